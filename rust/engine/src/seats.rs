use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier the transport assigns to a connected client.
pub type SessionId = String;

/// One of the two player slots at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    pub const BOTH: [Seat; 2] = [Seat::First, Seat::Second];

    pub fn index(self) -> usize {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }

    /// 1-indexed seat number as shown to players.
    pub fn number(self) -> usize {
        self.index() + 1
    }

    pub fn other(self) -> Seat {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// Binds at most two sessions to the two seats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatTable {
    sessions: [Option<SessionId>; 2],
}

impl SeatTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the session to the lowest free seat. A session that is already
    /// seated keeps its seat. Returns `None` when both seats are taken.
    pub fn bind(&mut self, session: &str) -> Option<Seat> {
        if let Some(seat) = self.seat_of(session) {
            return Some(seat);
        }
        let seat = Seat::BOTH
            .into_iter()
            .find(|seat| self.sessions[seat.index()].is_none())?;
        self.sessions[seat.index()] = Some(session.to_string());
        Some(seat)
    }

    /// Binds a session to a specific seat, replacing whoever held it.
    pub fn assign(&mut self, seat: Seat, session: &str) {
        self.sessions[seat.index()] = Some(session.to_string());
    }

    pub fn unbind(&mut self, session: &str) -> Option<Seat> {
        let seat = self.seat_of(session)?;
        self.sessions[seat.index()] = None;
        Some(seat)
    }

    pub fn seat_of(&self, session: &str) -> Option<Seat> {
        Seat::BOTH
            .into_iter()
            .find(|seat| self.sessions[seat.index()].as_deref() == Some(session))
    }

    pub fn session_at(&self, seat: Seat) -> Option<&SessionId> {
        self.sessions[seat.index()].as_ref()
    }

    pub fn occupied_count(&self) -> usize {
        self.sessions.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.occupied_count() == 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_lowest_free_seat() {
        let mut table = SeatTable::new();
        assert_eq!(table.bind("a"), Some(Seat::First));
        assert_eq!(table.bind("b"), Some(Seat::Second));
        assert_eq!(table.bind("c"), None);
        assert_eq!(table.unbind("a"), Some(Seat::First));
        assert_eq!(table.bind("c"), Some(Seat::First));
        assert_eq!(table.seat_of("b"), Some(Seat::Second));
    }

    #[test]
    fn rebinding_keeps_seat() {
        let mut table = SeatTable::new();
        table.bind("a");
        assert_eq!(table.bind("a"), Some(Seat::First));
        assert_eq!(table.occupied_count(), 1);
        assert_eq!(table.unbind("ghost"), None);
    }
}
