use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::challenge::Challenge;
use crate::rules::SlapRule;
use crate::seats::{Seat, SessionId};

/// Coarse state of the match state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Fewer than two seats occupied.
    WaitingForPlayers,
    /// Both seats occupied, no chase in flight.
    Dealt,
    /// Both seats occupied and a face-card chase is open.
    Challenged,
}

/// Why an intent left the match untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    TableFull,
    AlreadySeated,
    NotSeated,
    NotYourTurn,
    EmptyHand,
    NothingToBurn,
}

/// What a non-slap play did to the turn and the chase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayEffect {
    /// Plain card, turn passed to the opponent.
    Passed,
    /// Face card opened (or replaced) a chase and passed the turn.
    ChallengeOpened { remaining: u8 },
    /// Number card answered an open chase; the same seat plays again.
    ChallengeAnswered { remaining: u8 },
    /// Final answer played: the challenger took the pile and the turn.
    ChallengeWon { winner: Seat, cards: usize },
}

/// Diagnostic result of applying one intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    Joined {
        seat: Seat,
        dealt: bool,
    },
    Left {
        seat: Seat,
        discarded: usize,
    },
    Played {
        seat: Seat,
        card: Card,
        effect: PlayEffect,
    },
    SlapWon {
        seat: Seat,
        rule: SlapRule,
        cards: usize,
    },
    Burned {
        seat: Seat,
        card: Card,
    },
    Ignored {
        reason: IgnoreReason,
    },
}

impl Outcome {
    pub(crate) fn ignored(reason: IgnoreReason) -> Self {
        Outcome::Ignored { reason }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, Outcome::Ignored { .. })
    }

    pub fn seat(&self) -> Option<Seat> {
        match self {
            Outcome::Joined { seat, .. }
            | Outcome::Left { seat, .. }
            | Outcome::Played { seat, .. }
            | Outcome::SlapWon { seat, .. }
            | Outcome::Burned { seat, .. } => Some(*seat),
            Outcome::Ignored { .. } => None,
        }
    }

    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Joined { .. } => "joined",
            Outcome::Left { .. } => "left",
            Outcome::Played { .. } => "played",
            Outcome::SlapWon { .. } => "slap_won",
            Outcome::Burned { .. } => "burned",
            Outcome::Ignored { .. } => "ignored",
        }
    }

    /// Text the transport announces to every observer, if any.
    ///
    /// ```
    /// use ratscrew_engine::game::Outcome;
    /// use ratscrew_engine::rules::SlapRule;
    /// use ratscrew_engine::seats::Seat;
    ///
    /// let outcome = Outcome::SlapWon { seat: Seat::Second, rule: SlapRule::Double, cards: 6 };
    /// assert_eq!(outcome.notification().as_deref(), Some("Player 2 won the slap!"));
    /// ```
    pub fn notification(&self) -> Option<String> {
        match self {
            Outcome::SlapWon { seat, .. } => Some(format!("Player {} won the slap!", seat.number())),
            _ => None,
        }
    }
}

/// One seat as seen by observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatState {
    pub seat: Seat,
    pub session_id: Option<SessionId>,
    pub hand: Vec<Card>,
}

/// Read-only projection of the match, broadcast after every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub seats: [SeatState; 2],
    /// Top first.
    pub pile: Vec<Card>,
    pub turn: Seat,
    pub challenge: Option<Challenge>,
    pub phase: Phase,
}

impl MatchState {
    pub fn hand(&self, seat: Seat) -> &[Card] {
        &self.seats[seat.index()].hand
    }

    pub fn occupied_count(&self) -> usize {
        self.seats.iter().filter(|s| s.session_id.is_some()).count()
    }

    pub fn total_cards(&self) -> usize {
        self.pile.len() + self.seats.iter().map(|s| s.hand.len()).sum::<usize>()
    }
}
