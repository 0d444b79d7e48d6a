use crate::cards::Card;
use crate::challenge::{Challenge, ChallengeAnswer};
use crate::deck::Deck;
use crate::game::{IgnoreReason, MatchState, Outcome, Phase, PlayEffect, SeatState};
use crate::logger::{ActionRecord, Intent, MatchRecord};
use crate::pile::Pile;
use crate::player::Hand;
use crate::seats::{Seat, SeatTable, SessionId};

/// Authoritative state of the single two-seat match.
///
/// Every intent runs to completion synchronously and either applies a whole
/// transition or leaves the match untouched (reported as [`Outcome::Ignored`]).
/// Callers sharing a `Match` across threads must serialize access to it.
///
/// # Examples
///
/// ```
/// use ratscrew_engine::engine::Match;
/// use ratscrew_engine::game::{Outcome, Phase};
/// use ratscrew_engine::seats::Seat;
///
/// let mut table = Match::new_with_seed(7);
/// table.join("alice");
/// let outcome = table.join("bob");
/// assert_eq!(outcome, Outcome::Joined { seat: Seat::Second, dealt: true });
///
/// let state = table.snapshot();
/// assert_eq!(state.phase, Phase::Dealt);
/// assert_eq!(state.hand(Seat::First).len(), 26);
/// assert_eq!(state.total_cards(), 52);
///
/// // Only the seat whose turn it is may play.
/// assert!(table.play("bob").is_ignored());
/// assert!(!table.play("alice").is_ignored());
/// ```
#[derive(Debug, Clone)]
pub struct Match {
    seats: SeatTable,
    hands: [Hand; 2],
    pile: Pile,
    turn: Seat,
    challenge: Option<Challenge>,
    deck: Deck,
    seq: u64,
    history: Vec<ActionRecord>,
}

impl Match {
    pub fn new(deck: Deck) -> Self {
        Self {
            seats: SeatTable::new(),
            hands: [Hand::new(), Hand::new()],
            pile: Pile::new(),
            turn: Seat::First,
            challenge: None,
            deck,
            seq: 0,
            history: Vec::new(),
        }
    }

    pub fn new_with_seed(seed: u64) -> Self {
        Self::new(Deck::new_with_seed(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(Deck::from_entropy())
    }

    pub fn builder() -> MatchBuilder {
        MatchBuilder::default()
    }

    /// Seats a session. Deals a fresh deck 26/26 when this fills the table
    /// and both hands are empty.
    pub fn join(&mut self, session: &str) -> Outcome {
        if self.seats.seat_of(session).is_some() {
            return Outcome::ignored(IgnoreReason::AlreadySeated);
        }
        let Some(seat) = self.seats.bind(session) else {
            return Outcome::ignored(IgnoreReason::TableFull);
        };
        let dealt = self.seats.is_full() && self.hands.iter().all(Hand::is_empty);
        if dealt {
            self.deal();
        }
        self.commit(session, Intent::Join, Outcome::Joined { seat, dealt })
    }

    /// Unseats a session. With fewer than two seats left the pile is
    /// discarded; hands, turn and any open chase stay as they are.
    pub fn leave(&mut self, session: &str) -> Outcome {
        let Some(seat) = self.seats.unbind(session) else {
            return Outcome::ignored(IgnoreReason::NotSeated);
        };
        let discarded = if self.seats.is_full() {
            0
        } else {
            self.pile.clear()
        };
        self.commit(session, Intent::Leave, Outcome::Left { seat, discarded })
    }

    pub fn play(&mut self, session: &str) -> Outcome {
        match self.seats.seat_of(session) {
            Some(seat) => self.apply_play(seat, session),
            None => Outcome::ignored(IgnoreReason::NotSeated),
        }
    }

    pub fn slap(&mut self, session: &str) -> Outcome {
        match self.seats.seat_of(session) {
            Some(seat) => self.apply_slap(seat, session),
            None => Outcome::ignored(IgnoreReason::NotSeated),
        }
    }

    /// Seat-addressed play, for callers that track seats themselves.
    pub fn play_seat(&mut self, seat: Seat) -> Outcome {
        match self.seats.session_at(seat).cloned() {
            Some(session) => self.apply_play(seat, &session),
            None => Outcome::ignored(IgnoreReason::NotSeated),
        }
    }

    pub fn slap_seat(&mut self, seat: Seat) -> Outcome {
        match self.seats.session_at(seat).cloned() {
            Some(session) => self.apply_slap(seat, &session),
            None => Outcome::ignored(IgnoreReason::NotSeated),
        }
    }

    fn apply_play(&mut self, seat: Seat, session: &str) -> Outcome {
        if seat != self.turn {
            return Outcome::ignored(IgnoreReason::NotYourTurn);
        }
        let Some(card) = self.hands[seat.index()].draw_front() else {
            return Outcome::ignored(IgnoreReason::EmptyHand);
        };
        self.pile.place_on_top(card);

        // A face card always opens a fresh chase, superseding any open one.
        let effect = if let Some(chase) = Challenge::open(seat, card.rank) {
            self.challenge = Some(chase);
            self.turn = seat.other();
            PlayEffect::ChallengeOpened {
                remaining: chase.remaining,
            }
        } else if let Some(chase) = self.challenge.take() {
            match chase.answer() {
                ChallengeAnswer::Resolved { challenger } => {
                    let cards = self.award_pile(challenger);
                    self.turn = challenger;
                    PlayEffect::ChallengeWon {
                        winner: challenger,
                        cards,
                    }
                }
                ChallengeAnswer::Pending(next) => {
                    self.challenge = Some(next);
                    PlayEffect::ChallengeAnswered {
                        remaining: next.remaining,
                    }
                }
            }
        } else {
            self.turn = seat.other();
            PlayEffect::Passed
        };

        self.commit(session, Intent::Play, Outcome::Played { seat, card, effect })
    }

    fn apply_slap(&mut self, seat: Seat, session: &str) -> Outcome {
        if let Some(rule) = self.pile.matching_rule() {
            let cards = self.award_pile(seat);
            self.challenge = None;
            self.turn = seat;
            return self.commit(session, Intent::Slap, Outcome::SlapWon { seat, rule, cards });
        }
        match self.hands[seat.index()].draw_front() {
            Some(card) => {
                self.pile.burn_to_bottom(card);
                self.commit(session, Intent::Slap, Outcome::Burned { seat, card })
            }
            None => Outcome::ignored(IgnoreReason::NothingToBurn),
        }
    }

    fn award_pile(&mut self, seat: Seat) -> usize {
        let cards = self.pile.take_all();
        let n = cards.len();
        self.hands[seat.index()].collect(cards);
        n
    }

    fn deal(&mut self) {
        let mut cards = self.deck.shuffled();
        let second = cards.split_off(cards.len() / 2);
        self.hands[Seat::First.index()] = Hand::from(cards);
        self.hands[Seat::Second.index()] = Hand::from(second);
    }

    fn commit(&mut self, session: &str, intent: Intent, outcome: Outcome) -> Outcome {
        self.seq += 1;
        self.history.push(ActionRecord {
            seq: self.seq,
            session_id: session.to_string(),
            intent,
            outcome: outcome.clone(),
            ts: None,
        });
        outcome
    }

    pub fn apply(&mut self, session: &str, intent: Intent) -> Outcome {
        match intent {
            Intent::Join => self.join(session),
            Intent::Leave => self.leave(session),
            Intent::Play => self.play(session),
            Intent::Slap => self.slap(session),
        }
    }

    pub fn snapshot(&self) -> MatchState {
        let seats = Seat::BOTH.map(|seat| SeatState {
            seat,
            session_id: self.seats.session_at(seat).cloned(),
            hand: self.hands[seat.index()].to_vec(),
        });
        MatchState {
            seats,
            pile: self.pile.to_vec(),
            turn: self.turn,
            challenge: self.challenge,
            phase: self.phase(),
        }
    }

    pub fn phase(&self) -> Phase {
        if !self.seats.is_full() {
            Phase::WaitingForPlayers
        } else if self.challenge.is_some() {
            Phase::Challenged
        } else {
            Phase::Dealt
        }
    }

    pub fn seat_of(&self, session: &str) -> Option<Seat> {
        self.seats.seat_of(session)
    }

    pub fn session_at(&self, seat: Seat) -> Option<&SessionId> {
        self.seats.session_at(seat)
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn pile(&self) -> &Pile {
        &self.pile
    }

    pub fn turn(&self) -> Seat {
        self.turn
    }

    pub fn challenge(&self) -> Option<Challenge> {
        self.challenge
    }

    pub fn total_cards(&self) -> usize {
        self.pile.len() + self.hands.iter().map(Hand::len).sum::<usize>()
    }

    pub fn seed(&self) -> u64 {
        self.deck.seed()
    }

    /// Accepted transitions not yet drained, in the order they were applied.
    pub fn history(&self) -> &[ActionRecord] {
        &self.history
    }

    /// Hands over the buffered transitions. Long-lived owners call this after
    /// each intent so the buffer stays bounded; `seq` keeps counting.
    pub fn drain_history(&mut self) -> Vec<ActionRecord> {
        std::mem::take(&mut self.history)
    }

    pub fn record(&self, match_id: impl Into<String>) -> MatchRecord {
        MatchRecord {
            match_id: match_id.into(),
            seed: self.seed(),
            actions: self.history.clone(),
        }
    }

    /// Rebuilds a match by re-applying a recorded action sequence to a fresh
    /// match dealt from the same seed.
    pub fn replay(record: &MatchRecord) -> Match {
        let mut table = Match::new_with_seed(record.seed);
        for action in &record.actions {
            table.apply(&action.session_id, action.intent);
        }
        table
    }
}

/// Arranges a match in a given position, mainly for tests and tooling.
///
/// ```
/// use ratscrew_engine::cards::parse_cards;
/// use ratscrew_engine::engine::Match;
/// use ratscrew_engine::game::Outcome;
/// use ratscrew_engine::seats::Seat;
///
/// let mut table = Match::builder()
///     .seat(Seat::First, "alice")
///     .seat(Seat::Second, "bob")
///     .hand(Seat::First, parse_cards("3♦").unwrap())
///     .pile(parse_cards("7♥ 7♠").unwrap())
///     .build();
///
/// assert!(matches!(table.slap("bob"), Outcome::SlapWon { cards: 2, .. }));
/// assert_eq!(table.turn(), Seat::Second);
/// ```
#[derive(Debug, Default)]
pub struct MatchBuilder {
    seed: Option<u64>,
    sessions: [Option<SessionId>; 2],
    hands: [Vec<Card>; 2],
    pile: Vec<Card>,
    turn: Option<Seat>,
    challenge: Option<Challenge>,
}

impl MatchBuilder {
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn seat(mut self, seat: Seat, session: impl Into<SessionId>) -> Self {
        self.sessions[seat.index()] = Some(session.into());
        self
    }

    pub fn hand(mut self, seat: Seat, cards: Vec<Card>) -> Self {
        self.hands[seat.index()] = cards;
        self
    }

    /// Top-first pile contents.
    pub fn pile(mut self, cards: Vec<Card>) -> Self {
        self.pile = cards;
        self
    }

    pub fn turn(mut self, seat: Seat) -> Self {
        self.turn = Some(seat);
        self
    }

    pub fn challenge(mut self, challenge: Challenge) -> Self {
        self.challenge = Some(challenge);
        self
    }

    pub fn build(self) -> Match {
        let deck = match self.seed {
            Some(seed) => Deck::new_with_seed(seed),
            None => Deck::from_entropy(),
        };
        let mut table = Match::new(deck);
        for seat in Seat::BOTH {
            if let Some(session) = &self.sessions[seat.index()] {
                table.seats.assign(seat, session);
            }
        }
        let [first, second] = self.hands;
        table.hands = [Hand::from(first), Hand::from(second)];
        table.pile = Pile::from(self.pile);
        table.turn = self
            .turn
            .or(self.challenge.map(|c| c.chaser()))
            .unwrap_or(Seat::First);
        table.challenge = self.challenge;
        table
    }
}
