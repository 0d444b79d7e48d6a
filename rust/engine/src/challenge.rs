use serde::{Deserialize, Serialize};

use crate::cards::Rank;
use crate::seats::Seat;

/// An unanswered face-card chase.
///
/// The opponent of `challenger` must play `remaining` more cards; if none of
/// them is a face card the challenger takes the pile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub challenger: Seat,
    pub remaining: u8,
}

/// Result of answering a chase with a non-face card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeAnswer {
    Resolved { challenger: Seat },
    Pending(Challenge),
}

impl Challenge {
    /// Opens a chase for a face rank. Returns `None` for number cards.
    ///
    /// ```
    /// use ratscrew_engine::cards::Rank;
    /// use ratscrew_engine::challenge::Challenge;
    /// use ratscrew_engine::seats::Seat;
    ///
    /// let chase = Challenge::open(Seat::First, Rank::King).unwrap();
    /// assert_eq!(chase.remaining, 3);
    /// assert!(Challenge::open(Seat::First, Rank::Nine).is_none());
    /// ```
    pub fn open(challenger: Seat, rank: Rank) -> Option<Challenge> {
        rank.chase_count().map(|remaining| Challenge {
            challenger,
            remaining,
        })
    }

    pub fn answer(self) -> ChallengeAnswer {
        match self.remaining {
            0 | 1 => ChallengeAnswer::Resolved {
                challenger: self.challenger,
            },
            n => ChallengeAnswer::Pending(Challenge {
                remaining: n - 1,
                ..self
            }),
        }
    }

    /// Seat that has to answer the chase.
    pub fn chaser(&self) -> Seat {
        self.challenger.other()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ace_takes_four_answers() {
        let mut chase = Challenge::open(Seat::Second, Rank::Ace).unwrap();
        for expected in [3, 2, 1] {
            match chase.answer() {
                ChallengeAnswer::Pending(next) => {
                    assert_eq!(next.remaining, expected);
                    assert_eq!(next.challenger, Seat::Second);
                    chase = next;
                }
                other => panic!("resolved early: {other:?}"),
            }
        }
        assert_eq!(
            chase.answer(),
            ChallengeAnswer::Resolved {
                challenger: Seat::Second
            }
        );
    }

    #[test]
    fn jack_resolves_on_first_answer() {
        let chase = Challenge::open(Seat::First, Rank::Jack).unwrap();
        assert_eq!(chase.chaser(), Seat::Second);
        assert!(matches!(chase.answer(), ChallengeAnswer::Resolved { .. }));
    }
}
