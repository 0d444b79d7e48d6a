//! Slap validation over the top of the pile.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};
use crate::pile::Pile;

/// A pile pattern that entitles a slapper to the whole pile.
/// Variants are listed in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlapRule {
    /// Top two cards share a rank.
    Double,
    /// Top card matches the third card down.
    Sandwich,
    /// Top two number cards sum to ten.
    Tens,
    /// King and Queen on top, either order.
    Marriage,
    /// Top card matches the bottom card (three or more cards).
    TopBottom,
}

impl SlapRule {
    pub const ALL: [SlapRule; 5] = [
        SlapRule::Double,
        SlapRule::Sandwich,
        SlapRule::Tens,
        SlapRule::Marriage,
        SlapRule::TopBottom,
    ];

    /// Checks this single rule against a top-first card slice.
    pub fn matches(self, pile: &[Card]) -> bool {
        match (self, pile) {
            (SlapRule::Double, [a, b, ..]) => a.same_rank(b),
            (SlapRule::Sandwich, [a, _, c, ..]) => a.same_rank(c),
            (SlapRule::Tens, [a, b, ..]) => matches!(
                (a.rank.pip_value(), b.rank.pip_value()),
                (Some(x), Some(y)) if x + y == 10
            ),
            (SlapRule::Marriage, [a, b, ..]) => matches!(
                (a.rank, b.rank),
                (Rank::King, Rank::Queen) | (Rank::Queen, Rank::King)
            ),
            (SlapRule::TopBottom, [first, _, .., last]) => first.same_rank(last),
            _ => false,
        }
    }
}

/// Returns the first rule that fires for a top-first card slice.
///
/// # Examples
///
/// ```
/// use ratscrew_engine::cards::parse_cards;
/// use ratscrew_engine::rules::{matching_rule, SlapRule};
///
/// let pile = parse_cards("5♣ 9♦ 5♥").unwrap();
/// assert_eq!(matching_rule(&pile), Some(SlapRule::Sandwich));
///
/// let pile = parse_cards("2♠ 5♥").unwrap();
/// assert_eq!(matching_rule(&pile), None);
/// ```
pub fn matching_rule(pile: &[Card]) -> Option<SlapRule> {
    SlapRule::ALL.into_iter().find(|rule| rule.matches(pile))
}

pub fn is_slappable(pile: &[Card]) -> bool {
    matching_rule(pile).is_some()
}

impl Pile {
    pub fn matching_rule(&mut self) -> Option<SlapRule> {
        matching_rule(self.make_contiguous())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn rule(s: &str) -> Option<SlapRule> {
        matching_rule(&parse_cards(s).unwrap())
    }

    #[test]
    fn short_piles_never_slappable() {
        assert_eq!(rule(""), None);
        assert_eq!(rule("7♥"), None);
    }

    #[test]
    fn top_bottom_needs_three_cards() {
        // a two-card pile's "bottom" is the second card; only Double may fire there
        assert_eq!(rule("3♠ 3♣"), Some(SlapRule::Double));
        assert_eq!(rule("3♠ 8♥ 3♣"), Some(SlapRule::Sandwich));
        assert_eq!(rule("3♠ 8♥ 9♦ 3♣"), Some(SlapRule::TopBottom));
    }

    #[test]
    fn tens_excludes_aces_and_faces() {
        assert_eq!(rule("A♠ 9♥"), None);
        assert_eq!(rule("10♠ Q♥"), None);
        assert_eq!(rule("5♠ 5♥"), Some(SlapRule::Double));
        assert_eq!(rule("8♠ 2♥"), Some(SlapRule::Tens));
    }

    #[test]
    fn rules_only_look_at_the_top() {
        assert_eq!(rule("2♠ 7♥ 7♠"), None);
        assert_eq!(rule("J♦ K♠ Q♥"), None);
    }

    #[test]
    fn pile_matches_after_mixed_placement() {
        let cards = parse_cards("3♣ 8♥ 3♠").unwrap();
        let mut pile = Pile::new();
        pile.burn_to_bottom(cards[0]);
        pile.place_on_top(cards[1]);
        pile.place_on_top(cards[2]);

        assert_eq!(pile.matching_rule(), Some(SlapRule::Sandwich));
        assert_eq!(pile.to_vec(), vec![cards[2], cards[1], cards[0]]);
    }
}
