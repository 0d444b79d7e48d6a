use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// The shared stack of played cards. Index 0 is the top (most recently played).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pile {
    cards: VecDeque<Card>,
}

impl Pile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place_on_top(&mut self, card: Card) {
        self.cards.push_front(card);
    }

    /// Penalty placement for a false slap.
    pub fn burn_to_bottom(&mut self, card: Card) {
        self.cards.push_back(card);
    }

    pub fn top(&self) -> Option<&Card> {
        self.cards.front()
    }

    pub fn bottom(&self) -> Option<&Card> {
        self.cards.back()
    }

    pub fn get(&self, depth: usize) -> Option<&Card> {
        self.cards.get(depth)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Empties the pile and returns its cards bottom first, so the most
    /// recently played card is last when appended to a hand.
    pub fn take_all(&mut self) -> Vec<Card> {
        self.cards.drain(..).rev().collect()
    }

    /// Discards every card, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let n = self.cards.len();
        self.cards.clear();
        n
    }

    /// Top-first view of the pile without copying it.
    pub fn make_contiguous(&mut self) -> &[Card] {
        self.cards.make_contiguous()
    }

    /// Top-first copy of the pile.
    pub fn to_vec(&self) -> Vec<Card> {
        self.cards.iter().copied().collect()
    }
}

impl From<Vec<Card>> for Pile {
    /// Builds a pile from a top-first list.
    fn from(cards: Vec<Card>) -> Self {
        Self {
            cards: cards.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    #[test]
    fn plays_go_on_top_and_burns_to_bottom() {
        let mut pile = Pile::new();
        let cards = parse_cards("2♠ 5♥ 9♣").unwrap();
        pile.place_on_top(cards[0]);
        pile.place_on_top(cards[1]);
        pile.burn_to_bottom(cards[2]);
        assert_eq!(pile.to_vec(), vec![cards[1], cards[0], cards[2]]);
        assert_eq!(pile.top(), Some(&cards[1]));
        assert_eq!(pile.bottom(), Some(&cards[2]));
    }

    #[test]
    fn take_all_reverses_and_clears() {
        let mut pile = Pile::from(parse_cards("K♠ 4♦ 8♥").unwrap());
        let taken = pile.take_all();
        assert_eq!(taken, parse_cards("8♥ 4♦ K♠").unwrap());
        assert!(pile.is_empty());
    }
}
