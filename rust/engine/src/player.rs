use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// A seat's face-down stack of cards.
/// Cards are played from the front and won cards are appended to the back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: VecDeque<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw_front(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }

    /// Appends won cards in the order given.
    pub fn collect<I: IntoIterator<Item = Card>>(&mut self, cards: I) {
        self.cards.extend(cards);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn front(&self) -> Option<&Card> {
        self.cards.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn to_vec(&self) -> Vec<Card> {
        self.cards.iter().copied().collect()
    }
}

impl From<Vec<Card>> for Hand {
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
    fn hand_is_fifo() {
        let mut hand = Hand::from(parse_cards("2♠ 3♠").unwrap());
        hand.collect(parse_cards("9♥ K♦").unwrap());
        let order: Vec<String> = std::iter::from_fn(|| hand.draw_front())
            .map(|c| c.to_string())
            .collect();
        assert_eq!(order, ["2♠", "3♠", "9♥", "K♦"]);
        assert!(hand.is_empty());
    }
}
