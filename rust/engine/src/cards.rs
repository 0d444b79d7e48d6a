use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CardParseError;

/// Represents one of the four suits in a standard 52-card deck.
/// Suits never matter to the slap rules; they only make every card unique.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs suit (♣)
    Clubs,
    /// Diamonds suit (♦)
    Diamonds,
    /// Hearts suit (♥)
    Hearts,
    /// Spades suit (♠)
    Spades,
}

impl Suit {
    pub fn symbol(self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }

    fn from_char(c: char) -> Option<Suit> {
        match c {
            '♣' | 'C' | 'c' => Some(Suit::Clubs),
            '♦' | 'D' | 'd' => Some(Suit::Diamonds),
            '♥' | 'H' | 'h' => Some(Suit::Hearts),
            '♠' | 'S' | 's' => Some(Suit::Spades),
            _ => None,
        }
    }
}

/// Represents the rank of a playing card from Ace through King.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    /// Ace (opens a four-card chase)
    Ace = 1,
    /// Rank 2
    Two,
    /// Rank 3
    Three,
    /// Rank 4
    Four,
    /// Rank 5
    Five,
    /// Rank 6
    Six,
    /// Rank 7
    Seven,
    /// Rank 8
    Eight,
    /// Rank 9
    Nine,
    /// Rank 10
    Ten,
    /// Jack (opens a one-card chase)
    Jack,
    /// Queen (opens a two-card chase)
    Queen,
    /// King (opens a three-card chase)
    King,
}

impl Rank {
    /// Face value of a number card, `None` for A, J, Q and K.
    ///
    /// ```
    /// use ratscrew_engine::cards::Rank;
    ///
    /// assert_eq!(Rank::Ten.pip_value(), Some(10));
    /// assert_eq!(Rank::Ace.pip_value(), None);
    /// ```
    pub fn pip_value(self) -> Option<u8> {
        match self {
            Rank::Ace | Rank::Jack | Rank::Queen | Rank::King => None,
            numeric => Some(numeric as u8),
        }
    }

    /// Number of cards the opponent must play to answer a chase opened by this rank.
    pub fn chase_count(self) -> Option<u8> {
        match self {
            Rank::Jack => Some(1),
            Rank::Queen => Some(2),
            Rank::King => Some(3),
            Rank::Ace => Some(4),
            _ => None,
        }
    }

    pub fn is_face(self) -> bool {
        self.chase_count().is_some()
    }

    pub fn label(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }

    fn from_label(label: &str) -> Option<Rank> {
        all_ranks()
            .into_iter()
            .find(|rank| rank.label().eq_ignore_ascii_case(label))
    }
}

/// A single playing card.
///
/// Derived equality is structural so decks can be checked for duplicates;
/// the game rules compare cards with [`Card::same_rank`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub fn same_rank(&self, other: &Card) -> bool {
        self.rank == other.rank
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit.symbol())
    }
}

impl FromStr for Card {
    type Err = CardParseError;

    /// Parses `"7♥"`, `"10♠"` or the ASCII forms `"7H"`, `"qs"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let suit_char = s.chars().last().ok_or(CardParseError::Empty)?;
        let suit = Suit::from_char(suit_char)
            .ok_or_else(|| CardParseError::UnknownSuit(suit_char.to_string()))?;
        let rank_part = &s[..s.len() - suit_char.len_utf8()];
        let rank = Rank::from_label(rank_part)
            .ok_or_else(|| CardParseError::UnknownRank(rank_part.to_string()))?;
        Ok(Card { rank, suit })
    }
}

pub fn all_suits() -> [Suit; 4] {
    [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs]
}

pub fn all_ranks() -> [Rank; 13] {
    [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ]
}

pub fn full_deck() -> Vec<Card> {
    let mut v = Vec::with_capacity(52);
    for &s in &all_suits() {
        for &r in &all_ranks() {
            v.push(Card { rank: r, suit: s });
        }
    }
    v
}

/// Parses a whitespace separated list of cards, e.g. `"7♥ 7♠"`.
pub fn parse_cards(s: &str) -> Result<Vec<Card>, CardParseError> {
    s.split_whitespace().map(str::parse).collect()
}
