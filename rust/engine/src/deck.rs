use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};

/// Source of shuffled 52-card orders.
///
/// The seed is kept so a match can be replayed from its action log.
#[derive(Debug, Clone)]
pub struct Deck {
    seed: u64,
    rng: ChaCha20Rng,
}

impl Deck {
    pub fn new_with_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self::new_with_seed(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns a fresh, uniformly shuffled ordering of all 52 cards.
    /// Each call advances the RNG, so consecutive orders are independent.
    pub fn shuffled(&mut self) -> Vec<Card> {
        let mut cards = full_deck();
        cards.shuffle(&mut self.rng);
        cards
    }
}

/// One-shot shuffle backed by an entropy-seeded deck.
pub fn shuffled_deck() -> Vec<Card> {
    Deck::from_entropy().shuffled()
}
