//! # ratscrew-engine: Two-Seat Slap Game Rules
//!
//! The authoritative rules engine for an Egyptian-Ratscrew style match between
//! two seats sharing one pile. It arbitrates two competing actions, playing a
//! card and slapping the pile, and produces the same outcome for the same
//! sequence of intents regardless of how they were delivered.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card), chase counts, parsing
//! - [`deck`] - Seeded ChaCha20 shuffling of the 52-card set
//! - [`player`] - FIFO hands
//! - [`pile`] - The shared pile (top at index 0)
//! - [`rules`] - Slap pattern matcher
//! - [`challenge`] - Face-card chase tracking
//! - [`seats`] - Session-to-seat binding
//! - [`engine`] - The match state machine
//! - [`game`] - Outcomes and the observable match state
//! - [`logger`] - Action records, JSONL logging and replay input
//! - [`errors`] - Error types for parsing and logging
//!
//! ## Quick Start
//!
//! ```rust
//! use ratscrew_engine::cards::parse_cards;
//! use ratscrew_engine::rules::{is_slappable, matching_rule, SlapRule};
//!
//! // Marriage: a King and a Queen on top, in either order
//! let pile = parse_cards("K♠ Q♥ 4♦").unwrap();
//! assert!(is_slappable(&pile));
//! assert_eq!(matching_rule(&pile), Some(SlapRule::Marriage));
//! ```
//!
//! ## Deterministic Gameplay
//!
//! Deals are reproducible from the deck seed, so a recorded match replays exactly:
//!
//! ```rust
//! use ratscrew_engine::engine::Match;
//!
//! let mut table = Match::new_with_seed(42);
//! table.join("a");
//! table.join("b");
//! table.play("a");
//! table.slap("b");
//!
//! let replayed = Match::replay(&table.record("20250101-000001"));
//! assert_eq!(replayed.snapshot(), table.snapshot());
//! ```

pub mod cards;
pub mod challenge;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod game;
pub mod logger;
pub mod pile;
pub mod player;
pub mod rules;
pub mod seats;
