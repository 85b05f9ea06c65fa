//! Daily word-guessing game
//!
//! A fixed grid of six five-letter guesses. Each submitted row is scored
//! letter by letter against the day's answer.

mod game;
mod matching;
mod words;

pub use game::*;
pub use matching::*;
pub use words::*;

/// Letters per word
pub const WORD_LENGTH: usize = 5;

/// Guesses per game
pub const MAX_GUESSES: usize = 6;
