//! Game state: the guess grid, submission rules, and keyboard hints

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::{LetterState, MAX_GUESSES, WORD_LENGTH, evaluate};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Not enough letters")]
    IncompleteRow,

    #[error("Not in word list: {0}")]
    UnknownWord(String),

    #[error("Game is over")]
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

/// A scored row of the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredGuess {
    pub word: String,
    pub states: [LetterState; WORD_LENGTH],
}

impl ScoredGuess {
    pub fn is_solved(&self) -> bool {
        self.states.iter().all(|s| *s == LetterState::Correct)
    }
}

#[derive(Debug, Clone)]
pub struct Game {
    answer: String,
    dictionary: Option<HashSet<String>>,
    guesses: Vec<ScoredGuess>,
    current: String,
    keyboard: BTreeMap<char, LetterState>,
}

impl Game {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into().to_ascii_lowercase(),
            dictionary: None,
            guesses: Vec::with_capacity(MAX_GUESSES),
            current: String::with_capacity(WORD_LENGTH),
            keyboard: BTreeMap::new(),
        }
    }

    /// Only accept guesses found in `words`
    pub fn with_dictionary<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.dictionary = Some(
            words
                .into_iter()
                .map(|w| w.as_ref().to_ascii_lowercase())
                .collect(),
        );
        self
    }

    pub fn status(&self) -> GameStatus {
        if self.guesses.last().is_some_and(ScoredGuess::is_solved) {
            GameStatus::Won
        } else if self.guesses.len() >= MAX_GUESSES {
            GameStatus::Lost
        } else {
            GameStatus::InProgress
        }
    }

    /// The answer, once the game is over
    pub fn reveal(&self) -> Option<&str> {
        (self.status() != GameStatus::InProgress).then_some(self.answer.as_str())
    }

    pub fn guesses(&self) -> &[ScoredGuess] {
        &self.guesses
    }

    /// Letters typed into the active row
    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn remaining_guesses(&self) -> usize {
        MAX_GUESSES - self.guesses.len()
    }

    /// Best state seen so far for `letter`
    pub fn hint(&self, letter: char) -> Option<LetterState> {
        self.keyboard.get(&letter.to_ascii_lowercase()).copied()
    }

    pub fn keyboard(&self) -> &BTreeMap<char, LetterState> {
        &self.keyboard
    }

    /// Type a letter into the active row. Returns false if it was ignored.
    pub fn push_letter(&mut self, letter: char) -> bool {
        if self.status() != GameStatus::InProgress
            || self.current.len() >= WORD_LENGTH
            || !letter.is_ascii_alphabetic()
        {
            return false;
        }
        self.current.push(letter.to_ascii_lowercase());
        true
    }

    pub fn pop_letter(&mut self) -> Option<char> {
        self.current.pop()
    }

    /// Score the active row and move to the next one
    pub fn submit(&mut self) -> Result<&ScoredGuess, GameError> {
        if self.status() != GameStatus::InProgress {
            return Err(GameError::Finished);
        }
        if self.current.len() != WORD_LENGTH {
            return Err(GameError::IncompleteRow);
        }
        if let Some(dictionary) = &self.dictionary
            && !dictionary.contains(&self.current)
        {
            return Err(GameError::UnknownWord(self.current.clone()));
        }

        let word = std::mem::take(&mut self.current);
        let states = evaluate(&word, &self.answer);

        for (letter, state) in word.chars().zip(states) {
            let best = self.keyboard.entry(letter).or_insert(state);
            *best = (*best).max(state);
        }

        self.guesses.push(ScoredGuess { word, states });
        Ok(&self.guesses[self.guesses.len() - 1])
    }

    /// Type and submit a whole word
    pub fn guess(&mut self, word: &str) -> Result<&ScoredGuess, GameError> {
        if self.status() != GameStatus::InProgress {
            return Err(GameError::Finished);
        }
        self.current.clear();
        for letter in word.chars() {
            self.push_letter(letter);
        }
        if word.chars().count() != self.current.len() {
            self.current.clear();
            return Err(GameError::IncompleteRow);
        }
        self.submit()
    }
}
