//! Letter-by-letter scoring of a guess

use serde::{Deserialize, Serialize};

use crate::WORD_LENGTH;

/// Score of one guessed letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterState {
    Absent,
    Present,
    Correct,
}

/// Score `guess` against `answer`.
///
/// Both must be `WORD_LENGTH` ASCII letters; case is ignored. A letter is
/// marked `Present` at most as many times as it still occurs in the answer
/// after exact matches are taken.
pub fn evaluate(guess: &str, answer: &str) -> [LetterState; WORD_LENGTH] {
    let guess: Vec<u8> = guess.bytes().map(|b| b.to_ascii_lowercase()).collect();
    let answer: Vec<u8> = answer.bytes().map(|b| b.to_ascii_lowercase()).collect();

    let mut states = [LetterState::Absent; WORD_LENGTH];
    let mut remaining = [0u8; 26];

    for i in 0..WORD_LENGTH {
        match (guess.get(i), answer.get(i)) {
            (Some(g), Some(a)) if g == a => states[i] = LetterState::Correct,
            (_, Some(a)) if a.is_ascii_lowercase() => remaining[(a - b'a') as usize] += 1,
            _ => {}
        }
    }

    for i in 0..WORD_LENGTH {
        if states[i] == LetterState::Correct {
            continue;
        }
        if let Some(g) = guess.get(i).filter(|g| g.is_ascii_lowercase()) {
            let slot = &mut remaining[(g - b'a') as usize];
            if *slot > 0 {
                *slot -= 1;
                states[i] = LetterState::Present;
            }
        }
    }

    states
}

#[cfg(test)]
mod tests {
    use super::*;
    use LetterState::*;

    #[test]
    fn exact_match_is_all_correct() {
        assert_eq!(evaluate("crane", "crane"), [Correct; 5]);
    }

    #[test]
    fn misplaced_letters_are_present() {
        assert_eq!(
            evaluate("nacre", "crane"),
            [Present, Present, Present, Present, Correct]
        );
    }

    #[test]
    fn duplicate_guess_letters_are_limited_by_answer() {
        // Two 'l's in the answer, both claimed by the first two guesses
        assert_eq!(
            evaluate("llama", "hello"),
            [Present, Present, Absent, Absent, Absent]
        );
        assert_eq!(
            evaluate("spool", "lopes"),
            [Present, Present, Present, Absent, Present]
        );
    }

    #[test]
    fn exact_matches_claim_letters_first() {
        // The last 'e' is exact, so the earlier ones are absent
        assert_eq!(
            evaluate("eerie", "crane"),
            [Absent, Absent, Present, Absent, Correct]
        );
        assert_eq!(
            evaluate("geese", "those"),
            [Absent, Absent, Absent, Correct, Correct]
        );
    }

    #[test]
    fn case_is_ignored() {
        assert_eq!(evaluate("CRANE", "crane"), [Correct; 5]);
    }
}
