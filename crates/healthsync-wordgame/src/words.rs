//! Answer word list and daily answer selection

use chrono::{Datelike, NaiveDate};

/// Built-in answer list
pub const WORDS: &[&str] = &[
    "heart", "pulse", "steps", "sleep", "water", "train", "brisk", "climb", "relax", "focus",
    "lunge", "squat", "plank", "swing", "march", "dance", "cycle", "jumps", "pedal", "renew",
    "fresh", "vital", "sport", "shape", "still", "quiet", "dream", "awake", "light", "bloom",
    "salad", "fruit", "grain", "berry", "olive", "lemon", "honey", "mango", "peach", "apple",
];

/// Words usable as answers or guesses: five ASCII letters, lowercased
pub fn playable(words: &[&str]) -> Vec<String> {
    words
        .iter()
        .filter(|w| w.len() == crate::WORD_LENGTH && w.bytes().all(|b| b.is_ascii_alphabetic()))
        .map(|w| w.to_ascii_lowercase())
        .collect()
}

/// Pick the answer for `date` deterministically. None if `words` is empty.
pub fn daily_answer<S: AsRef<str>>(date: NaiveDate, words: &[S]) -> Option<&str> {
    if words.is_empty() {
        return None;
    }
    let index = date.num_days_from_ce().rem_euclid(words.len() as i32) as usize;
    words.get(index).map(AsRef::as_ref)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playable_drops_wrong_lengths() {
        let words = playable(&["Heart", "yoga", "stamina", "ab1cd"]);
        assert_eq!(words, vec!["heart".to_string()]);
        assert_eq!(playable(WORDS).len(), WORDS.len());
    }

    #[test]
    fn same_day_same_answer() {
        let words = playable(WORDS);
        let day = NaiveDate::from_ymd_opt(2025, 10, 3).unwrap();
        assert_eq!(daily_answer(day, &words), daily_answer(day, &words));
    }

    #[test]
    fn consecutive_days_rotate() {
        let words = ["aaaaa", "bbbbb"];
        let day = NaiveDate::from_ymd_opt(2025, 10, 3).unwrap();
        let next = day.succ_opt().unwrap();
        assert_ne!(daily_answer(day, &words), daily_answer(next, &words));
    }

    #[test]
    fn empty_list_has_no_answer() {
        let words: [&str; 0] = [];
        let day = NaiveDate::from_ymd_opt(2025, 10, 3).unwrap();
        assert_eq!(daily_answer(day, &words), None);
    }
}
