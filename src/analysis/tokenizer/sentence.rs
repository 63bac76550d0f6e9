//! Sentence boundary detection.
//!
//! Word tokenization treats a period differently at the end of a sentence
//! than in the middle of one, so messages are split into sentences first.
//! The rules follow the behaviour of the pre-trained English Punkt model on
//! lowercased text:
//!
//! - `?` and `!` always end a sentence when followed by whitespace.
//! - A single `.` followed by whitespace ends a sentence unless the word in
//!   front of it is a known abbreviation.
//! - Initials (`j.`) and numbers (`10.`) end a sentence only when the next
//!   word does not start with a lowercase letter.
//! - An ellipsis (`...`) never ends a sentence. Punkt only breaks after one
//!   when the next word is capitalized, which lowercased text never has.

use std::collections::HashSet;

use regex::Regex;

use crate::error::{Result, SpamcheckError};

/// Candidate sentence ends: a word, its terminal punctuation, optional closing
/// quotes or brackets, then whitespace.
const SENTENCE_END_PATTERN: &str = r#"(\S*?)([.?!]+)(["')\]}»”’]*)\s+"#;

/// Abbreviations that never end a sentence.
const DEFAULT_ABBREVIATIONS: &[&str] = &[
    "a.m", "p.m", "e.g", "i.e", "etc", "vs", "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st",
    "mt", "ft", "inc", "ltd", "co", "corp", "dept", "est", "approx", "jan", "feb", "mar", "apr",
    "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec", "u.s", "u.k", "gen", "col", "capt",
    "sgt", "lt", "rev", "gov", "sen", "rep", "no", "nos", "fig", "vol", "pp", "ed", "cf",
];

/// Splits text into sentences.
#[derive(Clone, Debug)]
pub struct SentenceSplitter {
    boundary: Regex,
    abbreviations: HashSet<String>,
}

impl SentenceSplitter {
    /// Create a splitter with the default English abbreviation list.
    pub fn new() -> Result<Self> {
        Self::with_abbreviations(DEFAULT_ABBREVIATIONS.iter().copied())
    }

    /// Create a splitter with a custom abbreviation list (lowercase, no trailing period).
    pub fn with_abbreviations<I, S>(abbreviations: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let boundary = Regex::new(SENTENCE_END_PATTERN)
            .map_err(|e| SpamcheckError::analysis(format!("Invalid sentence pattern: {e}")))?;

        Ok(SentenceSplitter {
            boundary,
            abbreviations: abbreviations.into_iter().map(Into::into).collect(),
        })
    }

    /// Check whether `word` is treated as an abbreviation.
    pub fn is_abbreviation(&self, word: &str) -> bool {
        self.abbreviations.contains(word)
    }

    /// Split `text` into trimmed, non-empty sentences.
    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut sentences = Vec::new();
        let mut start = 0;

        for caps in self.boundary.captures_iter(text) {
            let (Some(whole), Some(word), Some(terminator), Some(closers)) =
                (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
            else {
                continue;
            };

            let next = text[whole.end()..].chars().next();
            if self.is_boundary(word.as_str(), terminator.as_str(), next) {
                Self::push_trimmed(&mut sentences, &text[start..closers.end()]);
                start = whole.end();
            }
        }

        Self::push_trimmed(&mut sentences, &text[start..]);
        sentences
    }

    fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, sentence: &'a str) {
        let sentence = sentence.trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
    }

    fn is_boundary(&self, word: &str, terminator: &str, next: Option<char>) -> bool {
        if terminator.contains(['?', '!']) {
            return true;
        }

        // Ellipsis
        if terminator.len() > 1 {
            return false;
        }

        let next_is_lowercase = next.is_some_and(char::is_lowercase);

        let core = word.trim_start_matches(|c: char| !c.is_alphanumeric());
        if self.is_abbreviation(core) {
            return false;
        }

        let mut chars = core.chars();
        let is_initial = matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic());
        let is_number = core.chars().any(|c| c.is_ascii_digit())
            && core.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.');

        !((is_initial || is_number) && next_is_lowercase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_terminal_punctuation() {
        let splitter = SentenceSplitter::new().unwrap();
        let sentences = splitter.split("congratulations! you've won. click here? now");

        assert_eq!(
            sentences,
            vec!["congratulations!", "you've won.", "click here?", "now"]
        );
    }

    #[test]
    fn test_no_split_inside_words() {
        let splitter = SentenceSplitter::new().unwrap();
        let sentences = splitter.split("visit bit.ly/winprize123 or call 3.50 now");

        assert_eq!(sentences, vec!["visit bit.ly/winprize123 or call 3.50 now"]);
    }

    #[test]
    fn test_abbreviations_initials_and_numbers() {
        let splitter = SentenceSplitter::new().unwrap();

        assert_eq!(splitter.split("ask mr. smith today"), vec!["ask mr. smith today"]);
        assert_eq!(splitter.split("by j. doe"), vec!["by j. doe"]);
        assert_eq!(splitter.split("call 0800. then wait"), vec!["call 0800. then wait"]);
        assert_eq!(splitter.split("wait... what"), vec!["wait... what"]);
        assert_eq!(splitter.split("wait... 5 left"), vec!["wait... 5 left"]);
        assert_eq!(splitter.split("wait.. \"now\""), vec!["wait.. \"now\""]);
        assert_eq!(
            splitter.split("it cost 10. 5 left"),
            vec!["it cost 10.", "5 left"]
        );
    }

    #[test]
    fn test_closing_quotes_stay_with_sentence() {
        let splitter = SentenceSplitter::new().unwrap();
        let sentences = splitter.split("he said \"win!\" then left");

        assert_eq!(sentences, vec!["he said \"win!\"", "then left"]);
    }

    #[test]
    fn test_empty_and_whitespace() {
        let splitter = SentenceSplitter::new().unwrap();
        assert!(splitter.split("").is_empty());
        assert!(splitter.split("   \n\t ").is_empty());
    }
}
