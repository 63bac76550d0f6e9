//! Stop filter implementation.
//!
//! Removes English stopwords and single punctuation characters from the token
//! stream. The English list is the NLTK stopword corpus, including the
//! apostrophe forms added in later releases.
//!
//! # Examples
//!
//! ```
//! use spamcheck::analysis::token_filter::Filter;
//! use spamcheck::analysis::token_filter::stop::StopFilter;
//! use spamcheck::analysis::token::Token;
//!
//! let filter = StopFilter::english();
//! let tokens = vec![
//!     Token::new("you", 0),
//!     Token::new("won", 1),
//!     Token::new("prize", 2)
//! ];
//!
//! let result: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(result.len(), 1);
//! assert_eq!(result[0].text, "prize");
//! ```

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// English stopwords.
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "ain", "all", "am", "an", "and", "any",
    "are", "aren", "aren't", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "couldn", "couldn't", "d", "did", "didn", "didn't",
    "do", "does", "doesn", "doesn't", "doing", "don", "don't", "down", "during", "each", "few",
    "for", "from", "further", "had", "hadn", "hadn't", "has", "hasn", "hasn't", "have", "haven",
    "haven't", "having", "he", "he'd", "he'll", "he's", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "i", "i'd", "i'll", "i'm", "i've", "if", "in", "into", "is", "isn",
    "isn't", "it", "it'd", "it'll", "it's", "its", "itself", "just", "ll", "m", "ma", "me",
    "mightn", "mightn't", "more", "most", "mustn", "mustn't", "my", "myself", "needn", "needn't",
    "no", "nor", "not", "now", "o", "of", "off", "on", "once", "only", "or", "other", "our",
    "ours", "ourselves", "out", "over", "own", "re", "s", "same", "shan", "shan't", "she",
    "she'd", "she'll", "she's", "should", "should've", "shouldn", "shouldn't", "so", "some",
    "such", "t", "than", "that", "that'll", "the", "their", "theirs", "them", "themselves",
    "then", "there", "these", "they", "they'd", "they'll", "they're", "they've", "this", "those",
    "through", "to", "too", "under", "until", "up", "ve", "very", "was", "wasn", "wasn't", "we",
    "we'd", "we'll", "we're", "we've", "were", "weren", "weren't", "what", "when", "where",
    "which", "while", "who", "whom", "why", "will", "with", "won", "won't", "wouldn", "wouldn't",
    "y", "you", "you'd", "you'll", "you're", "you've", "your", "yours", "yourself", "yourselves",
];

/// ASCII punctuation characters, each treated as a stopword on its own.
const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// English stopwords plus punctuation as a HashSet.
pub static ENGLISH_STOP_WORDS_SET: LazyLock<HashSet<String>> = LazyLock::new(|| {
    ENGLISH_STOP_WORDS
        .iter()
        .map(|&s| s.to_string())
        .chain(PUNCTUATION.chars().map(String::from))
        .collect()
});

/// A filter that removes stop words from the token stream.
///
/// Matching is exact: the filter expects lowercased tokens.
#[derive(Clone, Debug)]
pub struct StopFilter {
    stop_words: Arc<HashSet<String>>,
}

impl StopFilter {
    /// Create a stop filter with the English stopwords and punctuation.
    pub fn english() -> Self {
        Self::with_stop_words(ENGLISH_STOP_WORDS_SET.clone())
    }

    /// Create a new stop filter with custom stop words.
    pub fn with_stop_words(stop_words: HashSet<String>) -> Self {
        StopFilter {
            stop_words: Arc::new(stop_words),
        }
    }

    /// Create a new stop filter from a list of stop words.
    ///
    /// ```
    /// use spamcheck::analysis::token_filter::stop::StopFilter;
    ///
    /// let filter = StopFilter::from_words(vec!["foo", "bar", "baz"]);
    /// assert_eq!(filter.len(), 3);
    /// ```
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_stop_words(words.into_iter().map(Into::into).collect())
    }

    /// Check if a word is a stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Get the number of stop words.
    pub fn len(&self) -> usize {
        self.stop_words.len()
    }

    /// Check if the stop word set is empty.
    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty()
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::english()
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens: Vec<Token> = tokens
            .filter(|token| !self.is_stop_word(&token.text))
            .collect();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(filter: &StopFilter, words: &[&str]) -> Vec<String> {
        let tokens: Vec<Token> = words
            .iter()
            .enumerate()
            .map(|(i, w)| Token::new(*w, i))
            .collect();

        filter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_english_stop_words() {
        let filter = StopFilter::english();
        assert_eq!(
            texts(&filter, &["congratulations", "you", "won", "click", "here", "to", "claim", "your", "prize"]),
            vec!["congratulations", "click", "claim", "prize"]
        );
    }

    #[test]
    fn test_punctuation_is_stopped() {
        let filter = StopFilter::english();
        assert_eq!(texts(&filter, &["!", "$", ":", "offer", "'"]), vec!["offer"]);
        assert!(filter.is_stop_word("~"));
        assert!(!filter.is_stop_word("!!"));
    }

    #[test]
    fn test_case_sensitive_matching() {
        let filter = StopFilter::english();
        assert!(filter.is_stop_word("the"));
        assert!(!filter.is_stop_word("The"));
    }

    #[test]
    fn test_list_size() {
        assert_eq!(ENGLISH_STOP_WORDS.len(), 198);
        assert_eq!(StopFilter::english().len(), 198 + 32);
    }

    #[test]
    fn test_custom_stop_words_keep_positions() {
        let filter = StopFilter::from_words(vec!["the", "and"]);
        let tokens = vec![
            Token::new("hello", 0),
            Token::new("the", 1),
            Token::new("world", 2),
        ];

        let result: Vec<Token> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].position, 0);
        assert_eq!(result[1].position, 2);
        assert!(!filter.is_stop_word("!"));
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(StopFilter::english().name(), "stop");
    }
}
