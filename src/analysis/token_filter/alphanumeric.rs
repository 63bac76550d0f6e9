//! Filter that keeps only purely alphanumeric tokens.

use regex::Regex;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::{Result, SpamcheckError};

/// Letters and numbers by general category. Combining marks (`Mn`, `Mc`) are
/// not alphanumeric, so words written with vowel signs are dropped.
const ALPHANUMERIC_PATTERN: &str = r"^[\p{L}\p{N}]+$";

/// Drops every token that is empty or contains a character that is neither a
/// letter nor a number.
///
/// Tokens such as `"!"`, `"n't"`, `"1,000"` and `"bit.ly/x"` are removed;
/// `"win"`, `"2day"` and `"café"` are kept.
///
/// # Examples
///
/// ```
/// use spamcheck::analysis::token::Token;
/// use spamcheck::analysis::token_filter::{AlphanumericFilter, Filter};
///
/// let tokens = vec![Token::new("win", 0), Token::new("!", 1), Token::new("n't", 2)];
/// let result: Vec<_> = AlphanumericFilter::new()
///     .unwrap()
///     .filter(Box::new(tokens.into_iter()))
///     .unwrap()
///     .collect();
///
/// assert_eq!(result.len(), 1);
/// assert_eq!(result[0].text, "win");
/// ```
#[derive(Clone, Debug)]
pub struct AlphanumericFilter {
    pattern: Regex,
}

impl AlphanumericFilter {
    /// Create a new alphanumeric filter.
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(ALPHANUMERIC_PATTERN)
            .map_err(|e| SpamcheckError::analysis(format!("Invalid alphanumeric pattern: {e}")))?;

        Ok(AlphanumericFilter { pattern })
    }

    /// Check whether `text` is non-empty and made only of letters and numbers.
    pub fn is_alphanumeric(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

impl Filter for AlphanumericFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens: Vec<Token> = tokens
            .filter(|token| self.is_alphanumeric(&token.text))
            .collect();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "alphanumeric"
    }
}
