//! Lowercase char filter.
//!
//! Lowercasing happens on the whole message, before tokenization, so that
//! case-sensitive tokenizer rules (clitics such as `N'T`, quote handling)
//! only ever see lowercase input.

use crate::analysis::char_filter::CharFilter;

/// A char filter that lowercases the entire input using Unicode case mapping.
#[derive(Clone, Debug, Default)]
pub struct LowercaseCharFilter;

impl LowercaseCharFilter {
    /// Create a new lowercase char filter.
    pub fn new() -> Self {
        LowercaseCharFilter
    }
}

impl CharFilter for LowercaseCharFilter {
    fn filter(&self, input: &str) -> String {
        input.to_lowercase()
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_char_filter() {
        let filter = LowercaseCharFilter::new();
        assert_eq!(filter.filter("Hello WORLD"), "hello world");
        assert_eq!(filter.filter("CAFÉ Ünïcode"), "café ünïcode");
        assert_eq!(filter.filter(""), "");
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(LowercaseCharFilter::new().name(), "lowercase");
    }
}
