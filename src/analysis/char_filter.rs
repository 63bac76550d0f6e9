//! Char filters that pre-process the raw text before tokenization.
//!
//! # Available Filters
//!
//! - [`lowercase::LowercaseCharFilter`] - Unicode lowercasing of the whole message
//!
//! # Examples
//!
//! ```
//! use spamcheck::analysis::char_filter::CharFilter;
//! use spamcheck::analysis::char_filter::lowercase::LowercaseCharFilter;
//!
//! let filter = LowercaseCharFilter::new();
//! assert_eq!(filter.filter("You've WON!"), "you've won!");
//! ```

/// Trait for character filters that transform text before tokenization.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text.
    fn filter(&self, input: &str) -> String;

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

pub mod lowercase;

pub use lowercase::LowercaseCharFilter;
