//! Penn Treebank word tokenizer.
//!
//! Reproduces the token boundaries of NLTK's `word_tokenize`: text is split
//! into sentences, then each sentence goes through the ordered Treebank
//! substitution rules (quotes, punctuation, brackets, dashes, clitics and
//! contractions) before being split on whitespace.
//!
//! The `regex` crate has no look-around, so the two rules that need it are
//! expressed with character class intersection and an explicit whitespace
//! capture instead.

use std::borrow::Cow;

use regex::Regex;

use super::Tokenizer;
use super::sentence::SentenceSplitter;
use crate::analysis::token::{Token, TokenStream};
use crate::error::{Result, SpamcheckError};

const STARTING_QUOTES: &[(&str, &str)] = &[
    (r"([«“‘„]|[`]+)", " $1 "),
    (r#"^""#, "``"),
    (r"(``)", " $1 "),
    (r#"([ (\[{<])("|'{2})"#, "$1 `` "),
    // A leading apostrophe splits from the following letter unless it starts a clitic.
    (r"(?i)(')([\w&&[^mtsdn]])\b", "$1 $2"),
];

const PUNCTUATION: &[(&str, &str)] = &[
    (r#"([^.])(\.)([\])}>"'»”’ ]*)\s*$"#, "$1 $2 $3 "),
    (r"([:,])([^\d])", " $1 $2"),
    (r"([:,])$", " $1 "),
    (r"\.{2,}", " $0 "),
    (r"[;@#$%&]", " $0 "),
    (r#"([^.])(\.)([\])}>"']*)\s*$"#, "$1 $2$3 "),
    (r"[?!]", " $0 "),
    (r"([^'])' ", "$1 ' "),
    (r"[*]", " $0 "),
];

const PARENS_BRACKETS: (&str, &str) = (r"[\]\[(){}<>]", " $0 ");

const DOUBLE_DASHES: (&str, &str) = (r"--", " -- ");

const ENDING_QUOTES: &[(&str, &str)] = &[
    (r"([»”’])", " $1 "),
    (r"''", " '' "),
    (r#"""#, " '' "),
    (r"\s+", " "),
    (r"([^' ])('[sS]|'[mM]|'[dD]|') ", "$1 $2 "),
    (r"([^' ])('ll|'LL|'re|'RE|'ve|'VE|n't|N'T) ", "$1 $2 "),
];

const CONTRACTIONS: &[(&str, &str)] = &[
    (r"(?i)\b(can)(not)\b", " $1 $2 "),
    (r"(?i)\b(d)('ye)\b", " $1 $2 "),
    (r"(?i)\b(gim)(me)\b", " $1 $2 "),
    (r"(?i)\b(gon)(na)\b", " $1 $2 "),
    (r"(?i)\b(got)(ta)\b", " $1 $2 "),
    (r"(?i)\b(lem)(me)\b", " $1 $2 "),
    (r"(?i)\b(more)('n)\b", " $1 $2 "),
    (r"(?i)\b(wan)(na)(\s)", " $1 $2 $3"),
    (r"(?i) ('t)(is)\b", " $1 $2 "),
    (r"(?i) ('t)(was)\b", " $1 $2 "),
];

/// A compiled substitution.
#[derive(Clone, Debug)]
struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

impl Rule {
    fn compile(&(pattern, replacement): &(&'static str, &'static str)) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| {
            SpamcheckError::analysis(format!("Invalid treebank rule {pattern:?}: {e}"))
        })?;
        Ok(Rule {
            pattern,
            replacement,
        })
    }

    fn compile_all(rules: &[(&'static str, &'static str)]) -> Result<Vec<Self>> {
        rules.iter().map(Rule::compile).collect()
    }

    fn apply(&self, text: String) -> String {
        match self.pattern.replace_all(&text, self.replacement) {
            Cow::Borrowed(_) => text,
            Cow::Owned(replaced) => replaced,
        }
    }
}

/// Word tokenizer following the Penn Treebank conventions.
///
/// # Examples
///
/// ```
/// use spamcheck::analysis::tokenizer::treebank::TreebankWordTokenizer;
///
/// let tokenizer = TreebankWordTokenizer::new().unwrap();
/// assert_eq!(
///     tokenizer.split_words("you've won $1,000!"),
///     vec!["you", "'ve", "won", "$", "1,000", "!"]
/// );
/// ```
#[derive(Clone, Debug)]
pub struct TreebankWordTokenizer {
    sentences: Option<SentenceSplitter>,
    starting_quotes: Vec<Rule>,
    punctuation: Vec<Rule>,
    parens_brackets: Rule,
    double_dashes: Rule,
    ending_quotes: Vec<Rule>,
    contractions: Vec<Rule>,
}

impl TreebankWordTokenizer {
    /// Create a tokenizer that splits sentences before tokenizing words.
    pub fn new() -> Result<Self> {
        Self::build(Some(SentenceSplitter::new()?))
    }

    /// Create a tokenizer that treats the whole input as a single sentence.
    pub fn without_sentence_splitting() -> Result<Self> {
        Self::build(None)
    }

    fn build(sentences: Option<SentenceSplitter>) -> Result<Self> {
        Ok(TreebankWordTokenizer {
            sentences,
            starting_quotes: Rule::compile_all(STARTING_QUOTES)?,
            punctuation: Rule::compile_all(PUNCTUATION)?,
            parens_brackets: Rule::compile(&PARENS_BRACKETS)?,
            double_dashes: Rule::compile(&DOUBLE_DASHES)?,
            ending_quotes: Rule::compile_all(ENDING_QUOTES)?,
            contractions: Rule::compile_all(CONTRACTIONS)?,
        })
    }

    /// Split `text` into word strings.
    pub fn split_words(&self, text: &str) -> Vec<String> {
        match &self.sentences {
            Some(splitter) => splitter
                .split(text)
                .into_iter()
                .flat_map(|sentence| self.split_sentence(sentence))
                .collect(),
            None => self.split_sentence(text),
        }
    }

    /// Split a single sentence into word strings.
    pub fn split_sentence(&self, sentence: &str) -> Vec<String> {
        let mut text = sentence.to_owned();

        for rule in &self.starting_quotes {
            text = rule.apply(text);
        }
        for rule in &self.punctuation {
            text = rule.apply(text);
        }
        text = self.parens_brackets.apply(text);
        text = self.double_dashes.apply(text);

        text = format!(" {text} ");

        for rule in &self.ending_quotes {
            text = rule.apply(text);
        }
        for rule in &self.contractions {
            text = rule.apply(text);
        }

        text.split_whitespace().map(str::to_owned).collect()
    }
}

impl Tokenizer for TreebankWordTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = self
            .split_words(text)
            .into_iter()
            .enumerate()
            .map(|(position, word)| Token::new(word, position))
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "treebank"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        TreebankWordTokenizer::new().unwrap().split_words(text)
    }

    #[test]
    fn test_contractions_and_clitics() {
        assert_eq!(words("don't stop."), vec!["do", "n't", "stop", "."]);
        assert_eq!(words("i'm gonna win"), vec!["i", "'m", "gon", "na", "win"]);
        assert_eq!(words("you cannot lose"), vec!["you", "can", "not", "lose"]);
        assert_eq!(words("we'll call"), vec!["we", "'ll", "call"]);
        assert_eq!(words("i wanna go"), vec!["i", "wan", "na", "go"]);
    }

    #[test]
    fn test_prize_message() {
        let tokens = words(
            "congratulations! you've won $1,000,000! click here to claim your prize: bit.ly/winprize123\nlimited time offer!",
        );

        assert_eq!(
            tokens,
            vec![
                "congratulations",
                "!",
                "you",
                "'ve",
                "won",
                "$",
                "1,000,000",
                "!",
                "click",
                "here",
                "to",
                "claim",
                "your",
                "prize",
                ":",
                "bit.ly/winprize123",
                "limited",
                "time",
                "offer",
                "!",
            ]
        );
    }

    #[test]
    fn test_quotes_and_brackets() {
        assert_eq!(
            words("\"hello\" he said"),
            vec!["``", "hello", "''", "he", "said"]
        );
        assert_eq!(words("(free) entry"), vec!["(", "free", ")", "entry"]);
        assert_eq!(words("wait--now"), vec!["wait", "--", "now"]);
    }

    #[test]
    fn test_periods() {
        // Only sentence-final periods are split off.
        assert_eq!(
            words("call mr. smith at 3.30 today. reply now."),
            vec!["call", "mr.", "smith", "at", "3.30", "today", ".", "reply", "now", "."]
        );
        assert_eq!(words("wait... what"), vec!["wait", "...", "what"]);
    }

    #[test]
    fn test_single_sentence_mode() {
        let tokenizer = TreebankWordTokenizer::without_sentence_splitting().unwrap();
        assert_eq!(
            tokenizer.split_words("today. reply now."),
            vec!["today.", "reply", "now", "."]
        );
    }

    #[test]
    fn test_tokenize_positions() {
        let tokenizer = TreebankWordTokenizer::new().unwrap();
        let tokens: Vec<Token> = tokenizer.tokenize("win a prize!").unwrap().collect();

        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[3].text, "!");
        assert_eq!(tokens[3].position, 3);
        assert_eq!(tokenizer.name(), "treebank");
    }

    #[test]
    fn test_empty_input() {
        assert!(words("").is_empty());
        assert!(words("   ").is_empty());
    }
}
