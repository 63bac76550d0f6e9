//! Porter stemming algorithm implementation.
//!
//! Implements the Porter algorithm with the extensions that NLTK enables by
//! default (`NLTK_EXTENSIONS` mode), so stems line up with vocabularies built
//! by NLTK-based preprocessing:
//!
//! - a small table of irregular forms (`dying` → `die`, `skies` → `sky`)
//! - words of one or two letters are left alone
//! - `-ies` and `-ied` keep their `e` in four-letter words (`ties` → `tie`)
//! - `y` → `i` only after a consonant that is not the first letter
//! - the step 2 rules `-fulli`, `-logi` and `-bli`, and recursive `-alli`
//!
//! The algorithm works on Unicode scalar values. Only ASCII vowels count as
//! vowels, so non-English letters behave like consonants.
//!
//! # Examples
//!
//! ```
//! use spamcheck::analysis::token_filter::stem::Stemmer;
//! use spamcheck::analysis::token_filter::stem::porter::PorterStemmer;
//!
//! let stemmer = PorterStemmer::new();
//!
//! assert_eq!(stemmer.stem("running"), "run");
//! assert_eq!(stemmer.stem("flies"), "fli");
//! assert_eq!(stemmer.stem("traditional"), "tradit");
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::analysis::token_filter::stem::Stemmer;

/// Words whose stem the rules would get wrong.
static IRREGULAR_FORMS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("sky", "sky"),
        ("skies", "sky"),
        ("dying", "die"),
        ("lying", "lie"),
        ("tying", "tie"),
        ("news", "news"),
        ("innings", "inning"),
        ("inning", "inning"),
        ("outings", "outing"),
        ("outing", "outing"),
        ("cannings", "canning"),
        ("canning", "canning"),
        ("howe", "howe"),
        ("proceed", "proceed"),
        ("exceed", "exceed"),
        ("succeed", "succeed"),
    ]
    .into_iter()
    .collect()
});

/// When a suffix rule may fire. `stem` is the word with the suffix removed.
#[derive(Clone, Copy, Debug)]
enum Condition {
    Always,
    /// m(stem) > 0
    PositiveMeasure,
    /// m(stem) > 1
    MeasureAboveOne,
    /// m(stem) > 1 and the stem ends in `s` or `t`
    IonStem,
    /// The stem is longer than one letter and ends in a consonant
    ConsonantStem,
    /// m > 0 for the word without its final three letters
    LogiStem,
    /// m > 1 for the word without its final letter
    DoubleL,
}

impl Condition {
    fn holds(self, word: &[char], stem: &[char]) -> bool {
        match self {
            Condition::Always => true,
            Condition::PositiveMeasure => measure(stem) > 0,
            Condition::MeasureAboveOne => measure(stem) > 1,
            Condition::IonStem => measure(stem) > 1 && matches!(stem.last(), Some('s' | 't')),
            Condition::ConsonantStem => stem.len() > 1 && ends_with_consonant(stem),
            Condition::LogiStem => measure(&word[..word.len() - 3]) > 0,
            Condition::DoubleL => measure(&word[..word.len() - 1]) > 1,
        }
    }
}

type Rule = (&'static str, &'static str, Condition);

const STEP1A_RULES: &[Rule] = &[
    ("sses", "ss", Condition::Always),
    ("ies", "i", Condition::Always),
    ("ss", "ss", Condition::Always),
    ("s", "", Condition::Always),
];

const STEP1C_RULES: &[Rule] = &[("y", "i", Condition::ConsonantStem)];

const STEP2_RULES: &[Rule] = &[
    ("ational", "ate", Condition::PositiveMeasure),
    ("tional", "tion", Condition::PositiveMeasure),
    ("enci", "ence", Condition::PositiveMeasure),
    ("anci", "ance", Condition::PositiveMeasure),
    ("izer", "ize", Condition::PositiveMeasure),
    ("bli", "ble", Condition::PositiveMeasure),
    ("alli", "al", Condition::PositiveMeasure),
    ("entli", "ent", Condition::PositiveMeasure),
    ("eli", "e", Condition::PositiveMeasure),
    ("ousli", "ous", Condition::PositiveMeasure),
    ("ization", "ize", Condition::PositiveMeasure),
    ("ation", "ate", Condition::PositiveMeasure),
    ("ator", "ate", Condition::PositiveMeasure),
    ("alism", "al", Condition::PositiveMeasure),
    ("iveness", "ive", Condition::PositiveMeasure),
    ("fulness", "ful", Condition::PositiveMeasure),
    ("ousness", "ous", Condition::PositiveMeasure),
    ("aliti", "al", Condition::PositiveMeasure),
    ("iviti", "ive", Condition::PositiveMeasure),
    ("biliti", "ble", Condition::PositiveMeasure),
    ("fulli", "ful", Condition::PositiveMeasure),
    ("logi", "log", Condition::LogiStem),
];

const STEP3_RULES: &[Rule] = &[
    ("icate", "ic", Condition::PositiveMeasure),
    ("ative", "", Condition::PositiveMeasure),
    ("alize", "al", Condition::PositiveMeasure),
    ("iciti", "ic", Condition::PositiveMeasure),
    ("ical", "ic", Condition::PositiveMeasure),
    ("ful", "", Condition::PositiveMeasure),
    ("ness", "", Condition::PositiveMeasure),
];

const STEP4_RULES: &[Rule] = &[
    ("al", "", Condition::MeasureAboveOne),
    ("ance", "", Condition::MeasureAboveOne),
    ("ence", "", Condition::MeasureAboveOne),
    ("er", "", Condition::MeasureAboveOne),
    ("ic", "", Condition::MeasureAboveOne),
    ("able", "", Condition::MeasureAboveOne),
    ("ible", "", Condition::MeasureAboveOne),
    ("ant", "", Condition::MeasureAboveOne),
    ("ement", "", Condition::MeasureAboveOne),
    ("ment", "", Condition::MeasureAboveOne),
    ("ent", "", Condition::MeasureAboveOne),
    ("ion", "", Condition::IonStem),
    ("ou", "", Condition::MeasureAboveOne),
    ("ism", "", Condition::MeasureAboveOne),
    ("ate", "", Condition::MeasureAboveOne),
    ("iti", "", Condition::MeasureAboveOne),
    ("ous", "", Condition::MeasureAboveOne),
    ("ive", "", Condition::MeasureAboveOne),
    ("ize", "", Condition::MeasureAboveOne),
];

const STEP5B_RULES: &[Rule] = &[("ll", "l", Condition::DoubleL)];

/// Consonant flags for every letter of `word`, computed left to right. A `y`
/// is a consonant at the start of the word or after a vowel.
fn consonant_flags(word: &[char]) -> Vec<bool> {
    let mut flags: Vec<bool> = Vec::with_capacity(word.len());
    for &c in word {
        let consonant = match c {
            'a' | 'e' | 'i' | 'o' | 'u' => false,
            'y' => flags.last().is_none_or(|&previous| !previous),
            _ => true,
        };
        flags.push(consonant);
    }
    flags
}

fn ends_with_consonant(word: &[char]) -> bool {
    consonant_flags(word).last() == Some(&true)
}

/// The number of vowel-consonant sequences in `stem` (Porter's `m`).
fn measure(stem: &[char]) -> usize {
    consonant_flags(stem)
        .windows(2)
        .filter(|pair| !pair[0] && pair[1])
        .count()
}

fn contains_vowel(stem: &[char]) -> bool {
    consonant_flags(stem).contains(&false)
}

fn ends_double_consonant(word: &[char]) -> bool {
    let n = word.len();
    n >= 2 && word[n - 1] == word[n - 2] && ends_with_consonant(word)
}

/// `*o`: consonant-vowel-consonant where the last consonant is not w, x or y.
/// A two-letter vowel-consonant word also qualifies.
fn ends_cvc(word: &[char]) -> bool {
    match consonant_flags(word).as_slice() {
        [.., true, false, true] => !matches!(word.last(), Some('w' | 'x' | 'y')),
        [false, true] => true,
        _ => false,
    }
}

fn strip_suffix<'a>(word: &'a [char], suffix: &str) -> Option<&'a [char]> {
    let n = suffix.chars().count();
    if n > word.len() {
        return None;
    }
    let (stem, tail) = word.split_at(word.len() - n);
    tail.iter().copied().eq(suffix.chars()).then_some(stem)
}

fn concat(stem: &[char], replacement: &str) -> Vec<char> {
    stem.iter().copied().chain(replacement.chars()).collect()
}

/// The first rule whose suffix matches decides the outcome, even when its
/// condition fails.
fn apply_rules(word: Vec<char>, rules: &[Rule]) -> Vec<char> {
    for &(suffix, replacement, condition) in rules {
        if let Some(stem) = strip_suffix(&word, suffix) {
            if condition.holds(&word, stem) {
                return concat(stem, replacement);
            }
            return word;
        }
    }
    word
}

fn step1a(word: Vec<char>) -> Vec<char> {
    if word.len() == 4 {
        if let Some(stem) = strip_suffix(&word, "ies") {
            return concat(stem, "ie");
        }
    }
    apply_rules(word, STEP1A_RULES)
}

fn step1b(word: Vec<char>) -> Vec<char> {
    if let Some(stem) = strip_suffix(&word, "ied") {
        let replacement = if word.len() == 4 { "ie" } else { "i" };
        return concat(stem, replacement);
    }

    if let Some(stem) = strip_suffix(&word, "eed") {
        if measure(stem) > 0 {
            return concat(stem, "ee");
        }
        return word;
    }

    let Some(stem) = ["ed", "ing"]
        .iter()
        .find_map(|suffix| strip_suffix(&word, suffix).filter(|stem| contains_vowel(stem)))
    else {
        return word;
    };

    let mut stem = stem.to_vec();
    for (suffix, replacement) in [("at", "ate"), ("bl", "ble"), ("iz", "ize")] {
        if let Some(base) = strip_suffix(&stem, suffix) {
            return concat(base, replacement);
        }
    }

    if ends_double_consonant(&stem) {
        if !matches!(stem.last(), Some('l' | 's' | 'z')) {
            stem.pop();
        }
        return stem;
    }

    if measure(&stem) == 1 && ends_cvc(&stem) {
        stem.push('e');
    }
    stem
}

fn step2(word: Vec<char>) -> Vec<char> {
    if let Some(stem) = strip_suffix(&word, "alli") {
        if measure(stem) > 0 {
            return step2(concat(stem, "al"));
        }
    }
    apply_rules(word, STEP2_RULES)
}

fn step5a(word: Vec<char>) -> Vec<char> {
    if let Some(stem) = strip_suffix(&word, "e") {
        let m = measure(stem);
        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            return stem.to_vec();
        }
    }
    word
}

/// Porter stemmer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    /// Create a new Porter stemmer.
    pub fn new() -> Self {
        PorterStemmer
    }
}

impl Stemmer for PorterStemmer {
    fn stem(&self, word: &str) -> String {
        let lowered = word.to_lowercase();

        if let Some(&irregular) = IRREGULAR_FORMS.get(lowered.as_str()) {
            return irregular.to_string();
        }

        let mut chars: Vec<char> = lowered.chars().collect();
        if chars.len() <= 2 {
            return lowered;
        }

        chars = step1a(chars);
        chars = step1b(chars);
        chars = apply_rules(chars, STEP1C_RULES);
        chars = step2(chars);
        chars = apply_rules(chars, STEP3_RULES);
        chars = apply_rules(chars, STEP4_RULES);
        chars = step5a(chars);
        chars = apply_rules(chars, STEP5B_RULES);

        chars.into_iter().collect()
    }

    fn name(&self) -> &'static str {
        "porter"
    }
}
