//! Dialogue detection collaborator.
//!
//! The filter engine treats dialogue detection as an opaque predicate.
//! [`QuoteDialogueDetector`] is the default: it looks for dash-led lines
//! and for paired quotation marks.

use once_cell::sync::Lazy;
use regex::Regex;

pub trait DialogueDetector {
    fn has_dialogue(&self, text: &str) -> bool;
}

impl<F> DialogueDetector for F
where
    F: Fn(&str) -> bool,
{
    fn has_dialogue(&self, text: &str) -> bool {
        self(text)
    }
}

/// Opener/closer pairs. A text containing both halves of any pair counts.
pub const QUOTE_PAIRS: &[(char, char)] = &[
    ('"', '"'),
    ('“', '”'),
    ('\'', '\''),
    ('‘', '’'),
    ('`', '`'),
    ('«', '»'),
    ('「', '」'),
    ('『', '』'),
];

static DASH_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*[-—–]\s+").expect("valid regex"));

#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteDialogueDetector;

impl DialogueDetector for QuoteDialogueDetector {
    fn has_dialogue(&self, text: &str) -> bool {
        if DASH_LINE.is_match(text) {
            return true;
        }
        QUOTE_PAIRS
            .iter()
            .any(|(open, close)| text.contains(*open) && text.contains(*close))
    }
}
