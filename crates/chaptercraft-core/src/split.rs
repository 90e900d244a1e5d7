//! Source text splitting.
//!
//! Chapter text is cut into [`Paragraph`]s on blank lines or on single
//! newlines. Paragraphs can be further decomposed into sentence
//! [`Segment`]s for fine-grained translation.
//!
//! # Example
//!
//! ```rust
//! use chaptercraft_core::models::SplitMode;
//! use chaptercraft_core::split::split_text;
//!
//! let paragraphs = split_text("A\n\nB\n\n\nC", SplitMode::BlankLines);
//! let originals: Vec<&str> = paragraphs.iter().map(|p| p.original.as_str()).collect();
//! assert_eq!(originals, ["A", "B", "C"]);
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Paragraph, Segment, SplitMode};

static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n+").expect("valid regex"));

/// Split `raw` into trimmed, non-empty paragraphs, preserving order.
pub fn split_text(raw: &str, mode: SplitMode) -> Vec<Paragraph> {
    let normalized = raw.replace("\r\n", "\n");
    let parts: Vec<&str> = match mode {
        SplitMode::BlankLines => BLANK_LINES.split(&normalized).collect(),
        SplitMode::Lines => normalized.split('\n').collect(),
    };

    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(Paragraph::new)
        .collect()
}

/// Sentence terminators that end a segment when followed by whitespace.
const TERMINATORS: &[char] = &['.', '!', '?', '…'];

/// Full-width terminators that end a segment unconditionally.
const WIDE_TERMINATORS: &[char] = &['。', '！', '？'];

/// Closers that stay attached to the sentence they end.
const CLOSERS: &[char] = &['"', '\'', '”', '’', '»', '」', '』', ')', ']'];

/// Decompose paragraph text into sentence segments.
///
/// Breaks after a terminator (plus any trailing closing quotes) when the
/// next character is whitespace or the end of text, after any full-width
/// terminator, and at every newline. Segments are trimmed; empty ones are
/// dropped.
pub fn segment_sentences(text: &str) -> Vec<Segment> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut segments = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];

        if c == '\n' {
            push_segment(&mut segments, &text[start..pos]);
            start = pos + c.len_utf8();
            i += 1;
            continue;
        }

        let wide = WIDE_TERMINATORS.contains(&c);
        if wide || TERMINATORS.contains(&c) {
            // Swallow runs like "?!" and trailing closing quotes.
            let mut j = i + 1;
            while j < chars.len()
                && (TERMINATORS.contains(&chars[j].1)
                    || WIDE_TERMINATORS.contains(&chars[j].1)
                    || CLOSERS.contains(&chars[j].1))
            {
                j += 1;
            }
            let at_break = j >= chars.len() || chars[j].1.is_whitespace();
            if wide || at_break {
                let end = chars.get(j).map(|(p, _)| *p).unwrap_or(text.len());
                push_segment(&mut segments, &text[start..end]);
                start = end;
            }
            i = j;
            continue;
        }

        i += 1;
    }

    if start < text.len() {
        push_segment(&mut segments, &text[start..]);
    }
    segments
}

fn push_segment(out: &mut Vec<Segment>, piece: &str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        out.push(Segment {
            original: trimmed.to_string(),
            translation: String::new(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn originals(paragraphs: &[Paragraph]) -> Vec<&str> {
        paragraphs.iter().map(|p| p.original.as_str()).collect()
    }

    fn segment_texts(text: &str) -> Vec<String> {
        segment_sentences(text)
            .into_iter()
            .map(|s| s.original)
            .collect()
    }

    #[test]
    fn test_split_blank_lines() {
        let paragraphs = split_text("A\n\nB\n\n\nC", SplitMode::BlankLines);
        assert_eq!(originals(&paragraphs), ["A", "B", "C"]);
    }

    #[test]
    fn test_split_blank_lines_keeps_single_newlines() {
        let paragraphs = split_text("line one\nline two\n\n  second  ", SplitMode::BlankLines);
        assert_eq!(originals(&paragraphs), ["line one\nline two", "second"]);
    }

    #[test]
    fn test_split_whitespace_only_separator() {
        let paragraphs = split_text("A\n   \t\nB", SplitMode::BlankLines);
        assert_eq!(originals(&paragraphs), ["A", "B"]);
    }

    #[test]
    fn test_split_lines() {
        let paragraphs = split_text("A\nB\n\n C \n", SplitMode::Lines);
        assert_eq!(originals(&paragraphs), ["A", "B", "C"]);
    }

    #[test]
    fn test_split_crlf() {
        let paragraphs = split_text("A\r\n\r\nB", SplitMode::BlankLines);
        assert_eq!(originals(&paragraphs), ["A", "B"]);
    }

    #[test]
    fn test_split_empty() {
        assert!(split_text("", SplitMode::BlankLines).is_empty());
        assert!(split_text("\n\n  \n", SplitMode::Lines).is_empty());
    }

    #[test]
    fn test_split_fresh_fields() {
        let paragraphs = split_text("A", SplitMode::BlankLines);
        assert_eq!(paragraphs[0].translation, "");
        assert!(!paragraphs[0].done);
        assert!(!paragraphs[0].skipped);
        assert!(paragraphs[0].segments.is_none());
    }

    #[test]
    fn test_segment_sentences() {
        assert_eq!(
            segment_texts("He left. She stayed! Why? Nobody knows"),
            ["He left.", "She stayed!", "Why?", "Nobody knows"]
        );
    }

    #[test]
    fn test_segment_keeps_closing_quotes() {
        assert_eq!(
            segment_texts("\"Stop.\" He froze."),
            ["\"Stop.\"", "He froze."]
        );
    }

    #[test]
    fn test_segment_no_break_inside_number() {
        assert_eq!(segment_texts("It cost 3.50 today."), ["It cost 3.50 today."]);
    }

    #[test]
    fn test_segment_wide_terminators() {
        assert_eq!(segment_texts("你好。再见！"), ["你好。", "再见！"]);
    }

    #[test]
    fn test_segment_newlines() {
        assert_eq!(segment_texts("first line\nsecond line"), ["first line", "second line"]);
    }
}
