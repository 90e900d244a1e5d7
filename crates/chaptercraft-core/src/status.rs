//! Status & filter engine.
//!
//! Status is derived, never stored:
//!
//! 1. `skipped` wins over everything;
//! 2. otherwise `done` if the flag is set or the translation has content;
//! 3. otherwise `untranslated`.
//!
//! Matching is recomputed with a full linear scan on every call. Chapters
//! are hundreds to low thousands of paragraphs, so no index is kept.

use serde::Serialize;

use crate::dialogue::DialogueDetector;
use crate::models::{FilterMode, Paragraph, Status};

pub fn status_of(p: &Paragraph) -> Status {
    if p.skipped {
        Status::Skipped
    } else if p.done || p.has_translation() {
        Status::Done
    } else {
        Status::Untranslated
    }
}

/// Completion summary for a paragraph sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    /// `round(completed / total * 100)`, or 0 for an empty sequence.
    pub percent: u32,
}

pub fn progress(paragraphs: &[Paragraph], count_skipped_as_done: bool) -> Progress {
    let total = paragraphs.len();
    let completed = paragraphs
        .iter()
        .filter(|p| match status_of(p) {
            Status::Done => true,
            Status::Skipped => count_skipped_as_done,
            Status::Untranslated => false,
        })
        .count();
    let percent = if total == 0 {
        0
    } else {
        ((completed as f64 / total as f64) * 100.0).round() as u32
    };
    Progress {
        completed,
        total,
        percent,
    }
}

/// Case-insensitive substring match over original and translation.
pub fn matches_search(p: &Paragraph, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let haystack = format!("{}\n{}", p.original, p.translation).to_lowercase();
    haystack.contains(&query.to_lowercase())
}

pub fn matches_filter(p: &Paragraph, mode: FilterMode, dialogue: &dyn DialogueDetector) -> bool {
    match mode {
        FilterMode::All => true,
        FilterMode::Dialogue => dialogue.has_dialogue(&p.original),
        FilterMode::Done => status_of(p) == Status::Done,
        FilterMode::Skipped => status_of(p) == Status::Skipped,
        FilterMode::Untranslated => status_of(p) == Status::Untranslated,
    }
}

/// Ascending indexes of every paragraph passing both the filter and the
/// (trimmed) search query.
pub fn matching_indexes(
    paragraphs: &[Paragraph],
    query: &str,
    mode: FilterMode,
    dialogue: &dyn DialogueDetector,
) -> Vec<usize> {
    let query = query.trim();
    paragraphs
        .iter()
        .enumerate()
        .filter(|(_, p)| matches_search(p, query) && matches_filter(p, mode, dialogue))
        .map(|(i, _)| i)
        .collect()
}
