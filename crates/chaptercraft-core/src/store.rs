//! The paragraph store: the ordered paragraph sequence and its mutation API.
//!
//! Reads go through `Deref<Target = [Paragraph]>`; every write goes through
//! a method here so the `done`/`skipped`/`translation` coupling is applied
//! in exactly one place:
//!
//! - a translation with non-whitespace content clears `skipped`;
//! - `done = true` clears `skipped`;
//! - `skipped = true` clears `done`.

use serde::{Deserialize, Serialize};
use std::ops::Deref;
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::models::{Paragraph, SplitMode};
use crate::split::{segment_sentences, split_text};

/// A single-field paragraph mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParagraphEdit {
    Translation(String),
    Done(bool),
    Skipped(bool),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParagraphStore {
    paragraphs: Vec<Paragraph>,
}

impl From<Vec<Paragraph>> for ParagraphStore {
    fn from(paragraphs: Vec<Paragraph>) -> Self {
        Self { paragraphs }
    }
}

impl Deref for ParagraphStore {
    type Target = [Paragraph];

    fn deref(&self) -> &[Paragraph] {
        &self.paragraphs
    }
}

impl ParagraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole sequence with the paragraphs of `raw`.
    ///
    /// Destructive: prior translations are gone unless the caller captured
    /// a snapshot first. Returns the new paragraph count.
    pub fn split(&mut self, raw: &str, mode: SplitMode) -> usize {
        self.paragraphs = split_text(raw, mode);
        debug!(count = self.paragraphs.len(), mode = mode.as_str(), "split source text");
        self.paragraphs.len()
    }

    pub fn paragraph(&self, index: usize) -> Result<&Paragraph> {
        let len = self.paragraphs.len();
        self.paragraphs
            .get(index)
            .ok_or(CoreError::IndexOutOfRange { index, len })
    }

    fn paragraph_mut(&mut self, index: usize) -> Result<&mut Paragraph> {
        let len = self.paragraphs.len();
        self.paragraphs
            .get_mut(index)
            .ok_or(CoreError::IndexOutOfRange { index, len })
    }

    /// Apply one field mutation with the flag coupling rules.
    pub fn set(&mut self, index: usize, edit: ParagraphEdit) -> Result<()> {
        let p = self.paragraph_mut(index)?;
        match edit {
            ParagraphEdit::Translation(text) => {
                p.translation = text;
                if p.has_translation() {
                    p.skipped = false;
                }
            }
            ParagraphEdit::Done(done) => {
                p.done = done;
                if done {
                    p.skipped = false;
                }
            }
            ParagraphEdit::Skipped(skipped) => {
                p.skipped = skipped;
                if skipped {
                    p.done = false;
                }
            }
        }
        debug!(index, "paragraph updated");
        Ok(())
    }

    pub fn mark_done(&mut self, index: usize) -> Result<()> {
        self.set(index, ParagraphEdit::Done(true))
    }

    pub fn mark_skipped(&mut self, index: usize) -> Result<()> {
        self.set(index, ParagraphEdit::Skipped(true))
    }

    /// Reset translation, flags, and segments. The paragraph itself stays.
    pub fn clear(&mut self, index: usize) -> Result<()> {
        let p = self.paragraph_mut(index)?;
        p.translation.clear();
        p.done = false;
        p.skipped = false;
        p.segments = None;
        Ok(())
    }

    /// Decompose a paragraph into sentence segments.
    ///
    /// A paragraph that already has segments keeps them. Returns the
    /// segment count.
    pub fn segment(&mut self, index: usize) -> Result<usize> {
        let p = self.paragraph_mut(index)?;
        if p.segments.is_none() {
            p.segments = Some(segment_sentences(&p.original));
        }
        Ok(p.segments.as_ref().map_or(0, Vec::len))
    }

    pub fn set_segment(&mut self, index: usize, segment: usize, text: String) -> Result<()> {
        let p = self.paragraph_mut(index)?;
        let segments = p.segments.as_mut().ok_or(CoreError::SegmentOutOfRange {
            index,
            segment,
            len: 0,
        })?;
        let len = segments.len();
        let target = segments
            .get_mut(segment)
            .ok_or(CoreError::SegmentOutOfRange {
                index,
                segment,
                len,
            })?;
        target.translation = text;
        Ok(())
    }

    /// Join segment translations into the paragraph translation.
    ///
    /// One-way: the paragraph translation is overwritten. Segments are kept.
    /// Returns the merged text.
    pub fn merge_segments(&mut self, index: usize) -> Result<String> {
        let p = self.paragraph(index)?;
        let segments = p.segments.as_ref().ok_or(CoreError::SegmentOutOfRange {
            index,
            segment: 0,
            len: 0,
        })?;
        let merged = segments
            .iter()
            .map(|s| s.translation.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        self.set(index, ParagraphEdit::Translation(merged.clone()))?;
        Ok(merged)
    }
}
