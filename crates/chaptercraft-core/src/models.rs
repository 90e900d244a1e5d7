//! Core data models used throughout ChapterCraft.
//!
//! These types are serialized with camelCase field names, matching the
//! persisted record and the project pack format.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::store::ParagraphStore;

/// Number of matches shown per page of the list view.
pub const DEFAULT_PAGE_SIZE: usize = 40;

/// Term → translation mapping. Ordered so exports are stable.
pub type Glossary = BTreeMap<String, String>;

/// A sentence-level piece of a paragraph used for fine-grained translation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub original: String,
    #[serde(default)]
    pub translation: String,
}

/// One unit of source text and its translation.
///
/// Identity is positional: a paragraph is addressed by its index in the
/// store. `original` is fixed at split time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub original: String,
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub skipped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<Segment>>,
}

impl Paragraph {
    pub fn new(original: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            ..Self::default()
        }
    }

    /// True when the translation has any non-whitespace content.
    pub fn has_translation(&self) -> bool {
        !self.translation.trim().is_empty()
    }
}

/// Derived paragraph status. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Untranslated,
    Done,
    Skipped,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Untranslated => "untranslated",
            Status::Done => "done",
            Status::Skipped => "skipped",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How raw chapter text is cut into paragraphs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitMode {
    /// Split on one or more blank lines.
    #[default]
    #[serde(rename = "blanklines", alias = "blank-lines")]
    BlankLines,
    /// Split on every newline.
    #[serde(rename = "lines")]
    Lines,
}

impl SplitMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitMode::BlankLines => "blanklines",
            SplitMode::Lines => "lines",
        }
    }
}

impl FromStr for SplitMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blanklines" | "blank-lines" => Ok(SplitMode::BlankLines),
            "lines" => Ok(SplitMode::Lines),
            other => Err(CoreError::InvalidInput(format!(
                "unknown split mode '{}': use blank-lines or lines",
                other
            ))),
        }
    }
}

/// The active predicate restricting which paragraphs are matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    All,
    Done,
    Skipped,
    #[default]
    Untranslated,
    Dialogue,
}

impl FilterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Done => "done",
            FilterMode::Skipped => "skipped",
            FilterMode::Untranslated => "untranslated",
            FilterMode::Dialogue => "dialogue",
        }
    }
}

impl FromStr for FilterMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(FilterMode::All),
            "done" => Ok(FilterMode::Done),
            "skipped" => Ok(FilterMode::Skipped),
            "untranslated" => Ok(FilterMode::Untranslated),
            "dialogue" => Ok(FilterMode::Dialogue),
            other => Err(CoreError::InvalidInput(format!(
                "unknown filter '{}': use all, done, skipped, untranslated, or dialogue",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Anything other than exactly `"light"` is dark.
    pub fn coerce(value: &str) -> Self {
        if value == "light" {
            Theme::Light
        } else {
            Theme::Dark
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// User preference flags. Captured with every snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub theme: Theme,
    pub auto_advance: bool,
    pub auto_backup: bool,
    pub count_skipped_as_done: bool,
    pub dialogue_tools: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            auto_advance: true,
            auto_backup: true,
            count_skipped_as_done: false,
            dialogue_tools: true,
        }
    }
}

/// The project aggregate: metadata, paragraphs, glossary, and focus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub project_name: String,
    pub chapter_name: String,
    pub file_name: String,
    pub raw_text: String,
    pub split_mode: SplitMode,
    pub paragraphs: ParagraphStore,
    pub glossary: Glossary,
    pub focused_index: usize,
}

impl Project {
    /// Pull `focused_index` back inside `0..paragraphs.len()`, or to 0 when
    /// the project is empty.
    pub fn clamp_focus(&mut self) {
        if self.paragraphs.is_empty() {
            self.focused_index = 0;
        } else if self.focused_index >= self.paragraphs.len() {
            self.focused_index = self.paragraphs.len() - 1;
        }
    }
}

/// Transient list/focus presentation state, persisted for convenience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewState {
    pub focus_mode: bool,
    pub visible_count: usize,
    pub search_query: String,
    pub filter_mode: FilterMode,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            focus_mode: false,
            visible_count: DEFAULT_PAGE_SIZE,
            search_query: String::new(),
            filter_mode: FilterMode::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_coerce() {
        assert_eq!(Theme::coerce("light"), Theme::Light);
        assert_eq!(Theme::coerce("Light"), Theme::Dark);
        assert_eq!(Theme::coerce(""), Theme::Dark);
    }

    #[test]
    fn test_split_mode_parse() {
        assert_eq!("blank-lines".parse::<SplitMode>().unwrap(), SplitMode::BlankLines);
        assert_eq!("blanklines".parse::<SplitMode>().unwrap(), SplitMode::BlankLines);
        assert_eq!("lines".parse::<SplitMode>().unwrap(), SplitMode::Lines);
        assert!("words".parse::<SplitMode>().is_err());
    }

    #[test]
    fn test_paragraph_json_shape() {
        let p = Paragraph::new("Hello");
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "original": "Hello",
                "translation": "",
                "done": false,
                "skipped": false
            })
        );
    }

    #[test]
    fn test_clamp_focus() {
        let mut project = Project {
            paragraphs: ParagraphStore::from(vec![Paragraph::new("a"), Paragraph::new("b")]),
            focused_index: 7,
            ..Project::default()
        };
        project.clamp_focus();
        assert_eq!(project.focused_index, 1);

        project.paragraphs = ParagraphStore::default();
        project.clamp_focus();
        assert_eq!(project.focused_index, 0);
    }
}
