//! Glossary matching and management.
//!
//! The glossary is a plain term → translation map on the project. Term
//! matching against paragraph text is a collaborator ([`GlossaryMatcher`]);
//! [`SubstringMatcher`] is the default.

use serde::Serialize;

use crate::error::{CoreError, Result};
use crate::models::Glossary;

/// Default cap on suggestions per paragraph.
pub const MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlossaryMatch {
    pub term: String,
    pub translation: String,
}

pub trait GlossaryMatcher {
    /// Glossary entries relevant to `text`, most specific first.
    fn matches(&self, text: &str, glossary: &Glossary) -> Vec<GlossaryMatch>;
}

/// Case-sensitive substring matcher, longest term first.
#[derive(Debug, Clone, Copy)]
pub struct SubstringMatcher {
    pub limit: usize,
}

impl Default for SubstringMatcher {
    fn default() -> Self {
        Self {
            limit: MAX_SUGGESTIONS,
        }
    }
}

impl GlossaryMatcher for SubstringMatcher {
    fn matches(&self, text: &str, glossary: &Glossary) -> Vec<GlossaryMatch> {
        let mut found: Vec<GlossaryMatch> = glossary
            .iter()
            .filter(|(term, _)| !term.is_empty() && text.contains(term.as_str()))
            .map(|(term, translation)| GlossaryMatch {
                term: term.clone(),
                translation: translation.clone(),
            })
            .collect();
        found.sort_by(|a, b| b.term.chars().count().cmp(&a.term.chars().count()));
        found.truncate(self.limit);
        found
    }
}

/// Insert or overwrite an entry. Both sides are trimmed and required.
pub fn add_entry(glossary: &mut Glossary, term: &str, translation: &str) -> Result<()> {
    let term = term.trim();
    let translation = translation.trim();
    if term.is_empty() || translation.is_empty() {
        return Err(CoreError::InvalidInput(
            "glossary entries need both a term and a translation".to_string(),
        ));
    }
    glossary.insert(term.to_string(), translation.to_string());
    Ok(())
}

/// Entries sorted by term, optionally narrowed to those whose term or
/// translation contains `query` (case-insensitive).
pub fn entries<'a>(glossary: &'a Glossary, query: &str) -> Vec<(&'a str, &'a str)> {
    let query = query.trim().to_lowercase();
    glossary
        .iter()
        .filter(|(k, v)| {
            query.is_empty()
                || k.to_lowercase().contains(&query)
                || v.to_lowercase().contains(&query)
        })
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect()
}

/// Merge imported entries; imported terms win. Returns how many entries
/// were taken from `imported`.
pub fn merge(glossary: &mut Glossary, imported: Glossary) -> usize {
    let count = imported.len();
    glossary.extend(imported);
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glossary(pairs: &[(&str, &str)]) -> Glossary {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_matches_longest_first() {
        let g = glossary(&[("Li", "Lee"), ("Li Wei", "Lee Way"), ("sword", "Schwert")]);
        let found = SubstringMatcher::default().matches("Li Wei drew his sword.", &g);
        let terms: Vec<&str> = found.iter().map(|m| m.term.as_str()).collect();
        assert_eq!(terms, ["Li Wei", "sword", "Li"]);
    }

    #[test]
    fn test_matches_case_sensitive_and_limited() {
        let g = glossary(&[("Sword", "Schwert"), ("a", "1"), ("b", "2"), ("c", "3")]);
        assert!(SubstringMatcher::default().matches("sword", &g).is_empty());
        let limited = SubstringMatcher { limit: 2 }.matches("abc", &g);
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn test_add_entry_trims_and_validates() {
        let mut g = Glossary::new();
        add_entry(&mut g, "  Qi ", " vital energy ").unwrap();
        assert_eq!(g.get("Qi").map(String::as_str), Some("vital energy"));
        assert!(add_entry(&mut g, "term", "  ").is_err());
        assert!(add_entry(&mut g, "", "x").is_err());
    }

    #[test]
    fn test_entries_filter() {
        let g = glossary(&[("beta", "Zwei"), ("alpha", "Eins")]);
        assert_eq!(entries(&g, ""), [("alpha", "Eins"), ("beta", "Zwei")]);
        assert_eq!(entries(&g, "zw"), [("beta", "Zwei")]);
        assert_eq!(entries(&g, "ALP"), [("alpha", "Eins")]);
    }

    #[test]
    fn test_merge_overwrites() {
        let mut g = glossary(&[("a", "old"), ("b", "keep")]);
        let n = merge(&mut g, glossary(&[("a", "new"), ("c", "added")]));
        assert_eq!(n, 2);
        assert_eq!(g, glossary(&[("a", "new"), ("b", "keep"), ("c", "added")]));
    }
}
