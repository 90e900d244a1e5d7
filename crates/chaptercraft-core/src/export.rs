//! Exports and imports.
//!
//! - Plain text: translation-only, and a review format pairing each
//!   original with its translation. Skipped paragraphs are left out of both.
//! - Project pack: `{ version, exportedAt, snapshot }`, re-importable.
//! - Glossary pack: `{ glossary, exportedAt }`, merged on import.
//!
//! Imports are validated completely before anything is applied.

use chrono::{DateTime, SecondsFormat};
use serde::Serialize;
use serde_json::Value;

use crate::error::{CoreError, Result};
use crate::models::{Glossary, Paragraph};
use crate::schema::{coerce_glossary, coerce_payload, STORAGE_KEY};
use crate::snapshot::SnapshotPayload;

const FILENAME_LIMIT: usize = 140;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPack {
    pub version: String,
    pub exported_at: String,
    pub snapshot: SnapshotPayload,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryPack {
    pub glossary: Glossary,
    pub exported_at: String,
}

/// Translations of non-skipped paragraphs, separated by blank lines.
pub fn translation_only(paragraphs: &[Paragraph]) -> String {
    paragraphs
        .iter()
        .filter(|p| !p.skipped)
        .map(|p| p.translation.trim())
        .collect::<Vec<_>>()
        .join("\n\n")
        .trim()
        .to_string()
}

/// Labelled original/translation blocks for non-skipped paragraphs.
pub fn review_format(paragraphs: &[Paragraph]) -> String {
    paragraphs
        .iter()
        .filter(|p| !p.skipped)
        .map(|p| {
            format!(
                "--- ORIGINAL ---\n{}\n\n--- TRANSLATION ---\n{}\n",
                p.original.trim(),
                p.translation.trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
        .trim()
        .to_string()
}

/// Make a name safe to use as a file name.
pub fn normalize_filename(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            other => other,
        })
        .take(FILENAME_LIMIT)
        .collect();
    if cleaned.is_empty() {
        "translation".to_string()
    } else {
        cleaned
    }
}

/// `"<project> - <chapter>.txt"`, or `None` unless both names are set.
pub fn export_filename(project_name: &str, chapter_name: &str) -> Option<String> {
    let project = project_name.trim();
    let chapter = chapter_name.trim();
    if project.is_empty() || chapter.is_empty() {
        return None;
    }
    Some(format!(
        "{} - {}.txt",
        normalize_filename(project),
        normalize_filename(chapter)
    ))
}

pub fn review_filename(project_name: &str, chapter_name: &str) -> Option<String> {
    export_filename(project_name, chapter_name)
        .map(|name| format!("{}-review.txt", name.trim_end_matches(".txt")))
}

/// ISO 8601 with milliseconds and a `Z` suffix.
pub fn iso_timestamp(now_ms: i64) -> String {
    DateTime::from_timestamp_millis(now_ms)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| now_ms.to_string())
}

pub fn project_pack(payload: SnapshotPayload, now_ms: i64) -> ProjectPack {
    ProjectPack {
        version: STORAGE_KEY.to_string(),
        exported_at: iso_timestamp(now_ms),
        snapshot: payload,
    }
}

pub fn glossary_pack(glossary: &Glossary, now_ms: i64) -> GlossaryPack {
    GlossaryPack {
        glossary: glossary.clone(),
        exported_at: iso_timestamp(now_ms),
    }
}

fn parse_json(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| CoreError::InvalidImportFile(format!("not valid JSON: {}", e)))
}

/// Validate a project pack and return its payload.
pub fn parse_project_pack(text: &str) -> Result<SnapshotPayload> {
    let value = parse_json(text)?;
    match value.get("snapshot") {
        Some(snapshot) if snapshot.is_object() => Ok(coerce_payload(snapshot)),
        _ => Err(CoreError::InvalidImportFile(
            "project file has no snapshot".to_string(),
        )),
    }
}

/// Validate a glossary pack and return its entries.
pub fn parse_glossary_pack(text: &str) -> Result<Glossary> {
    let value = parse_json(text)?;
    match value.get("glossary") {
        Some(glossary) if glossary.is_object() => Ok(coerce_glossary(Some(glossary))),
        _ => Err(CoreError::InvalidImportFile(
            "glossary file has no glossary object".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Project;

    fn paragraphs() -> Vec<Paragraph> {
        let mut a = Paragraph::new("Eins");
        a.translation = " One ".into();
        let mut b = Paragraph::new("Zwei");
        b.skipped = true;
        b.translation = "ignored".into();
        let c = Paragraph::new("Drei");
        vec![a, b, c]
    }

    #[test]
    fn test_translation_only_skips_skipped() {
        assert_eq!(translation_only(&paragraphs()), "One");
        let mut ps = paragraphs();
        ps[2].translation = "Three".into();
        assert_eq!(translation_only(&ps), "One\n\nThree");
    }

    #[test]
    fn test_review_format() {
        let out = review_format(&paragraphs());
        assert_eq!(
            out,
            "--- ORIGINAL ---\nEins\n\n--- TRANSLATION ---\nOne\n\n\n\
             --- ORIGINAL ---\nDrei\n\n--- TRANSLATION ---"
        );
    }

    #[test]
    fn test_normalize_filename() {
        assert_eq!(normalize_filename("  a/b:c*d?  "), "a-b-c-d-");
        assert_eq!(normalize_filename("   "), "translation");
        assert_eq!(normalize_filename(&"x".repeat(200)).len(), 140);
    }

    #[test]
    fn test_export_filenames() {
        assert_eq!(
            export_filename("Novel", "Ch 1").as_deref(),
            Some("Novel - Ch 1.txt")
        );
        assert_eq!(
            review_filename("Novel", "Ch 1").as_deref(),
            Some("Novel - Ch 1-review.txt")
        );
        assert_eq!(export_filename("Novel", " "), None);
    }

    #[test]
    fn test_iso_timestamp() {
        assert_eq!(iso_timestamp(0), "1970-01-01T00:00:00.000Z");
        assert_eq!(iso_timestamp(1_500), "1970-01-01T00:00:01.500Z");
    }

    #[test]
    fn test_project_pack_round_trip() {
        let payload = SnapshotPayload {
            project: Project {
                project_name: "Novel".into(),
                ..Project::default()
            },
            ..SnapshotPayload::default()
        };
        let pack = project_pack(payload.clone(), 0);
        let text = serde_json::to_string(&pack).unwrap();
        assert!(text.contains("\"exportedAt\""));
        assert_eq!(parse_project_pack(&text).unwrap(), payload);
    }

    #[test]
    fn test_project_pack_rejects_missing_snapshot() {
        assert!(matches!(
            parse_project_pack(r#"{"version": "x"}"#),
            Err(CoreError::InvalidImportFile(_))
        ));
        assert!(matches!(
            parse_project_pack("not json"),
            Err(CoreError::InvalidImportFile(_))
        ));
        assert!(parse_project_pack(r#"{"snapshot": 3}"#).is_err());
    }

    #[test]
    fn test_glossary_pack() {
        let g = parse_glossary_pack(r#"{"glossary": {"a": "b", "n": 1}, "exportedAt": "x"}"#).unwrap();
        assert_eq!(g.len(), 1);
        assert!(parse_glossary_pack(r#"{"glossary": ["a"]}"#).is_err());
        assert!(parse_glossary_pack(r#"{}"#).is_err());
    }
}
