//! The persisted record and its schema migrations.
//!
//! One record per installation holds the whole application state. It is
//! tagged with `schemaVersion`:
//!
//! | Version | Layout |
//! |---------|--------|
//! | missing, `1` | Legacy flat layout: `theme`, `projectName`, `ui{..}`, `backups[{ts,size,snapshot}]`, `currentIndex`, … |
//! | `2` | Current layout: `project`, `snapshots`, `preferences`, `focusedIndex`, `viewState` |
//!
//! Decoding never fails on malformed content: unparsable text is treated
//! as an absent record, and any record that does not decode strictly is
//! rebuilt field by field with type coercion and documented defaults.
//! Unknown fields are dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{
    FilterMode, Glossary, Paragraph, Preferences, Project, Segment, SplitMode, Theme, ViewState,
    DEFAULT_PAGE_SIZE,
};
use crate::snapshot::{Snapshot, SnapshotPayload};
use crate::store::ParagraphStore;

pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// The flat layout written before records were versioned.
pub const LEGACY_SCHEMA_VERSION: u32 = 1;

/// Default storage key, shared with legacy installations.
pub const STORAGE_KEY: &str = "chaptercraft_combined_v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedRecord {
    pub schema_version: u32,
    pub project: Project,
    pub snapshots: Vec<Snapshot>,
    pub preferences: Preferences,
    pub focused_index: usize,
    pub view_state: ViewState,
}

impl Default for PersistedRecord {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            project: Project::default(),
            snapshots: Vec::new(),
            preferences: Preferences::default(),
            focused_index: 0,
            view_state: ViewState::default(),
        }
    }
}

impl PersistedRecord {
    /// Enforce the invariants every loaded record must satisfy.
    fn normalized(mut self) -> Self {
        self.schema_version = CURRENT_SCHEMA_VERSION;
        self.project.focused_index = self.focused_index;
        self.project.clamp_focus();
        self.focused_index = self.project.focused_index;
        if self.view_state.visible_count == 0 {
            self.view_state.visible_count = DEFAULT_PAGE_SIZE;
        }
        self
    }
}

/// Parse stored text into a current-version record.
///
/// Returns `None` for unparsable or non-object content.
pub fn decode(text: &str) -> Option<PersistedRecord> {
    let value: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "stored record is not valid JSON; ignoring it");
            return None;
        }
    };
    if !value.is_object() {
        warn!("stored record is not a JSON object; ignoring it");
        return None;
    }
    Some(migrate(&value))
}

/// Bring any record object up to [`CURRENT_SCHEMA_VERSION`].
pub fn migrate(value: &Value) -> PersistedRecord {
    let current = u64::from(CURRENT_SCHEMA_VERSION);
    let legacy = u64::from(LEGACY_SCHEMA_VERSION);
    let record = match value.get("schemaVersion") {
        None => migrate_v1_to_v2(value),
        Some(v) if v.as_u64() == Some(legacy) => migrate_v1_to_v2(value),
        Some(v) if v.as_u64() == Some(current) => match PersistedRecord::deserialize(value) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "current-version record failed strict decoding; salvaging");
                salvage_unknown(value)
            }
        },
        Some(other) => {
            warn!(version = %other, "unrecognized schema version; salvaging known fields");
            salvage_unknown(value)
        }
    };
    record.normalized()
}

/// Legacy flat layout → current layout.
pub fn migrate_v1_to_v2(value: &Value) -> PersistedRecord {
    debug!("migrating legacy record");
    PersistedRecord {
        schema_version: CURRENT_SCHEMA_VERSION,
        project: coerce_project(value),
        snapshots: coerce_snapshots(value.get("backups")),
        preferences: coerce_legacy_preferences(value),
        focused_index: index_at(value, &["currentIndex", "focusedIndex"]),
        view_state: coerce_view_state(value),
    }
}

/// Unknown or damaged record → current layout, reading current key names
/// first and legacy ones as a fallback.
pub fn salvage_unknown(value: &Value) -> PersistedRecord {
    let project = match value.get("project") {
        Some(p) if p.is_object() => coerce_project(p),
        _ => coerce_project(value),
    };
    let preferences = match value.get("preferences") {
        Some(p) if p.is_object() => coerce_preferences(p),
        _ => coerce_legacy_preferences(value),
    };
    let snapshots = coerce_snapshots(field(value, &["snapshots", "backups"]));
    let view_state = match value.get("viewState") {
        Some(v) if v.is_object() => coerce_view_state(v),
        _ => coerce_view_state(value),
    };
    let focused_index = match field(value, &["focusedIndex", "currentIndex"]) {
        Some(v) => v.as_u64().map_or(project.focused_index, |i| i as usize),
        None => project.focused_index,
    };
    PersistedRecord {
        schema_version: CURRENT_SCHEMA_VERSION,
        project,
        snapshots,
        preferences,
        focused_index,
        view_state,
    }
}

/// Rebuild a snapshot payload (current or legacy shape) from loose JSON.
pub fn coerce_payload(value: &Value) -> SnapshotPayload {
    let preferences = match value.get("preferences") {
        Some(p) if p.is_object() => coerce_preferences(p),
        _ => coerce_legacy_preferences(value),
    };
    let mut project = coerce_project(value);
    project.clamp_focus();
    SnapshotPayload {
        project,
        preferences,
    }
}

/// Rebuild a glossary from loose JSON. Non-string translations are dropped.
pub fn coerce_glossary(value: Option<&Value>) -> Glossary {
    value
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

fn field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| value.get(*k))
}

fn str_at(value: &Value, keys: &[&str]) -> String {
    field(value, keys)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn bool_at(value: &Value, key: &str, default: bool) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(default)
}

fn index_at(value: &Value, keys: &[&str]) -> usize {
    field(value, keys)
        .and_then(Value::as_u64)
        .map_or(0, |i| i as usize)
}

fn coerce_project(value: &Value) -> Project {
    let split_mode = match str_at(value, &["splitMode"]).as_str() {
        "lines" => SplitMode::Lines,
        _ => SplitMode::BlankLines,
    };
    Project {
        project_name: str_at(value, &["projectName"]),
        chapter_name: str_at(value, &["chapterName"]),
        file_name: str_at(value, &["fileName"]),
        raw_text: str_at(value, &["rawText"]),
        split_mode,
        paragraphs: coerce_paragraphs(value.get("paragraphs")),
        glossary: coerce_glossary(value.get("glossary")),
        focused_index: index_at(value, &["focusedIndex", "currentIndex"]),
    }
}

fn coerce_paragraphs(value: Option<&Value>) -> ParagraphStore {
    let items = match value.and_then(Value::as_array) {
        Some(items) => items,
        None => return ParagraphStore::new(),
    };
    let paragraphs: Vec<Paragraph> = items
        .iter()
        .filter(|item| item.is_object())
        .map(|item| Paragraph {
            original: str_at(item, &["original"]),
            translation: str_at(item, &["translation"]),
            done: bool_at(item, "done", false),
            skipped: bool_at(item, "skipped", false),
            segments: item.get("segments").and_then(Value::as_array).map(|segs| {
                segs.iter()
                    .filter(|s| s.is_object())
                    .map(|s| Segment {
                        original: str_at(s, &["original"]),
                        translation: str_at(s, &["translation"]),
                    })
                    .collect()
            }),
        })
        .collect();
    ParagraphStore::from(paragraphs)
}

fn coerce_preferences(value: &Value) -> Preferences {
    let defaults = Preferences::default();
    Preferences {
        theme: Theme::coerce(&str_at(value, &["theme"])),
        auto_advance: bool_at(value, "autoAdvance", defaults.auto_advance),
        auto_backup: bool_at(value, "autoBackup", defaults.auto_backup),
        count_skipped_as_done: bool_at(value, "countSkippedAsDone", defaults.count_skipped_as_done),
        dialogue_tools: bool_at(value, "dialogueTools", defaults.dialogue_tools),
    }
}

/// Legacy records keep the theme at top level and the flags under `ui`.
fn coerce_legacy_preferences(value: &Value) -> Preferences {
    let mut preferences = match value.get("ui") {
        Some(ui) if ui.is_object() => coerce_preferences(ui),
        _ => Preferences::default(),
    };
    preferences.theme = Theme::coerce(&str_at(value, &["theme"]));
    preferences
}

fn coerce_snapshots(value: Option<&Value>) -> Vec<Snapshot> {
    let items = match value.and_then(Value::as_array) {
        Some(items) => items,
        None => return Vec::new(),
    };
    items
        .iter()
        .filter_map(|item| {
            let timestamp = field(item, &["timestamp", "ts"]).and_then(Value::as_i64)?;
            let payload = field(item, &["payload", "snapshot"]).filter(|p| p.is_object())?;
            Some(Snapshot::new(timestamp, coerce_payload(payload)))
        })
        .collect()
}

fn coerce_view_state(value: &Value) -> ViewState {
    let filter_mode = str_at(value, &["filterMode"])
        .parse::<FilterMode>()
        .unwrap_or_default();
    let visible_count = value
        .get("visibleCount")
        .and_then(Value::as_u64)
        .filter(|n| *n > 0)
        .map_or(DEFAULT_PAGE_SIZE, |n| n as usize);
    ViewState {
        focus_mode: bool_at(value, "focusMode", false),
        visible_count,
        search_query: str_at(value, &["searchQuery"]),
        filter_mode,
    }
}
