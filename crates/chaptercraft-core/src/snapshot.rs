//! Snapshot manager: a bounded, newest-first history of self-contained
//! project copies.
//!
//! Eviction is FIFO by age once the history exceeds its bound; the
//! serialized size is recorded for display only. A capture's timestamp is
//! its identity, so captures are stamped strictly newer than the current
//! newest entry.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Confirmation, CoreError, Result};
use crate::models::{Preferences, Project};

/// Default bound on the snapshot history.
pub const MAX_BACKUPS: usize = 12;

/// Everything needed to restore a project without any other state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotPayload {
    #[serde(flatten)]
    pub project: Project,
    #[serde(default)]
    pub preferences: Preferences,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Capture time, Unix milliseconds.
    pub timestamp: i64,
    pub size_bytes: usize,
    pub payload: SnapshotPayload,
}

impl Snapshot {
    pub fn new(timestamp: i64, payload: SnapshotPayload) -> Self {
        let size_bytes = serde_json::to_string(&payload).map_or(0, |s| s.len());
        Self {
            timestamp,
            size_bytes,
            payload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotHistory {
    entries: Vec<Snapshot>,
    max: usize,
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new(MAX_BACKUPS)
    }
}

impl SnapshotHistory {
    pub fn new(max: usize) -> Self {
        Self {
            entries: Vec::new(),
            max: max.max(1),
        }
    }

    /// Adopt persisted entries, newest first, trimmed to the bound.
    pub fn from_entries(mut entries: Vec<Snapshot>, max: usize) -> Self {
        let max = max.max(1);
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(max);
        Self { entries, max }
    }

    pub fn entries(&self) -> &[Snapshot] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn newest(&self) -> Option<&Snapshot> {
        self.entries.first()
    }

    /// Deep-copy the project and preferences into a new newest entry,
    /// evicting the oldest entries beyond the bound.
    pub fn capture(&mut self, project: &Project, preferences: &Preferences, now_ms: i64) -> &Snapshot {
        let timestamp = match self.newest() {
            Some(newest) if now_ms <= newest.timestamp => newest.timestamp + 1,
            _ => now_ms,
        };
        let snapshot = Snapshot::new(
            timestamp,
            SnapshotPayload {
                project: project.clone(),
                preferences: preferences.clone(),
            },
        );
        info!(
            timestamp,
            size_bytes = snapshot.size_bytes,
            paragraphs = project.paragraphs.len(),
            "snapshot captured"
        );
        self.entries.insert(0, snapshot);
        self.entries.truncate(self.max);
        &self.entries[0]
    }

    pub fn get(&self, timestamp: i64) -> Result<&Snapshot> {
        self.entries
            .iter()
            .find(|s| s.timestamp == timestamp)
            .ok_or(CoreError::SnapshotNotFound(timestamp))
    }

    /// Remove every entry captured at `timestamp`.
    pub fn delete(&mut self, timestamp: i64) -> Result<usize> {
        let before = self.entries.len();
        self.entries.retain(|s| s.timestamp != timestamp);
        match before - self.entries.len() {
            0 => Err(CoreError::SnapshotNotFound(timestamp)),
            removed => Ok(removed),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Produce the payload that should replace live state.
///
/// Refuses without confirmation. The payload's focus is clamped so the
/// restored project satisfies the focus invariant.
pub fn restore(snapshot: &Snapshot, confirm: Confirmation) -> Result<SnapshotPayload> {
    confirm.require("restoring a snapshot")?;
    let mut payload = snapshot.payload.clone();
    payload.project.clamp_focus();
    info!(timestamp = snapshot.timestamp, "snapshot restored");
    Ok(payload)
}

/// Whether the auto-backup timer should capture now.
pub fn should_auto_capture(preferences: &Preferences, project: &Project) -> bool {
    preferences.auto_backup && !project.paragraphs.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Glossary, Paragraph};
    use crate::store::{ParagraphEdit, ParagraphStore};

    fn project() -> Project {
        let mut paragraphs = ParagraphStore::from(vec![Paragraph::new("A"), Paragraph::new("B")]);
        paragraphs
            .set(1, ParagraphEdit::Translation("Bee".into()))
            .unwrap();
        let mut glossary = Glossary::new();
        glossary.insert("A".into(), "Ay".into());
        Project {
            project_name: "Novel".into(),
            chapter_name: "Ch 1".into(),
            paragraphs,
            glossary,
            focused_index: 1,
            ..Project::default()
        }
    }

    #[test]
    fn test_capture_then_restore_round_trip() {
        let mut history = SnapshotHistory::default();
        let original = project();
        let ts = history.capture(&original, &Preferences::default(), 1_000).timestamp;

        let payload = restore(history.get(ts).unwrap(), Confirmation::Granted).unwrap();
        assert_eq!(payload.project.paragraphs, original.paragraphs);
        assert_eq!(payload.project.glossary, original.glossary);
        assert_eq!(payload.project.focused_index, 1);
    }

    #[test]
    fn test_capture_is_a_deep_copy() {
        let mut history = SnapshotHistory::default();
        let mut live = project();
        history.capture(&live, &Preferences::default(), 1);
        live.paragraphs.clear(1).unwrap();
        assert_eq!(history.entries()[0].payload.project.paragraphs[1].translation, "Bee");
    }

    #[test]
    fn test_restore_requires_confirmation() {
        let mut history = SnapshotHistory::default();
        history.capture(&project(), &Preferences::default(), 5);
        assert_eq!(
            restore(&history.entries()[0], Confirmation::Denied),
            Err(CoreError::ConfirmationRequired("restoring a snapshot"))
        );
    }

    #[test]
    fn test_bound_evicts_oldest() {
        let mut history = SnapshotHistory::default();
        for i in 1..=13 {
            history.capture(&project(), &Preferences::default(), i * 1_000);
        }
        assert_eq!(history.len(), MAX_BACKUPS);
        assert_eq!(history.newest().unwrap().timestamp, 13_000);
        assert!(history.get(1_000).is_err());
        assert!(history.get(2_000).is_ok());
    }

    #[test]
    fn test_timestamps_stay_unique() {
        let mut history = SnapshotHistory::default();
        history.capture(&project(), &Preferences::default(), 500);
        let second = history.capture(&project(), &Preferences::default(), 500).timestamp;
        assert_eq!(second, 501);
    }

    #[test]
    fn test_size_matches_serialized_payload() {
        let mut history = SnapshotHistory::default();
        let snap = history.capture(&project(), &Preferences::default(), 1).clone();
        let json = serde_json::to_string(&snap.payload).unwrap();
        assert_eq!(snap.size_bytes, json.len());
    }

    #[test]
    fn test_delete() {
        let mut history = SnapshotHistory::default();
        history.capture(&project(), &Preferences::default(), 10);
        history.capture(&project(), &Preferences::default(), 20);
        assert_eq!(history.delete(10), Ok(1));
        assert_eq!(history.len(), 1);
        assert_eq!(history.delete(10), Err(CoreError::SnapshotNotFound(10)));
    }

    #[test]
    fn test_from_entries_sorts_and_bounds() {
        let entries: Vec<Snapshot> = (0..5)
            .map(|i| Snapshot::new(i, SnapshotPayload::default()))
            .collect();
        let history = SnapshotHistory::from_entries(entries, 3);
        let stamps: Vec<i64> = history.entries().iter().map(|s| s.timestamp).collect();
        assert_eq!(stamps, [4, 3, 2]);
    }

    #[test]
    fn test_auto_capture_gate() {
        let mut prefs = Preferences::default();
        assert!(should_auto_capture(&prefs, &project()));
        assert!(!should_auto_capture(&prefs, &Project::default()));
        prefs.auto_backup = false;
        assert!(!should_auto_capture(&prefs, &project()));
    }

    #[test]
    fn test_payload_is_project_shaped() {
        let json = serde_json::to_value(SnapshotPayload {
            project: project(),
            preferences: Preferences::default(),
        })
        .unwrap();
        assert_eq!(json["projectName"], "Novel");
        assert_eq!(json["focusedIndex"], 1);
        assert_eq!(json["paragraphs"][1]["translation"], "Bee");
        assert_eq!(json["preferences"]["autoBackup"], true);
    }
}
