//! The editor: a [`Workbench`] wired to durable storage and timers.
//!
//! Hosts drive it with the current time. Mutations go through
//! [`Editor::edit`], which arms the debounced write buffer; the host calls
//! [`Editor::tick`] periodically to perform due writes and auto-backups.

use tracing::{debug, info, warn};

use crate::error::{CoreError, Result};
use crate::gateway::PersistenceGateway;
use crate::schedule::{AutoBackupTimer, WriteBuffer, AUTO_BACKUP_MS, DEFAULT_DEBOUNCE_MS};
use crate::snapshot::Snapshot;
use crate::storage::KeyValueStore;
use crate::workbench::{Workbench, WorkbenchSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorSettings {
    pub workbench: WorkbenchSettings,
    pub debounce_ms: i64,
    pub auto_backup_ms: i64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            workbench: WorkbenchSettings::default(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            auto_backup_ms: AUTO_BACKUP_MS,
        }
    }
}

/// Where the workbench state came from when the editor opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOrigin {
    /// A stored record was decoded (possibly migrated or salvaged).
    Restored,
    /// Nothing usable was stored.
    Fresh,
    /// Storage could not be read; the editor started empty.
    StorageUnavailable(String),
}

/// What one [`Editor::tick`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Bytes written, if a write happened.
    pub flushed: Option<usize>,
    /// Timestamp of an auto-captured snapshot.
    pub captured: Option<i64>,
    /// A failed write. The buffer stays armed and is retried next tick.
    pub error: Option<CoreError>,
}

pub struct Editor<S: KeyValueStore> {
    workbench: Workbench,
    gateway: PersistenceGateway<S>,
    buffer: WriteBuffer,
    timer: AutoBackupTimer,
    origin: LoadOrigin,
}

impl<S: KeyValueStore> Editor<S> {
    /// Load state from `storage` under `key`. Never fails: unreadable or
    /// unusable storage yields an empty workbench.
    pub fn open(storage: S, key: impl Into<String>, settings: EditorSettings, now_ms: i64) -> Self {
        let gateway = PersistenceGateway::new(storage, key);
        let (workbench, origin) = match gateway.load() {
            Ok(Some(record)) => (
                Workbench::from_record(record, settings.workbench),
                LoadOrigin::Restored,
            ),
            Ok(None) => (Workbench::new(settings.workbench), LoadOrigin::Fresh),
            Err(e) => {
                warn!(error = %e, "starting with empty state");
                (
                    Workbench::new(settings.workbench),
                    LoadOrigin::StorageUnavailable(e.to_string()),
                )
            }
        };
        info!(
            key = gateway.key(),
            paragraphs = workbench.paragraphs().len(),
            snapshots = workbench.snapshots().len(),
            ?origin,
            "editor opened"
        );
        Self {
            workbench,
            gateway,
            buffer: WriteBuffer::new(settings.debounce_ms),
            timer: AutoBackupTimer::new(settings.auto_backup_ms, now_ms),
            origin,
        }
    }

    pub fn workbench(&self) -> &Workbench {
        &self.workbench
    }

    pub fn origin(&self) -> &LoadOrigin {
        &self.origin
    }

    pub fn gateway(&self) -> &PersistenceGateway<S> {
        &self.gateway
    }

    /// True while a write is buffered.
    pub fn is_dirty(&self) -> bool {
        self.buffer.is_pending()
    }

    pub fn pending_deadline(&self) -> Option<i64> {
        self.buffer.deadline()
    }

    pub fn next_auto_backup(&self) -> i64 {
        self.timer.next_due()
    }

    /// Apply a mutation. A successful one re-arms the write buffer; a
    /// failed one leaves the state as the operation left it and schedules
    /// nothing.
    pub fn edit<T>(&mut self, now_ms: i64, f: impl FnOnce(&mut Workbench) -> Result<T>) -> Result<T> {
        let value = f(&mut self.workbench)?;
        self.buffer.schedule(now_ms);
        Ok(value)
    }

    /// Write the current state immediately.
    pub fn flush(&mut self) -> Result<usize> {
        let bytes = self.gateway.save(&self.workbench.to_record())?;
        self.buffer.disarm();
        Ok(bytes)
    }

    /// Write only if something is buffered.
    pub fn flush_pending(&mut self) -> Result<Option<usize>> {
        if self.buffer.is_pending() {
            self.flush().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Perform the writes and auto-backups that are due at `now_ms`.
    pub fn tick(&mut self, now_ms: i64) -> TickReport {
        let mut report = TickReport::default();

        if self.timer.poll(now_ms) {
            report.captured = self.workbench.auto_capture(now_ms);
            if report.captured.is_some() {
                self.buffer.schedule(now_ms);
                self.write_now(now_ms, &mut report);
                return report;
            }
        }

        if self.buffer.is_due(now_ms) {
            self.write_now(now_ms, &mut report);
        }
        report
    }

    fn write_now(&mut self, now_ms: i64, report: &mut TickReport) {
        match self.flush() {
            Ok(bytes) => report.flushed = Some(bytes),
            Err(e) => {
                warn!(error = %e, "write failed, will retry");
                self.buffer.schedule(now_ms);
                report.error = Some(e);
            }
        }
    }

    /// The snapshot history, after forcing any buffered write so the
    /// listing reflects durable state.
    pub fn list_snapshots(&mut self) -> &[Snapshot] {
        if let Err(e) = self.flush_pending() {
            warn!(error = %e, "could not flush before listing snapshots");
        }
        debug!(count = self.workbench.snapshots().len(), "listing snapshots");
        self.workbench.snapshots().entries()
    }

    /// Flush any buffered write and hand back the storage backend.
    pub fn close(mut self) -> Result<S> {
        self.flush_pending()?;
        Ok(self.gateway.into_storage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SplitMode;
    use crate::storage::memory::InMemoryStore;

    const KEY: &str = "test_state";

    fn settings() -> EditorSettings {
        EditorSettings {
            debounce_ms: 100,
            auto_backup_ms: 1_000,
            ..EditorSettings::default()
        }
    }

    fn split(editor: &mut Editor<InMemoryStore>, now: i64) {
        editor
            .edit(now, |wb| wb.split_chapter("Novel", "One", "A.\n\nB.\n\nC.", SplitMode::BlankLines, now))
            .unwrap();
    }

    #[test]
    fn test_open_empty_storage() {
        let editor = Editor::open(InMemoryStore::new(), KEY, settings(), 0);
        assert_eq!(editor.origin(), &LoadOrigin::Fresh);
        assert!(editor.workbench().paragraphs().is_empty());
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_open_malformed_storage() {
        let store = InMemoryStore::new();
        store.set(KEY, "{not json").unwrap();
        let editor = Editor::open(store, KEY, settings(), 0);
        assert_eq!(editor.origin(), &LoadOrigin::Fresh);
    }

    #[test]
    fn test_burst_is_written_once_after_quiet_period() {
        let mut editor = Editor::open(InMemoryStore::new(), KEY, settings(), 0);
        assert_eq!(editor.pending_deadline(), None);
        assert_eq!(editor.next_auto_backup(), 1_000);
        split(&mut editor, 0);
        editor.edit(50, |wb| wb.translate(0, "Ah.")).unwrap();
        editor.edit(120, |wb| wb.translate(1, "Be.")).unwrap();
        assert_eq!(editor.pending_deadline(), Some(220));

        assert_eq!(editor.tick(200), TickReport::default());
        assert!(editor.gateway().load().unwrap().is_none());

        let report = editor.tick(220);
        assert!(report.flushed.is_some());
        assert!(!editor.is_dirty());
        assert_eq!(editor.pending_deadline(), None);

        let stored = editor.gateway().load().unwrap().unwrap();
        assert_eq!(stored.project.paragraphs[1].translation, "Be.");
    }

    #[test]
    fn test_failed_edit_schedules_nothing() {
        let mut editor = Editor::open(InMemoryStore::new(), KEY, settings(), 0);
        assert!(editor.edit(0, |wb| wb.translate(5, "x")).is_err());
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_reopen_restores_state() {
        let mut editor = Editor::open(InMemoryStore::new(), KEY, settings(), 0);
        split(&mut editor, 0);
        editor.edit(10, |wb| wb.focus(2)).unwrap();
        let store = editor.close().unwrap();

        let editor = Editor::open(store, KEY, settings(), 0);
        assert_eq!(editor.origin(), &LoadOrigin::Restored);
        assert_eq!(editor.workbench().paragraphs().len(), 3);
        assert_eq!(editor.workbench().focused_index(), 2);
        assert_eq!(editor.workbench().snapshots().len(), 1);
    }

    #[test]
    fn test_auto_backup_fires_and_flushes() {
        let mut editor = Editor::open(InMemoryStore::new(), KEY, settings(), 0);
        assert_eq!(editor.tick(1_000).captured, None);

        split(&mut editor, 1_100);
        let report = editor.tick(2_000);
        assert_eq!(report.captured, Some(2_000));
        assert!(report.flushed.is_some());
        assert_eq!(editor.gateway().load().unwrap().unwrap().snapshots.len(), 2);
    }

    #[test]
    fn test_list_snapshots_forces_flush() {
        let mut editor = Editor::open(InMemoryStore::new(), KEY, settings(), 0);
        split(&mut editor, 0);
        assert!(editor.is_dirty());
        assert_eq!(editor.list_snapshots().len(), 1);
        assert!(!editor.is_dirty());
        assert!(editor.gateway().load().unwrap().is_some());
    }

    #[test]
    fn test_write_failure_is_retried() {
        let mut editor = Editor::open(InMemoryStore::with_quota(10), KEY, settings(), 0);
        split(&mut editor, 0);
        let report = editor.tick(500);
        assert!(matches!(report.error, Some(CoreError::StorageUnavailable(_))));
        assert!(editor.is_dirty());
        assert_eq!(editor.workbench().paragraphs().len(), 3);
    }
}
