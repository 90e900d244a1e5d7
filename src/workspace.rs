//! Opening the persisted workbench for one CLI invocation.
//!
//! Each command opens an [`Editor`] over the configured [`FileStore`],
//! applies its mutations, and commits with a forced flush. The debounce
//! only matters for long-running sessions.

use anyhow::{Context, Result};
use chaptercraft_core::editor::{Editor, LoadOrigin};
use chaptercraft_core::{Confirmation, CoreError};

use crate::config::Config;
use crate::file_store::FileStore;

pub type CliEditor = Editor<FileStore>;

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub fn open(config: &Config) -> Result<CliEditor> {
    let store = FileStore::new(&config.storage.dir);
    let editor = Editor::open(
        store,
        config.storage.key.clone(),
        config.editor_settings(),
        now_ms(),
    );
    if let LoadOrigin::StorageUnavailable(reason) = editor.origin() {
        eprintln!("Warning: storage unavailable ({}); starting empty.", reason);
    }
    Ok(editor)
}

/// Write any buffered changes.
pub fn commit(editor: &mut CliEditor) -> Result<()> {
    editor
        .flush_pending()
        .context("Failed to save workspace state")?;
    Ok(())
}

/// Translate a 1-based paragraph number, or the focused paragraph when
/// none was given, into an index.
pub fn resolve_index(editor: &CliEditor, number: Option<usize>) -> Result<usize> {
    let len = editor.workbench().paragraphs().len();
    if len == 0 {
        anyhow::bail!("No paragraphs yet. Run `ccraft split` first.");
    }
    match number {
        None => Ok(editor.workbench().focused_index()),
        Some(0) => anyhow::bail!("Paragraph numbers start at 1"),
        Some(n) if n > len => anyhow::bail!("Paragraph {} does not exist (have {})", n, len),
        Some(n) => Ok(n - 1),
    }
}

pub fn confirmation(yes: bool) -> Confirmation {
    Confirmation::from_flag(yes)
}

/// Convert a core result, pointing the user at `--yes` when a destructive
/// operation was refused.
pub fn confirmed<T>(result: chaptercraft_core::Result<T>) -> Result<T> {
    result.map_err(|e| match e {
        CoreError::ConfirmationRequired(_) => anyhow::anyhow!("{}; re-run with --yes", e),
        other => other.into(),
    })
}
