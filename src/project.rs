//! Whole-project commands: init, split, exports, imports, preferences and
//! reset.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chaptercraft_core::models::{SplitMode, Theme};
use chaptercraft_core::storage::KeyValueStore;

use crate::config::Config;
use crate::workspace;

/// Create the storage directory and an initial empty record. Idempotent.
pub fn run_init(config: &Config) -> Result<()> {
    std::fs::create_dir_all(&config.storage.dir).with_context(|| {
        format!(
            "Failed to create storage directory: {}",
            config.storage.dir.display()
        )
    })?;

    let mut editor = workspace::open(config)?;
    let exists = editor
        .gateway()
        .storage()
        .get(editor.gateway().key())?
        .is_some();
    if !exists {
        editor.flush()?;
    }
    println!(
        "Workspace initialized at {}.",
        config.storage.dir.display()
    );
    Ok(())
}

/// Read chapter text from a file, or stdin when the path is `-`.
fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read chapter text from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))
    }
}

pub fn run_split(
    config: &Config,
    project: &str,
    chapter: &str,
    mode: SplitMode,
    source: &Path,
) -> Result<()> {
    let text = read_source(source)?;
    let mut editor = workspace::open(config)?;
    let now = workspace::now_ms();
    let count = editor.edit(now, |wb| {
        let count = wb.split_chapter(project, chapter, &text, mode, now)?;
        if source != Path::new("-") {
            let name = source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            wb.set_file_name(&name);
        }
        Ok(count)
    })?;
    workspace::commit(&mut editor)?;
    println!("Split into {} paragraphs.", count);
    Ok(())
}

pub fn run_rename(config: &Config, project: Option<&str>, chapter: Option<&str>) -> Result<()> {
    if project.is_none() && chapter.is_none() {
        anyhow::bail!("Nothing to rename: pass --project and/or --chapter");
    }
    let mut editor = workspace::open(config)?;
    editor.edit(workspace::now_ms(), |wb| {
        if let Some(name) = project {
            wb.set_project_name(name);
        }
        if let Some(name) = chapter {
            wb.set_chapter_name(name);
        }
        Ok(())
    })?;
    workspace::commit(&mut editor)?;
    let p = editor.workbench().project();
    println!("{} / {}", p.project_name, p.chapter_name);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Translation,
    Review,
    Project,
}

/// Write an export file into `dir` (or print it to stdout).
pub fn run_export(config: &Config, kind: ExportKind, dir: Option<&Path>, stdout: bool) -> Result<()> {
    let editor = workspace::open(config)?;
    let wb = editor.workbench();
    let now = workspace::now_ms();

    let (name, body) = match kind {
        ExportKind::Translation => (wb.export_filename()?, wb.translation_text()),
        ExportKind::Review => (wb.review_filename()?, wb.review_text()),
        ExportKind::Project => {
            let base = wb.export_filename()?;
            let name = format!("{}.chaptercraft.json", base.trim_end_matches(".txt"));
            (name, serde_json::to_string_pretty(&wb.project_pack(now))?)
        }
    };

    if stdout {
        println!("{}", body);
        return Ok(());
    }

    let path: PathBuf = dir.unwrap_or_else(|| Path::new(".")).join(&name);
    std::fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{}", path.display());
    Ok(())
}

/// Replace the workspace with a project pack.
pub fn run_import(config: &Config, path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut editor = workspace::open(config)?;
    let now = workspace::now_ms();
    editor.edit(now, |wb| wb.import_project(&text, now))?;
    workspace::commit(&mut editor)?;
    eprintln!(
        "Imported {} paragraphs.",
        editor.workbench().paragraphs().len()
    );
    Ok(())
}

/// Changes requested by `ccraft prefs`. `None` leaves a flag unchanged.
#[derive(Debug, Default)]
pub struct PrefsArgs {
    pub theme: Option<String>,
    pub toggle_theme: bool,
    pub auto_advance: Option<bool>,
    pub auto_backup: Option<bool>,
    pub count_skipped_as_done: Option<bool>,
    pub dialogue_tools: Option<bool>,
}

impl PrefsArgs {
    fn is_empty(&self) -> bool {
        self.theme.is_none()
            && !self.toggle_theme
            && self.auto_advance.is_none()
            && self.auto_backup.is_none()
            && self.count_skipped_as_done.is_none()
            && self.dialogue_tools.is_none()
    }
}

pub fn run_prefs(config: &Config, args: PrefsArgs) -> Result<()> {
    let mut editor = workspace::open(config)?;

    if !args.is_empty() {
        let mut prefs = editor.workbench().preferences().clone();
        if let Some(theme) = &args.theme {
            prefs.theme = match theme.as_str() {
                "dark" | "light" => Theme::coerce(theme),
                other => anyhow::bail!("Unknown theme '{}'. Must be dark or light.", other),
            };
        }
        if args.toggle_theme {
            prefs.theme = prefs.theme.toggled();
        }
        if let Some(v) = args.auto_advance {
            prefs.auto_advance = v;
        }
        if let Some(v) = args.auto_backup {
            prefs.auto_backup = v;
        }
        if let Some(v) = args.count_skipped_as_done {
            prefs.count_skipped_as_done = v;
        }
        if let Some(v) = args.dialogue_tools {
            prefs.dialogue_tools = v;
        }
        editor.edit(workspace::now_ms(), |wb| {
            wb.set_preferences(prefs);
            Ok(())
        })?;
        workspace::commit(&mut editor)?;
    }

    let prefs = editor.workbench().preferences();
    println!("theme                  {}", prefs.theme.as_str());
    println!("auto-advance           {}", prefs.auto_advance);
    println!("auto-backup            {}", prefs.auto_backup);
    println!("count-skipped-as-done  {}", prefs.count_skipped_as_done);
    println!("dialogue-tools         {}", prefs.dialogue_tools);
    Ok(())
}

/// Clear everything except the theme, including backups.
pub fn run_reset(config: &Config, yes: bool) -> Result<()> {
    let mut editor = workspace::open(config)?;
    workspace::confirmed(editor.edit(workspace::now_ms(), |wb| {
        wb.clear_all(workspace::confirmation(yes))
    }))?;
    workspace::commit(&mut editor)?;
    eprintln!("Workspace cleared.");
    Ok(())
}
