//! Read-only overviews: `ccraft status`, `ccraft check`, and the shared
//! formatting helpers used by the other commands.

use anyhow::Result;
use chaptercraft_core::models::{Paragraph, Status};
use chaptercraft_core::status::status_of;

use crate::config::Config;
use crate::workspace;

/// Print progress, view state and storage details.
pub fn run_status(config: &Config) -> Result<()> {
    let mut editor = workspace::open(config)?;
    let snapshot_count = editor.list_snapshots().len();
    let newest = editor.workbench().snapshots().newest().map(|s| s.timestamp);
    let wb = editor.workbench();
    let project = wb.project();
    let progress = wb.progress();
    let view = wb.view();

    let path = editor.gateway().storage().path_for(editor.gateway().key())?;
    let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

    let counts = |status: Status| {
        wb.paragraphs()
            .iter()
            .filter(|p| status_of(p) == status)
            .count()
    };

    println!("ChapterCraft — Workspace Status");
    println!("===============================");
    println!();
    println!("  Project:     {}", or_dash(&project.project_name));
    println!("  Chapter:     {}", or_dash(&project.chapter_name));
    if !project.file_name.is_empty() {
        println!("  Source:      {}", project.file_name);
    }
    println!("  Split mode:  {}", project.split_mode.as_str());
    println!();
    println!(
        "  Progress:    {} / {} ({}%){}",
        progress.completed,
        progress.total,
        progress.percent,
        if wb.preferences().count_skipped_as_done {
            "  [skipped counts as done]"
        } else {
            ""
        }
    );
    println!("  Done:        {}", counts(Status::Done));
    println!("  Skipped:     {}", counts(Status::Skipped));
    println!("  Remaining:   {}", counts(Status::Untranslated));
    if !wb.paragraphs().is_empty() {
        println!("  Focused:     #{}", wb.focused_index() + 1);
    }
    println!();
    println!("  Filter:      {}", view.filter_mode.as_str());
    if !view.search_query.trim().is_empty() {
        println!("  Search:      {:?}", view.search_query);
    }
    println!(
        "  Matches:     {}{}",
        wb.matching_indexes().len(),
        if view.focus_mode { "  [focus mode]" } else { "" }
    );
    println!("  Glossary:    {} entries", project.glossary.len());
    println!();
    println!("  Storage:     {}", path.display());
    println!("  Size:        {}", format_bytes(size));
    println!(
        "  Backups:     {} / {}{}",
        snapshot_count,
        wb.snapshots().max(),
        match newest {
            Some(ts) => format!("  (latest {})", format_ts_relative(ts)),
            None => String::new(),
        }
    );
    println!();
    Ok(())
}

/// Print the consistency check report.
pub fn run_check(config: &Config) -> Result<()> {
    let editor = workspace::open(config)?;
    let report = editor.workbench().check_report();
    for (title, body) in report.sections() {
        println!("{}", title);
        println!("{}", "-".repeat(title.chars().count()));
        println!("{}", body);
        println!();
    }
    Ok(())
}

fn or_dash(s: &str) -> &str {
    if s.trim().is_empty() {
        "-"
    } else {
        s
    }
}

/// One-character status marker used in listings.
pub fn status_mark(p: &Paragraph) -> &'static str {
    match status_of(p) {
        Status::Done => "✓",
        Status::Skipped => "~",
        Status::Untranslated => "·",
    }
}

/// First `max` characters of `text` on one line.
pub fn preview(text: &str, max: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        flat
    } else {
        let cut: String = flat.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// Format a byte count as a human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

/// Format a Unix-millisecond timestamp relative to now (e.g. "3 mins ago").
pub fn format_ts_relative(ts_ms: i64) -> String {
    format_ts_relative_at(ts_ms, workspace::now_ms())
}

fn format_ts_relative_at(ts_ms: i64, now_ms: i64) -> String {
    let delta = (now_ms - ts_ms) / 1000;

    if delta < 0 {
        return format_ts_iso(ts_ms);
    }

    if delta < 60 {
        "just now".to_string()
    } else if delta < 3600 {
        let mins = delta / 60;
        format!("{} min{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if delta < 86400 {
        let hours = delta / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if delta < 86400 * 30 {
        let days = delta / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else {
        format_ts_iso(ts_ms)
    }
}

pub fn format_ts_iso(ts_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ts_ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ts_ms.to_string())
}
