//! `ccraft backup`: manual snapshots, listing, restore, delete, download.

use std::path::Path;

use anyhow::{Context, Result};
use chaptercraft_core::models::Status;
use chaptercraft_core::status::status_of;

use crate::config::Config;
use crate::stats::{format_bytes, format_ts_iso, format_ts_relative};
use crate::workspace;

pub fn run_make(config: &Config) -> Result<()> {
    let mut editor = workspace::open(config)?;
    if editor.workbench().paragraphs().is_empty() {
        anyhow::bail!("Nothing to back up yet. Run `ccraft split` first.");
    }
    let ts = editor.edit(workspace::now_ms(), |wb| Ok(wb.capture(workspace::now_ms())))?;
    workspace::commit(&mut editor)?;
    println!("{}", ts);
    eprintln!("Backup created ({}).", format_ts_iso(ts));
    Ok(())
}

pub fn run_list(config: &Config) -> Result<()> {
    let mut editor = workspace::open(config)?;
    let snapshots = editor.list_snapshots();

    if snapshots.is_empty() {
        println!("No backups.");
        return Ok(());
    }

    println!(
        "  {:<15} {:<21} {:>10} {:>6}   {}",
        "TIMESTAMP", "CREATED", "SIZE", "DONE", "AGE"
    );
    println!("  {}", "-".repeat(72));
    for s in snapshots {
        let paragraphs = &s.payload.project.paragraphs;
        let done = paragraphs.iter().filter(|p| status_of(p) == Status::Done).count();
        println!(
            "  {:<15} {:<21} {:>10} {:>6}   {}",
            s.timestamp,
            format_ts_iso(s.timestamp),
            format_bytes(s.size_bytes as u64),
            format!("{}/{}", done, paragraphs.len()),
            format_ts_relative(s.timestamp)
        );
    }
    Ok(())
}

pub fn run_restore(config: &Config, timestamp: i64, yes: bool) -> Result<()> {
    let mut editor = workspace::open(config)?;
    workspace::confirmed(editor.edit(workspace::now_ms(), |wb| {
        wb.restore_snapshot(timestamp, workspace::confirmation(yes))
    }))?;
    workspace::commit(&mut editor)?;
    eprintln!("Restored backup {}.", format_ts_iso(timestamp));
    Ok(())
}

pub fn run_delete(config: &Config, timestamp: i64) -> Result<()> {
    let mut editor = workspace::open(config)?;
    let removed = editor.edit(workspace::now_ms(), |wb| wb.delete_snapshot(timestamp))?;
    workspace::commit(&mut editor)?;
    eprintln!("Deleted {} backup{}.", removed, if removed == 1 { "" } else { "s" });
    Ok(())
}

/// Write one snapshot's payload as JSON, to `out` or stdout.
pub fn run_download(config: &Config, timestamp: i64, out: Option<&Path>) -> Result<()> {
    let editor = workspace::open(config)?;
    let payload = editor.workbench().snapshot_payload(timestamp)?;
    let json = serde_json::to_string_pretty(payload)?;

    match out {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
