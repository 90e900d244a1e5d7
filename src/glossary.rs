//! `ccraft glossary`: term management, suggestions, import and export.

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::workspace;

pub fn run_add(config: &Config, term: &str, translation: &str) -> Result<()> {
    let mut editor = workspace::open(config)?;
    editor.edit(workspace::now_ms(), |wb| {
        wb.add_glossary_entry(term, translation)
    })?;
    workspace::commit(&mut editor)?;
    eprintln!("Added {} => {}", term.trim(), translation.trim());
    Ok(())
}

pub fn run_remove(config: &Config, term: &str) -> Result<()> {
    let mut editor = workspace::open(config)?;
    let removed = editor.edit(workspace::now_ms(), |wb| Ok(wb.remove_glossary_entry(term)))?;
    if !removed {
        anyhow::bail!("No glossary entry for '{}'", term);
    }
    workspace::commit(&mut editor)?;
    eprintln!("Removed '{}'", term);
    Ok(())
}

pub fn run_list(config: &Config, query: Option<&str>) -> Result<()> {
    let editor = workspace::open(config)?;
    let entries = editor.workbench().glossary_entries(query.unwrap_or(""));
    if entries.is_empty() {
        println!("No glossary entries.");
        return Ok(());
    }
    let width = entries
        .iter()
        .map(|(term, _)| term.chars().count())
        .max()
        .unwrap_or(0)
        .min(32);
    for (term, translation) in entries {
        println!("  {:<width$}  {}", term, translation, width = width);
    }
    Ok(())
}

/// Suggestions for one paragraph (the focused one by default).
pub fn run_matches(config: &Config, number: Option<usize>) -> Result<()> {
    let editor = workspace::open(config)?;
    let index = workspace::resolve_index(&editor, number)?;
    let found = editor.workbench().glossary_suggestions(index)?;
    if found.is_empty() {
        println!("No glossary terms in paragraph {}.", index + 1);
        return Ok(());
    }
    for m in found {
        println!("  {} => {}", m.term, m.translation);
    }
    Ok(())
}

pub fn run_import(config: &Config, path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut editor = workspace::open(config)?;
    let count = editor.edit(workspace::now_ms(), |wb| wb.import_glossary(&text))?;
    workspace::commit(&mut editor)?;
    eprintln!("Imported {} glossary entries.", count);
    Ok(())
}

pub fn run_export(config: &Config, out: Option<&Path>) -> Result<()> {
    let editor = workspace::open(config)?;
    let pack = editor.workbench().glossary_pack(workspace::now_ms());
    let json = serde_json::to_string_pretty(&pack)?;
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

pub fn run_clear(config: &Config, yes: bool) -> Result<()> {
    let mut editor = workspace::open(config)?;
    workspace::confirmed(editor.edit(workspace::now_ms(), |wb| {
        wb.clear_glossary(workspace::confirmation(yes))
    }))?;
    workspace::commit(&mut editor)?;
    eprintln!("Glossary cleared.");
    Ok(())
}
