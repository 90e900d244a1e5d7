//! Paragraph-level commands: listing, editing, navigation, view state and
//! segments.
//!
//! Paragraph numbers on the command line are 1-based; commands that take
//! an optional number act on the focused paragraph when it is omitted.

use anyhow::Result;
use chaptercraft_core::models::FilterMode;
use chaptercraft_core::navigate::{Direction, NavOutcome, UnfinishedOutcome};
use chaptercraft_core::status::status_of;
use chaptercraft_core::store::ParagraphEdit;

use crate::config::Config;
use crate::stats::{preview, status_mark};
use crate::workspace::{self, CliEditor};

const PREVIEW_CHARS: usize = 72;

/// Print the current page of matches for the active search and filter.
pub fn run_list(config: &Config) -> Result<()> {
    let editor = workspace::open(config)?;
    let wb = editor.workbench();
    let page = wb.visible_page();
    let total = wb.matching_indexes().len();

    if page.is_empty() {
        println!("No matching paragraphs.");
        return Ok(());
    }

    println!("  {:>5}  {}  {}", "#", "S", "ORIGINAL");
    println!("  {}", "-".repeat(PREVIEW_CHARS + 10));
    for i in &page {
        let p = &wb.paragraphs()[*i];
        let focus = if *i == wb.focused_index() { ">" } else { " " };
        println!(
            "{} {:>5}  {}  {}",
            focus,
            i + 1,
            status_mark(p),
            preview(&p.original, PREVIEW_CHARS)
        );
    }

    let remaining = wb.remaining_matches();
    println!();
    println!("Showing {} of {} matches.", page.len(), total);
    if remaining > 0 {
        println!("Run `ccraft view --more` to show {} more.", remaining);
    }
    Ok(())
}

/// Print one paragraph in full. Without a number, shows the focused
/// paragraph (or, in focus mode, the focused match).
pub fn run_show(config: &Config, number: Option<usize>) -> Result<()> {
    let editor = workspace::open(config)?;
    let wb = editor.workbench();

    let index = match number {
        Some(_) => workspace::resolve_index(&editor, number)?,
        None if wb.view().focus_mode => match wb.focused_match() {
            Some(i) => i,
            None => {
                println!("No paragraph matches the current filter.");
                return Ok(());
            }
        },
        None => workspace::resolve_index(&editor, None)?,
    };
    let p = wb.paragraph(index)?;

    println!(
        "Paragraph {} of {}  [{}]{}",
        index + 1,
        wb.paragraphs().len(),
        status_of(p),
        if wb.preferences().dialogue_tools && wb.has_dialogue(&p.original) {
            "  [dialogue]"
        } else {
            ""
        }
    );
    println!();
    println!("--- ORIGINAL ---");
    println!("{}", p.original);
    println!();
    println!("--- TRANSLATION ---");
    println!("{}", p.translation);

    if let Some(segments) = &p.segments {
        println!();
        println!("--- SEGMENTS ---");
        for (k, seg) in segments.iter().enumerate() {
            println!("  [{}] {}", k + 1, seg.original);
            if !seg.translation.is_empty() {
                println!("      => {}", seg.translation);
            }
        }
    }

    let suggestions = wb.glossary_suggestions(index)?;
    if !suggestions.is_empty() {
        println!();
        println!("--- GLOSSARY ---");
        for m in suggestions {
            println!("  {} => {}", m.term, m.translation);
        }
    }
    Ok(())
}

pub fn run_translate(config: &Config, number: Option<usize>, text: &str) -> Result<()> {
    let mut editor = workspace::open(config)?;
    let index = workspace::resolve_index(&editor, number)?;
    let now = workspace::now_ms();
    editor.edit(now, |wb| {
        wb.set(index, ParagraphEdit::Translation(text.to_string()))
    })?;
    workspace::commit(&mut editor)?;
    eprintln!("Paragraph {} updated.", index + 1);
    Ok(())
}

/// Mark a paragraph done or skipped, reporting any auto-advance.
pub fn run_mark(config: &Config, number: Option<usize>, skip: bool) -> Result<()> {
    let mut editor = workspace::open(config)?;
    let index = workspace::resolve_index(&editor, number)?;
    let now = workspace::now_ms();
    let advanced = editor.edit(now, |wb| {
        if skip {
            wb.mark_skipped(index)
        } else {
            wb.mark_done(index)
        }
    })?;
    workspace::commit(&mut editor)?;

    eprintln!(
        "Paragraph {} marked {}.",
        index + 1,
        if skip { "skipped" } else { "done" }
    );
    if let Some(next) = advanced {
        eprintln!("Moved to paragraph {}.", next + 1);
    }
    Ok(())
}

pub fn run_clear(config: &Config, number: Option<usize>, yes: bool) -> Result<()> {
    let mut editor = workspace::open(config)?;
    let index = workspace::resolve_index(&editor, number)?;
    let now = workspace::now_ms();
    workspace::confirmed(editor.edit(now, |wb| {
        wb.clear_paragraph(index, workspace::confirmation(yes))
    }))?;
    workspace::commit(&mut editor)?;
    eprintln!("Paragraph {} cleared.", index + 1);
    Ok(())
}

fn report_move(editor: &mut CliEditor, outcome: NavOutcome) -> Result<()> {
    match outcome {
        NavOutcome::Found(index) => {
            workspace::commit(editor)?;
            println!("Paragraph {}", index + 1);
        }
        NavOutcome::NoMatch => println!("No further match."),
    }
    Ok(())
}

/// Move to the neighbouring match of the active search and filter.
pub fn run_navigate(config: &Config, direction: Direction) -> Result<()> {
    let mut editor = workspace::open(config)?;
    workspace::resolve_index(&editor, None)?;
    let now = workspace::now_ms();
    let outcome = editor.edit(now, |wb| Ok(wb.navigate(direction)))?;
    report_move(&mut editor, outcome)
}

/// Move by one paragraph, ignoring search and filter.
pub fn run_step(config: &Config, direction: Direction) -> Result<()> {
    let mut editor = workspace::open(config)?;
    workspace::resolve_index(&editor, None)?;
    let now = workspace::now_ms();
    let outcome = editor.edit(now, |wb| Ok(wb.step(direction)))?;
    report_move(&mut editor, outcome)
}

pub fn run_unfinished(config: &Config) -> Result<()> {
    let mut editor = workspace::open(config)?;
    let now = workspace::now_ms();
    match editor.edit(now, |wb| Ok(wb.goto_next_unfinished()))? {
        UnfinishedOutcome::Found(index) => {
            workspace::commit(&mut editor)?;
            println!("Paragraph {}", index + 1);
        }
        UnfinishedOutcome::AllCompleted => println!("All paragraphs are completed."),
    }
    Ok(())
}

pub fn run_goto(config: &Config, number: usize) -> Result<()> {
    let mut editor = workspace::open(config)?;
    let index = workspace::resolve_index(&editor, Some(number))?;
    editor.edit(workspace::now_ms(), |wb| wb.focus(index))?;
    workspace::commit(&mut editor)?;
    println!("Paragraph {}", index + 1);
    Ok(())
}

/// Options for `ccraft view`.
#[derive(Debug, Default)]
pub struct ViewArgs {
    pub filter: Option<FilterMode>,
    pub search: Option<String>,
    pub more: bool,
    pub focus: Option<bool>,
}

pub fn run_view(config: &Config, args: ViewArgs) -> Result<()> {
    let mut editor = workspace::open(config)?;
    editor.edit(workspace::now_ms(), |wb| {
        if let Some(mode) = args.filter {
            wb.set_filter(mode);
        }
        if let Some(query) = &args.search {
            wb.set_search(query);
        }
        if args.more {
            wb.load_more();
        }
        if let Some(on) = args.focus {
            wb.set_focus_mode(on);
        }
        Ok(())
    })?;
    workspace::commit(&mut editor)?;

    let wb = editor.workbench();
    let view = wb.view();
    println!("Filter:     {}", view.filter_mode.as_str());
    println!(
        "Search:     {}",
        if view.search_query.is_empty() {
            "-".to_string()
        } else {
            format!("{:?}", view.search_query)
        }
    );
    println!("Focus mode: {}", if view.focus_mode { "on" } else { "off" });
    println!(
        "Showing:    {} of {} matches",
        wb.visible_page().len(),
        wb.matching_indexes().len()
    );
    Ok(())
}

pub fn run_segments_split(config: &Config, number: Option<usize>) -> Result<()> {
    let mut editor = workspace::open(config)?;
    let index = workspace::resolve_index(&editor, number)?;
    let count = editor.edit(workspace::now_ms(), |wb| wb.segment(index))?;
    workspace::commit(&mut editor)?;

    if let Some(segments) = &editor.workbench().paragraphs()[index].segments {
        for (k, seg) in segments.iter().enumerate() {
            println!("  [{}] {}", k + 1, preview(&seg.original, PREVIEW_CHARS));
        }
    }
    eprintln!("Paragraph {} has {} segments.", index + 1, count);
    Ok(())
}

pub fn run_segments_set(
    config: &Config,
    number: usize,
    segment: usize,
    text: &str,
) -> Result<()> {
    if segment == 0 {
        anyhow::bail!("Segment numbers start at 1");
    }
    let mut editor = workspace::open(config)?;
    let index = workspace::resolve_index(&editor, Some(number))?;
    editor.edit(workspace::now_ms(), |wb| {
        wb.set_segment(index, segment - 1, text)
    })?;
    workspace::commit(&mut editor)?;
    eprintln!("Segment {} of paragraph {} updated.", segment, index + 1);
    Ok(())
}

pub fn run_segments_merge(config: &Config, number: Option<usize>) -> Result<()> {
    let mut editor = workspace::open(config)?;
    let index = workspace::resolve_index(&editor, number)?;
    let merged = editor.edit(workspace::now_ms(), |wb| wb.merge_segments(index))?;
    workspace::commit(&mut editor)?;
    println!("{}", merged);
    Ok(())
}
