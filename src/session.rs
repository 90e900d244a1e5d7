//! `ccraft session`: an interactive line-mode editor.
//!
//! Unlike the one-shot commands, a session keeps the workbench open and
//! runs the real timers: edits are written after the debounce quiet
//! period, and auto-backups fire on the configured interval. Everything
//! buffered is flushed on exit.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use chaptercraft_core::models::FilterMode;
use chaptercraft_core::navigate::{Direction, NavOutcome, UnfinishedOutcome};
use chaptercraft_core::status::status_of;
use chaptercraft_core::store::ParagraphEdit;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use crate::config::Config;
use crate::stats::{format_ts_iso, preview};
use crate::workspace::{self, CliEditor};

/// Timer resolution. Well under the smallest useful debounce.
const TICK_MS: u64 = 50;

const HELP: &str = "\
Commands:
  <enter> | show        show the focused paragraph
  t <text>              set the translation
  d | done              mark done
  s | skip              mark skipped
  n | next, p | prev    next/previous match
  + | -                 step one paragraph
  u | unfinished        next untranslated paragraph
  g <n>                 go to paragraph n
  f <mode>              filter: all, done, skipped, untranslated, dialogue
  / <query>             search (empty clears)
  more                  show more matches in `list`
  list                  list the current page of matches
  b | backup            create a backup now
  status                progress
  q | quit              save and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Show,
    Translate(String),
    Done,
    Skip,
    Navigate(Direction),
    Step(Direction),
    Unfinished,
    Goto(usize),
    Filter(FilterMode),
    Search(String),
    More,
    List,
    Backup,
    Status,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        if let Some(query) = line.strip_prefix('/') {
            return Ok(SessionCommand::Search(query.trim().to_string()));
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (line, ""),
        };
        let cmd = match word.to_lowercase().as_str() {
            "" | "show" => SessionCommand::Show,
            "t" | "translate" => SessionCommand::Translate(rest.to_string()),
            "d" | "done" => SessionCommand::Done,
            "s" | "skip" => SessionCommand::Skip,
            "n" | "next" => SessionCommand::Navigate(Direction::Next),
            "p" | "prev" => SessionCommand::Navigate(Direction::Prev),
            "+" => SessionCommand::Step(Direction::Next),
            "-" => SessionCommand::Step(Direction::Prev),
            "u" | "unfinished" => SessionCommand::Unfinished,
            "g" | "goto" => match rest.parse::<usize>() {
                Ok(n) if n >= 1 => SessionCommand::Goto(n),
                _ => return Err(format!("usage: g <paragraph number>, got '{}'", rest)),
            },
            "f" | "filter" => {
                SessionCommand::Filter(rest.parse::<FilterMode>().map_err(|e| e.to_string())?)
            }
            "search" => SessionCommand::Search(rest.to_string()),
            "more" => SessionCommand::More,
            "l" | "list" => SessionCommand::List,
            "b" | "backup" => SessionCommand::Backup,
            "status" => SessionCommand::Status,
            "h" | "help" | "?" => SessionCommand::Help,
            "q" | "quit" | "exit" => SessionCommand::Quit,
            other => return Err(format!("unknown command '{}' (type `help`)", other)),
        };
        Ok(cmd)
    }
}

pub async fn run_session(config: &Config) -> Result<()> {
    let mut editor = workspace::open(config)?;
    let interactive = atty::is(atty::Stream::Stdin);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_millis(TICK_MS));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    if interactive {
        eprintln!("ChapterCraft session. Type `help` for commands.");
        print_focused(&editor);
        prompt();
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };
                match line.parse::<SessionCommand>() {
                    Ok(SessionCommand::Quit) => break,
                    Ok(cmd) => {
                        if let Err(e) = apply(&mut editor, cmd) {
                            eprintln!("Error: {:#}", e);
                        }
                    }
                    Err(msg) => eprintln!("{}", msg),
                }
                if interactive {
                    prompt();
                }
            }
            _ = ticker.tick() => {
                let report = editor.tick(workspace::now_ms());
                if let Some(ts) = report.captured {
                    eprintln!("[auto-backup {}]", format_ts_iso(ts));
                }
                if let Some(e) = report.error {
                    eprintln!("Warning: {}", e);
                }
            }
            _ = &mut ctrl_c => break,
        }
    }

    workspace::commit(&mut editor)?;
    if interactive {
        eprintln!("Saved.");
    }
    Ok(())
}

fn prompt() {
    use std::io::Write;
    eprint!("> ");
    let _ = std::io::stderr().flush();
}

fn apply(editor: &mut CliEditor, cmd: SessionCommand) -> Result<()> {
    let now = workspace::now_ms();
    match cmd {
        SessionCommand::Show => print_focused(editor),
        SessionCommand::Translate(text) => {
            let index = workspace::resolve_index(editor, None)?;
            editor.edit(now, |wb| wb.set(index, ParagraphEdit::Translation(text)))?;
        }
        SessionCommand::Done => mark(editor, now, false)?,
        SessionCommand::Skip => mark(editor, now, true)?,
        SessionCommand::Navigate(direction) => {
            match editor.edit(now, |wb| Ok(wb.navigate(direction)))? {
                NavOutcome::Found(_) => print_focused(editor),
                NavOutcome::NoMatch => println!("No further match."),
            }
        }
        SessionCommand::Step(direction) => match editor.edit(now, |wb| Ok(wb.step(direction)))? {
            NavOutcome::Found(_) => print_focused(editor),
            NavOutcome::NoMatch => println!("Already at the edge."),
        },
        SessionCommand::Unfinished => {
            match editor.edit(now, |wb| Ok(wb.goto_next_unfinished()))? {
                UnfinishedOutcome::Found(_) => print_focused(editor),
                UnfinishedOutcome::AllCompleted => println!("All paragraphs are completed."),
            }
        }
        SessionCommand::Goto(n) => {
            let index = workspace::resolve_index(editor, Some(n))?;
            editor.edit(now, |wb| wb.focus(index))?;
            print_focused(editor);
        }
        SessionCommand::Filter(mode) => {
            editor.edit(now, |wb| {
                wb.set_filter(mode);
                Ok(())
            })?;
            println!("{} matches.", editor.workbench().matching_indexes().len());
        }
        SessionCommand::Search(query) => {
            editor.edit(now, |wb| {
                wb.set_search(&query);
                Ok(())
            })?;
            println!("{} matches.", editor.workbench().matching_indexes().len());
        }
        SessionCommand::More => {
            editor.edit(now, |wb| {
                wb.load_more();
                Ok(())
            })?;
        }
        SessionCommand::List => {
            let wb = editor.workbench();
            for i in wb.visible_page() {
                let p = &wb.paragraphs()[i];
                println!("{:>5} [{}] {}", i + 1, status_of(p), preview(&p.original, 64));
            }
        }
        SessionCommand::Backup => {
            if editor.workbench().paragraphs().is_empty() {
                anyhow::bail!("Nothing to back up yet.");
            }
            let ts = editor.edit(now, |wb| Ok(wb.capture(now)))?;
            println!("Backup {} created.", format_ts_iso(ts));
        }
        SessionCommand::Status => {
            let p = editor.workbench().progress();
            println!("{} / {} ({}%)", p.completed, p.total, p.percent);
        }
        SessionCommand::Help => println!("{}", HELP),
        SessionCommand::Quit => {}
    }
    Ok(())
}

fn mark(editor: &mut CliEditor, now: i64, skip: bool) -> Result<()> {
    let index = workspace::resolve_index(editor, None)?;
    let moved = editor.edit(now, |wb| {
        if skip {
            wb.mark_skipped(index)
        } else {
            wb.mark_done(index)
        }
    })?;
    if moved.is_some() {
        print_focused(editor);
    }
    Ok(())
}

fn print_focused(editor: &CliEditor) {
    let wb = editor.workbench();
    let index = wb.focused_index();
    match wb.paragraphs().get(index) {
        Some(p) => {
            println!("#{}/{} [{}]", index + 1, wb.paragraphs().len(), status_of(p));
            println!("{}", p.original);
            if !p.translation.is_empty() {
                println!("=> {}", p.translation);
            }
        }
        None => println!("No paragraphs yet. Run `ccraft split` first."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!("".parse::<SessionCommand>(), Ok(SessionCommand::Show));
        assert_eq!(
            "t  Hallo Welt ".parse::<SessionCommand>(),
            Ok(SessionCommand::Translate("Hallo Welt".into()))
        );
        assert_eq!(
            "N".parse::<SessionCommand>(),
            Ok(SessionCommand::Navigate(Direction::Next))
        );
        assert_eq!("g 3".parse::<SessionCommand>(), Ok(SessionCommand::Goto(3)));
        assert_eq!(
            "f dialogue".parse::<SessionCommand>(),
            Ok(SessionCommand::Filter(FilterMode::Dialogue))
        );
        assert_eq!(
            "/ fox".parse::<SessionCommand>(),
            Ok(SessionCommand::Search("fox".into()))
        );
        assert_eq!("/".parse::<SessionCommand>(), Ok(SessionCommand::Search(String::new())));
        assert_eq!("quit".parse::<SessionCommand>(), Ok(SessionCommand::Quit));
    }

    #[test]
    fn rejects_bad_input() {
        assert!("g 0".parse::<SessionCommand>().is_err());
        assert!("g x".parse::<SessionCommand>().is_err());
        assert!("f bogus".parse::<SessionCommand>().is_err());
        assert!("dance".parse::<SessionCommand>().is_err());
    }
}
