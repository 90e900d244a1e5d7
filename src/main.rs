//! # ChapterCraft CLI (`ccraft`)
//!
//! The `ccraft` binary is the primary interface for ChapterCraft. It splits
//! chapters into paragraphs, edits translations, navigates by status and
//! search, manages backups and the glossary, and exports results.
//!
//! ## Usage
//!
//! ```bash
//! ccraft --config ./config/ccraft.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ccraft init` | Create the storage directory and an empty workspace |
//! | `ccraft split <file>` | Split a chapter into paragraphs |
//! | `ccraft status` | Progress, view and storage overview |
//! | `ccraft list` / `show` | Browse matching paragraphs |
//! | `ccraft translate` / `done` / `skip` / `clear` | Edit a paragraph |
//! | `ccraft next` / `prev` / `unfinished` / `goto` / `step` | Navigate |
//! | `ccraft view` | Change filter, search, paging and focus mode |
//! | `ccraft segments ...` | Sentence-level editing |
//! | `ccraft backup ...` | Snapshots |
//! | `ccraft glossary ...` | Glossary |
//! | `ccraft export ...` / `import` | Files in and out |
//! | `ccraft session` | Interactive editing with live autosave |
//!
//! ## Examples
//!
//! ```bash
//! # Start a chapter
//! ccraft split --project Novel --chapter "Chapter 1" chapter1.txt
//!
//! # Work through untranslated paragraphs
//! ccraft show
//! ccraft translate "Es war einmal..."
//! ccraft done
//!
//! # Only dialogue
//! ccraft view --filter dialogue
//! ccraft next
//!
//! # Write "Novel - Chapter 1.txt"
//! ccraft export txt
//! ```

use chaptercraft::{backups, config, glossary, logging, paragraphs, project, session, stats};
use chaptercraft_core::models::{FilterMode, SplitMode};
use chaptercraft_core::navigate::Direction;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// ChapterCraft CLI: a local-first paragraph-level translation workbench.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. A missing file means all defaults. See
/// `config/ccraft.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "ccraft",
    about = "ChapterCraft — a local-first paragraph-level translation workbench",
    version,
    long_about = "ChapterCraft splits chapter text into paragraphs, tracks a translation and \
    status per paragraph, navigates by search and status filters, keeps a bounded history of \
    backups, and persists everything to a single schema-versioned record."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/ccraft.toml`. Storage, editor and backup
    /// settings are read from this file.
    #[arg(long, global = true, default_value = "./config/ccraft.toml")]
    config: PathBuf,

    /// Log at debug level (overrides `CCRAFT_LOG`).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the workspace storage.
    ///
    /// Creates the storage directory and writes an empty record if none
    /// exists. Running it again is safe.
    Init,

    /// Split chapter text into paragraphs, replacing the current ones.
    ///
    /// A backup of the freshly split chapter is captured immediately.
    Split {
        /// Chapter text file, or `-` for stdin.
        file: PathBuf,

        /// Project (book) name.
        #[arg(long)]
        project: String,

        /// Chapter name.
        #[arg(long)]
        chapter: String,

        /// `blanklines`: paragraphs are separated by blank lines.
        /// `lines`: every non-empty line is a paragraph.
        #[arg(long, default_value = "blanklines")]
        mode: SplitMode,
    },

    /// Change the project or chapter name used for export filenames.
    Rename {
        /// New project (book) name.
        #[arg(long)]
        project: Option<String>,

        /// New chapter name.
        #[arg(long)]
        chapter: Option<String>,
    },

    /// Show progress, view state, and storage details.
    Status,

    /// List the current page of paragraphs matching the search and filter.
    List,

    /// Show one paragraph with its translation, segments and glossary hits.
    Show {
        /// Paragraph number (default: focused).
        number: Option<usize>,
    },

    /// Set a paragraph's translation.
    ///
    /// A non-blank translation counts as done and clears `skipped`.
    Translate {
        /// The translation text.
        text: String,

        /// Paragraph number (default: focused).
        #[arg(long, short)]
        number: Option<usize>,
    },

    /// Mark a paragraph done, then advance to the next match.
    Done {
        /// Paragraph number (default: focused).
        number: Option<usize>,
    },

    /// Mark a paragraph skipped, then advance to the next match.
    Skip {
        /// Paragraph number (default: focused).
        number: Option<usize>,
    },

    /// Erase a paragraph's translation, flags and segments.
    Clear {
        /// Paragraph number (default: focused).
        number: Option<usize>,

        /// Confirm the destructive operation.
        #[arg(long)]
        yes: bool,
    },

    /// Focus the next paragraph matching the search and filter.
    Next,

    /// Focus the previous paragraph matching the search and filter.
    Prev,

    /// Focus the next untranslated paragraph, wrapping around.
    Unfinished,

    /// Focus a paragraph by number.
    Goto {
        number: usize,
    },

    /// Move focus by one paragraph, ignoring search and filter.
    Step {
        #[arg(value_enum, default_value = "next")]
        direction: StepDirection,
    },

    /// Change the list view: filter, search, paging and focus mode.
    View {
        /// `all`, `done`, `skipped`, `untranslated` or `dialogue`.
        #[arg(long)]
        filter: Option<FilterMode>,

        /// Case-insensitive search over original and translation.
        /// An empty string clears it.
        #[arg(long)]
        search: Option<String>,

        /// Show one more page of matches.
        #[arg(long)]
        more: bool,

        /// Turn focus mode on or off.
        #[arg(long)]
        focus: Option<bool>,
    },

    /// Sentence-level editing of a paragraph.
    Segments {
        #[command(subcommand)]
        action: SegmentsAction,
    },

    /// Manage backups (snapshots).
    Backup {
        #[command(subcommand)]
        action: BackupAction,
    },

    /// Manage the glossary.
    Glossary {
        #[command(subcommand)]
        action: GlossaryAction,
    },

    /// Export the chapter.
    Export {
        #[command(subcommand)]
        format: ExportFormat,
    },

    /// Replace the workspace with an exported project file.
    Import {
        file: PathBuf,
    },

    /// Consistency check: untranslated dialogue and counts.
    Check,

    /// Show or change preferences.
    Prefs {
        /// `dark` or `light`.
        #[arg(long)]
        theme: Option<String>,

        /// Switch between dark and light.
        #[arg(long)]
        toggle_theme: bool,

        #[arg(long)]
        auto_advance: Option<bool>,

        #[arg(long)]
        auto_backup: Option<bool>,

        /// Count skipped paragraphs as completed in progress.
        #[arg(long)]
        count_skipped_as_done: Option<bool>,

        #[arg(long)]
        dialogue_tools: Option<bool>,
    },

    /// Clear the whole workspace (keeps the theme; drops backups).
    Reset {
        #[arg(long)]
        yes: bool,
    },

    /// Interactive editing session with live autosave and auto-backup.
    Session,
}

#[derive(Clone, Copy, ValueEnum)]
enum StepDirection {
    Next,
    Prev,
}

impl From<StepDirection> for Direction {
    fn from(d: StepDirection) -> Self {
        match d {
            StepDirection::Next => Direction::Next,
            StepDirection::Prev => Direction::Prev,
        }
    }
}

/// Segment subcommands.
#[derive(Subcommand)]
enum SegmentsAction {
    /// Split a paragraph into sentence segments (no-op if already split).
    Split {
        number: Option<usize>,
    },
    /// Set one segment's translation.
    Set {
        number: usize,
        segment: usize,
        text: String,
    },
    /// Join segment translations into the paragraph translation.
    Merge {
        number: Option<usize>,
    },
}

/// Backup subcommands.
#[derive(Subcommand)]
enum BackupAction {
    /// Capture a backup now. Prints its timestamp.
    Make,
    /// List backups, newest first.
    List,
    /// Replace the workspace with a backup.
    Restore {
        timestamp: i64,
        #[arg(long)]
        yes: bool,
    },
    /// Delete a backup.
    Delete {
        timestamp: i64,
    },
    /// Write a backup's payload as JSON.
    Download {
        timestamp: i64,
        /// Output file (default: stdout).
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}

/// Glossary subcommands.
#[derive(Subcommand)]
enum GlossaryAction {
    /// Add or overwrite an entry.
    Add {
        term: String,
        translation: String,
    },
    /// Remove an entry.
    Remove {
        term: String,
    },
    /// List entries, optionally filtered.
    List {
        query: Option<String>,
    },
    /// Glossary terms found in a paragraph (default: focused).
    Matches {
        number: Option<usize>,
    },
    /// Merge entries from a glossary JSON file.
    Import {
        file: PathBuf,
    },
    /// Write the glossary as JSON.
    Export {
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Remove all entries.
    Clear {
        #[arg(long)]
        yes: bool,
    },
}

/// Export formats. Files are named after the project and chapter.
#[derive(Subcommand)]
enum ExportFormat {
    /// Translations only, one paragraph per block.
    Txt {
        #[command(flatten)]
        target: ExportTarget,
    },
    /// Original and translation side by side.
    Review {
        #[command(flatten)]
        target: ExportTarget,
    },
    /// The full project as JSON, importable with `ccraft import`.
    Project {
        #[command(flatten)]
        target: ExportTarget,
    },
}

#[derive(clap::Args)]
struct ExportTarget {
    /// Output directory (default: current directory).
    #[arg(long, short)]
    dir: Option<PathBuf>,

    /// Print to stdout instead of writing a file.
    #[arg(long)]
    stdout: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let cfg = config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Init => project::run_init(&cfg)?,
        Commands::Split {
            file,
            project: name,
            chapter,
            mode,
        } => project::run_split(&cfg, &name, &chapter, mode, &file)?,
        Commands::Rename { project: name, chapter } => {
            project::run_rename(&cfg, name.as_deref(), chapter.as_deref())?
        }
        Commands::Status => stats::run_status(&cfg)?,
        Commands::List => paragraphs::run_list(&cfg)?,
        Commands::Show { number } => paragraphs::run_show(&cfg, number)?,
        Commands::Translate { text, number } => paragraphs::run_translate(&cfg, number, &text)?,
        Commands::Done { number } => paragraphs::run_mark(&cfg, number, false)?,
        Commands::Skip { number } => paragraphs::run_mark(&cfg, number, true)?,
        Commands::Clear { number, yes } => paragraphs::run_clear(&cfg, number, yes)?,
        Commands::Next => paragraphs::run_navigate(&cfg, Direction::Next)?,
        Commands::Prev => paragraphs::run_navigate(&cfg, Direction::Prev)?,
        Commands::Unfinished => paragraphs::run_unfinished(&cfg)?,
        Commands::Goto { number } => paragraphs::run_goto(&cfg, number)?,
        Commands::Step { direction } => paragraphs::run_step(&cfg, direction.into())?,
        Commands::View {
            filter,
            search,
            more,
            focus,
        } => paragraphs::run_view(
            &cfg,
            paragraphs::ViewArgs {
                filter,
                search,
                more,
                focus,
            },
        )?,
        Commands::Segments { action } => match action {
            SegmentsAction::Split { number } => paragraphs::run_segments_split(&cfg, number)?,
            SegmentsAction::Set {
                number,
                segment,
                text,
            } => paragraphs::run_segments_set(&cfg, number, segment, &text)?,
            SegmentsAction::Merge { number } => paragraphs::run_segments_merge(&cfg, number)?,
        },
        Commands::Backup { action } => match action {
            BackupAction::Make => backups::run_make(&cfg)?,
            BackupAction::List => backups::run_list(&cfg)?,
            BackupAction::Restore { timestamp, yes } => backups::run_restore(&cfg, timestamp, yes)?,
            BackupAction::Delete { timestamp } => backups::run_delete(&cfg, timestamp)?,
            BackupAction::Download { timestamp, out } => {
                backups::run_download(&cfg, timestamp, out.as_deref())?
            }
        },
        Commands::Glossary { action } => match action {
            GlossaryAction::Add { term, translation } => glossary::run_add(&cfg, &term, &translation)?,
            GlossaryAction::Remove { term } => glossary::run_remove(&cfg, &term)?,
            GlossaryAction::List { query } => glossary::run_list(&cfg, query.as_deref())?,
            GlossaryAction::Matches { number } => glossary::run_matches(&cfg, number)?,
            GlossaryAction::Import { file } => glossary::run_import(&cfg, &file)?,
            GlossaryAction::Export { out } => glossary::run_export(&cfg, out.as_deref())?,
            GlossaryAction::Clear { yes } => glossary::run_clear(&cfg, yes)?,
        },
        Commands::Export { format } => {
            let (kind, target) = match format {
                ExportFormat::Txt { target } => (project::ExportKind::Translation, target),
                ExportFormat::Review { target } => (project::ExportKind::Review, target),
                ExportFormat::Project { target } => (project::ExportKind::Project, target),
            };
            project::run_export(&cfg, kind, target.dir.as_deref(), target.stdout)?;
        }
        Commands::Import { file } => project::run_import(&cfg, &file)?,
        Commands::Check => stats::run_check(&cfg)?,
        Commands::Prefs {
            theme,
            toggle_theme,
            auto_advance,
            auto_backup,
            count_skipped_as_done,
            dialogue_tools,
        } => project::run_prefs(
            &cfg,
            project::PrefsArgs {
                theme,
                toggle_theme,
                auto_advance,
                auto_backup,
                count_skipped_as_done,
                dialogue_tools,
            },
        )?,
        Commands::Reset { yes } => project::run_reset(&cfg, yes)?,
        Commands::Session => session::run_session(&cfg).await?,
    }

    Ok(())
}
