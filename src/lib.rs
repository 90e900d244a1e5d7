//! # ChapterCraft
//!
//! A local-first, paragraph-level translation workbench.
//!
//! ChapterCraft splits a chapter of source text into paragraphs, tracks a
//! translation and a status for each one, navigates by search and status
//! filters, keeps a bounded history of snapshots, and persists everything
//! as one schema-versioned record.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐     ┌──────────────────┐
//! │  chaptercraft-core    │     │   FileStore       │
//! │  store/status/nav/    │────▶│   <dir>/<key>.json│
//! │  snapshot/gateway     │     └──────────────────┘
//! └──────────┬───────────┘
//!            │
//!            ▼
//!     ┌──────────────┐
//!     │  CLI (ccraft) │  one-shot commands + `session`
//!     └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! ccraft init
//! ccraft split --project Novel --chapter "Chapter 1" chapter1.txt
//! ccraft show
//! ccraft translate "Es war einmal..."
//! ccraft done
//! ccraft export txt
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`file_store`] | File-backed key-value storage |
//! | [`logging`] | Tracing subscriber setup |
//! | [`workspace`] | Opening and committing the persisted workbench |
//! | [`paragraphs`] | Paragraph editing, navigation and view commands |
//! | [`backups`] | Snapshot commands |
//! | [`glossary`] | Glossary commands |
//! | [`project`] | Init, split, import/export, preferences |
//! | [`stats`] | Status and check reports |
//! | [`session`] | Interactive session with live timers |

pub mod backups;
pub mod config;
pub mod file_store;
pub mod glossary;
pub mod logging;
pub mod paragraphs;
pub mod project;
pub mod session;
pub mod stats;
pub mod workspace;
