//! # ChapterCraft Core
//!
//! Portable logic for ChapterCraft: the paragraph store, the status and
//! filter engine, navigation, the snapshot history, and schema-versioned
//! persistence.
//!
//! This crate contains no tokio, filesystem I/O, or clock access. Every
//! time-dependent operation takes the current time as Unix milliseconds,
//! and durable storage is reached through the [`storage::KeyValueStore`]
//! trait, so the same code runs natively and on `wasm32-unknown-unknown`.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | Paragraphs, projects, preferences, view state |
//! | [`split`] | Source text splitting and sentence segmentation |
//! | [`store`] | The paragraph store and its mutation API |
//! | [`status`] | Derived status, progress, search and filter matching |
//! | [`navigate`] | Next-match and next-unfinished navigation |
//! | [`dialogue`] | Dialogue detection collaborator |
//! | [`glossary`] | Glossary matching and management |
//! | [`snapshot`] | Bounded snapshot history with capture and restore |
//! | [`schema`] | The persisted record and its migrations |
//! | [`storage`] | Key-value storage abstraction |
//! | [`gateway`] | Versioned save/load over a storage backend |
//! | [`schedule`] | Debounced write buffer and auto-backup timer |
//! | [`export`] | Plain-text and JSON pack exports/imports |
//! | [`check`] | Consistency check report |
//! | [`workbench`] | The state-owning component |
//! | [`editor`] | Workbench wired to persistence and timers |

pub mod check;
pub mod dialogue;
pub mod editor;
pub mod error;
pub mod export;
pub mod gateway;
pub mod glossary;
pub mod models;
pub mod navigate;
pub mod schedule;
pub mod schema;
pub mod snapshot;
pub mod split;
pub mod status;
pub mod storage;
pub mod store;
pub mod workbench;

pub use error::{Confirmation, CoreError, Result};
