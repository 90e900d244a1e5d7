use anyhow::{Context, Result};
use chaptercraft_core::editor::EditorSettings;
use chaptercraft_core::models::DEFAULT_PAGE_SIZE;
use chaptercraft_core::schedule::{AUTO_BACKUP_MS, DEFAULT_DEBOUNCE_MS};
use chaptercraft_core::schema::STORAGE_KEY;
use chaptercraft_core::snapshot::MAX_BACKUPS;
use chaptercraft_core::workbench::WorkbenchSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub backups: BackupsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            key: default_key(),
        }
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_key() -> String {
    STORAGE_KEY.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct EditorConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            page_size: default_page_size(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS as u64
}
fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackupsConfig {
    #[serde(default = "default_max_backups")]
    pub max: usize,
    #[serde(default = "default_auto_interval_secs")]
    pub auto_interval_secs: u64,
}

impl Default for BackupsConfig {
    fn default() -> Self {
        Self {
            max: default_max_backups(),
            auto_interval_secs: default_auto_interval_secs(),
        }
    }
}

fn default_max_backups() -> usize {
    MAX_BACKUPS
}
fn default_auto_interval_secs() -> u64 {
    (AUTO_BACKUP_MS / 1000) as u64
}

impl Config {
    /// All defaults. Used when no config file exists.
    pub fn minimal() -> Self {
        Self {
            storage: StorageConfig::default(),
            editor: EditorConfig::default(),
            backups: BackupsConfig::default(),
        }
    }

    pub fn editor_settings(&self) -> EditorSettings {
        EditorSettings {
            workbench: WorkbenchSettings {
                max_backups: self.backups.max,
                page_size: self.editor.page_size,
            },
            debounce_ms: self.editor.debounce_ms as i64,
            auto_backup_ms: self.backups.auto_interval_secs as i64 * 1000,
        }
    }
}

/// Load the config at `path`, or defaults when the file does not exist.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        Ok(Config::minimal())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    // Validate storage
    let key = &config.storage.key;
    if key.is_empty() {
        anyhow::bail!("storage.key must not be empty");
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        anyhow::bail!(
            "storage.key '{}' may only contain letters, digits, '_', '.' and '-'",
            key
        );
    }

    // Validate editor
    if config.editor.debounce_ms > 10_000 {
        anyhow::bail!("editor.debounce_ms must be <= 10000");
    }
    if config.editor.page_size == 0 {
        anyhow::bail!("editor.page_size must be >= 1");
    }

    // Validate backups
    if config.backups.max == 0 {
        anyhow::bail!("backups.max must be >= 1");
    }
    if config.backups.auto_interval_secs == 0 {
        anyhow::bail!("backups.auto_interval_secs must be >= 1");
    }

    Ok(())
}
