use std::collections::HashMap;
use std::path::PathBuf;

use chrono::Weekday;
use serde::Deserialize;

use crate::filter::{DateField, DateOptions, DateOrder, SearchOptions};

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    pub profile: Option<String>,
    pub profiles: HashMap<String, Profile>,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct Profile {
    pub vault_root: String,
    /// Folders skipped while scanning (relative to vault_root).
    #[serde(default)]
    pub excluded_folders: Vec<String>,
    /// File extensions collected while scanning.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string()]
}

/// The `[search]` table.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct SearchConfig {
    #[serde(default)]
    pub default_date_field: DateField,
    #[serde(default)]
    pub date_order: DateOrder,
    /// Any chrono weekday name, short or long.
    #[serde(default = "default_week_start")]
    pub week_start: Weekday,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_date_field: DateField::default(),
            date_order: DateOrder::default(),
            week_start: default_week_start(),
        }
    }
}

impl From<SearchConfig> for DateOptions {
    fn from(search: SearchConfig) -> Self {
        Self {
            order: search.date_order,
            week_start: search.week_start,
            default_field: search.default_date_field,
        }
    }
}

fn default_week_start() -> Weekday {
    Weekday::Mon
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub active_profile: String,
    pub vault_root: PathBuf,
    /// Excluded folders, relative to the vault root or absolute.
    pub excluded_folders: Vec<PathBuf>,
    pub extensions: Vec<String>,
    pub dates: DateOptions,
    pub logging: LoggingConfig,
}

impl ResolvedConfig {
    /// Session options derived from the `[search]` settings.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions { dates: self.dates }
    }
}
