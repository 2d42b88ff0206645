use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default location of the manual event calendar, relative to the installation
/// directory (see [`CalendarSettings::resolve_path`]).
pub const DEFAULT_CALENDAR_PATH: &str = "data/event_calendar.json";

/// Default number of trailing calendar days folded into `flags_recent`.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub calendar: CalendarSettings,
    #[serde(default)]
    pub context: ContextSettings,
    #[serde(default)]
    pub output: OutputSettings,
    /// Extra alias -> canonical tag mappings, applied on top of the built-in table.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
    /// Extra canonical tag -> explanation texts, overriding the built-in ones.
    #[serde(default)]
    pub definitions: HashMap<String, String>,
}

/// Where to find the manually maintained event calendar.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarSettings {
    /// Path to the JSON calendar file (`{"YYYY-MM-DD": ["TAG", ...]}`).
    pub path: PathBuf,
}

impl CalendarSettings {
    /// The calendar file to read.
    ///
    /// An absolute `path` is used as is. A relative one is looked up in `install_dir`
    /// first (the directory holding the executable) and falls back to the working
    /// directory when no such file exists there.
    pub fn resolve_path(&self, install_dir: Option<&Path>) -> PathBuf {
        if self.path.is_absolute() {
            return self.path.clone();
        }
        match install_dir.map(|dir| dir.join(&self.path)) {
            Some(installed) if installed.is_file() => installed,
            _ => self.path.clone(),
        }
    }
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CALENDAR_PATH),
        }
    }
}

/// Parameters for building an event context.
#[derive(Debug, Clone, Deserialize)]
pub struct ContextSettings {
    /// How many days before the report date are scanned. 0 disables the window.
    pub lookback_days: u32,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,
}

/// How the binary prints the resulting context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON, the form consumed by prompt and report builders.
    #[default]
    Json,
    /// A human-readable table.
    Table,
}
