use core_types::EventTag;
use std::path::PathBuf;
use thiserror::Error;

/// Why the manual calendar could not be used.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Failed to read event calendar '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Event calendar is not a JSON object of date -> [tags]: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Table entry '{0}' has an empty key or value")]
    EmptyEntry(String),

    #[error("Alias '{alias}' shadows the canonical tag {tag}")]
    ShadowedTag { alias: String, tag: EventTag },

    #[error("Alias '{alias}' targets {tag}, which only the date rules may set")]
    RuleBasedTarget { alias: String, tag: EventTag },
}
