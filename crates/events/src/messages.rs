use crate::error::EventsError;
use chrono::NaiveDate;
use core_types::{EventTag, FlagSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where the manual events came from, so consumers can tell "no events occurred"
/// apart from "the manual calendar failed to load".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMeta {
    pub calendar_loaded: bool,
    pub calendar_path: String,
}

/// The event context for a single report date.
///
/// Serialized, it looks like:
/// `{
///   "as_of": "2025-12-22",
///   "source": { "calendar_loaded": true, "calendar_path": "data/event_calendar.json" },
///   "flags_today": [],
///   "flags_recent": ["MONTHLY_OPEX", "TRIPLE_WITCHING"],
///   "notes": { "MONTHLY_OPEX": "...", "TRIPLE_WITCHING": "..." }
/// }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventContext {
    pub as_of: NaiveDate,
    pub source: SourceMeta,
    pub flags_today: FlagSet,
    /// Union over the lookback window. The report date itself is never included.
    pub flags_recent: FlagSet,
    /// One explanation per tag in `flags_today ∪ flags_recent`, and nothing else.
    pub notes: BTreeMap<EventTag, String>,
}

impl EventContext {
    /// Every tag flagged today or within the lookback window.
    pub fn all_flags(&self) -> FlagSet {
        self.flags_today.union(&self.flags_recent).cloned().collect()
    }

    pub fn has_today(&self, tag: &EventTag) -> bool {
        self.flags_today.contains(tag)
    }

    pub fn has_recent(&self, tag: &EventTag) -> bool {
        self.flags_recent.contains(tag)
    }

    /// Renders the context as indented JSON, ready to be interpolated into a prompt.
    pub fn to_json_pretty(&self) -> Result<String, EventsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
