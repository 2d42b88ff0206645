use crate::error::CalendarError;
use crate::tables::NormalizationTable;
use chrono::NaiveDate;
use core_types::{DATE_FORMAT, EventTag};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// The raw on-disk shape: `{"YYYY-MM-DD": ["TAG", ...]}`.
type RawCalendar = BTreeMap<String, Vec<String>>;

/// Manually scheduled events (FOMC, index rebalances, ...), keyed by exact date.
///
/// Tags are normalized once, at load time. The calendar is never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventCalendar {
    entries: BTreeMap<NaiveDate, Vec<EventTag>>,
}

impl EventCalendar {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses and normalizes a calendar document.
    ///
    /// Keys must be exactly `YYYY-MM-DD`. Any other key can never match a report date,
    /// so it is skipped with a warning and the remaining entries still apply.
    pub fn from_json_str(text: &str, table: &NormalizationTable) -> Result<Self, CalendarError> {
        let raw: RawCalendar = serde_json::from_str(text)?;

        let mut entries: BTreeMap<NaiveDate, Vec<EventTag>> = BTreeMap::new();
        for (key, tags) in raw {
            let Some(date) = parse_date_key(&key) else {
                tracing::warn!(
                    key = %key,
                    "Skipping event calendar entry with a non YYYY-MM-DD key."
                );
                continue;
            };
            entries
                .entry(date)
                .or_default()
                .extend(tags.iter().map(|raw| table.normalize(raw)));
        }

        Ok(Self { entries })
    }

    /// Reads the calendar file at `path`. The file handle is closed before parsing.
    pub fn load(path: &Path, table: &NormalizationTable) -> Result<Self, CalendarError> {
        let text = fs::read_to_string(path).map_err(|source| CalendarError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text, table)
    }

    /// Loads the calendar, degrading to an empty one if the source is unusable.
    ///
    /// Returns the calendar and whether it was actually loaded. Failures are reported
    /// through a warning log and never propagate.
    pub fn load_or_empty(path: &Path, table: &NormalizationTable) -> (Self, bool) {
        match Self::load(path, table) {
            Ok(calendar) => {
                tracing::debug!(
                    path = %path.display(),
                    dates = calendar.len(),
                    "Loaded manual event calendar."
                );
                (calendar, true)
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Could not load event calendar; continuing with rule-based flags only."
                );
                (Self::empty(), false)
            }
        }
    }

    /// The normalized tags scheduled for `date`, if any.
    pub fn tags_on(&self, date: NaiveDate) -> &[EventTag] {
        self.entries.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses a calendar key, accepting only its canonical zero-padded form.
fn parse_date_key(key: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(key, DATE_FORMAT).ok()?;
    (date.format(DATE_FORMAT).to_string() == key).then_some(date)
}
