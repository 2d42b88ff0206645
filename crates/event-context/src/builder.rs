use crate::calendar::EventCalendar;
use crate::rules;
use crate::tables::{DefinitionTable, NormalizationTable};
use chrono::{Days, NaiveDate};
use core_types::{parse_report_date, CoreError, FlagSet};
use events::{EventContext, SourceMeta};
use std::path::Path;

/// Builds event contexts from a loaded calendar and a definition table.
///
/// Once constructed the builder is immutable: every call to [`build`](Self::build) is a
/// pure function of its arguments, so a single builder can serve many report dates.
#[derive(Debug, Clone)]
pub struct EventContextBuilder {
    calendar: EventCalendar,
    calendar_loaded: bool,
    calendar_path: String,
    definitions: DefinitionTable,
}

impl EventContextBuilder {
    /// Wraps an already-loaded calendar.
    pub fn new(
        calendar: EventCalendar,
        calendar_loaded: bool,
        calendar_path: impl Into<String>,
        definitions: DefinitionTable,
    ) -> Self {
        Self {
            calendar,
            calendar_loaded,
            calendar_path: calendar_path.into(),
            definitions,
        }
    }

    /// Reads the manual calendar once. An unusable source yields a builder that only
    /// produces rule-based flags and reports `calendar_loaded = false`.
    pub fn from_source(
        calendar_path: &Path,
        normalization: &NormalizationTable,
        definitions: DefinitionTable,
    ) -> Self {
        let (calendar, loaded) = EventCalendar::load_or_empty(calendar_path, normalization);
        Self::new(
            calendar,
            loaded,
            calendar_path.display().to_string(),
            definitions,
        )
    }

    pub fn calendar_loaded(&self) -> bool {
        self.calendar_loaded
    }

    /// All flags for a single date: manual calendar entries plus the date rules.
    pub fn flags_for(&self, date: NaiveDate) -> FlagSet {
        let mut flags = rules::rule_flags(date);
        flags.extend(self.calendar.tags_on(date).iter().cloned());
        flags
    }

    /// Builds the context for `report_date`.
    ///
    /// `flags_recent` covers every calendar day from `report_date - lookback_days` up to
    /// the day before `report_date`, weekends included.
    #[tracing::instrument(
        name = "build_event_context",
        skip(self),
        fields(calendar_loaded = self.calendar_loaded)
    )]
    pub fn build(&self, report_date: NaiveDate, lookback_days: u32) -> EventContext {
        let flags_today = self.flags_for(report_date);

        let mut flags_recent = FlagSet::new();
        for offset in 1..=u64::from(lookback_days) {
            // Only reachable near the edge of chrono's representable range.
            let Some(day) = report_date.checked_sub_days(Days::new(offset)) else {
                break;
            };
            let flags = self.flags_for(day);
            if !flags.is_empty() {
                tracing::debug!(%day, ?flags, "Flags found in lookback window.");
            }
            flags_recent.extend(flags);
        }

        let notes = flags_today
            .union(&flags_recent)
            .map(|tag| (tag.clone(), self.definitions.explain(tag).to_string()))
            .collect();

        EventContext {
            as_of: report_date,
            source: SourceMeta {
                calendar_loaded: self.calendar_loaded,
                calendar_path: self.calendar_path.clone(),
            },
            flags_today,
            flags_recent,
            notes,
        }
    }

    /// Like [`build`](Self::build), but takes the report date as a `YYYY-MM-DD` string.
    pub fn build_from_str(
        &self,
        report_date: &str,
        lookback_days: u32,
    ) -> Result<EventContext, CoreError> {
        let date = parse_report_date(report_date)?;
        Ok(self.build(date, lookback_days))
    }
}

/// One-shot entry point: loads the calendar at `calendar_path` with the default tables
/// and builds the context for `report_date`.
///
/// Fails only if `report_date` is not a valid `YYYY-MM-DD` date; the date is checked
/// before the calendar is read.
pub fn build_event_context(
    report_date: &str,
    lookback_days: u32,
    calendar_path: &Path,
) -> Result<EventContext, CoreError> {
    let date = parse_report_date(report_date)?;
    let builder = EventContextBuilder::from_source(
        calendar_path,
        &NormalizationTable::default(),
        DefinitionTable::default(),
    );
    Ok(builder.build(date, lookback_days))
}
