use crate::error::TableError;
use core_types::EventTag;
use std::collections::HashMap;

/// Explanation used for any tag without an entry in the [`DefinitionTable`].
pub const FALLBACK_NOTE: &str = "Market event.";

/// Maps raw calendar aliases to canonical tags.
///
/// Applied once per tag when the manual calendar is loaded. Strings without an alias
/// pass through unchanged, so normalizing an already-canonical tag is a no-op.
#[derive(Debug, Clone)]
pub struct NormalizationTable {
    aliases: HashMap<String, EventTag>,
}

impl NormalizationTable {
    /// A table with no aliases at all.
    pub fn empty() -> Self {
        Self {
            aliases: HashMap::new(),
        }
    }

    /// Adds or replaces an alias.
    ///
    /// Rejects aliases spelled like a named canonical tag (unless they map to that very
    /// tag), since they would break idempotence, and aliases onto the opex / month-end
    /// tags, which only the date rules produce.
    pub fn with_alias(mut self, alias: &str, canonical: &str) -> Result<Self, TableError> {
        let alias = alias.trim().to_ascii_uppercase();
        let canonical = canonical.trim();
        if alias.is_empty() || canonical.is_empty() {
            return Err(TableError::EmptyEntry(alias));
        }

        let target = EventTag::from(canonical);
        if let Some(known) = EventTag::known(&alias) {
            if known != target {
                return Err(TableError::ShadowedTag { alias, tag: known });
            }
        }
        if target.is_rule_based() && EventTag::known(&alias).is_none() {
            return Err(TableError::RuleBasedTarget { alias, tag: target });
        }

        self.aliases.insert(alias, target);
        Ok(self)
    }

    /// Resolves a raw calendar tag to its canonical form.
    pub fn normalize(&self, raw: &str) -> EventTag {
        match self.aliases.get(raw) {
            Some(tag) => tag.clone(),
            None => EventTag::from(raw),
        }
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl Default for NormalizationTable {
    fn default() -> Self {
        let aliases = [
            ("FOMC_MEETING", EventTag::Fomc),
            ("FOMC_OVERRIDE", EventTag::Fomc),
            ("RUSSELL_REBALANCE_OVERRIDE", EventTag::RussellRebalance),
            ("RUSSELL_RECONSTITUTION", EventTag::RussellRebalance),
            ("CPI_REPORT", EventTag::from("CPI")),
            ("NFP_REPORT", EventTag::from("NFP")),
        ]
        .into_iter()
        .map(|(alias, tag)| (alias.to_string(), tag))
        .collect();

        Self { aliases }
    }
}

/// Human-readable explanations for canonical tags.
#[derive(Debug, Clone)]
pub struct DefinitionTable {
    notes: HashMap<EventTag, String>,
}

impl DefinitionTable {
    pub fn empty() -> Self {
        Self {
            notes: HashMap::new(),
        }
    }

    /// Adds or replaces the explanation for `tag`.
    pub fn with_definition(mut self, tag: &str, text: &str) -> Result<Self, TableError> {
        let tag = tag.trim().to_ascii_uppercase();
        if tag.is_empty() || text.trim().is_empty() {
            return Err(TableError::EmptyEntry(tag));
        }
        self.notes.insert(EventTag::from(tag), text.to_string());
        Ok(self)
    }

    /// The explanation for `tag`, or [`FALLBACK_NOTE`].
    pub fn explain(&self, tag: &EventTag) -> &str {
        self.notes.get(tag).map(String::as_str).unwrap_or(FALLBACK_NOTE)
    }
}

impl Default for DefinitionTable {
    fn default() -> Self {
        let notes = [
            (
                EventTag::MonthlyOpex,
                "Expiry/roll can cause mechanical volume/OI changes. Downgrade directional inference.",
            ),
            (
                EventTag::TripleWitching,
                "Expiry across index options, single-stock options, and futures; positioning signals may be distorted.",
            ),
            (EventTag::MonthEnd, "Portfolio rebalancing flows possible."),
            (
                EventTag::QuarterEnd,
                "Significant window dressing and rebalancing flows likely.",
            ),
            (EventTag::Fomc, "Federal Reserve meeting; expect volatility."),
            (
                EventTag::RussellRebalance,
                "High volume in small caps expected due to index reconstitution.",
            ),
        ]
        .into_iter()
        .map(|(tag, text)| (tag, text.to_string()))
        .collect();

        Self { notes }
    }
}
