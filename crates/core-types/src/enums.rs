use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A canonical market event tag.
///
/// The deterministic calendar rules and the well-known manual events are modelled as
/// named variants. Anything else read from the manual calendar is carried verbatim in
/// `Other`, so the system never drops an event it does not understand.
///
/// On the wire (calendar file, JSON output) a tag is always its string form, e.g.
/// `"MONTHLY_OPEX"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum EventTag {
    MonthlyOpex,
    TripleWitching,
    MonthEnd,
    QuarterEnd,
    Fomc,
    RussellRebalance,
    /// An unmodelled tag. Never holds the string form of a named variant.
    Other(String),
}

impl EventTag {
    /// Every named variant, in declaration order.
    pub const KNOWN: [EventTag; 6] = [
        EventTag::MonthlyOpex,
        EventTag::TripleWitching,
        EventTag::MonthEnd,
        EventTag::QuarterEnd,
        EventTag::Fomc,
        EventTag::RussellRebalance,
    ];

    /// Returns the canonical string form of the tag.
    pub fn as_str(&self) -> &str {
        match self {
            EventTag::MonthlyOpex => "MONTHLY_OPEX",
            EventTag::TripleWitching => "TRIPLE_WITCHING",
            EventTag::MonthEnd => "MONTH_END",
            EventTag::QuarterEnd => "QUARTER_END",
            EventTag::Fomc => "FOMC",
            EventTag::RussellRebalance => "RUSSELL_REBALANCE",
            EventTag::Other(raw) => raw,
        }
    }

    /// Returns the named variant for `s`, if there is one.
    pub fn known(s: &str) -> Option<EventTag> {
        Self::KNOWN.into_iter().find(|tag| tag.as_str() == s)
    }

    /// True for the tags produced by the date rules rather than the manual calendar.
    pub fn is_rule_based(&self) -> bool {
        matches!(
            self,
            EventTag::MonthlyOpex
                | EventTag::TripleWitching
                | EventTag::MonthEnd
                | EventTag::QuarterEnd
        )
    }
}

impl From<&str> for EventTag {
    fn from(s: &str) -> Self {
        EventTag::known(s).unwrap_or_else(|| EventTag::Other(s.to_string()))
    }
}

impl From<String> for EventTag {
    fn from(s: String) -> Self {
        match EventTag::known(&s) {
            Some(tag) => tag,
            None => EventTag::Other(s),
        }
    }
}

impl From<EventTag> for String {
    fn from(tag: EventTag) -> Self {
        match tag {
            EventTag::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of event tags. Unique by construction; iteration order is stable but carries
/// no meaning.
pub type FlagSet = BTreeSet<EventTag>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_strings_parse_to_named_variants() {
        for tag in EventTag::KNOWN {
            assert_eq!(EventTag::from(tag.as_str()), tag);
        }
        assert_eq!(EventTag::from("FOMC"), EventTag::Fomc);
    }

    #[test]
    fn unknown_strings_pass_through() {
        let tag = EventTag::from("CPI");
        assert_eq!(tag, EventTag::Other("CPI".to_string()));
        assert_eq!(tag.to_string(), "CPI");
        assert!(!tag.is_rule_based());
    }

    #[test]
    fn rule_based_tags() {
        assert!(EventTag::MonthlyOpex.is_rule_based());
        assert!(EventTag::QuarterEnd.is_rule_based());
        assert!(!EventTag::Fomc.is_rule_based());
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&EventTag::TripleWitching).unwrap();
        assert_eq!(json, "\"TRIPLE_WITCHING\"");

        let parsed: EventTag = serde_json::from_str("\"RUSSELL_REBALANCE\"").unwrap();
        assert_eq!(parsed, EventTag::RussellRebalance);
    }

    #[test]
    fn flag_set_deduplicates() {
        let mut flags = FlagSet::new();
        flags.insert(EventTag::MonthEnd);
        flags.insert(EventTag::MonthEnd);
        flags.insert(EventTag::from("MONTH_END"));
        assert_eq!(flags.len(), 1);
    }
}
