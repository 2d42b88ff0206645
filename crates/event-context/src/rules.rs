use chrono::{Datelike, NaiveDate, Weekday};
use core_types::{EventTag, FlagSet};

/// March, June, September and December.
pub fn is_quarter_month(month: u32) -> bool {
    matches!(month, 3 | 6 | 9 | 12)
}

/// Every day of the given month, in ascending order.
///
/// The month length comes from the calendar itself, so February in a leap year has
/// 29 entries. An invalid `year`/`month` yields nothing.
pub fn days_in_month(year: i32, month: u32) -> impl Iterator<Item = NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .into_iter()
        .flat_map(|first| first.iter_days())
        .take_while(move |d| d.month() == month && d.year() == year)
}

/// The Monday to Friday dates of the month, in ascending order.
pub fn weekdays_in_month(year: i32, month: u32) -> impl Iterator<Item = NaiveDate> {
    days_in_month(year, month).filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
}

/// The monthly options expiration: the third Friday of the month.
///
/// Every month has at least four Fridays, so this always exists for a valid month and
/// always lands on day 15..=21. Returns `None` only for an invalid `year`/`month`.
pub fn third_friday(year: i32, month: u32) -> Option<NaiveDate> {
    days_in_month(year, month)
        .filter(|d| d.weekday() == Weekday::Fri)
        .nth(2)
}

/// The last Monday to Friday date of the month.
pub fn last_weekday(year: i32, month: u32) -> Option<NaiveDate> {
    weekdays_in_month(year, month).last()
}

/// Evaluates the deterministic calendar rules for a single date.
///
/// `TRIPLE_WITCHING` is only ever added together with `MONTHLY_OPEX`, and
/// `QUARTER_END` only together with `MONTH_END`.
pub fn rule_flags(date: NaiveDate) -> FlagSet {
    let mut flags = FlagSet::new();
    let (year, month) = (date.year(), date.month());

    if third_friday(year, month) == Some(date) {
        flags.insert(EventTag::MonthlyOpex);
        if is_quarter_month(month) {
            flags.insert(EventTag::TripleWitching);
        }
    }

    if last_weekday(year, month) == Some(date) {
        flags.insert(EventTag::MonthEnd);
        if is_quarter_month(month) {
            flags.insert(EventTag::QuarterEnd);
        }
    }

    flags
}
