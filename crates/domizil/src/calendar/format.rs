use chrono::{Datelike, NaiveDate};

const ISO_FORMAT: &str = "%Y-%m-%d";

const GERMAN_MONTHS: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to parse '{raw}' as YYYY-MM-DD")]
pub struct DateFormatError {
    pub raw: String,
}

/// Formats a day the way the booking interface expects it (`YYYY-MM-DD`).
pub fn iso_date(day: NaiveDate) -> String {
    day.format(ISO_FORMAT).to_string()
}

pub fn parse_iso_date(raw: &str) -> Result<NaiveDate, DateFormatError> {
    NaiveDate::parse_from_str(raw.trim(), ISO_FORMAT).map_err(|_| DateFormatError {
        raw: raw.to_string(),
    })
}

/// German month name for a 1-based month; out-of-range months yield an empty string.
pub fn german_month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|index| GERMAN_MONTHS.get(index as usize))
        .copied()
        .unwrap_or("")
}

/// Human readable label for a selected stay, e.g. `10 Juli – 15 Juli 2024`.
pub fn range_label(start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{} {} – {} {} {}",
        start.day(),
        german_month_name(start.month()),
        end.day(),
        german_month_name(end.month()),
        end.year()
    )
}
