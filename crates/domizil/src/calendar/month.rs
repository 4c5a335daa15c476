use super::format::{german_month_name, iso_date};
use super::selector::DateRangeSelector;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Month currently displayed by a calendar widget. `month` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCursor {
    pub year: i32,
    pub month: u32,
}

impl CalendarCursor {
    /// Returns `None` when `month` is outside 1..=12 or the year lies outside
    /// the representable calendar.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn containing(day: NaiveDate) -> Self {
        Self {
            year: day.year(),
            month: day.month(),
        }
    }

    /// The month `step` months away, carrying into the year on either boundary.
    ///
    /// Returns `None` when the target month is not representable.
    pub fn advanced(&self, step: i32) -> Option<Self> {
        let zero_based = i64::from(self.year)
            .checked_mul(12)?
            .checked_add(i64::from(self.month) - 1)?
            .checked_add(i64::from(step))?;
        let year = i32::try_from(zero_based.div_euclid(12)).ok()?;
        let month = u32::try_from(zero_based.rem_euclid(12) + 1).ok()?;
        Self::new(year, month)
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn days_in_month(&self) -> u32 {
        (28..=31)
            .rev()
            .find(|day| NaiveDate::from_ymd_opt(self.year, self.month, *day).is_some())
            .unwrap_or(0)
    }

    /// Blank cells before the 1st in a Monday-first grid.
    pub fn leading_blanks(&self) -> u32 {
        self.first_day()
            .map(|first| first.weekday().num_days_from_monday())
            .unwrap_or(0)
    }

    pub fn label(&self) -> String {
        format!("{} {}", german_month_name(self.month), self.year)
    }
}

/// Availability flags for one day as published by the data service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: String,
    pub is_available: bool,
    pub is_selected: bool,
    pub is_in_range: bool,
}

/// A month of availability flags as published by the data service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayState {
    pub date: NaiveDate,
    pub day: u32,
    pub is_start: bool,
    pub is_end: bool,
    pub is_in_range: bool,
    pub is_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DayCell {
    Blank,
    Day(DayState),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub awaiting_end: bool,
    pub cells: Vec<DayCell>,
}

impl MonthView {
    /// Lay out the displayed month with selection flags from `selector`.
    ///
    /// Days missing from `availability` are treated as available; the flags are
    /// informational and never consulted by the selector.
    pub fn render(
        cursor: CalendarCursor,
        selector: &DateRangeSelector,
        availability: Option<&CalendarMonth>,
    ) -> Self {
        let published: HashMap<&str, bool> = availability
            .filter(|month| month.year == cursor.year && month.month == cursor.month)
            .map(|month| {
                month
                    .days
                    .iter()
                    .map(|day| (day.date.as_str(), day.is_available))
                    .collect()
            })
            .unwrap_or_default();

        let mut cells: Vec<DayCell> = (0..cursor.leading_blanks())
            .map(|_| DayCell::Blank)
            .collect();

        cells.extend(
            (1..=cursor.days_in_month())
                .filter_map(|day| NaiveDate::from_ymd_opt(cursor.year, cursor.month, day))
                .map(|date| {
                    let key = iso_date(date);
                    DayCell::Day(DayState {
                        date,
                        day: date.day(),
                        is_start: selector.is_start(date),
                        is_end: selector.is_end(date),
                        is_in_range: selector.is_in_range(date),
                        is_available: published.get(key.as_str()).copied().unwrap_or(true),
                    })
                }),
        );

        let range = selector.range();

        Self {
            year: cursor.year,
            month: cursor.month,
            label: cursor.label(),
            awaiting_end: range.start.is_some() && range.end.is_none(),
            cells,
        }
    }

    pub fn days(&self) -> impl Iterator<Item = &DayState> {
        self.cells.iter().filter_map(|cell| match cell {
            DayCell::Day(state) => Some(state),
            DayCell::Blank => None,
        })
    }
}
