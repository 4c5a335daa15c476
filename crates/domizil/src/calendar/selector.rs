use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stay endpoints chosen on a residence calendar.
///
/// When both endpoints are set `start <= end` always holds; the selector swaps
/// out-of-order clicks instead of storing an inverted range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Both endpoints, if the range is complete.
    pub fn endpoints(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.start.zip(self.end)
    }

    pub fn is_complete(&self) -> bool {
        self.endpoints().is_some()
    }

    /// Number of nights between check-in and check-out.
    pub fn nights(&self) -> Option<i64> {
        self.endpoints()
            .map(|(start, end)| (end - start).num_days())
    }
}

/// Which endpoint the next click fills.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    #[default]
    AwaitingStart,
    AwaitingEnd,
}

/// Two-click range selection for one residence calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRangeSelector {
    mode: SelectionMode,
    range: DateRange,
}

impl DateRangeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    /// Apply a day click and return the range that observers should see.
    ///
    /// The first click (or any click while no start is held) opens a new range.
    /// The second click closes it, swapping endpoints when the day precedes the
    /// held start. A third click starts over.
    pub fn select_day(&mut self, day: NaiveDate) -> DateRange {
        let held_start = match (self.mode, self.range.start) {
            (SelectionMode::AwaitingEnd, Some(start)) => start,
            _ => {
                self.range = DateRange {
                    start: Some(day),
                    end: None,
                };
                self.mode = SelectionMode::AwaitingEnd;
                return self.range;
            }
        };

        let (start, end) = if day < held_start {
            (day, held_start)
        } else {
            (held_start, day)
        };

        self.range = DateRange {
            start: Some(start),
            end: Some(end),
        };
        self.mode = SelectionMode::AwaitingStart;
        self.range
    }

    pub fn reset(&mut self) {
        self.range = DateRange::empty();
        self.mode = SelectionMode::AwaitingStart;
    }

    pub fn is_start(&self, day: NaiveDate) -> bool {
        self.range.start == Some(day)
    }

    pub fn is_end(&self, day: NaiveDate) -> bool {
        self.range.end == Some(day)
    }

    /// Strictly between the endpoints; endpoints themselves are not "in range".
    pub fn is_in_range(&self, day: NaiveDate) -> bool {
        match self.range.endpoints() {
            Some((start, end)) => start < day && day < end,
            None => false,
        }
    }
}
