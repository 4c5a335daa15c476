//! Date-range selection and month rendering for the per-residence availability calendars.

pub mod format;
pub mod month;
pub mod selector;

pub use format::{iso_date, parse_iso_date, range_label, DateFormatError};
pub use month::{CalendarCursor, CalendarDay, CalendarMonth, DayCell, DayState, MonthView};
pub use selector::{DateRange, DateRangeSelector, SelectionMode};
