//! # Dates and Deadlines
//!
//! Spreadsheet serial-date conversion and due-date urgency.
//!
//! Spreadsheet applications store dates as a day count from the
//! `1899-12-30` epoch (serial `1` is `1899-12-31`, `44000` is `2020-06-18`).
//! The epoch absorbs the 1900 leap-year quirk for every date after
//! February 1900, which covers all realistic due dates.

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::task::TaskStatus;

/// Day zero of the spreadsheet serial-date system.
pub fn excel_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

/// Number of days ahead within which a task counts as "due soon".
pub const DUE_SOON_DAYS: i64 = 7;

/// Convert a spreadsheet serial date to a UTC timestamp at midnight.
///
/// Non-positive serials are treated as blank cells and yield the current
/// time. Serials past [`MAX_EXCEL_SERIAL`] also fall back to now.
pub fn excel_date_to_datetime(excel_date: i64) -> DateTime<Utc> {
    excel_date_to_datetime_at(excel_date, Utc::now())
}

/// [`excel_date_to_datetime`] with an explicit "now", for deterministic use.
pub fn excel_date_to_datetime_at(excel_date: i64, now: DateTime<Utc>) -> DateTime<Utc> {
    excel_date_to_date(excel_date)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or(now)
}

/// Largest serial a spreadsheet can hold (`9999-12-31`).
pub const MAX_EXCEL_SERIAL: i64 = 2_958_465;

/// Calendar date for a serial in `1..=MAX_EXCEL_SERIAL`, `None` otherwise.
pub fn excel_date_to_date(excel_date: i64) -> Option<NaiveDate> {
    if !(1..=MAX_EXCEL_SERIAL).contains(&excel_date) {
        return None;
    }
    let days = u64::try_from(excel_date).ok()?;
    excel_epoch().checked_add_days(Days::new(days))
}

/// Inverse of [`excel_date_to_date`].
pub fn date_to_excel_serial(date: NaiveDate) -> i64 {
    (date - excel_epoch()).num_days()
}

/// Interpret a spreadsheet cell as a date.
///
/// Accepts a serial number (integer or float; the fractional time-of-day
/// part is dropped), a numeric string, or text in `YYYY-MM-DD`,
/// `YYYYMMDD`, `DD/MM/YYYY`, `DD-MM-YYYY` or RFC 3339 form. Serials past
/// [`MAX_EXCEL_SERIAL`] are rejected. Returns `None` for blank
/// or unparseable cells.
pub fn date_from_cell(cell: &serde_json::Value) -> Option<NaiveDate> {
    match cell {
        serde_json::Value::Number(n) => {
            let serial = n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64))?;
            excel_date_to_date(serial)
        }
        serde_json::Value::String(s) => date_from_text(s),
        _ => None,
    }
}

fn date_from_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    // Eight bare digits are a compact YYYYMMDD date, never a serial.
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::parse_from_str(s, "%Y%m%d").ok();
    }
    if let Ok(serial) = s.parse::<f64>() {
        return excel_date_to_date(serial.trunc() as i64);
    }
    ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Signed number of days from `today` until `due` (negative once overdue).
pub fn days_until(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

/// Deadline pressure of a task relative to a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// Due date has passed.
    Overdue,
    /// Due today.
    DueToday,
    /// Due within [`DUE_SOON_DAYS`].
    DueSoon,
    /// Due later.
    Upcoming,
    /// Completed; no longer pressing.
    Done,
}

impl Urgency {
    /// Classify a due date. Completed tasks are always [`Urgency::Done`];
    /// a task explicitly marked overdue is [`Urgency::Overdue`] regardless
    /// of its date.
    pub fn classify(due: NaiveDate, today: NaiveDate, status: TaskStatus) -> Self {
        match status {
            TaskStatus::Completed => return Self::Done,
            TaskStatus::Overdue => return Self::Overdue,
            _ => {}
        }
        match days_until(due, today) {
            d if d < 0 => Self::Overdue,
            0 => Self::DueToday,
            d if d <= DUE_SOON_DAYS => Self::DueSoon,
            _ => Self::Upcoming,
        }
    }

    /// Short label for listings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::DueToday => "due today",
            Self::DueSoon => "due soon",
            Self::Upcoming => "upcoming",
            Self::Done => "done",
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
