//! Date and period resolution for heterogeneous spreadsheet cells.
//!
//! The feeds carry dates as 1900-system serial numbers or ISO text; both
//! resolve to `NaiveDate`. A value that resolves to nothing contributes
//! nothing; resolution never fails a parse.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::model::Cell;

/// Days added to a campaign end date to get the PO close-down cutoff.
pub const CLOSE_DOWN_DAYS: u64 = 90;

/// Highest serial the decoder accepts (9999-12-31).
const MAX_SERIAL: f64 = 2_958_465.0;

/// Decode a 1900-system spreadsheet date serial.
///
/// Serial 1 is 1900-01-01. Serials below 60 predate the phantom
/// 1900-02-29 and sit one day off the common 1899-12-30 epoch.
pub fn from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > MAX_SERIAL {
        return None;
    }
    let days = serial.floor() as u64;
    let epoch = if days < 60 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    epoch.checked_add_days(Days::new(days))
}

/// Resolve a raw cell into a calendar date: numeric serial, ISO-8601 text,
/// or absent. Unparseable values are absent, never an error.
pub fn resolve(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Empty => None,
        Cell::Number(n) => from_serial(*n),
        Cell::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(from_serial))
        }
    }
}

/// First calendar day of the date's month.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// Last calendar day of the date's month.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    month_start(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Min/max date accumulator over every row contributing to one campaign.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Widen by a month-granularity value: first day of the month for the
    /// start boundary, last day for the end boundary.
    pub fn fold_month(&mut self, date: NaiveDate) {
        self.widen(month_start(date), month_end(date));
    }

    /// Widen by an exact day.
    pub fn fold_day(&mut self, date: NaiveDate) {
        self.widen(date, date);
    }

    fn widen(&mut self, lo: NaiveDate, hi: NaiveDate) {
        self.start = Some(match self.start {
            Some(s) => s.min(lo),
            None => lo,
        });
        self.end = Some(match self.end {
            Some(e) => e.max(hi),
            None => hi,
        });
    }

    /// Close-down cutoff: 90 calendar days past the end date. Always
    /// derived, never read from source.
    pub fn close_down(&self) -> Option<NaiveDate> {
        self.end
            .and_then(|e| e.checked_add_days(Days::new(CLOSE_DOWN_DAYS)))
    }
}
