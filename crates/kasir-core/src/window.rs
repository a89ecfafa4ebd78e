//! # Report Windows
//!
//! Half-open time intervals `[start, end)` used by sales reports.
//!
//! ```text
//!   start (inclusive)                         end (exclusive)
//!     │                                          │
//!     ▼                                          ▼
//! ────[══════════════════════════════════════════)────────► time
//!      t >= start                         t < end
//! ```
//!
//! Back-to-back windows (e.g. consecutive days) therefore never count the
//! same transaction twice.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;

use crate::error::{CoreError, CoreResult};

/// A validated half-open interval in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl ReportWindow {
    /// Creates a window from explicit bounds.
    ///
    /// An empty window (`start == end`) is allowed and matches nothing.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> CoreResult<Self> {
        if end < start {
            return Err(CoreError::InvalidWindow {
                reason: format!("end {} is before start {}", end, start),
            });
        }
        Ok(ReportWindow { start, end })
    }

    /// The UTC calendar day `date`.
    pub fn day(date: NaiveDate) -> CoreResult<Self> {
        ReportWindow::dates(date, date)
    }

    /// The UTC calendar day containing `now`.
    pub fn today(now: DateTime<Utc>) -> CoreResult<Self> {
        ReportWindow::day(now.date_naive())
    }

    /// Whole days from `start_date` through `end_date`, both inclusive.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use kasir_core::ReportWindow;
    ///
    /// let jan = ReportWindow::dates(
    ///     NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
    ///     NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
    /// )
    /// .unwrap();
    /// assert_eq!(jan.end().date_naive(), NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
    /// ```
    pub fn dates(start_date: NaiveDate, end_date: NaiveDate) -> CoreResult<Self> {
        if end_date < start_date {
            return Err(CoreError::InvalidWindow {
                reason: format!("end_date {} is before start_date {}", end_date, start_date),
            });
        }

        let day_after = end_date
            .checked_add_days(Days::new(1))
            .ok_or_else(|| CoreError::InvalidWindow {
                reason: format!("end_date {} is out of range", end_date),
            })?;

        ReportWindow::new(midnight(start_date), midnight(day_after))
    }

    #[inline]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Checks `start <= at < end`.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

// =============================================================================
// Unit Tests
// =============================================================================
