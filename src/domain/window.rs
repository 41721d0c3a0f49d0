use chrono::{DateTime, Datelike, Utc};

use crate::app::{NewswireError, Result};

/// Inclusive calendar-month range an article date must fall into.
///
/// The window always contains the month of `latest`, so a window of
/// `months_back = 1` covers the current month only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyWindow {
    pub earliest_year: i32,
    pub earliest_month: u32,
    pub latest: DateTime<Utc>,
}

impl RecencyWindow {
    /// Resolve the window ending at `now` and spanning `months_back` months.
    pub fn resolve(now: DateTime<Utc>, months_back: i32) -> Result<Self> {
        if months_back <= 0 {
            return Err(NewswireError::InvalidConfiguration(format!(
                "months_back must be at least 1, got {}",
                months_back
            )));
        }

        let mut year = now.year();
        let mut month = now.month() as i32 - (months_back - 1);

        if month <= 0 {
            year -= month.abs() / 12 + 1;
            month = month.rem_euclid(12);
            if month == 0 {
                month = 12;
            }
        }

        Ok(Self {
            earliest_year: year,
            earliest_month: month as u32,
            latest: now,
        })
    }

    /// Whether `instant` lies inside the window, inclusive at both ends.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let starts_after_floor = (instant.year(), instant.month())
            >= (self.earliest_year, self.earliest_month);
        starts_after_floor && instant <= self.latest
    }
}
