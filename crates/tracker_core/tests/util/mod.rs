//! Shared helpers for integration tests.

use chrono::{Days, Local, NaiveDate};

/// Returns the local date `days` days in the future.
pub fn days_from_now(days: u64) -> NaiveDate {
    Local::now()
        .date_naive()
        .checked_add_days(Days::new(days))
        .unwrap()
}

/// Returns the local date `days` days in the past.
#[allow(dead_code)]
pub fn days_ago(days: u64) -> NaiveDate {
    Local::now()
        .date_naive()
        .checked_sub_days(Days::new(days))
        .unwrap()
}
