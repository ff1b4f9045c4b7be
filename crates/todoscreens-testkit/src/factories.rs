//! Fixture builders

use chrono::{Duration, NaiveDate, NaiveDateTime};
use todoscreens_core::Todo;

/// The date every fixture treats as "today"
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
}

/// Noon on [`test_today`]
pub fn test_now() -> NaiveDateTime {
    test_today().and_hms_opt(12, 0, 0).unwrap()
}

/// A task due today
pub fn todo(id: u64, title: &str, priority: u8) -> Todo {
    Todo::new(id, title, priority, test_today())
}

/// A task due `days` before [`test_today`]
pub fn overdue_todo(id: u64, title: &str, priority: u8, days: i64) -> Todo {
    Todo::new(id, title, priority, test_today() - Duration::days(days))
}
