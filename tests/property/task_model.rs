//! Property tests for the shared task model.
//!
//! 1. Any calendar date normalizes to midnight UTC and keeps its date.
//! 2. The wire form of a normalized due date always ends in `T00:00:00.000Z`.
//! 3. Complete tasks are never overdue, whatever the dates.
//! 4. Status wire names parse back to the same status.

#![allow(clippy::unwrap_used)]

use chrono::{Days, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use taskboard_proto::task::{
    Task, TaskId, TaskStatus, due_date_from, format_timestamp, parse_timestamp,
};

// --- Strategies ---

/// Dates between 1970 and roughly 2130.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0u64..60_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|d| d.checked_add_days(Days::new(offset)))
            .unwrap()
    })
}

fn arb_status() -> impl Strategy<Value = TaskStatus> {
    prop::sample::select(TaskStatus::ALL.to_vec())
}

fn task_with(status: TaskStatus, due: Option<NaiveDate>) -> Task {
    Task {
        id: TaskId::new(),
        title: "t".to_string(),
        description: None,
        status,
        due_date: due.map(due_date_from),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

proptest! {
    #[test]
    fn due_date_keeps_calendar_date(date in arb_date()) {
        let due = due_date_from(date);
        prop_assert_eq!(due.date_naive(), date);
        prop_assert_eq!(due.timestamp() % 86_400, 0);
    }

    #[test]
    fn due_date_wire_form_is_midnight_millis(date in arb_date()) {
        let wire = format_timestamp(&due_date_from(date));
        prop_assert!(wire.ends_with("T00:00:00.000Z"), "got {}", wire);
        prop_assert_eq!(parse_timestamp(&wire), Some(due_date_from(date)));
    }

    #[test]
    fn date_only_input_matches_normalized_form(date in arb_date()) {
        let bare = date.format("%Y-%m-%d").to_string();
        prop_assert_eq!(parse_timestamp(&bare), Some(due_date_from(date)));
    }

    #[test]
    fn complete_tasks_never_overdue(due in arb_date(), today in arb_date()) {
        prop_assert!(!task_with(TaskStatus::Complete, Some(due)).is_overdue(today));
    }

    #[test]
    fn overdue_iff_due_before_today(
        status in arb_status(),
        due in arb_date(),
        today in arb_date(),
    ) {
        let task = task_with(status, Some(due));
        let expected = status != TaskStatus::Complete && due < today;
        prop_assert_eq!(task.is_overdue(today), expected);
    }

    #[test]
    fn status_wire_name_parses_back(status in arb_status()) {
        prop_assert_eq!(status.as_str().parse::<TaskStatus>(), Ok(status));
    }
}
