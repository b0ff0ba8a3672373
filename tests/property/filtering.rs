//! Property tests for search filtering and task counts.
//!
//! 1. Filtering never reorders: the result is a subsequence of the input.
//! 2. A blank query returns every task in order.
//! 3. Filtering is idempotent.
//! 4. Every returned task matches; every dropped task does not.
//! 5. Per-status counts always sum to the total.

#![allow(clippy::unwrap_used)]

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use taskboard::tasks::{TaskCounts, filter_tasks, matches_query};
use taskboard_proto::task::{Task, TaskId, TaskStatus};

// --- Strategies ---

fn arb_status() -> impl Strategy<Value = TaskStatus> {
    prop::sample::select(TaskStatus::ALL.to_vec())
}

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z ]{0,12}"
}

fn arb_tasks() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(
        (arb_text(), prop::option::of(arb_text()), arb_status()),
        0..20,
    )
    .prop_map(|rows| {
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        (0i64..)
            .zip(rows)
            .map(|(i, (title, description, status))| Task {
                id: TaskId::new(),
                title,
                description,
                status,
                due_date: None,
                created_at: base - Duration::minutes(i),
            })
            .collect()
    })
}

fn arb_query() -> impl Strategy<Value = String> {
    "[a-zA-Z]{0,3}"
}

fn ids(tasks: &[&Task]) -> Vec<TaskId> {
    tasks.iter().map(|t| t.id.clone()).collect()
}

proptest! {
    #[test]
    fn filter_keeps_input_order(tasks in arb_tasks(), query in arb_query()) {
        let visible = filter_tasks(&tasks, &query);
        let mut remaining = tasks.iter();
        for task in visible {
            prop_assert!(remaining.any(|t| t.id == task.id));
        }
    }

    #[test]
    fn blank_query_returns_everything(tasks in arb_tasks(), spaces in " {0,4}") {
        let visible = filter_tasks(&tasks, &spaces);
        let all: Vec<&Task> = tasks.iter().collect();
        prop_assert_eq!(ids(&visible), ids(&all));
    }

    #[test]
    fn filter_is_idempotent(tasks in arb_tasks(), query in arb_query()) {
        let once: Vec<Task> = filter_tasks(&tasks, &query).into_iter().cloned().collect();
        let twice = filter_tasks(&once, &query);
        let once_refs: Vec<&Task> = once.iter().collect();
        prop_assert_eq!(ids(&twice), ids(&once_refs));
    }

    #[test]
    fn filter_partitions_by_match(tasks in arb_tasks(), query in arb_query()) {
        let visible = ids(&filter_tasks(&tasks, &query));
        for task in &tasks {
            prop_assert_eq!(visible.contains(&task.id), matches_query(task, &query));
        }
    }

    #[test]
    fn match_ignores_case(tasks in arb_tasks(), query in arb_query()) {
        let lower = ids(&filter_tasks(&tasks, &query.to_lowercase()));
        let upper = ids(&filter_tasks(&tasks, &query.to_uppercase()));
        prop_assert_eq!(lower, upper);
    }

    #[test]
    fn counts_sum_to_total(tasks in arb_tasks()) {
        let counts = TaskCounts::from_tasks(&tasks);
        prop_assert_eq!(counts.total, tasks.len());
        prop_assert_eq!(counts.pending + counts.in_progress + counts.complete, counts.total);
        for status in TaskStatus::ALL {
            let expected = tasks.iter().filter(|t| t.status == status).count();
            prop_assert_eq!(counts.of(status), expected);
        }
    }
}
