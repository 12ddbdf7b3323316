use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::error::AppError;

/// Values stored in `tasks.status`. The schema ranges over all five, but
/// the create/update validators only accept 0..=2; see the request DTOs.
pub mod status {
    pub const TODO: i16 = 0;
    pub const IN_PROGRESS: i16 = 1;
    pub const REVIEW: i16 = 2;
    pub const DONE: i16 = 3;
    pub const BLOCKED: i16 = 4;
}

/// Values stored in `tasks.priority`.
pub mod priority {
    pub const LOW: i16 = 0;
    pub const NORMAL: i16 = 1;
    pub const HIGH: i16 = 2;
    pub const CRITICAL: i16 = 3;
}

pub fn status_name(status: i16) -> &'static str {
    match status {
        0 => "todo",
        1 => "in_progress",
        2 => "review",
        3 => "done",
        4 => "blocked",
        _ => "unknown",
    }
}

pub fn priority_name(priority: i16) -> &'static str {
    match priority {
        0 => "low",
        1 => "normal",
        2 => "high",
        3 => "critical",
        _ => "unknown",
    }
}

/// A full task row.
#[derive(Debug, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub project_id: Option<i64>,
    pub team_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub status: i16,
    pub priority: i16,
    pub estimate_minutes: Option<i32>,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    pub metadata: Option<serde_json::Value>,
}

/// The listing projection: the columns the dashboard shows, plus the
/// creator's name from a join against `users`.
#[derive(Debug, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaskWithCreator {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: i16,
    pub priority: i16,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<i64>,
    pub project_id: Option<i64>,
    pub creator_name: Option<String>,
}

/// A listing row decorated with the human-readable status and priority
/// names the frontend renders.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListItem {
    #[serde(flatten)]
    pub task: TaskWithCreator,
    pub status_name: &'static str,
    pub priority_name: &'static str,
}

impl From<TaskWithCreator> for TaskListItem {
    fn from(task: TaskWithCreator) -> Self {
        let status_name = status_name(task.status);
        let priority_name = priority_name(task.priority);
        Self {
            task,
            status_name,
            priority_name,
        }
    }
}

/// Owner-scoped task counts, recomputed from the task list in memory
/// rather than as a SQL aggregate. Task counts per user are assumed
/// small. Status 2 counts as completed here, matching the dashboard.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub todo: usize,
}

impl TaskStats {
    pub fn compute(tasks: &[TaskWithCreator]) -> Self {
        Self {
            total: tasks.len(),
            completed: tasks.iter().filter(|t| t.status == 2).count(),
            in_progress: tasks.iter().filter(|t| t.status == 1).count(),
            todo: tasks.iter().filter(|t| t.status == 0).count(),
        }
    }
}

/// Body of `POST /api/tasks`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    /// The accepted range is 0..=2 even though the column allows 0..=4;
    /// statuses 3 and 4 are unreachable through the API.
    #[validate(range(min = 0, max = 2))]
    pub status: Option<i16>,
    #[validate(range(min = 0, max = 3))]
    pub priority: Option<i16>,
    /// RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight UTC).
    pub due_date: Option<String>,
    pub project_id: Option<i64>,
    /// When set, an assignment row is created alongside the task, with
    /// the caller recorded as the assigner.
    pub assigned_to: Option<i64>,
}

/// Body of `PUT /api/tasks/{id}`. Absent fields are left untouched.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 0, max = 2))]
    pub status: Option<i16>,
    #[validate(range(min = 0, max = 3))]
    pub priority: Option<i16>,
    pub due_date: Option<String>,
}

/// Parses a due date from either an RFC 3339 timestamp or a bare date.
/// A bare date means midnight UTC of that day.
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, AppError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
        .map_err(|_| AppError::BadRequest(format!("Invalid due date: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn listing_row(status: i16) -> TaskWithCreator {
        TaskWithCreator {
            id: 1,
            title: "t".to_string(),
            description: None,
            status,
            priority: priority::NORMAL,
            due_date: None,
            created_at: Utc::now(),
            created_by: Some(1),
            project_id: None,
            creator_name: Some("Ada".to_string()),
        }
    }

    #[test]
    fn test_create_task_validation() {
        let valid = CreateTaskRequest {
            title: "Write spec".to_string(),
            description: Some("A description".to_string()),
            status: Some(1),
            priority: Some(2),
            due_date: None,
            project_id: None,
            assigned_to: None,
        };
        assert!(valid.validate().is_ok());

        let empty_title = CreateTaskRequest {
            title: "".to_string(),
            description: None,
            status: None,
            priority: None,
            due_date: None,
            project_id: None,
            assigned_to: None,
        };
        assert!(empty_title.validate().is_err());

        let long_title = CreateTaskRequest {
            title: "a".repeat(201),
            description: None,
            status: None,
            priority: None,
            due_date: None,
            project_id: None,
            assigned_to: None,
        };
        assert!(long_title.validate().is_err());

        let long_description = CreateTaskRequest {
            title: "ok".to_string(),
            description: Some("b".repeat(1001)),
            status: None,
            priority: None,
            due_date: None,
            project_id: None,
            assigned_to: None,
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_status_above_validated_range_is_rejected() {
        // done (3) and blocked (4) exist in the column but not in the
        // accepted request range.
        for status in [status::DONE, status::BLOCKED] {
            let input = CreateTaskRequest {
                title: "ok".to_string(),
                description: None,
                status: Some(status),
                priority: None,
                due_date: None,
                project_id: None,
                assigned_to: None,
            };
            assert!(input.validate().is_err(), "status {} should be rejected", status);
        }

        let bad_priority = CreateTaskRequest {
            title: "ok".to_string(),
            description: None,
            status: None,
            priority: Some(4),
            due_date: None,
            project_id: None,
            assigned_to: None,
        };
        assert!(bad_priority.validate().is_err());
    }

    #[test]
    fn test_update_task_all_fields_optional() {
        let empty = UpdateTaskRequest {
            title: None,
            description: None,
            status: None,
            priority: None,
            due_date: None,
        };
        assert!(empty.validate().is_ok());

        let empty_title = UpdateTaskRequest {
            title: Some("".to_string()),
            description: None,
            status: None,
            priority: None,
            due_date: None,
        };
        assert!(empty_title.validate().is_err());
    }

    #[test]
    fn test_parse_due_date_bare_date_is_midnight_utc() {
        let parsed = parse_due_date("2025-01-01").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_parse_due_date_rfc3339() {
        let parsed = parse_due_date("2025-06-15T12:30:00+02:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-06-15T10:30:00+00:00");
    }

    #[test]
    fn test_parse_due_date_garbage_is_bad_request() {
        assert!(matches!(
            parse_due_date("next tuesday"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_status_and_priority_names() {
        assert_eq!(status_name(0), "todo");
        assert_eq!(status_name(1), "in_progress");
        assert_eq!(status_name(2), "review");
        assert_eq!(status_name(3), "done");
        assert_eq!(status_name(4), "blocked");
        assert_eq!(status_name(9), "unknown");

        assert_eq!(priority_name(0), "low");
        assert_eq!(priority_name(1), "normal");
        assert_eq!(priority_name(3), "critical");
        assert_eq!(priority_name(-1), "unknown");
    }

    #[test]
    fn test_stats_partition_validated_statuses() {
        let tasks: Vec<TaskWithCreator> = [0, 0, 1, 2, 2, 2].iter().map(|&s| listing_row(s)).collect();
        let stats = TaskStats::compute(&tasks);

        assert_eq!(
            stats,
            TaskStats {
                total: 6,
                completed: 3,
                in_progress: 1,
                todo: 2,
            }
        );
        // For rows within the validated status range the counts partition
        // the total.
        assert_eq!(stats.total, stats.todo + stats.in_progress + stats.completed);
    }

    #[test]
    fn test_list_item_carries_names() {
        let item = TaskListItem::from(listing_row(1));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["statusName"], "in_progress");
        assert_eq!(json["priorityName"], "normal");
        assert_eq!(json["creatorName"], "Ada");
        assert_eq!(json["title"], "t");
    }
}
