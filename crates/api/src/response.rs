//! 线上 JSON 表示，字段统一为 camelCase

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tasktrack_domain::{CountByStatus, Genre, Task, TaskPriority, TaskReport, TaskStatus};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: i64,
    pub name: String,
    pub explanation: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub genre_id: i64,
    pub deadline_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskView {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            name: task.name,
            explanation: task.explanation,
            status: task.status,
            priority: task.priority,
            genre_id: task.genre_id,
            deadline_date: task.deadline_date,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreView {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Genre> for GenreView {
    fn from(genre: Genre) -> Self {
        Self {
            id: genre.id,
            name: genre.name,
            created_at: genre.created_at,
            updated_at: genre.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountByStatusView {
    pub not_started: i64,
    pub in_progress: i64,
    pub completed: i64,
}

impl From<CountByStatus> for CountByStatusView {
    fn from(counts: CountByStatus) -> Self {
        Self {
            not_started: counts.not_started,
            in_progress: counts.in_progress,
            completed: counts.completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    pub total_count: i64,
    pub count_by_status: CountByStatusView,
    pub completion_rate: f64,
}

impl From<TaskReport> for ReportView {
    fn from(report: TaskReport) -> Self {
        Self {
            total_count: report.total_count,
            count_by_status: report.count_by_status.into(),
            completion_rate: report.completion_rate,
        }
    }
}

pub fn task_views(tasks: Vec<Task>) -> Vec<TaskView> {
    tasks.into_iter().map(TaskView::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_view_uses_camel_case_and_labels() {
        let ts = DateTime::parse_from_rfc3339("2024-01-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let task = Task {
            id: 1,
            name: "買い物".to_string(),
            explanation: None,
            status: TaskStatus::InProgress,
            priority: TaskPriority::High,
            genre_id: 2,
            deadline_date: NaiveDate::from_ymd_opt(2024, 3, 5),
            created_at: ts,
            updated_at: ts,
        };

        let value = serde_json::to_value(TaskView::from(task)).unwrap();
        assert_eq!(value["genreId"], json!(2));
        assert_eq!(value["status"], json!("in_progress"));
        assert_eq!(value["priority"], json!("high"));
        assert_eq!(value["deadlineDate"], json!("2024-03-05"));
        assert_eq!(value["explanation"], json!(null));
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_report_view_shape() {
        let report = TaskReport::from_counts(CountByStatus {
            not_started: 2,
            in_progress: 3,
            completed: 1,
        });
        let value = serde_json::to_value(ReportView::from(report)).unwrap();
        assert_eq!(
            value,
            json!({
                "totalCount": 6,
                "countByStatus": {"notStarted": 2, "inProgress": 3, "completed": 1},
                "completionRate": 16.7
            })
        );
    }
}
