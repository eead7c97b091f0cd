//! 全部任务的完成情况统计

use std::sync::Arc;

use serde::Serialize;
use tasktrack_errors::TrackerResult;
use tracing::debug;

use crate::entities::TaskStatus;
use crate::repositories::TaskRepository;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CountByStatus {
    pub not_started: i64,
    pub in_progress: i64,
    pub completed: i64,
}

impl CountByStatus {
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (TaskStatus, i64)>,
    {
        counts
            .into_iter()
            .fold(Self::default(), |mut acc, (status, count)| {
                match status {
                    TaskStatus::NotStarted => acc.not_started += count,
                    TaskStatus::InProgress => acc.in_progress += count,
                    TaskStatus::Completed => acc.completed += count,
                }
                acc
            })
    }

    pub fn total(&self) -> i64 {
        self.not_started + self.in_progress + self.completed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskReport {
    pub total_count: i64,
    pub count_by_status: CountByStatus,
    pub completion_rate: f64,
}

impl TaskReport {
    pub fn from_counts(count_by_status: CountByStatus) -> Self {
        let total_count = count_by_status.total();
        Self {
            total_count,
            count_by_status,
            completion_rate: completion_rate(count_by_status.completed, total_count),
        }
    }
}

/// 完成率百分比，保留一位小数（四舍五入），没有任务时为 0.0
pub fn completion_rate(completed: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = completed as f64 / total as f64 * 100.0;
    (percent * 10.0).round() / 10.0
}

#[derive(Clone)]
pub struct TaskReportService {
    tasks: Arc<dyn TaskRepository>,
}

impl TaskReportService {
    pub fn new(tasks: Arc<dyn TaskRepository>) -> Self {
        Self { tasks }
    }

    /// 总数取各状态计数之和，保证三项之和恒等于 total_count
    pub async fn generate_report(&self) -> TrackerResult<TaskReport> {
        let counts = self.tasks.count_by_status().await?;
        let report = TaskReport::from_counts(CountByStatus::from_counts(counts));
        debug!(
            total = report.total_count,
            completion_rate = report.completion_rate,
            "生成任务报告"
        );
        Ok(report)
    }
}
