use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::EnumInput;

/// 复制任务时追加到名称末尾的后缀
pub const DUPLICATE_NAME_SUFFIX: &str = "(コピー)";

/// 以整数序号存储、以 snake_case 标签传输的枚举
pub trait OrdinalEnum: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn ordinal(self) -> i64;
    fn label(self) -> &'static str;

    fn from_ordinal(ordinal: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.ordinal() == ordinal)
    }

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.label() == label)
    }

    /// 接受标签 ("completed")、序号 (2) 或数字字符串 ("2")
    fn from_input(input: &EnumInput) -> Option<Self> {
        match input {
            EnumInput::Ordinal(n) => Self::from_ordinal(*n),
            EnumInput::Label(s) => Self::from_label(s)
                .or_else(|| s.trim().parse::<i64>().ok().and_then(Self::from_ordinal)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl OrdinalEnum for TaskStatus {
    const ALL: &'static [Self] = &[
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    fn ordinal(self) -> i64 {
        match self {
            TaskStatus::NotStarted => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Completed => 2,
        }
    }

    fn label(self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "not_started",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl OrdinalEnum for TaskPriority {
    const ALL: &'static [Self] = &[TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    fn ordinal(self) -> i64 {
        match self {
            TaskPriority::Low => 0,
            TaskPriority::Medium => 1,
            TaskPriority::High => 2,
        }
    }

    fn label(self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
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

/// 尚未持久化的任务，id 与时间戳由数据库写入时分配
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub name: String,
    pub explanation: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub genre_id: i64,
    pub deadline_date: Option<NaiveDate>,
}

impl NewTask {
    pub fn new(name: impl Into<String>, genre_id: i64) -> Self {
        Self {
            name: name.into(),
            explanation: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            genre_id,
            deadline_date: None,
        }
    }
}

impl Task {
    /// 生成未保存的副本
    ///
    /// 名称追加复制后缀（总是追加，不去重），状态重置为 `NotStarted`，
    /// 截止日期清空，说明、优先级和分类保持不变。
    pub fn duplicate(&self) -> NewTask {
        NewTask {
            name: format!("{}{}", self.name, DUPLICATE_NAME_SUFFIX),
            explanation: self.explanation.clone(),
            status: TaskStatus::NotStarted,
            priority: self.priority,
            genre_id: self.genre_id,
            deadline_date: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn entity_description(&self) -> String {
        format!("任务 '{}' (ID: {}, 分类: {})", self.name, self.id, self.genre_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGenre {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_task() -> Task {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        Task {
            id: 10,
            name: "テストタスク".to_string(),
            explanation: Some("これは説明文です".to_string()),
            status: TaskStatus::InProgress,
            priority: TaskPriority::High,
            genre_id: 3,
            deadline_date: NaiveDate::from_ymd_opt(2024, 12, 31),
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_status_ordinals_and_labels() {
        assert_eq!(TaskStatus::NotStarted.ordinal(), 0);
        assert_eq!(TaskStatus::InProgress.ordinal(), 1);
        assert_eq!(TaskStatus::Completed.ordinal(), 2);
        assert_eq!(TaskStatus::from_ordinal(2), Some(TaskStatus::Completed));
        assert_eq!(TaskStatus::from_ordinal(3), None);
        assert_eq!(TaskStatus::from_label("in_progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::Completed.to_string(), "completed");
    }

    #[test]
    fn test_priority_ordinals_and_labels() {
        assert_eq!(TaskPriority::Low.ordinal(), 0);
        assert_eq!(TaskPriority::Medium.ordinal(), 1);
        assert_eq!(TaskPriority::High.ordinal(), 2);
        assert_eq!(TaskPriority::from_label("low"), Some(TaskPriority::Low));
        assert_eq!(TaskPriority::from_label("urgent"), None);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(TaskStatus::default(), TaskStatus::NotStarted);
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);

        let task = NewTask::new("新規", 1);
        assert_eq!(task.status, TaskStatus::NotStarted);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.explanation, None);
        assert_eq!(task.deadline_date, None);
    }

    #[test]
    fn test_from_input_accepts_label_ordinal_and_numeric_string() {
        assert_eq!(
            TaskStatus::from_input(&EnumInput::Label("completed".into())),
            Some(TaskStatus::Completed)
        );
        assert_eq!(
            TaskStatus::from_input(&EnumInput::Ordinal(1)),
            Some(TaskStatus::InProgress)
        );
        assert_eq!(
            TaskPriority::from_input(&EnumInput::Label("2".into())),
            Some(TaskPriority::High)
        );
        assert_eq!(TaskPriority::from_input(&EnumInput::Ordinal(-1)), None);
        assert_eq!(TaskStatus::from_input(&EnumInput::Label("done".into())), None);
    }

    #[test]
    fn test_enum_serde_uses_labels() {
        assert_eq!(
            serde_json::to_value(TaskStatus::NotStarted).unwrap(),
            serde_json::json!("not_started")
        );
        assert_eq!(
            serde_json::to_value(TaskPriority::High).unwrap(),
            serde_json::json!("high")
        );
    }

    #[test]
    fn test_duplicate_appends_suffix_and_resets_fields() {
        let original = sample_task();
        let copy = original.duplicate();

        assert_eq!(copy.name, "テストタスク(コピー)");
        assert_eq!(copy.status, TaskStatus::NotStarted);
        assert_eq!(copy.deadline_date, None);
        assert_eq!(copy.explanation.as_deref(), Some("これは説明文です"));
        assert_eq!(copy.priority, TaskPriority::High);
        assert_eq!(copy.genre_id, 3);
    }

    #[test]
    fn test_duplicate_from_completed_resets_status() {
        let mut original = sample_task();
        original.status = TaskStatus::Completed;
        assert_eq!(original.duplicate().status, TaskStatus::NotStarted);
    }

    #[test]
    fn test_duplicate_does_not_mutate_original() {
        let original = sample_task();
        let snapshot = original.clone();
        let _ = original.duplicate();
        assert_eq!(original, snapshot);
    }

    #[test]
    fn test_duplicate_empty_name_is_only_suffix() {
        let mut original = sample_task();
        original.name = String::new();
        assert_eq!(original.duplicate().name, "(コピー)");
    }

    #[test]
    fn test_duplicate_suffix_accumulates() {
        let mut original = sample_task();
        original.name = "タスクA(コピー)".to_string();
        assert_eq!(original.duplicate().name, "タスクA(コピー)(コピー)");
    }

    #[test]
    fn test_duplicate_preserves_special_characters() {
        let mut original = sample_task();
        original.name = "タスク🎉【重要】".to_string();
        assert_eq!(original.duplicate().name, "タスク🎉【重要】(コピー)");
    }

    #[test]
    fn test_duplicate_preserves_missing_and_empty_explanation() {
        let mut original = sample_task();
        original.explanation = None;
        assert_eq!(original.duplicate().explanation, None);

        original.explanation = Some(String::new());
        assert_eq!(original.duplicate().explanation, Some(String::new()));

        let long_text = "あ".repeat(1000);
        original.explanation = Some(long_text.clone());
        assert_eq!(original.duplicate().explanation, Some(long_text));
    }

    #[test]
    fn test_duplicate_keeps_every_priority() {
        for priority in TaskPriority::ALL {
            let mut original = sample_task();
            original.priority = *priority;
            assert_eq!(original.duplicate().priority, *priority);
        }
    }
}
