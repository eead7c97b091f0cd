//! 输入值类型：原始枚举输入、PATCH 更新值，以及任务服务接受的字段集合

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::{NewTask, OrdinalEnum, Task, TaskPriority, TaskStatus};
use crate::validation::ValidationErrors;

/// 客户端提交的枚举值，可以是标签或序号
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumInput {
    Ordinal(i64),
    Label(String),
}

impl EnumInput {
    /// 空字符串（表单未选择）视为未提交
    pub fn is_blank(&self) -> bool {
        matches!(self, EnumInput::Label(s) if s.trim().is_empty())
    }
}

impl fmt::Display for EnumInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumInput::Ordinal(n) => write!(f, "{n}"),
            EnumInput::Label(s) => f.write_str(s),
        }
    }
}

impl From<TaskStatus> for EnumInput {
    fn from(status: TaskStatus) -> Self {
        EnumInput::Label(status.label().to_string())
    }
}

impl From<TaskPriority> for EnumInput {
    fn from(priority: TaskPriority) -> Self {
        EnumInput::Label(priority.label().to_string())
    }
}

/// 客户端提交的ID，可以是数字或数字字符串
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdInput {
    Number(i64),
    Text(String),
}

impl IdInput {
    /// 空字符串或非数字字符串得到 None
    pub fn into_id(self) -> Option<i64> {
        match self {
            IdInput::Number(id) => Some(id),
            IdInput::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<i64> for IdInput {
    fn from(id: i64) -> Self {
        IdInput::Number(id)
    }
}

/// PATCH 语义下的字段更新
///
/// - `Set(T)`: 设置为给定值
/// - `Unset`: 显式提交了 `null`
/// - `NoChange`: 字段缺失（字段上需要 `#[serde(default)]`）
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UpdateValue<T> {
    Set(T),
    Unset,
    #[default]
    NoChange,
}

impl<T> UpdateValue<T> {
    pub fn is_change(&self) -> bool {
        !matches!(self, UpdateValue::NoChange)
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, UpdateValue::Unset)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            UpdateValue::Set(value) => Some(value),
            _ => None,
        }
    }

    /// 应用到已有的可空值
    pub fn apply_to(self, existing: Option<T>) -> Option<T> {
        match self {
            UpdateValue::Set(value) => Some(value),
            UpdateValue::Unset => None,
            UpdateValue::NoChange => existing,
        }
    }

    /// 满足 `is_blank` 的 `Set` 值按 `Unset` 处理
    pub fn blank_as_unset<F>(self, is_blank: F) -> UpdateValue<T>
    where
        F: Fn(&T) -> bool,
    {
        match self {
            UpdateValue::Set(value) if is_blank(&value) => UpdateValue::Unset,
            other => other,
        }
    }

    pub fn map<U, F>(self, f: F) -> UpdateValue<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            UpdateValue::Set(value) => UpdateValue::Set(f(value)),
            UpdateValue::Unset => UpdateValue::Unset,
            UpdateValue::NoChange => UpdateValue::NoChange,
        }
    }
}

impl<T> UpdateValue<Option<T>> {
    pub fn flatten(self) -> UpdateValue<T> {
        match self {
            UpdateValue::Set(Some(value)) => UpdateValue::Set(value),
            UpdateValue::Set(None) | UpdateValue::Unset => UpdateValue::Unset,
            UpdateValue::NoChange => UpdateValue::NoChange,
        }
    }
}

impl<T> From<Option<T>> for UpdateValue<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => UpdateValue::Set(v),
            None => UpdateValue::Unset,
        }
    }
}

impl<'de, T> Deserialize<'de> for UpdateValue<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // 字段缺失时不会调用到这里（由 #[serde(default)] 给出 NoChange），
        // 因此 None 只可能来自显式的 null
        Option::<T>::deserialize(deserializer).map(UpdateValue::from)
    }
}

/// 创建任务时允许的字段，`None` 表示未提交（或为 null），使用默认值
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFields {
    pub name: Option<String>,
    pub explanation: Option<String>,
    pub status: Option<EnumInput>,
    pub priority: Option<EnumInput>,
    pub genre_id: Option<i64>,
    pub deadline_date: Option<String>,
}

impl TaskFields {
    /// 合并到默认值上；这里只检查分类是否提交，不检查是否存在
    pub fn normalize(self) -> Result<NewTask, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let status = match self.status.filter(|s| !s.is_blank()) {
            Some(input) => parse_enum::<TaskStatus>(&input, "status", &mut errors),
            None => Some(TaskStatus::default()),
        };
        let priority = match self.priority.filter(|p| !p.is_blank()) {
            Some(input) => parse_enum::<TaskPriority>(&input, "priority", &mut errors),
            None => Some(TaskPriority::default()),
        };
        let deadline_date = match self.deadline_date.filter(|d| !is_blank(d)) {
            Some(raw) => parse_date(&raw, &mut errors),
            None => None,
        };
        if self.genre_id.is_none() {
            errors.add("genre", "must exist");
        }

        match (status, priority, self.genre_id) {
            (Some(status), Some(priority), Some(genre_id)) if errors.is_empty() => Ok(NewTask {
                name: self.name.unwrap_or_default(),
                explanation: self.explanation,
                status,
                priority,
                genre_id,
                deadline_date,
            }),
            _ => Err(errors),
        }
    }
}

/// 任务的部分更新
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChanges {
    pub name: UpdateValue<String>,
    pub explanation: UpdateValue<String>,
    pub status: UpdateValue<EnumInput>,
    pub priority: UpdateValue<EnumInput>,
    pub genre_id: UpdateValue<i64>,
    pub deadline_date: UpdateValue<String>,
}

impl TaskChanges {
    pub fn status_only(status: EnumInput) -> Self {
        Self {
            status: UpdateValue::Set(status),
            ..Self::default()
        }
    }

    pub fn has_changes(&self) -> bool {
        self.name.is_change()
            || self.explanation.is_change()
            || self.status.is_change()
            || self.priority.is_change()
            || self.genre_id.is_change()
            || self.deadline_date.is_change()
    }

    /// 返回应用变更后的任务，`task` 本身不变
    pub fn apply_to(self, task: &Task) -> Result<Task, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut updated = task.clone();

        match self.name {
            UpdateValue::Set(name) => updated.name = name,
            UpdateValue::Unset => errors.add("name", "can't be null"),
            UpdateValue::NoChange => {}
        }

        updated.explanation = self.explanation.apply_to(updated.explanation);

        match self.status.blank_as_unset(EnumInput::is_blank) {
            UpdateValue::Set(input) => {
                if let Some(status) = parse_enum::<TaskStatus>(&input, "status", &mut errors) {
                    updated.status = status;
                }
            }
            UpdateValue::Unset => errors.add("status", "can't be null"),
            UpdateValue::NoChange => {}
        }

        match self.priority.blank_as_unset(EnumInput::is_blank) {
            UpdateValue::Set(input) => {
                if let Some(priority) =
                    parse_enum::<TaskPriority>(&input, "priority", &mut errors)
                {
                    updated.priority = priority;
                }
            }
            UpdateValue::Unset => errors.add("priority", "can't be null"),
            UpdateValue::NoChange => {}
        }

        match self.genre_id {
            UpdateValue::Set(genre_id) => updated.genre_id = genre_id,
            UpdateValue::Unset => errors.add("genre", "must exist"),
            UpdateValue::NoChange => {}
        }

        match self.deadline_date.blank_as_unset(|d| is_blank(d)) {
            UpdateValue::Set(raw) => {
                if let Some(date) = parse_date(&raw, &mut errors) {
                    updated.deadline_date = Some(date);
                }
            }
            UpdateValue::Unset => updated.deadline_date = None,
            UpdateValue::NoChange => {}
        }

        if errors.is_empty() {
            Ok(updated)
        } else {
            Err(errors)
        }
    }
}

fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

fn parse_enum<E: OrdinalEnum>(
    input: &EnumInput,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<E> {
    let parsed = E::from_input(input);
    if parsed.is_none() {
        errors.add(field, format!("'{input}' is not a valid {field}"));
    }
    parsed
}

fn parse_date(raw: &str, errors: &mut ValidationErrors) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add("deadline_date", "is not a valid date");
            None
        }
    }
}
