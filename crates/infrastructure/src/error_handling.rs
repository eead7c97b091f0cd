//! 仓储层错误处理
//!
//! 数据库错误在这里按操作和实体记录一次日志，包装时保留原始驱动错误，
//! 上层据此判断外键冲突。

use sqlx::Error as SqlxError;
use std::fmt;
use tasktrack_errors::TrackerError;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryOperation {
    Create,
    Read,
    Update,
    Delete,
    Query,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryOperation::Create => write!(f, "创建"),
            RepositoryOperation::Read => write!(f, "查询"),
            RepositoryOperation::Update => write!(f, "更新"),
            RepositoryOperation::Delete => write!(f, "删除"),
            RepositoryOperation::Query => write!(f, "统计"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Task,
    Genre,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Task => write!(f, "任务"),
            EntityKind::Genre => write!(f, "分类"),
        }
    }
}

/// Context information for a repository operation
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub operation: RepositoryOperation,
    pub entity: EntityKind,
    pub entity_id: Option<i64>,
    pub entity_name: Option<String>,
}

impl OperationContext {
    pub fn new(operation: RepositoryOperation, entity: EntityKind) -> Self {
        Self {
            operation,
            entity,
            entity_id: None,
            entity_name: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.entity_id = Some(id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.entity_name = Some(name.into());
        self
    }

    pub fn entity_description(&self) -> String {
        match (self.entity_id, &self.entity_name) {
            (Some(id), Some(name)) => format!("{} '{}' (ID: {})", self.entity, name, id),
            (Some(id), None) => format!("{} (ID: {})", self.entity, id),
            (None, Some(name)) => format!("{} '{}'", self.entity, name),
            (None, None) => self.entity.to_string(),
        }
    }
}

pub struct RepositoryErrorHelpers;

impl RepositoryErrorHelpers {
    pub fn database_error(context: &OperationContext, error: SqlxError) -> TrackerError {
        let description = context.entity_description();
        match &error {
            SqlxError::Database(db_error) if db_error.is_foreign_key_violation() => {
                warn!(
                    operation = %context.operation,
                    error = %error,
                    "{}{}时违反外键约束",
                    context.operation,
                    description
                );
            }
            SqlxError::PoolTimedOut | SqlxError::PoolClosed => {
                error!(
                    operation = %context.operation,
                    error = %error,
                    "{}{}时数据库连接池不可用",
                    context.operation,
                    description
                );
            }
            _ => {
                error!(
                    operation = %context.operation,
                    error = %error,
                    "{}{}时发生数据库错误",
                    context.operation,
                    description
                );
            }
        }
        TrackerError::Database(error)
    }

    pub fn log_operation_success(context: &OperationContext, description: &str) {
        debug!(
            operation = %context.operation,
            entity = %context.entity,
            "{}{}成功",
            context.operation,
            description
        );
    }
}

#[macro_export]
macro_rules! repo_context {
    ($operation:ident, $entity:ident) => {
        $crate::error_handling::OperationContext::new(
            $crate::error_handling::RepositoryOperation::$operation,
            $crate::error_handling::EntityKind::$entity,
        )
    };
    ($operation:ident, $entity:ident, id = $id:expr) => {
        $crate::repo_context!($operation, $entity).with_id($id)
    };
    ($operation:ident, $entity:ident, name = $name:expr) => {
        $crate::repo_context!($operation, $entity).with_name($name)
    };
    ($operation:ident, $entity:ident, id = $id:expr, name = $name:expr) => {
        $crate::repo_context!($operation, $entity)
            .with_id($id)
            .with_name($name)
    };
}
