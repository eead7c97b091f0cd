use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
    #[error("任务未找到: {id}")]
    TaskNotFound { id: i64 },
    #[error("分类未找到: {id}")]
    GenreNotFound { id: i64 },
    #[error("分类仍被任务引用: {id}")]
    GenreInUse { id: i64 },
    #[error("配置错误: {0}")]
    Configuration(String),
    #[error("内部错误: {0}")]
    Internal(String),
}

pub type TrackerResult<T> = Result<T, TrackerError>;

impl TrackerError {
    pub fn task_not_found(id: i64) -> Self {
        Self::TaskNotFound { id }
    }
    pub fn genre_not_found(id: i64) -> Self {
        Self::GenreNotFound { id }
    }
    pub fn genre_in_use(id: i64) -> Self {
        Self::GenreInUse { id }
    }
    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TrackerError::TaskNotFound { .. } | TrackerError::GenreNotFound { .. }
        )
    }
    /// 数据库因外键约束拒绝写入：引用的行不存在，或删除时仍被引用
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            // 带 ON DELETE RESTRICT 的旧表报告 SQLITE_CONSTRAINT_TRIGGER (1811)，
            // sqlx 不把它归为外键错误，只能按消息识别
            TrackerError::Database(sqlx::Error::Database(db_err)) => {
                db_err.is_foreign_key_violation()
                    || db_err.message().contains("FOREIGN KEY constraint failed")
            }
            _ => false,
        }
    }
    pub fn user_message(&self) -> &str {
        match self {
            TrackerError::TaskNotFound { .. } => "请求的任务不存在",
            TrackerError::GenreNotFound { .. } => "请求的分类不存在",
            TrackerError::GenreInUse { .. } => "该分类下仍有任务，无法删除",
            _ => "系统繁忙，请稍后重试",
        }
    }
}

impl From<anyhow::Error> for TrackerError {
    fn from(err: anyhow::Error) -> Self {
        TrackerError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests;
