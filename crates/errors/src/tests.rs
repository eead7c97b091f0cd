use crate::*;

#[test]
fn test_tracker_error_display() {
    let task_error = TrackerError::TaskNotFound { id: 123 };
    assert_eq!(task_error.to_string(), "任务未找到: 123");

    let genre_error = TrackerError::GenreNotFound { id: 7 };
    assert_eq!(genre_error.to_string(), "分类未找到: 7");

    let in_use = TrackerError::GenreInUse { id: 7 };
    assert_eq!(in_use.to_string(), "分类仍被任务引用: 7");

    let config_error = TrackerError::Configuration("Missing required field".to_string());
    assert_eq!(config_error.to_string(), "配置错误: Missing required field");

    let internal_error = TrackerError::Internal("Unexpected error".to_string());
    assert_eq!(internal_error.to_string(), "内部错误: Unexpected error");
}

#[test]
fn test_helper_constructors() {
    assert!(matches!(
        TrackerError::task_not_found(1),
        TrackerError::TaskNotFound { id: 1 }
    ));
    assert!(matches!(
        TrackerError::genre_not_found(2),
        TrackerError::GenreNotFound { id: 2 }
    ));
    assert!(matches!(
        TrackerError::genre_in_use(3),
        TrackerError::GenreInUse { id: 3 }
    ));
    assert!(matches!(
        TrackerError::config_error("bad"),
        TrackerError::Configuration(msg) if msg == "bad"
    ));
}

#[test]
fn test_is_not_found() {
    assert!(TrackerError::task_not_found(1).is_not_found());
    assert!(TrackerError::genre_not_found(1).is_not_found());
    assert!(!TrackerError::genre_in_use(1).is_not_found());
    assert!(!TrackerError::internal("x").is_not_found());
}

#[test]
fn test_non_database_errors_are_not_fk_violations() {
    assert!(!TrackerError::internal("x").is_foreign_key_violation());
    assert!(!TrackerError::Database(sqlx::Error::RowNotFound).is_foreign_key_violation());
}

#[test]
fn test_user_message() {
    assert_eq!(TrackerError::task_not_found(1).user_message(), "请求的任务不存在");
    assert_eq!(
        TrackerError::genre_in_use(1).user_message(),
        "该分类下仍有任务，无法删除"
    );
    assert_eq!(TrackerError::internal("x").user_message(), "系统繁忙，请稍后重试");
}

#[test]
fn test_from_anyhow() {
    let err: TrackerError = anyhow::anyhow!("boom").into();
    assert!(matches!(err, TrackerError::Internal(msg) if msg == "boom"));
}

#[test]
fn test_from_sqlx() {
    let err: TrackerError = sqlx::Error::RowNotFound.into();
    assert!(matches!(err, TrackerError::Database(_)));
}
