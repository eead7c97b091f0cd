//! 应用配置
//!
//! 加载顺序：内置默认值、可选的 TOML 文件、`TASKTRACK_*` 环境变量
//! （嵌套键使用 `__` 分隔）。

pub mod models;

pub use models::{ApiConfig, AppConfig, DatabaseConfig, LogFormat, ObservabilityConfig};
