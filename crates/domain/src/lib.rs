//! 任务管理领域层：实体、输入值类型、校验、仓储接口，以及任务、分类与统计服务

pub mod entities;
pub mod report;
pub mod repositories;
pub mod service_result;
pub mod services;
pub mod sqlx_impls;
pub mod validation;
pub mod value_objects;

pub use entities::*;
pub use report::*;
pub use repositories::*;
pub use service_result::ServiceResult;
pub use services::*;
pub use tasktrack_errors::{TrackerError, TrackerResult};
pub use validation::ValidationErrors;
pub use value_objects::*;
