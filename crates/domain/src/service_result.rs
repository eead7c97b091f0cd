//! 服务层的成功/失败结果
//!
//! 基础设施故障仍以 `TrackerError` 返回，校验失败是普通的返回值。

use crate::validation::ValidationErrors;

#[derive(Debug, Clone, PartialEq)]
pub enum ServiceResult<T> {
    Success(T),
    Failure(ValidationErrors),
}

impl<T> ServiceResult<T> {
    pub fn success(value: T) -> Self {
        ServiceResult::Success(value)
    }

    pub fn failure(errors: ValidationErrors) -> Self {
        ServiceResult::Failure(errors)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ServiceResult::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            ServiceResult::Success(value) => Some(value),
            ServiceResult::Failure(_) => None,
        }
    }

    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            ServiceResult::Success(_) => None,
            ServiceResult::Failure(errors) => Some(errors),
        }
    }

    pub fn map<U, F>(self, f: F) -> ServiceResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            ServiceResult::Success(value) => ServiceResult::Success(f(value)),
            ServiceResult::Failure(errors) => ServiceResult::Failure(errors),
        }
    }

    pub fn into_result(self) -> Result<T, ValidationErrors> {
        self.into()
    }
}

impl<T> From<Result<T, ValidationErrors>> for ServiceResult<T> {
    fn from(result: Result<T, ValidationErrors>) -> Self {
        match result {
            Ok(value) => ServiceResult::Success(value),
            Err(errors) => ServiceResult::Failure(errors),
        }
    }
}

impl<T> From<ServiceResult<T>> for Result<T, ValidationErrors> {
    fn from(result: ServiceResult<T>) -> Self {
        match result {
            ServiceResult::Success(value) => Ok(value),
            ServiceResult::Failure(errors) => Err(errors),
        }
    }
}
