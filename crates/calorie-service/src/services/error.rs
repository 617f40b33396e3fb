//! Service layer error type

use calorie_common::AppError;
use calorie_core::DomainError;
use std::fmt;

#[derive(Debug)]
pub enum ServiceError {
    /// Rule violation or storage failure from the domain and engine
    Domain(DomainError),

    /// Credential, token or hashing failure
    App(AppError),

    /// Request rejected before it reached the domain
    Validation(String),

    /// `ServiceContextBuilder::build` without one of its collaborators
    MissingDependency(&'static str),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::MissingDependency(name) => write!(f, "{name} is required"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            Self::Validation(_) | Self::MissingDependency(_) => None,
        }
    }
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => e.status_code(),
            Self::App(e) => e.status_code(),
            Self::Validation(_) => 400,
            Self::MissingDependency(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::MissingDependency(_) => "CONFIG_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::Validation(msg) => AppError::Validation(msg),
            missing @ ServiceError::MissingDependency(_) => AppError::Config(missing.to_string()),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
