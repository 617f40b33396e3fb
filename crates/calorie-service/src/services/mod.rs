//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! authorization, validation, and orchestration of domain operations.

pub mod auth;
pub mod context;
pub mod error;
pub mod meal;
pub mod settings;
pub mod user;

// Re-export all services for convenience
pub use auth::AuthService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use meal::MealService;
pub use settings::SettingsService;
pub use user::UserService;
