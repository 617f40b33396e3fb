//! # calorie-core
//!
//! Domain layer containing entities, value objects, the authorization evaluator,
//! and repository / unit-of-work traits.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod authorization;
pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use authorization::{authorize, Action, ExecutionContext, Identity};
pub use entities::{is_deficit, DailySummary, Meal, MealEntry, MealPatch, NewUser, Settings, User};
pub use error::DomainError;
pub use traits::{
    CalorieLookup, LedgerTransaction, LockMode, MealRepository, RepoResult, SettingsRepository,
    UnitOfWork, UserRepository,
};
pub use value_objects::{
    Capabilities, FieldKind, FilterExpr, FilterField, FilterOp, FilterValue, Page, PageRequest,
    Role, MEAL_FILTER_FIELDS, USER_FILTER_FIELDS,
};
