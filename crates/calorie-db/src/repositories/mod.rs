//! Repository implementations
//!
//! PostgreSQL implementations of the repository and unit-of-work traits
//! defined in calorie-core.

mod error;
mod filter;
mod meal;
mod settings;
mod unit_of_work;
mod user;

pub use meal::PgMealRepository;
pub use settings::PgSettingsRepository;
pub use unit_of_work::{PgLedgerTransaction, PgUnitOfWork};
pub use user::PgUserRepository;
