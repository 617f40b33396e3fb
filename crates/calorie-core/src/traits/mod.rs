//! Ports implemented by the infrastructure layer

mod lookup;
mod repositories;
mod unit_of_work;

pub use lookup::CalorieLookup;
pub use repositories::{
    MealRepository, RepoResult, SettingsRepository, UserRepository,
};
pub use unit_of_work::{LedgerTransaction, LockMode, UnitOfWork};
