//! Database models - SQLx-compatible structs for PostgreSQL tables

mod meal;
mod settings;
mod user;

pub use meal::{MealEntryModel, MealModel};
pub use settings::SettingsModel;
pub use user::{UserCredentialsModel, UserModel};
