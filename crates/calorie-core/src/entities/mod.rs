//! Domain entities - core business objects

mod meal;
mod settings;
mod summary;
mod user;

pub use meal::{Meal, MealEntry, MealPatch};
pub use settings::Settings;
pub use summary::{is_deficit, DailySummary};
pub use user::{NewUser, User};
