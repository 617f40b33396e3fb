//! Transactional calorie engine
//!
//! The ledger and the settings store own every write to meals, settings and
//! daily summaries. Both depend only on [`calorie_core::traits::UnitOfWork`],
//! so the same code runs against PostgreSQL and the in-memory test store.

pub mod aggregator;
mod ledger;
mod settings;
mod transaction;

pub use ledger::MealLedger;
pub use settings::SettingsStore;
