//! Entity to model mappers
//!
//! Conversions from database rows (`models`) to domain entities (calorie-core).

mod meal;
mod settings;
mod user;
