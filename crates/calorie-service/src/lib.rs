//! # calorie-service
//!
//! Application layer containing the calorie engine, services, DTOs and the
//! calorie lookup client.

pub mod dto;
pub mod engine;
pub mod lookup;
pub mod services;

#[cfg(test)]
mod testing;

pub use engine::{MealLedger, SettingsStore};
pub use lookup::{DisabledLookup, NutritionixLookup};
pub use services::{
    AuthService, MealService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
    SettingsService, UserService,
};
