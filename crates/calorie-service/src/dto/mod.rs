//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    CreateMealRequest, CreateUserRequest, SigninRequest, SignupRequest, UpdateMealRequest,
    UpdateSettingsRequest, UpdateUserRequest,
};

pub use responses::{
    DependencyChecks, HealthResponse, MealResponse, Probe, ReadinessResponse, SettingsResponse,
    TokenResponse, UserResponse,
};
