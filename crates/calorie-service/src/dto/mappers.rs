//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use calorie_common::AccessToken;
use calorie_core::entities::{MealEntry, MealPatch, Settings, User};

use super::requests::UpdateMealRequest;
use super::responses::{MealResponse, SettingsResponse, TokenResponse, UserResponse};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            account_id: user.account_id,
            username: user.username.clone(),
            role_id: user.role.id(),
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

// ============================================================================
// Meal Mappers
// ============================================================================

impl From<MealEntry> for MealResponse {
    fn from(entry: MealEntry) -> Self {
        let MealEntry {
            meal,
            calories_deficit,
        } = entry;
        Self {
            id: meal.id,
            user_id: meal.user_id,
            date: meal.date,
            time: meal.time,
            name: meal.name,
            calories: meal.calories,
            calories_deficit,
        }
    }
}

impl From<UpdateMealRequest> for MealPatch {
    fn from(request: UpdateMealRequest) -> Self {
        Self {
            date: request.date,
            time: request.time,
            name: request.name,
            calories: request.calories,
        }
    }
}

// ============================================================================
// Settings / Token Mappers
// ============================================================================

impl From<Settings> for SettingsResponse {
    fn from(settings: Settings) -> Self {
        Self {
            user_id: settings.user_id,
            expected_daily_calories: settings.expected_daily_calories,
        }
    }
}

impl From<AccessToken> for TokenResponse {
    fn from(token: AccessToken) -> Self {
        Self {
            token: token.token,
            token_type: token.token_type,
            expires_in: token.expires_in,
        }
    }
}
