//! Settings mapper

use calorie_core::entities::Settings;

use crate::models::SettingsModel;

impl From<SettingsModel> for Settings {
    fn from(model: SettingsModel) -> Self {
        Settings::new(model.user_id, model.expected_daily_calories)
    }
}
