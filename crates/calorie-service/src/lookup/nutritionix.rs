//! Nutritionix instant search client

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use calorie_common::NutritionixConfig;
use calorie_core::error::DomainError;
use calorie_core::traits::{CalorieLookup, RepoResult};

use super::DisabledLookup;

/// Nutrient id of energy in kcal
const KCAL_ATTR_ID: i64 = 208;

#[derive(Debug, Deserialize)]
struct Nutrient {
    value: f64,
    attr_id: i64,
}

#[derive(Debug, Deserialize)]
struct Food {
    #[serde(default)]
    full_nutrients: Vec<Nutrient>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    common: Vec<Food>,
    #[serde(default)]
    branded: Vec<Food>,
}

impl SearchResponse {
    /// First kcal value, common foods before branded ones
    fn calories(&self) -> Option<i32> {
        self.common
            .iter()
            .chain(&self.branded)
            .flat_map(|food| &food.full_nutrients)
            .find(|nutrient| nutrient.attr_id == KCAL_ATTR_ID)
            .map(|nutrient| nutrient.value as i32)
    }
}

/// Calorie lookup backed by the Nutritionix API
#[derive(Debug, Clone)]
pub struct NutritionixLookup {
    client: Client,
    base_url: String,
    app_id: String,
    app_key: String,
}

impl NutritionixLookup {
    pub fn new(
        base_url: impl Into<String>,
        app_id: impl Into<String>,
        app_key: impl Into<String>,
        timeout: Duration,
    ) -> RepoResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::InternalError(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            app_id: app_id.into(),
            app_key: app_key.into(),
        })
    }

    /// Build the lookup described by `config`
    ///
    /// Without credentials every lookup misses, so meals without explicit
    /// calories are stored with 0.
    pub fn from_config(config: &NutritionixConfig) -> RepoResult<Arc<dyn CalorieLookup>> {
        match config.credentials() {
            Some((app_id, app_key)) => {
                info!(base_url = %config.base_url, "Nutritionix calorie lookup enabled");
                let lookup = Self::new(
                    &config.base_url,
                    app_id,
                    app_key,
                    Duration::from_secs(config.timeout_secs),
                )?;
                Ok(Arc::new(lookup))
            }
            None => {
                info!("Nutritionix credentials not set, calorie lookup disabled");
                Ok(Arc::new(DisabledLookup))
            }
        }
    }
}

#[async_trait]
impl CalorieLookup for NutritionixLookup {
    #[instrument(skip(self))]
    async fn lookup(&self, meal_name: &str) -> RepoResult<i32> {
        let url = format!("{}/v2/search/instant", self.base_url);
        let lookup_error = |e: reqwest::Error| DomainError::InternalError(format!("calorie lookup: {e}"));

        let response = self
            .client
            .get(&url)
            .query(&[("query", meal_name), ("self", "false"), ("detailed", "true")])
            .header("x-app-id", &self.app_id)
            .header("x-app-key", &self.app_key)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(lookup_error)?;

        let body: SearchResponse = response.json().await.map_err(lookup_error)?;
        let calories = body.calories().ok_or(DomainError::MealCaloriesNotFound)?;

        debug!(calories, "Calories found");
        Ok(calories)
    }
}
