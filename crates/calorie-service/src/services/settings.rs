//! Settings service

use calorie_core::{authorize, Action, ExecutionContext};
use tracing::instrument;

use crate::dto::{SettingsResponse, UpdateSettingsRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Settings service
pub struct SettingsService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SettingsService<'a> {
    /// Create a new SettingsService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self), fields(user_id = %ctx.target_user_id()))]
    pub async fn get(&self, ctx: ExecutionContext) -> ServiceResult<SettingsResponse> {
        authorize(&ctx, Action::ReadLedger)?;
        let settings = self
            .ctx
            .settings_store()
            .get(ctx.target_user_id())
            .await?;
        Ok(SettingsResponse::from(settings))
    }

    #[instrument(skip(self, request), fields(user_id = %ctx.target_user_id()))]
    pub async fn update(
        &self,
        ctx: ExecutionContext,
        request: UpdateSettingsRequest,
    ) -> ServiceResult<SettingsResponse> {
        authorize(&ctx, Action::WriteLedger)?;
        let target = request
            .expected_daily_calories
            .ok_or_else(|| ServiceError::validation("expected_daily_calories is required"))?;

        let settings = self
            .ctx
            .settings_store()
            .update(ctx.target_user_id(), target)
            .await?;
        Ok(SettingsResponse::from(settings))
    }
}
