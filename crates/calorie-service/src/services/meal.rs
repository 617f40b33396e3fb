//! Meal service
//!
//! Authorizes the execution context, resolves missing calories through the
//! lookup client and hands writes to the meal ledger.

use calorie_core::entities::{Meal, MealPatch};
use calorie_core::value_objects::{FilterExpr, Page, PageRequest, MEAL_FILTER_FIELDS};
use calorie_core::{authorize, Action, ExecutionContext};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::dto::{CreateMealRequest, MealResponse, UpdateMealRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Meal service
pub struct MealService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MealService<'a> {
    /// Create a new MealService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Calories for a meal name; lookup failures degrade to zero
    async fn resolve_calories(&self, name: &str) -> i32 {
        match self.ctx.calorie_lookup().lookup(name).await {
            Ok(calories) => calories,
            Err(e) => {
                warn!(meal = %name, error = %e, "Calorie lookup failed, storing 0");
                0
            }
        }
    }

    #[instrument(skip(self, filter), fields(user_id = %ctx.target_user_id()))]
    pub async fn list(
        &self,
        ctx: ExecutionContext,
        page: PageRequest,
        filter: Option<&str>,
    ) -> ServiceResult<Page<MealResponse>> {
        authorize(&ctx, Action::ReadLedger)?;
        let filter = match filter {
            Some(raw) => FilterExpr::parse(raw, MEAL_FILTER_FIELDS)?,
            None => None,
        };

        let meals = self
            .ctx
            .meal_ledger()
            .list(ctx.target_user_id(), page, filter.as_ref())
            .await?;
        Ok(meals.map(MealResponse::from))
    }

    #[instrument(skip(self, request), fields(user_id = %ctx.target_user_id()))]
    pub async fn create(
        &self,
        ctx: ExecutionContext,
        request: CreateMealRequest,
    ) -> ServiceResult<MealResponse> {
        authorize(&ctx, Action::WriteLedger)?;

        let calories = match request.calories {
            Some(calories) => calories,
            None => self.resolve_calories(&request.name).await,
        };
        let meal = Meal::new(
            ctx.target_user_id(),
            request.date,
            request.time,
            request.name,
            calories,
        );

        let entry = self.ctx.meal_ledger().create(meal).await?;
        Ok(MealResponse::from(entry))
    }

    #[instrument(skip(self), fields(user_id = %ctx.target_user_id()))]
    pub async fn get(&self, ctx: ExecutionContext, meal_id: Uuid) -> ServiceResult<MealResponse> {
        authorize(&ctx, Action::ReadLedger)?;
        let entry = self
            .ctx
            .meal_ledger()
            .read(ctx.target_user_id(), meal_id)
            .await?;
        Ok(MealResponse::from(entry))
    }

    /// Merge the supplied fields into the stored meal and write it back
    #[instrument(skip(self, request), fields(user_id = %ctx.target_user_id()))]
    pub async fn update(
        &self,
        ctx: ExecutionContext,
        meal_id: Uuid,
        request: UpdateMealRequest,
    ) -> ServiceResult<MealResponse> {
        authorize(&ctx, Action::WriteLedger)?;
        let ledger = self.ctx.meal_ledger();

        let mut meal = ledger.read(ctx.target_user_id(), meal_id).await?.meal;
        meal.apply(MealPatch::from(request));

        let entry = ledger.update(meal).await?;
        Ok(MealResponse::from(entry))
    }

    #[instrument(skip(self), fields(user_id = %ctx.target_user_id()))]
    pub async fn delete(&self, ctx: ExecutionContext, meal_id: Uuid) -> ServiceResult<()> {
        authorize(&ctx, Action::WriteLedger)?;
        self.ctx
            .meal_ledger()
            .delete(ctx.target_user_id(), meal_id)
            .await?;
        Ok(())
    }
}
