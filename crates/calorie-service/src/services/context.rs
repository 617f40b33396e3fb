//! Service context - dependency container for services
//!
//! Holds all repositories, the unit of work and other dependencies needed by services.

use std::sync::Arc;

use calorie_common::auth::JwtService;
use calorie_core::traits::{
    CalorieLookup, MealRepository, SettingsRepository, UnitOfWork, UserRepository,
};

use crate::engine::{MealLedger, SettingsStore};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Read-side repositories
/// - The unit of work behind every ledger write
/// - The calorie lookup client
/// - JWT service for authentication
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    meal_repo: Arc<dyn MealRepository>,
    settings_repo: Arc<dyn SettingsRepository>,

    // Transactions
    unit_of_work: Arc<dyn UnitOfWork>,

    // Collaborators
    calorie_lookup: Arc<dyn CalorieLookup>,
    jwt_service: Arc<JwtService>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        meal_repo: Arc<dyn MealRepository>,
        settings_repo: Arc<dyn SettingsRepository>,
        unit_of_work: Arc<dyn UnitOfWork>,
        calorie_lookup: Arc<dyn CalorieLookup>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            user_repo,
            meal_repo,
            settings_repo,
            unit_of_work,
            calorie_lookup,
            jwt_service,
        }
    }

    // === Repositories ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the meal repository
    pub fn meal_repo(&self) -> &dyn MealRepository {
        self.meal_repo.as_ref()
    }

    /// Get the settings repository
    pub fn settings_repo(&self) -> &dyn SettingsRepository {
        self.settings_repo.as_ref()
    }

    // === Engine ===

    pub fn unit_of_work(&self) -> &dyn UnitOfWork {
        self.unit_of_work.as_ref()
    }

    /// Meal ledger over this context's unit of work
    pub fn meal_ledger(&self) -> MealLedger<'_> {
        MealLedger::new(self.unit_of_work(), self.meal_repo())
    }

    /// Settings store over this context's unit of work
    pub fn settings_store(&self) -> SettingsStore<'_> {
        SettingsStore::new(self.unit_of_work(), self.settings_repo())
    }

    // === Services ===

    /// Get the calorie lookup client
    pub fn calorie_lookup(&self) -> &dyn CalorieLookup {
        self.calorie_lookup.as_ref()
    }

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("unit_of_work", &"UnitOfWork")
            .field("calorie_lookup", &"CalorieLookup")
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    meal_repo: Option<Arc<dyn MealRepository>>,
    settings_repo: Option<Arc<dyn SettingsRepository>>,
    unit_of_work: Option<Arc<dyn UnitOfWork>>,
    calorie_lookup: Option<Arc<dyn CalorieLookup>>,
    jwt_service: Option<Arc<JwtService>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn meal_repo(mut self, repo: Arc<dyn MealRepository>) -> Self {
        self.meal_repo = Some(repo);
        self
    }

    pub fn settings_repo(mut self, repo: Arc<dyn SettingsRepository>) -> Self {
        self.settings_repo = Some(repo);
        self
    }

    pub fn unit_of_work(mut self, uow: Arc<dyn UnitOfWork>) -> Self {
        self.unit_of_work = Some(uow);
        self
    }

    pub fn calorie_lookup(mut self, lookup: Arc<dyn CalorieLookup>) -> Self {
        self.calorie_lookup = Some(lookup);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::MissingDependency` naming the first unset field
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.user_repo.ok_or(ServiceError::MissingDependency("user_repo"))?,
            self.meal_repo.ok_or(ServiceError::MissingDependency("meal_repo"))?,
            self.settings_repo.ok_or(ServiceError::MissingDependency("settings_repo"))?,
            self.unit_of_work.ok_or(ServiceError::MissingDependency("unit_of_work"))?,
            self.calorie_lookup.ok_or(ServiceError::MissingDependency("calorie_lookup"))?,
            self.jwt_service.ok_or(ServiceError::MissingDependency("jwt_service"))?,
        ))
    }
}
