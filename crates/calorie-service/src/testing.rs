//! In-memory store for unit tests
//!
//! Transactions are fully serialized: `begin` takes a gate that is held
//! until commit or rollback, and writes go to a private copy of the state
//! that replaces the shared one on commit.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

use calorie_common::JwtService;
use calorie_core::entities::{DailySummary, Meal, MealEntry, NewUser, Settings, User};
use calorie_core::error::DomainError;
use calorie_core::traits::{
    CalorieLookup, LedgerTransaction, LockMode, MealRepository, RepoResult, SettingsRepository,
    UnitOfWork, UserRepository,
};
use calorie_core::value_objects::{FilterExpr, FilterValue, Page, PageRequest};

use crate::services::{ServiceContext, ServiceContextBuilder};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[derive(Debug, Clone, Default)]
struct State {
    users: HashMap<Uuid, (User, String)>,
    meals: HashMap<Uuid, Meal>,
    settings: HashMap<Uuid, Settings>,
    summaries: BTreeMap<(Uuid, NaiveDate), DailySummary>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
    gate: Arc<AsyncMutex<()>>,
    day_locks: Arc<Mutex<Vec<(Uuid, NaiveDate)>>>,
    fail_summary_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn seed_user(&self, user: &User, password_hash: &str) {
        self.state()
            .users
            .insert(user.id, (user.clone(), password_hash.to_string()));
    }

    pub fn seed_meal(&self, meal: Meal) {
        self.state().meals.insert(meal.id, meal);
    }

    pub fn seed_settings(&self, settings: Settings) {
        self.state().settings.insert(settings.user_id, settings);
    }

    pub fn seed_summary(&self, summary: DailySummary) {
        self.state()
            .summaries
            .insert((summary.user_id, summary.date), summary);
    }

    pub fn meal(&self, id: Uuid) -> Option<Meal> {
        self.state().meals.get(&id).cloned()
    }

    pub fn summary(&self, user_id: Uuid, date: NaiveDate) -> Option<DailySummary> {
        self.state().summaries.get(&(user_id, date)).copied()
    }

    pub fn settings(&self, user_id: Uuid) -> Option<Settings> {
        self.state().settings.get(&user_id).copied()
    }

    pub fn user(&self, id: Uuid) -> Option<User> {
        self.state().users.get(&id).map(|(user, _)| user.clone())
    }

    /// Day locks taken so far, in acquisition order
    pub fn day_locks(&self) -> Vec<(Uuid, NaiveDate)> {
        self.day_locks.lock().unwrap().clone()
    }

    /// Make every summary upsert fail from now on
    pub fn fail_summary_writes(&self) {
        self.fail_summary_writes.store(true, Ordering::SeqCst);
    }

    /// Assert the summary invariant for every stored day
    pub fn assert_consistent(&self, user_id: Uuid) {
        let state = self.state();
        let target = state
            .settings
            .get(&user_id)
            .map_or(0, |s| s.expected_daily_calories);
        for ((owner, day), summary) in &state.summaries {
            if *owner != user_id {
                continue;
            }
            let total: i64 = state
                .meals
                .values()
                .filter(|m| m.user_id == user_id && m.date == *day)
                .map(|m| i64::from(m.calories))
                .sum();
            assert_eq!(summary.total_calories, total, "total for {day}");
            assert_eq!(
                summary.calories_deficit,
                total < i64::from(target),
                "flag for {day}"
            );
        }
    }

    /// Service context wired to this store
    pub fn context(&self, lookup: Arc<dyn CalorieLookup>) -> ServiceContext {
        ServiceContextBuilder::new()
            .user_repo(Arc::new(self.clone()))
            .meal_repo(Arc::new(self.clone()))
            .settings_repo(Arc::new(self.clone()))
            .unit_of_work(Arc::new(self.clone()))
            .calorie_lookup(lookup)
            .jwt_service(Arc::new(JwtService::new("test-secret-key", 3600)))
            .build()
            .unwrap()
    }

    fn entry(state: &State, meal: &Meal) -> MealEntry {
        let deficit = state
            .summaries
            .get(&(meal.user_id, meal.date))
            .is_some_and(|s| s.calories_deficit);
        MealEntry::new(meal.clone(), deficit)
    }
}

fn paginate<T>(mut items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as i64;
    let start = (page.offset() as usize).min(items.len());
    let end = (start + page.limit() as usize).min(items.len());
    let items = items.drain(start..end).collect();
    Page::new(items, total)
}

fn meal_field(meal: &Meal, name: &str) -> Option<FilterValue> {
    match name {
        "date" => Some(FilterValue::Date(meal.date)),
        "time" => Some(FilterValue::Time(meal.time)),
        "name" => Some(FilterValue::Text(meal.name.clone())),
        "calories" => Some(FilterValue::Integer(i64::from(meal.calories))),
        _ => None,
    }
}

fn user_field(user: &User, name: &str) -> Option<FilterValue> {
    match name {
        "username" => Some(FilterValue::Text(user.username.clone())),
        "role_id" => Some(FilterValue::Integer(i64::from(user.role.id()))),
        _ => None,
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, account_id: Uuid, id: Uuid) -> RepoResult<Option<User>> {
        Ok(self
            .state()
            .users
            .get(&id)
            .filter(|(user, _)| user.account_id == account_id)
            .map(|(user, _)| user.clone()))
    }

    async fn find_owner_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        Ok(self
            .state()
            .users
            .values()
            .find(|(user, _)| user.is_owner() && user.username == username)
            .map(|(user, _)| user.clone()))
    }

    async fn find_credentials(
        &self,
        account_id: Uuid,
        username: &str,
    ) -> RepoResult<Option<(User, String)>> {
        Ok(self
            .state()
            .users
            .values()
            .find(|(user, _)| user.account_id == account_id && user.username == username)
            .cloned())
    }

    async fn list(
        &self,
        account_id: Uuid,
        page: PageRequest,
        filter: Option<&FilterExpr>,
    ) -> RepoResult<Page<User>> {
        let mut users: Vec<User> = self
            .state()
            .users
            .values()
            .map(|(user, _)| user.clone())
            .filter(|user| user.account_id == account_id)
            .filter(|user| filter.map_or(true, |f| f.matches(&|name| user_field(user, name))))
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username).then(a.id.cmp(&b.id)));
        Ok(paginate(users, page))
    }

    async fn create(&self, new_user: &NewUser) -> RepoResult<()> {
        let mut state = self.state();
        let user = &new_user.user;
        let clash = state.users.values().any(|(existing, _)| {
            (existing.account_id == user.account_id && existing.username == user.username)
                || (user.is_owner() && existing.is_owner() && existing.username == user.username)
        });
        if clash {
            return Err(if user.is_owner() {
                DomainError::AccountAlreadyExists
            } else {
                DomainError::UserAlreadyExists
            });
        }
        state
            .users
            .insert(user.id, (user.clone(), new_user.password_hash.clone()));
        Ok(())
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        let mut state = self.state();
        let clash = state.users.values().any(|(existing, _)| {
            existing.id != user.id
                && existing.account_id == user.account_id
                && existing.username == user.username
        });
        if clash {
            return Err(DomainError::UserAlreadyExists);
        }
        match state.users.get_mut(&user.id) {
            Some((stored, _)) if stored.account_id == user.account_id => {
                *stored = user.clone();
                Ok(())
            }
            _ => Err(DomainError::UserNotFound(user.id)),
        }
    }

    async fn delete(&self, account_id: Uuid, id: Uuid) -> RepoResult<()> {
        let mut state = self.state();
        match state.users.get(&id) {
            Some((user, _)) if user.account_id == account_id => {
                state.users.remove(&id);
                Ok(())
            }
            _ => Err(DomainError::UserNotFound(id)),
        }
    }
}

#[async_trait]
impl MealRepository for MemoryStore {
    async fn find(&self, user_id: Uuid, meal_id: Uuid) -> RepoResult<Option<MealEntry>> {
        let state = self.state();
        Ok(state
            .meals
            .get(&meal_id)
            .filter(|meal| meal.user_id == user_id)
            .map(|meal| Self::entry(&state, meal)))
    }

    async fn list(
        &self,
        user_id: Uuid,
        page: PageRequest,
        filter: Option<&FilterExpr>,
    ) -> RepoResult<Page<MealEntry>> {
        let state = self.state();
        let mut meals: Vec<&Meal> = state
            .meals
            .values()
            .filter(|meal| meal.user_id == user_id)
            .filter(|meal| filter.map_or(true, |f| f.matches(&|name| meal_field(meal, name))))
            .collect();
        meals.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then(b.time.cmp(&a.time))
                .then(a.id.cmp(&b.id))
        });
        let entries = meals
            .into_iter()
            .map(|meal| Self::entry(&state, meal))
            .collect();
        Ok(paginate(entries, page))
    }
}

#[async_trait]
impl SettingsRepository for MemoryStore {
    async fn find(&self, user_id: Uuid) -> RepoResult<Option<Settings>> {
        Ok(self.settings(user_id))
    }
}

#[async_trait]
impl UnitOfWork for MemoryStore {
    async fn begin(&self) -> RepoResult<Box<dyn LedgerTransaction>> {
        let guard = Arc::clone(&self.gate).lock_owned().await;
        let working = self.state().clone();
        Ok(Box::new(MemoryTransaction {
            working,
            store: self.clone(),
            _guard: guard,
        }))
    }

    async fn health_check(&self) -> RepoResult<()> {
        Ok(())
    }
}

struct MemoryTransaction {
    working: State,
    store: MemoryStore,
    _guard: OwnedMutexGuard<()>,
}

#[async_trait]
impl LedgerTransaction for MemoryTransaction {
    async fn lock_user(&mut self, _user_id: Uuid, _mode: LockMode) -> RepoResult<()> {
        Ok(())
    }

    async fn lock_day(&mut self, user_id: Uuid, date: NaiveDate) -> RepoResult<()> {
        self.store.day_locks.lock().unwrap().push((user_id, date));
        Ok(())
    }

    async fn insert_meal(&mut self, meal: &Meal) -> RepoResult<()> {
        self.working.meals.insert(meal.id, meal.clone());
        Ok(())
    }

    async fn find_meal(&mut self, user_id: Uuid, meal_id: Uuid) -> RepoResult<Option<Meal>> {
        Ok(self
            .working
            .meals
            .get(&meal_id)
            .filter(|meal| meal.user_id == user_id)
            .cloned())
    }

    async fn update_meal(&mut self, meal: &Meal) -> RepoResult<bool> {
        match self.working.meals.get_mut(&meal.id) {
            Some(stored) if stored.user_id == meal.user_id => {
                *stored = meal.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_meal(&mut self, user_id: Uuid, meal_id: Uuid) -> RepoResult<Option<Meal>> {
        let owned = self
            .working
            .meals
            .get(&meal_id)
            .is_some_and(|meal| meal.user_id == user_id);
        Ok(if owned {
            self.working.meals.remove(&meal_id)
        } else {
            None
        })
    }

    async fn sum_calories(&mut self, user_id: Uuid, date: NaiveDate) -> RepoResult<i64> {
        Ok(self
            .working
            .meals
            .values()
            .filter(|meal| meal.user_id == user_id && meal.date == date)
            .map(|meal| i64::from(meal.calories))
            .sum())
    }

    async fn daily_target(&mut self, user_id: Uuid) -> RepoResult<Option<i32>> {
        Ok(self
            .working
            .settings
            .get(&user_id)
            .map(|s| s.expected_daily_calories))
    }

    async fn upsert_summary(&mut self, summary: &DailySummary) -> RepoResult<()> {
        if self.store.fail_summary_writes.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("summary write failed".to_string()));
        }
        self.working
            .summaries
            .insert((summary.user_id, summary.date), *summary);
        Ok(())
    }

    async fn upsert_settings(&mut self, settings: &Settings) -> RepoResult<()> {
        self.working.settings.insert(settings.user_id, *settings);
        Ok(())
    }

    async fn refresh_deficit_flags(&mut self, user_id: Uuid, target: i32) -> RepoResult<u64> {
        let mut refreshed = 0;
        for summary in self
            .working
            .summaries
            .values_mut()
            .filter(|s| s.user_id == user_id)
        {
            summary.calories_deficit = summary.total_calories < i64::from(target);
            refreshed += 1;
        }
        Ok(refreshed)
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        let Self { working, store, .. } = *self;
        let mut state = store.state();
        state.meals = working.meals;
        state.settings = working.settings;
        state.summaries = working.summaries;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> RepoResult<()> {
        Ok(())
    }
}

/// Lookup returning a fixed answer
pub struct FixedLookup(pub RepoResult<i32>);

#[async_trait]
impl CalorieLookup for FixedLookup {
    async fn lookup(&self, _meal_name: &str) -> RepoResult<i32> {
        match &self.0 {
            Ok(calories) => Ok(*calories),
            Err(_) => Err(DomainError::MealCaloriesNotFound),
        }
    }
}
