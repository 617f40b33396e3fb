//! # calorie-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for the repository and
//! unit-of-work traits defined in `calorie-core`. It handles:
//!
//! - Connection pool management and migrations
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers
//! - Repository implementations and filter → SQL rendering
//! - Transactions with advisory user/day locks for summary recomputation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use calorie_db::pool::{create_pool, run_migrations, PoolConfig};
//! use calorie_db::repositories::PgUnitOfWork;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PoolConfig::new("postgres://localhost/calories");
//!     let pool = create_pool(&config).await?;
//!     run_migrations(&pool).await?;
//!     let uow = PgUnitOfWork::new(pool);
//!
//!     // Start transactions...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, PgPool, PoolConfig};
pub use repositories::{
    PgLedgerTransaction, PgMealRepository, PgSettingsRepository, PgUnitOfWork,
    PgUserRepository,
};
