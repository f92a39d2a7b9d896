//! Database layer
//!
//! Persistence for Architekt on SQLite (default, single-file deployment)
//! or MySQL. The driver is selected from configuration and hidden behind
//! the `DatabasePool` trait; repositories pick the dialect per call.
//!
//! # Usage
//!
//! ```ignore
//! use architekt::config::DatabaseConfig;
//! use architekt::db::{create_pool, migrations};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! migrations::run_migrations(&pool).await?;
//! pool.ping().await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};
