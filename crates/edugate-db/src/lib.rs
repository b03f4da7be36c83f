//! # EduGate DB
//!
//! Persistence for the EduGate API.
//!
//! - [`store`]: Store traits and [`StoreError`]
//! - [`postgres`]: PostgreSQL implementation (sqlx)
//! - [`memory`]: In-memory implementation with the same semantics, used by
//!   tests and local tooling
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use edugate_db::{Database, PgStore, init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&config.database).await?;
//! run_migrations(&pool).await?;
//! let db: Arc<dyn Database> = Arc::new(PgStore::new(pool));
//! ```

pub mod memory;
pub mod postgres;
pub mod store;

use std::time::Duration;

use edugate_config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use sqlx::PgPool;
pub use store::{CourseStore, Database, EnrollmentStore, OtpStore, StoreError, UserStore};

/// Connects a PostgreSQL pool. Called once at startup; the pool is cheap to
/// clone and is shared through [`PgStore`].
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        "database pool initialized"
    );
    Ok(pool)
}

/// Applies the migrations under `migrations/` at the workspace root.
pub async fn run_migrations(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    tracing::info!("database migrations applied");
    Ok(())
}
