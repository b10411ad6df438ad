//! Database connection management using Diesel ORM.

pub mod model;
pub mod schema;

use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::error::{Result, StoreError};

/// Embedded database migrations compiled from the migrations/ directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Type alias for a SQLite connection pool.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Type alias for a connection checked out of the pool.
pub type DbConn = diesel::r2d2::PooledConnection<ConnectionManager<SqliteConnection>>;

/// Create a connection pool for the given database URL.
///
/// In-memory databases get a single-connection pool: every SQLite `:memory:`
/// connection opens its own private database, so a wider pool would hand out
/// empty databases to all but one caller.
///
/// # Errors
/// Returns an error if the pool cannot be created.
pub fn create_pool(database_url: &str) -> Result<DbPool> {
    let max_size = if database_url.contains(":memory:") { 1 } else { 5 };
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| StoreError::Connection(e.to_string()).into())
}

/// Run all pending database migrations.
///
/// # Errors
/// Returns an error if migrations fail.
pub fn run_migrations(pool: &DbPool) -> Result<()> {
    let mut conn = pool
        .get()
        .map_err(|e| StoreError::Connection(e.to_string()))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| StoreError::Database(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_pool_with_memory_db() {
        let pool = create_pool(":memory:");
        assert!(pool.is_ok());
    }

    #[test]
    fn memory_pool_is_single_connection() {
        let pool = create_pool(":memory:").unwrap();
        assert_eq!(pool.max_size(), 1);
    }

    #[test]
    fn run_migrations_creates_tables() {
        let pool = create_pool(":memory:").unwrap();
        run_migrations(&pool).unwrap();
        // Running again is a no-op rather than an error.
        run_migrations(&pool).unwrap();
    }
}
