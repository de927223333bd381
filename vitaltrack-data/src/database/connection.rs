//! Database connection module for the VitalTrack application
//!
//! SQLite is the only supported backend. The pool is created once at
//! startup and shared through a process-wide `OnceCell`; callers that
//! cannot obtain a pool fall back to in-memory storage at the
//! repository level.

use std::env;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{error, info, warn};

use super::DatabaseError;

/// Global database pool used throughout the application
static DB_POOL: OnceCell<DatabasePool> = OnceCell::new();

/// Shared SQLite connection pool
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: Arc<r2d2::Pool<r2d2_sqlite::SqliteConnectionManager>>,
}

impl DatabasePool {
    /// Check out a connection from the pool
    pub fn get(
        &self,
    ) -> Result<r2d2::PooledConnection<r2d2_sqlite::SqliteConnectionManager>, DatabaseError> {
        self.pool
            .get()
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))
    }

    /// Pool statistics for health reporting
    pub fn state(&self) -> r2d2::State {
        self.pool.state()
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub sqlite_path: String,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sqlite_path: "./data/vitaltrack.db".to_string(),
            max_connections: 10,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration from environment variables
    pub fn from_env() -> Self {
        let sqlite_path = env::var("DB_SQLITE_PATH")
            .unwrap_or_else(|_| "./data/vitaltrack.db".to_string());

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(10);

        let timeout_seconds = env::var("DB_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        info!(
            "Database configuration: path={}, max_connections={}, timeout={}s",
            sqlite_path, max_connections, timeout_seconds
        );

        Self {
            sqlite_path,
            max_connections,
            timeout_seconds,
        }
    }
}

/// Initialize the global database connection pool
pub fn initialize_database_pool() -> Result<(), DatabaseError> {
    if DB_POOL.get().is_some() {
        return Err(DatabaseError::ConfigError(
            "Database pool is already initialized".to_string(),
        ));
    }

    let config = DatabaseConfig::from_env();
    let pool = initialize_sqlite_pool(&config)?;

    DB_POOL
        .set(pool)
        .map_err(|_| DatabaseError::ConfigError("Database pool is already initialized".to_string()))?;

    run_migrations()
}

/// Get the database connection pool
pub fn get_db_pool() -> Result<DatabasePool, DatabaseError> {
    DB_POOL
        .get()
        .cloned()
        .ok_or_else(|| DatabaseError::ConnectionError("Database pool is not initialized".to_string()))
}

/// Initialize the SQLite connection pool
fn initialize_sqlite_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    use rusqlite::OpenFlags;
    use std::fs;
    use std::path::Path;

    info!("Initializing SQLite database at: {}", config.sqlite_path);

    // Create parent directory if it doesn't exist
    if let Some(parent) = Path::new(&config.sqlite_path).parent() {
        if !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!(
                    "Failed to create directory {:?}: {}, falling back to in-memory database",
                    parent, e
                );
                return initialize_in_memory_sqlite_pool(config);
            }
        }
    }

    let manager = r2d2_sqlite::SqliteConnectionManager::file(&config.sqlite_path)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE);

    match r2d2::Pool::builder()
        .max_size(config.max_connections)
        .connection_timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .build(manager)
    {
        Ok(pool) => match pool.get() {
            Ok(_) => {
                info!("SQLite connection pool created successfully");
                Ok(DatabasePool { pool: Arc::new(pool) })
            }
            Err(e) => {
                error!("Failed to connect to SQLite database: {}", e);
                warn!("Falling back to in-memory SQLite database");
                initialize_in_memory_sqlite_pool(config)
            }
        },
        Err(e) => {
            error!("Failed to create SQLite connection pool: {}", e);
            warn!("Falling back to in-memory SQLite database");
            initialize_in_memory_sqlite_pool(config)
        }
    }
}

/// Initialize an in-memory SQLite database as fallback
fn initialize_in_memory_sqlite_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    info!("Initializing in-memory SQLite database");

    let manager = r2d2_sqlite::SqliteConnectionManager::memory();

    let pool = r2d2::Pool::builder()
        .max_size(config.max_connections)
        .connection_timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .build(manager)
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

    Ok(DatabasePool { pool: Arc::new(pool) })
}

/// Run database migrations
fn run_migrations() -> Result<(), DatabaseError> {
    let pool = get_db_pool()?;

    info!("Running database migrations");

    let conn = pool.get()?;
    run_sqlite_migrations(&conn)?;

    info!("Database migrations completed successfully");

    Ok(())
}

/// Run SQLite migrations
fn run_sqlite_migrations(conn: &rusqlite::Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS persons (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            age INTEGER NOT NULL,
            gender TEXT NOT NULL,
            description TEXT
        );
        CREATE TABLE IF NOT EXISTS health_entries (
            id TEXT PRIMARY KEY,
            person_id TEXT NOT NULL REFERENCES persons (id),
            systolic INTEGER NOT NULL,
            diastolic INTEGER NOT NULL,
            heart_rate INTEGER NOT NULL,
            tags TEXT,
            timestamp TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_health_entries_timestamp
        ON health_entries (timestamp DESC);
        CREATE INDEX IF NOT EXISTS idx_health_entries_person
        ON health_entries (person_id);",
    )
    .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;

    Ok(())
}

/// Get information about the current database connection
pub fn get_connection_info() -> Option<String> {
    let pool = DB_POOL.get()?;

    match pool.get() {
        Ok(conn) => {
            let location = match conn.query_row("PRAGMA database_list", [], |row| {
                row.get::<_, String>(2)
            }) {
                Ok(path) if path.is_empty() || path == ":memory:" => {
                    "SQLite in-memory database".to_string()
                }
                Ok(path) => format!("SQLite database at {}", path),
                Err(_) => "SQLite database (path unknown)".to_string(),
            };

            let state = pool.state();
            Some(format!(
                "{} (connections: active={}, idle={})",
                location, state.connections, state.idle_connections
            ))
        }
        Err(e) => {
            error!("Failed to get SQLite connection: {}", e);
            Some(format!("SQLite connection error: {}", e))
        }
    }
}

/// Build an isolated, migrated in-memory pool that is never registered
/// in the global `DB_POOL`.
#[cfg(test)]
pub fn new_isolated_pool() -> DatabasePool {
    let config = DatabaseConfig::default();
    let pool = initialize_in_memory_sqlite_pool(&config).expect("in-memory pool");
    let conn = pool.get().expect("connection");
    run_sqlite_migrations(&conn).expect("migrations");
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.sqlite_path, "./data/vitaltrack.db");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_in_memory_pool_runs_migrations() {
        let config = DatabaseConfig::default();
        let pool = initialize_in_memory_sqlite_pool(&config).unwrap();
        let conn = pool.get().unwrap();
        run_sqlite_migrations(&conn).unwrap();

        // Both tables must exist after migration
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master
                 WHERE type = 'table' AND name IN ('persons', 'health_entries')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 2);
    }
}
