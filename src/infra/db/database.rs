//! SQLite store setup and connection management for mechdb.
//! Handles store creation, schema validation, and connection handling.

use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::domain::{Result, StoreError};
use crate::infra::db::repository::{CategoryRepository, MaterialRepository};

/// Schema marker stamped into `PRAGMA user_version` at creation time.
const SCHEMA_VERSION: i32 = 1;

/// Base tables and views a valid store must contain.
const EXPECTED_OBJECTS: [&str; 5] = [
    "categories",
    "materials",
    "mechanical_properties",
    "properties",
    "category_summaries",
];

/// Store handle wrapping the SQLite connection.
///
/// One handle performs one operation at a time; the connection is shared
/// with the repositories through an `Arc<Mutex<_>>`. The file is
/// released when the handle (and every repository cloned from it) is
/// dropped, or explicitly via [`Database::close`].
#[derive(Debug)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Create a fresh store at `path` with the full schema.
    ///
    /// Fails with [`StoreError::AlreadyExists`] if a file is already
    /// present, unless `overwrite` is set, in which case the old file is
    /// replaced.
    pub fn initialize(path: &Path, overwrite: bool) -> Result<Self> {
        if path.exists() {
            if !overwrite {
                return Err(StoreError::AlreadyExists);
            }
            std::fs::remove_file(path)?;
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::configure(&conn)?;
        Self::create_schema(&conn)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        log::debug!("created store at {}", path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an existing store at `path`.
    ///
    /// Fails with [`StoreError::NotFound`] if there is no file there,
    /// and with [`StoreError::CorruptSchema`] if the file is not a store
    /// with the expected tables and views.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(StoreError::NotFound);
        }

        // No SQLITE_OPEN_CREATE: opening must never create the file.
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Self::configure(&conn).map_err(Self::corrupt_if_not_database)?;
        Self::verify_schema(&conn).map_err(Self::corrupt_if_not_database)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory store with the full schema (useful for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure(&conn)?;
        Self::create_schema(&conn)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Explicitly close the underlying connection.
    ///
    /// Dropping the handle closes it as well; this form surfaces any
    /// error SQLite reports while releasing the file. If repositories
    /// cloned from this handle are still alive, the connection stays
    /// open until they are dropped.
    pub fn close(self) -> Result<()> {
        if let Ok(mutex) = Arc::try_unwrap(self.conn)
            && let Ok(conn) = mutex.into_inner()
        {
            conn.close().map_err(|(_, err)| StoreError::from(err))?;
        }
        Ok(())
    }

    /// Get a reference to the connection.
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        self.conn.clone()
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.connection())
    }

    pub fn materials(&self) -> MaterialRepository {
        MaterialRepository::new(self.connection())
    }

    /// Resolve the store path from an explicit flag or the
    /// `MECHDB_STORE` environment variable.
    pub fn resolve_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
        explicit.or_else(|| std::env::var_os("MECHDB_STORE").map(PathBuf::from))
    }

    fn configure(conn: &Connection) -> Result<()> {
        // Referential integrity is off by default in SQLite; every
        // connection must opt in. busy_timeout stays 0 so lock
        // contention surfaces as Busy instead of blocking.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(())
    }

    fn create_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE categories (
                category_id INTEGER PRIMARY KEY,
                name TEXT NOT NULL COLLATE NOCASE UNIQUE
            );

            CREATE TABLE materials (
                name TEXT NOT NULL COLLATE NOCASE PRIMARY KEY,
                category TEXT NOT NULL COLLATE NOCASE,
                FOREIGN KEY (category) REFERENCES categories(name)
                    ON UPDATE CASCADE ON DELETE CASCADE
            );

            CREATE TABLE mechanical_properties (
                material TEXT NOT NULL COLLATE NOCASE PRIMARY KEY,
                density REAL,
                modulus_of_elasticity REAL,
                modulus_of_rigidity REAL,
                yield_strength REAL,
                ultimate_tensile_strength REAL,
                percent_elongation REAL,
                FOREIGN KEY (material) REFERENCES materials(name)
                    ON UPDATE CASCADE ON DELETE CASCADE
            );

            CREATE VIEW properties AS
            SELECT
                materials.name AS material,
                materials.category,
                density,
                modulus_of_elasticity,
                modulus_of_rigidity,
                yield_strength,
                ultimate_tensile_strength,
                percent_elongation
            FROM materials
            LEFT JOIN mechanical_properties
                ON mechanical_properties.material = materials.name;

            CREATE VIEW category_summaries AS
            SELECT
                categories.name AS category,
                COUNT(materials.name) AS materials,
                AVG(density) AS density,
                AVG(modulus_of_elasticity) AS modulus_of_elasticity,
                AVG(modulus_of_rigidity) AS modulus_of_rigidity,
                AVG(yield_strength) AS yield_strength,
                AVG(ultimate_tensile_strength) AS ultimate_tensile_strength,
                AVG(percent_elongation) AS percent_elongation
            FROM categories
            LEFT JOIN materials ON materials.category = categories.name
            LEFT JOIN mechanical_properties
                ON mechanical_properties.material = materials.name
            GROUP BY categories.category_id
            ORDER BY categories.category_id;
            "#,
        )?;
        Ok(())
    }

    /// Check that the file carries the expected tables and views.
    fn verify_schema(conn: &Connection) -> Result<()> {
        for name in EXPECTED_OBJECTS {
            let found: i64 = conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1",
                [name],
                |row| row.get(0),
            )?;
            if found == 0 {
                return Err(StoreError::CorruptSchema(format!("missing '{name}'")));
            }
        }
        Ok(())
    }

    fn corrupt_if_not_database(err: StoreError) -> StoreError {
        match &err {
            StoreError::Internal(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::NotADatabase =>
            {
                StoreError::CorruptSchema("not a SQLite database".into())
            }
            _ => err,
        }
    }
}
