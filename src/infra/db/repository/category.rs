use rusqlite::Row;

use super::{DbConn, commit, validate_name};
use crate::domain::{Category, CategorySummary, Properties, Result, StoreError};

/// Repository for category operations and the per-category aggregates.
pub struct CategoryRepository {
    conn: DbConn,
}

impl CategoryRepository {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    /// Add a new category and return its id.
    ///
    /// Uniqueness is case-insensitive: "Steel" and "steel" are the same
    /// category, and the second one fails with [`StoreError::Duplicate`].
    pub fn add(&self, name: &str) -> Result<i64> {
        validate_name(name)?;
        let conn = self
            .conn
            .lock()
            .expect("CategoryRepository: failed to acquire database lock");

        if Self::exists(&conn, name)? {
            return Err(StoreError::Duplicate(name.to_string()));
        }
        conn.execute("INSERT INTO categories (name) VALUES (?1)", [name])?;
        Ok(conn.last_insert_rowid())
    }

    /// Delete a category, cascading to its materials and their
    /// properties. One transaction: either everything goes or nothing
    /// does.
    pub fn delete(&self, name: &str) -> Result<()> {
        let mut conn = self
            .conn
            .lock()
            .expect("CategoryRepository: failed to acquire database lock");

        let tx = conn.transaction()?;
        let count = tx.execute("DELETE FROM categories WHERE name = ?1", [name])?;
        if count == 0 {
            return Err(StoreError::UnknownCategory(name.to_string()));
        }
        commit(tx)?;
        log::debug!("deleted category '{name}' (cascade)");
        Ok(())
    }

    /// All categories in creation order.
    pub fn list(&self) -> Result<Vec<Category>> {
        let conn = self
            .conn
            .lock()
            .expect("CategoryRepository: failed to acquire database lock");

        let mut stmt =
            conn.prepare("SELECT category_id, name FROM categories ORDER BY category_id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Aggregates for one category from the `category_summaries` view.
    ///
    /// A category with no materials yields a count of 0 and all-None
    /// means; a name not in the categories table is an error.
    pub fn summarize(&self, name: &str) -> Result<CategorySummary> {
        let conn = self
            .conn
            .lock()
            .expect("CategoryRepository: failed to acquire database lock");

        if !Self::exists(&conn, name)? {
            return Err(StoreError::UnknownCategory(name.to_string()));
        }

        let mut stmt = conn.prepare(
            "SELECT category, materials, density, modulus_of_elasticity, modulus_of_rigidity, \
             yield_strength, ultimate_tensile_strength, percent_elongation \
             FROM category_summaries WHERE category = ?1",
        )?;
        let summary = stmt.query_row([name], Self::row_to_summary)?;
        Ok(summary)
    }

    /// Aggregates for every category, in creation order.
    pub fn summarize_all(&self) -> Result<Vec<CategorySummary>> {
        let conn = self
            .conn
            .lock()
            .expect("CategoryRepository: failed to acquire database lock");

        let mut stmt = conn.prepare(
            "SELECT category, materials, density, modulus_of_elasticity, modulus_of_rigidity, \
             yield_strength, ultimate_tensile_strength, percent_elongation \
             FROM category_summaries",
        )?;
        let rows = stmt.query_map([], Self::row_to_summary)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    pub(super) fn exists(conn: &rusqlite::Connection, name: &str) -> rusqlite::Result<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM categories WHERE name = ?1",
            [name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn row_to_summary(row: &Row) -> rusqlite::Result<CategorySummary> {
        Ok(CategorySummary {
            category: row.get(0)?,
            materials: row.get(1)?,
            means: Properties {
                density: row.get(2)?,
                modulus_of_elasticity: row.get(3)?,
                modulus_of_rigidity: row.get(4)?,
                yield_strength: row.get(5)?,
                ultimate_tensile_strength: row.get(6)?,
                percent_elongation: row.get(7)?,
            },
        })
    }
}
