use rusqlite::{Row, params, params_from_iter};

use super::{CategoryRepository, DbConn, commit, validate_name};
use crate::domain::{Filter, MaterialRecord, Properties, Result, StoreError};

/// Columns the `properties` view may be sorted by.
const SORTABLE_COLUMNS: [&str; 8] = [
    "material",
    "category",
    "density",
    "modulus_of_elasticity",
    "modulus_of_rigidity",
    "yield_strength",
    "ultimate_tensile_strength",
    "percent_elongation",
];

/// Repository for material operations (the materials table plus the
/// one-row-per-material mechanical_properties table).
pub struct MaterialRepository {
    conn: DbConn,
}

impl MaterialRepository {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    /// Add a material under an existing category.
    ///
    /// The category is never auto-created; an unknown one is always
    /// [`StoreError::UnknownCategory`], and nothing is inserted.
    pub fn add(&self, name: &str, category: &str) -> Result<()> {
        validate_name(name)?;
        let conn = self
            .conn
            .lock()
            .expect("MaterialRepository: failed to acquire database lock");

        if !CategoryRepository::exists(&conn, category)? {
            return Err(StoreError::UnknownCategory(category.to_string()));
        }
        if Self::exists(&conn, name)? {
            return Err(StoreError::Duplicate(name.to_string()));
        }
        conn.execute(
            "INSERT INTO materials (name, category) VALUES (?1, ?2)",
            params![name, category],
        )?;
        Ok(())
    }

    /// Record property values for a material, creating or merging the
    /// properties row as needed.
    ///
    /// Only the fields present in `patch` change; everything else keeps
    /// its previous value. Runs in one transaction so a failure leaves
    /// the prior state intact.
    pub fn set_properties(&self, material: &str, patch: &Properties) -> Result<()> {
        patch.validate()?;
        let mut conn = self
            .conn
            .lock()
            .expect("MaterialRepository: failed to acquire database lock");

        if !Self::exists(&conn, material)? {
            return Err(StoreError::UnknownMaterial(material.to_string()));
        }

        let tx = conn.transaction()?;
        tx.execute(
            "INSERT OR IGNORE INTO mechanical_properties (material) VALUES (?1)",
            [material],
        )?;
        for (column, value) in Properties::COLUMNS.iter().zip(patch.values()) {
            if let Some(v) = value {
                // Column names come from the fixed COLUMNS set, never
                // from caller input.
                tx.execute(
                    &format!("UPDATE mechanical_properties SET {column} = ?1 WHERE material = ?2"),
                    params![v, material],
                )?;
            }
        }
        commit(tx)
    }

    /// Look up one material through the `properties` view.
    ///
    /// A material without a properties row comes back with all six
    /// fields as `None`, not as an error.
    pub fn get(&self, name: &str) -> Result<MaterialRecord> {
        let conn = self
            .conn
            .lock()
            .expect("MaterialRepository: failed to acquire database lock");

        let mut stmt = conn.prepare(
            "SELECT material, category, density, modulus_of_elasticity, modulus_of_rigidity, \
             yield_strength, ultimate_tensile_strength, percent_elongation \
             FROM properties WHERE material = ?1",
        )?;
        let mut rows = stmt.query_map([name], Self::row_to_record)?;
        match rows.next() {
            Some(row) => Ok(row?),
            None => Err(StoreError::UnknownMaterial(name.to_string())),
        }
    }

    /// All materials in a category, by name. An empty category yields an
    /// empty vec; an unknown one is an error.
    pub fn list_by_category(&self, category: &str) -> Result<Vec<MaterialRecord>> {
        let conn = self
            .conn
            .lock()
            .expect("MaterialRepository: failed to acquire database lock");

        if !CategoryRepository::exists(&conn, category)? {
            return Err(StoreError::UnknownCategory(category.to_string()));
        }

        let mut stmt = conn.prepare(
            "SELECT material, category, density, modulus_of_elasticity, modulus_of_rigidity, \
             yield_strength, ultimate_tensile_strength, percent_elongation \
             FROM properties WHERE category = ?1 ORDER BY material",
        )?;
        let rows = stmt.query_map([category], Self::row_to_record)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// The whole `properties` view, sorted by a caller-named column.
    pub fn list_all(&self, order_by: &str, descending: bool) -> Result<Vec<MaterialRecord>> {
        self.list_filtered(&[], order_by, descending)
    }

    /// The `properties` view narrowed by `column <op> value` conditions
    /// (all of them must hold), sorted by a caller-named column.
    ///
    /// Column names and sort column are interpolated into the SQL, so
    /// both are checked against the view's column set first; operators
    /// come from the fixed [`FilterOp`] set and values are bound as
    /// parameters. Filters on the six numeric columns require a numeric
    /// value; `material` and `category` compare as (case-insensitive)
    /// text.
    ///
    /// [`FilterOp`]: crate::domain::FilterOp
    pub fn list_filtered(
        &self,
        filters: &[Filter],
        order_by: &str,
        descending: bool,
    ) -> Result<Vec<MaterialRecord>> {
        if !SORTABLE_COLUMNS.contains(&order_by) {
            return Err(StoreError::Validation(format!(
                "cannot sort by '{order_by}'; expected one of: {}",
                SORTABLE_COLUMNS.join(", ")
            )));
        }
        let direction = if descending { "DESC" } else { "ASC" };

        let mut clauses = Vec::with_capacity(filters.len());
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::with_capacity(filters.len());
        for (i, filter) in filters.iter().enumerate() {
            let column = filter.column.as_str();
            if !SORTABLE_COLUMNS.contains(&column) {
                return Err(StoreError::Validation(format!(
                    "cannot filter by '{column}'; expected one of: {}",
                    SORTABLE_COLUMNS.join(", ")
                )));
            }
            if column == "material" || column == "category" {
                values.push(Box::new(filter.value.clone()));
            } else {
                let number: f64 = filter.value.parse().map_err(|_| {
                    StoreError::Validation(format!(
                        "{column} filters need a numeric value (got '{}')",
                        filter.value
                    ))
                })?;
                values.push(Box::new(number));
            }
            clauses.push(format!("{column} {} ?{}", filter.op.sql(), i + 1));
        }
        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {} ", clauses.join(" AND "))
        };

        let conn = self
            .conn
            .lock()
            .expect("MaterialRepository: failed to acquire database lock");

        let mut stmt = conn.prepare(&format!(
            "SELECT material, category, density, modulus_of_elasticity, modulus_of_rigidity, \
             yield_strength, ultimate_tensile_strength, percent_elongation \
             FROM properties {where_clause}ORDER BY {order_by} {direction}"
        ))?;
        let rows = stmt.query_map(
            params_from_iter(values.iter().map(|v| v.as_ref())),
            Self::row_to_record,
        )?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Delete a material and its properties row together.
    ///
    /// The FK cascade removes the properties row inside the same
    /// transaction, so no orphan can survive a failure.
    pub fn delete(&self, name: &str) -> Result<()> {
        let mut conn = self
            .conn
            .lock()
            .expect("MaterialRepository: failed to acquire database lock");

        let tx = conn.transaction()?;
        let count = tx.execute("DELETE FROM materials WHERE name = ?1", [name])?;
        if count == 0 {
            return Err(StoreError::UnknownMaterial(name.to_string()));
        }
        commit(tx)
    }

    /// Move a material to another existing category, leaving its
    /// properties untouched.
    pub fn update_category(&self, name: &str, new_category: &str) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .expect("MaterialRepository: failed to acquire database lock");

        if !Self::exists(&conn, name)? {
            return Err(StoreError::UnknownMaterial(name.to_string()));
        }
        if !CategoryRepository::exists(&conn, new_category)? {
            return Err(StoreError::UnknownCategory(new_category.to_string()));
        }
        conn.execute(
            "UPDATE materials SET category = ?1 WHERE name = ?2",
            params![new_category, name],
        )?;
        Ok(())
    }

    fn exists(conn: &rusqlite::Connection, name: &str) -> rusqlite::Result<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM materials WHERE name = ?1",
            [name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn row_to_record(row: &Row) -> rusqlite::Result<MaterialRecord> {
        Ok(MaterialRecord {
            material: row.get(0)?,
            category: row.get(1)?,
            properties: Properties {
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
