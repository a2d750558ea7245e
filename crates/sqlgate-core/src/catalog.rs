//! Schema catalog: the set of tables and columns a query may reference
//!
//! Built once at startup, either by reflecting a live DuckDB database or
//! by loading a static JSON definition, and immutable for the process
//! lifetime. A schema change requires rebuilding the catalog (and the
//! validator holding it); this staleness window is accepted by design.

use duckdb::{Connection, Result as DuckResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::info;

use crate::error::SchemaLoadError;

/// Static schema description for environments without a live connection.
///
/// ```json
/// { "tables": { "Student": ["name", "year", "semester"] } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDefinition {
    pub tables: BTreeMap<String, Vec<String>>,
}

/// Immutable table -> column-set mapping.
///
/// Lookups are case-sensitive exact matches against the names as
/// reflected or declared; callers are expected to quote or match the
/// stored casing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    tables: BTreeMap<String, BTreeSet<String>>,
}

impl Catalog {
    /// Reflect the schema of a live DuckDB database.
    pub fn from_database<P: AsRef<Path>>(db_path: P) -> Result<Self, SchemaLoadError> {
        let conn = Connection::open(&db_path)?;

        let mut stmt = conn.prepare(
            "SELECT table_name FROM information_schema.tables WHERE table_schema = 'main'",
        )?;
        let table_names: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<DuckResult<Vec<_>>>()?;

        let mut tables = BTreeMap::new();
        for table_name in table_names {
            let columns = Self::reflect_columns(&conn, &table_name)?;
            tables.insert(table_name, columns);
        }

        if tables.is_empty() {
            return Err(SchemaLoadError::Empty);
        }

        info!(
            tables = tables.len(),
            path = %db_path.as_ref().display(),
            "reflected schema catalog"
        );
        Ok(Self { tables })
    }

    fn reflect_columns(conn: &Connection, table_name: &str) -> DuckResult<BTreeSet<String>> {
        let mut stmt = conn.prepare(
            "SELECT column_name FROM information_schema.columns \
             WHERE table_name = ? ORDER BY ordinal_position",
        )?;
        let columns = stmt
            .query_map([table_name], |row| row.get(0))?
            .collect::<DuckResult<BTreeSet<String>>>()?;
        Ok(columns)
    }

    /// Build a catalog from a static definition.
    pub fn from_definition(definition: CatalogDefinition) -> Result<Self, SchemaLoadError> {
        if definition.tables.is_empty() {
            return Err(SchemaLoadError::Empty);
        }
        let tables = definition
            .tables
            .into_iter()
            .map(|(name, columns)| (name, columns.into_iter().collect()))
            .collect();
        Ok(Self { tables })
    }

    /// Load a [`CatalogDefinition`] from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaLoadError> {
        let contents = std::fs::read_to_string(path)?;
        let definition: CatalogDefinition = serde_json::from_str(&contents)?;
        Self::from_definition(definition)
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn columns_of(&self, table: &str) -> Option<&BTreeSet<String>> {
        self.tables.get(table)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn academic_definition() -> CatalogDefinition {
        let json = r#"{
            "tables": {
                "Student": ["name", "year", "semester"],
                "Course": ["title", "credits"]
            }
        }"#;
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn builds_from_definition() {
        let catalog = Catalog::from_definition(academic_definition()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.has_table("Student"));
        let columns = catalog.columns_of("Student").unwrap();
        assert!(columns.contains("semester"));
        assert!(catalog.columns_of("Nonexistent").is_none());
    }

    #[test]
    fn lookups_are_case_sensitive() {
        let catalog = Catalog::from_definition(academic_definition()).unwrap();
        assert!(catalog.has_table("Student"));
        assert!(!catalog.has_table("student"));
        assert!(!catalog.has_table("STUDENT"));
    }

    #[test]
    fn empty_definition_is_rejected() {
        let definition = CatalogDefinition {
            tables: BTreeMap::new(),
        };
        assert!(matches!(
            Catalog::from_definition(definition),
            Err(SchemaLoadError::Empty)
        ));
    }

    #[test]
    fn reflects_live_database() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE Student (name VARCHAR, year INTEGER, semester INTEGER);",
        )
        .unwrap();
        // Reflection goes through information_schema, same queries as the
        // file-backed path.
        let columns = Catalog::reflect_columns(&conn, "Student").unwrap();
        assert_eq!(columns.len(), 3);
        assert!(columns.contains("year"));
    }
}
