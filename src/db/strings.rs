//! String interning for tabular report dimensions
//!
//! Report names, table names, row/column labels and units repeat across
//! thousands of tabular cells. Each distinct `(type, value)` pair is stored
//! once in `Strings` and referenced by its integer id.

use crate::db::statement::{BoundStatement, StatementKind};
use crate::error::DbResult;
use rusqlite::Connection;
use std::collections::HashMap;
use tracing::trace;

/// Dimension an interned string belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum StringType {
    ReportName = 1,
    ReportForString = 2,
    TableName = 3,
    RowName = 4,
    ColumnName = 5,
    Units = 6,
}

impl StringType {
    /// All string types, seeded into `StringTypes`
    pub const ALL: [StringType; 6] = [
        StringType::ReportName,
        StringType::ReportForString,
        StringType::TableName,
        StringType::RowName,
        StringType::ColumnName,
        StringType::Units,
    ];

    /// Get database integer representation
    pub fn as_db_int(&self) -> i32 {
        *self as i32
    }

    /// Name stored in `StringTypes.Value`
    pub fn name(&self) -> &'static str {
        match self {
            StringType::ReportName => "ReportName",
            StringType::ReportForString => "ReportForString",
            StringType::TableName => "TableName",
            StringType::RowName => "RowName",
            StringType::ColumnName => "ColumnName",
            StringType::Units => "Units",
        }
    }
}

/// Lookup-before-insert cache over the `Strings` table
///
/// The table is the source of truth; the map only saves the lookup
/// round trip for strings already seen by this writer.
#[derive(Debug, Default)]
pub struct StringInterner {
    cache: HashMap<(StringType, String), i64>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `(value, ty)`, inserting a row on first use
    pub fn intern(&mut self, conn: &Connection, value: &str, ty: StringType) -> DbResult<i64> {
        if let Some(&id) = self.cache.get(&(ty, value.to_string())) {
            return Ok(id);
        }

        let id = match lookup(conn, value, ty)? {
            Some(id) => id,
            None => {
                let mut insert = BoundStatement::prepare(conn, StatementKind::StringsInsert)?;
                insert.bind_int(1, ty.as_db_int().into())?;
                insert.bind_text(2, value)?;
                insert.step()?;
                let id = conn.last_insert_rowid();
                trace!(id, string_type = ty.name(), value, "Interned string");
                id
            }
        };

        self.cache.insert((ty, value.to_string()), id);
        Ok(id)
    }

    /// Number of strings held in the cache
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

fn lookup(conn: &Connection, value: &str, ty: StringType) -> DbResult<Option<i64>> {
    let mut stmt = BoundStatement::prepare(conn, StatementKind::StringsLookup)?;
    stmt.bind_int(1, ty.as_db_int().into())?;
    stmt.bind_text(2, value)?;
    stmt.query_int()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::create_database(&conn).unwrap();
        conn
    }

    #[test]
    fn test_intern_is_idempotent() {
        let conn = setup();
        let mut strings = StringInterner::new();

        let first = strings.intern(&conn, "Annual Building Utility Performance Summary", StringType::ReportName).unwrap();
        let second = strings.intern(&conn, "Annual Building Utility Performance Summary", StringType::ReportName).unwrap();
        assert_eq!(first, second);

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM Strings", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_same_value_different_type() {
        let conn = setup();
        let mut strings = StringInterner::new();

        let row = strings.intern(&conn, "Total", StringType::RowName).unwrap();
        let column = strings.intern(&conn, "Total", StringType::ColumnName).unwrap();
        assert_ne!(row, column);
    }

    #[test]
    fn test_fresh_cache_reuses_table_rows() {
        let conn = setup();
        let id = StringInterner::new()
            .intern(&conn, "GJ", StringType::Units)
            .unwrap();

        let mut fresh = StringInterner::new();
        assert_eq!(fresh.cached(), 0);
        assert_eq!(fresh.intern(&conn, "GJ", StringType::Units).unwrap(), id);

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM Strings WHERE Value = 'GJ'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }
}
