//! Entity record writers
//!
//! Each record snapshots one static model entity (zone, surface, material,
//! load definition, ...) at construction and binds itself to its table's
//! prepared statement on insert. Records own copies of every field, so a
//! queued record stays valid after the engine's model changes.
//!
//! Records with child rows (constructions and their layers, zone lists and
//! their member zones) also implement [`InsertableWithChildren`]. Child rows
//! are written in source order. A failure aborts the current record only;
//! rows already written are kept unless the caller rolls back a wrapping
//! transaction.

mod airflow;
mod construction;
mod geometry;
mod loads;

pub use airflow::{AirflowKind, AirflowRecord, RoomAirModelRecord};
pub use construction::{ConstructionLayerRecord, ConstructionRecord, MaterialRecord};
pub use geometry::{SurfaceRecord, ZoneGroupRecord, ZoneListRecord, ZoneRecord};
pub use loads::{
    BaseboardHeatRecord, EquipmentKind, EquipmentRecord, LightingRecord, PeopleRecord,
    ScheduleRecord,
};

use crate::db::statement::{BoundStatement, StatementKind};
use crate::error::DbResult;
use rusqlite::Connection;

/// A record that writes one row into its table
pub trait Insertable {
    /// Statement this record binds to
    fn statement(&self) -> StatementKind;

    /// Bind every column, in table order
    fn bind(&self, stmt: &mut BoundStatement<'_>) -> DbResult<()>;

    /// Entity number, the row's primary key
    fn number(&self) -> i32;

    /// Insert the record's own row
    fn insert(&self, conn: &Connection) -> DbResult<()> {
        let mut stmt = BoundStatement::prepare(conn, self.statement())?;
        self.bind(&mut stmt)?;
        stmt.step()?;
        Ok(())
    }
}

/// A record that owns an ordered collection of child rows
pub trait InsertableWithChildren: Insertable {
    /// Insert the parent row, then one child row per member in order
    fn insert_with_children(&self, conn: &Connection) -> DbResult<()>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::db::schema;
    use rusqlite::Connection;

    pub fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::create_database(&conn).unwrap();
        conn
    }

    pub fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap()
    }
}
