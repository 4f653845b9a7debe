//! Queued entity snapshots for the zone extended output
//!
//! The engine hands over its static model entity by entity while the model
//! is finalized. Each `add_*` call on the writer snapshots the entity into
//! this queue; the whole queue is written in one pass, table by table, when
//! the extended output is created.

use crate::db::diagnostics::DiagnosticsSink;
use crate::error::DbResult;
use crate::records::{
    AirflowRecord, BaseboardHeatRecord, ConstructionRecord, EquipmentKind, EquipmentRecord,
    Insertable, InsertableWithChildren, LightingRecord, MaterialRecord, PeopleRecord,
    RoomAirModelRecord, ScheduleRecord, SurfaceRecord, ZoneGroupRecord, ZoneListRecord,
    ZoneRecord,
};
use rusqlite::Connection;
use tracing::debug;

/// Outcome of writing the queued entities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtendedOutputSummary {
    /// Records written, children included with their parent
    pub written: usize,
    /// Records that failed and were reported
    pub failed: usize,
}

impl ExtendedOutputSummary {
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Entity snapshots waiting to be written
#[derive(Debug, Default)]
pub struct ExtendedOutput {
    pub(crate) zones: Vec<ZoneRecord>,
    pub(crate) zone_lists: Vec<ZoneListRecord>,
    pub(crate) zone_groups: Vec<ZoneGroupRecord>,
    pub(crate) schedules: Vec<ScheduleRecord>,
    pub(crate) surfaces: Vec<SurfaceRecord>,
    pub(crate) materials: Vec<MaterialRecord>,
    pub(crate) constructions: Vec<ConstructionRecord>,
    pub(crate) lighting: Vec<LightingRecord>,
    pub(crate) people: Vec<PeopleRecord>,
    pub(crate) equipment: Vec<EquipmentRecord>,
    pub(crate) baseboards: Vec<BaseboardHeatRecord>,
    pub(crate) infiltration: Vec<AirflowRecord>,
    pub(crate) ventilation: Vec<AirflowRecord>,
    pub(crate) room_air_models: Vec<RoomAirModelRecord>,
}

impl ExtendedOutput {
    /// Number of queued parent records
    pub fn len(&self) -> usize {
        self.zones.len()
            + self.zone_lists.len()
            + self.zone_groups.len()
            + self.schedules.len()
            + self.surfaces.len()
            + self.materials.len()
            + self.constructions.len()
            + self.lighting.len()
            + self.people.len()
            + self.equipment.len()
            + self.baseboards.len()
            + self.infiltration.len()
            + self.ventilation.len()
            + self.room_air_models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write every queued record in table order
    ///
    /// A failed record is reported on `sink` and counted; the records after
    /// it are still written.
    pub fn write(&self, conn: &Connection, sink: &mut DiagnosticsSink) -> ExtendedOutputSummary {
        let mut summary = ExtendedOutputSummary::default();
        let mut pass = Pass {
            conn,
            sink,
            summary: &mut summary,
        };

        pass.rows("Zones", &self.zones);
        pass.rows_with_children("ZoneLists", &self.zone_lists);
        pass.rows("ZoneGroups", &self.zone_groups);
        pass.rows("Schedules", &self.schedules);
        pass.rows("Surfaces", &self.surfaces);
        pass.rows("Materials", &self.materials);
        pass.rows_with_children("Constructions", &self.constructions);
        pass.rows("NominalLighting", &self.lighting);
        pass.rows("NominalPeople", &self.people);
        for kind in EquipmentKind::ALL {
            let of_kind = self.equipment.iter().filter(|e| e.kind() == kind);
            pass.each(kind.table(), of_kind, |r, conn| r.insert(conn));
        }
        pass.rows("NominalBaseboardHeat", &self.baseboards);
        pass.rows("Infiltration", &self.infiltration);
        pass.rows("Ventilation", &self.ventilation);
        pass.rows("RoomAirModels", &self.room_air_models);

        debug!(
            written = summary.written,
            failed = summary.failed,
            "Zone extended output written"
        );
        summary
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

struct Pass<'a> {
    conn: &'a Connection,
    sink: &'a mut DiagnosticsSink,
    summary: &'a mut ExtendedOutputSummary,
}

impl Pass<'_> {
    fn rows<R: Insertable>(&mut self, table: &str, records: &[R]) {
        self.each(table, records, |r, conn| r.insert(conn));
    }

    fn rows_with_children<R: InsertableWithChildren>(&mut self, table: &str, records: &[R]) {
        self.each(table, records, |r, conn| r.insert_with_children(conn));
    }

    fn each<'r, R, F>(&mut self, table: &str, records: impl IntoIterator<Item = &'r R>, insert: F)
    where
        R: Insertable + 'r,
        F: Fn(&R, &Connection) -> DbResult<()>,
    {
        for record in records {
            match insert(record, self.conn) {
                Ok(()) => self.summary.written += 1,
                Err(e) => {
                    self.summary.failed += 1;
                    self.sink
                        .report(&format!("{table} record {}", record.number()), &e);
                }
            }
        }
    }
}
