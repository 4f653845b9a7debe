//! Zone, zone list, zone group and surface records

use super::{Insertable, InsertableWithChildren};
use crate::db::statement::{BoundStatement, StatementKind};
use crate::error::DbResult;
use crate::model::{SurfaceData, ZoneData, ZoneGroupData, ZoneListData};
use rusqlite::Connection;

/// Row of `Zones`
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneRecord {
    number: i32,
    zone: ZoneData,
}

impl ZoneRecord {
    pub fn new(number: i32, zone: &ZoneData) -> Self {
        Self {
            number,
            zone: zone.clone(),
        }
    }
}

impl Insertable for ZoneRecord {
    fn statement(&self) -> StatementKind {
        StatementKind::ZonesInsert
    }

    fn number(&self) -> i32 {
        self.number
    }

    fn bind(&self, stmt: &mut BoundStatement<'_>) -> DbResult<()> {
        let z = &self.zone;
        stmt.bind_int(1, self.number.into())?;
        stmt.bind_text(2, &z.name)?;
        stmt.bind_real(3, z.rel_north)?;
        stmt.bind_real(4, z.origin_x)?;
        stmt.bind_real(5, z.origin_y)?;
        stmt.bind_real(6, z.origin_z)?;
        stmt.bind_real(7, z.centroid_x)?;
        stmt.bind_real(8, z.centroid_y)?;
        stmt.bind_real(9, z.centroid_z)?;
        stmt.bind_int(10, z.of_type.into())?;
        stmt.bind_int(11, z.multiplier.into())?;
        stmt.bind_int(12, z.list_multiplier.into())?;
        stmt.bind_real(13, z.minimum_x)?;
        stmt.bind_real(14, z.maximum_x)?;
        stmt.bind_real(15, z.minimum_y)?;
        stmt.bind_real(16, z.maximum_y)?;
        stmt.bind_real(17, z.minimum_z)?;
        stmt.bind_real(18, z.maximum_z)?;
        stmt.bind_real(19, z.ceiling_height)?;
        stmt.bind_real(20, z.volume)?;
        stmt.bind_int(21, z.inside_convection_algo.into())?;
        stmt.bind_int(22, z.outside_convection_algo.into())?;
        stmt.bind_real(23, z.floor_area)?;
        stmt.bind_real(24, z.ext_gross_wall_area)?;
        stmt.bind_real(25, z.ext_net_wall_area)?;
        stmt.bind_real(26, z.ext_window_area)?;
        stmt.bind_bool(27, z.is_part_of_total_area)
    }
}

/// Row of `ZoneLists`, with one `ZoneInfoZoneLists` row per member zone
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneListRecord {
    number: i32,
    name: String,
    zones: Vec<i32>,
}

impl ZoneListRecord {
    pub fn new(number: i32, list: &ZoneListData) -> Self {
        Self {
            number,
            name: list.name.clone(),
            zones: list.zones.clone(),
        }
    }
}

impl Insertable for ZoneListRecord {
    fn statement(&self) -> StatementKind {
        StatementKind::ZoneListsInsert
    }

    fn number(&self) -> i32 {
        self.number
    }

    fn bind(&self, stmt: &mut BoundStatement<'_>) -> DbResult<()> {
        stmt.bind_int(1, self.number.into())?;
        stmt.bind_text(2, &self.name)
    }
}

impl InsertableWithChildren for ZoneListRecord {
    fn insert_with_children(&self, conn: &Connection) -> DbResult<()> {
        self.insert(conn)?;

        let mut members = BoundStatement::prepare(conn, StatementKind::ZoneInfoZoneListsInsert)?;
        for &zone in &self.zones {
            members.bind_int(1, self.number.into())?;
            members.bind_int(2, zone.into())?;
            members.step()?;
        }
        Ok(())
    }
}

/// Row of `ZoneGroups`
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneGroupRecord {
    number: i32,
    group: ZoneGroupData,
}

impl ZoneGroupRecord {
    pub fn new(number: i32, group: &ZoneGroupData) -> Self {
        Self {
            number,
            group: group.clone(),
        }
    }
}

impl Insertable for ZoneGroupRecord {
    fn statement(&self) -> StatementKind {
        StatementKind::ZoneGroupsInsert
    }

    fn number(&self) -> i32 {
        self.number
    }

    fn bind(&self, stmt: &mut BoundStatement<'_>) -> DbResult<()> {
        stmt.bind_int(1, self.number.into())?;
        stmt.bind_text(2, &self.group.name)?;
        stmt.bind_int(3, self.group.zone_list.into())?;
        stmt.bind_int(4, self.group.multiplier.into())
    }
}

/// Row of `Surfaces`
///
/// The surface class name is resolved by the engine and passed in
/// alongside the surface itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceRecord {
    number: i32,
    class_name: String,
    surface: SurfaceData,
}

impl SurfaceRecord {
    pub fn new(number: i32, surface: &SurfaceData, class_name: &str) -> Self {
        Self {
            number,
            class_name: class_name.to_string(),
            surface: surface.clone(),
        }
    }
}

impl Insertable for SurfaceRecord {
    fn statement(&self) -> StatementKind {
        StatementKind::SurfacesInsert
    }

    fn number(&self) -> i32 {
        self.number
    }

    fn bind(&self, stmt: &mut BoundStatement<'_>) -> DbResult<()> {
        let s = &self.surface;
        stmt.bind_int(1, self.number.into())?;
        stmt.bind_text(2, &s.name)?;
        stmt.bind_int(3, s.construction.into())?;
        stmt.bind_text(4, &self.class_name)?;
        stmt.bind_real(5, s.area)?;
        stmt.bind_real(6, s.gross_area)?;
        stmt.bind_real(7, s.perimeter)?;
        stmt.bind_real(8, s.azimuth)?;
        stmt.bind_real(9, s.height)?;
        stmt.bind_real(10, s.reveal)?;
        stmt.bind_int(11, s.shape.into())?;
        stmt.bind_int(12, s.sides.into())?;
        stmt.bind_real(13, s.tilt)?;
        stmt.bind_real(14, s.width)?;
        stmt.bind_bool(15, s.heat_trans_surf)?;
        stmt.bind_int(16, s.base_surf.into())?;
        stmt.bind_int(17, s.zone.into())?;
        stmt.bind_int(18, s.ext_bound_cond.into())?;
        stmt.bind_bool(19, s.ext_solar)?;
        stmt.bind_bool(20, s.ext_wind)
    }
}
