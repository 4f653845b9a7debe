//! Schedule and internal load records

use super::Insertable;
use crate::db::statement::{BoundStatement, StatementKind};
use crate::error::DbResult;
use crate::model::{BaseboardHeatData, LightsData, PeopleData, ScheduleData, ZoneEquipData};

/// Row of `Schedules`
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRecord {
    number: i32,
    schedule: ScheduleData,
}

impl ScheduleRecord {
    pub fn new(number: i32, schedule: &ScheduleData) -> Self {
        Self {
            number,
            schedule: schedule.clone(),
        }
    }
}

impl Insertable for ScheduleRecord {
    fn statement(&self) -> StatementKind {
        StatementKind::SchedulesInsert
    }

    fn number(&self) -> i32 {
        self.number
    }

    fn bind(&self, stmt: &mut BoundStatement<'_>) -> DbResult<()> {
        stmt.bind_int(1, self.number.into())?;
        stmt.bind_text(2, &self.schedule.name)?;
        stmt.bind_text(3, &self.schedule.schedule_type)?;
        stmt.bind_real(4, self.schedule.min_value)?;
        stmt.bind_real(5, self.schedule.max_value)
    }
}

/// Row of `NominalLighting`
#[derive(Debug, Clone, PartialEq)]
pub struct LightingRecord {
    number: i32,
    lights: LightsData,
}

impl LightingRecord {
    pub fn new(number: i32, lights: &LightsData) -> Self {
        Self {
            number,
            lights: lights.clone(),
        }
    }
}

impl Insertable for LightingRecord {
    fn statement(&self) -> StatementKind {
        StatementKind::NominalLightingInsert
    }

    fn number(&self) -> i32 {
        self.number
    }

    fn bind(&self, stmt: &mut BoundStatement<'_>) -> DbResult<()> {
        let l = &self.lights;
        stmt.bind_int(1, self.number.into())?;
        stmt.bind_text(2, &l.name)?;
        stmt.bind_int(3, l.zone_ptr.into())?;
        stmt.bind_int(4, l.sched_ptr.into())?;
        stmt.bind_real(5, l.design_level)?;
        stmt.bind_real(6, l.fraction_return_air)?;
        stmt.bind_real(7, l.fraction_radiant)?;
        stmt.bind_real(8, l.fraction_short_wave)?;
        stmt.bind_real(9, l.fraction_replaceable)?;
        stmt.bind_real(10, l.fraction_convected)?;
        stmt.bind_text(11, &l.end_use_subcategory)
    }
}

/// Row of `NominalPeople`
#[derive(Debug, Clone, PartialEq)]
pub struct PeopleRecord {
    number: i32,
    people: PeopleData,
}

impl PeopleRecord {
    pub fn new(number: i32, people: &PeopleData) -> Self {
        Self {
            number,
            people: people.clone(),
        }
    }
}

impl Insertable for PeopleRecord {
    fn statement(&self) -> StatementKind {
        StatementKind::NominalPeopleInsert
    }

    fn number(&self) -> i32 {
        self.number
    }

    fn bind(&self, stmt: &mut BoundStatement<'_>) -> DbResult<()> {
        let p = &self.people;
        stmt.bind_int(1, self.number.into())?;
        stmt.bind_text(2, &p.name)?;
        stmt.bind_int(3, p.zone_ptr.into())?;
        stmt.bind_real(4, p.number_of_people)?;
        stmt.bind_int(5, p.number_of_people_ptr.into())?;
        stmt.bind_int(6, p.activity_level_ptr.into())?;
        stmt.bind_real(7, p.fraction_radiant)?;
        stmt.bind_real(8, p.fraction_convected)?;
        stmt.bind_int(9, p.work_eff_ptr.into())?;
        stmt.bind_int(10, p.clothing_ptr.into())?;
        stmt.bind_int(11, p.air_velocity_ptr.into())?;
        stmt.bind_bool(12, p.fanger)?;
        stmt.bind_bool(13, p.pierce)?;
        stmt.bind_bool(14, p.ksu)?;
        stmt.bind_int(15, p.mrt_calc_type.into())?;
        stmt.bind_int(16, p.surface_ptr.into())?;
        stmt.bind_text(17, &p.angle_factor_list_name)?;
        stmt.bind_int(18, p.angle_factor_list_ptr.into())?;
        stmt.bind_real(19, p.user_spec_sens_frac)?;
        stmt.bind_bool(20, p.show_55_warning)
    }
}

/// Equipment table a [`EquipmentRecord`] is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquipmentKind {
    Electric,
    Gas,
    Steam,
    HotWater,
    Other,
}

impl EquipmentKind {
    pub const ALL: [EquipmentKind; 5] = [
        EquipmentKind::Electric,
        EquipmentKind::Gas,
        EquipmentKind::Steam,
        EquipmentKind::HotWater,
        EquipmentKind::Other,
    ];

    pub fn statement(&self) -> StatementKind {
        match self {
            EquipmentKind::Electric => StatementKind::NominalElectricEquipmentInsert,
            EquipmentKind::Gas => StatementKind::NominalGasEquipmentInsert,
            EquipmentKind::Steam => StatementKind::NominalSteamEquipmentInsert,
            EquipmentKind::HotWater => StatementKind::NominalHotWaterEquipmentInsert,
            EquipmentKind::Other => StatementKind::NominalOtherEquipmentInsert,
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            EquipmentKind::Electric => "NominalElectricEquipment",
            EquipmentKind::Gas => "NominalGasEquipment",
            EquipmentKind::Steam => "NominalSteamEquipment",
            EquipmentKind::HotWater => "NominalHotWaterEquipment",
            EquipmentKind::Other => "NominalOtherEquipment",
        }
    }
}

/// Row of one of the five `Nominal*Equipment` tables
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentRecord {
    kind: EquipmentKind,
    number: i32,
    equipment: ZoneEquipData,
}

impl EquipmentRecord {
    pub fn new(kind: EquipmentKind, number: i32, equipment: &ZoneEquipData) -> Self {
        Self {
            kind,
            number,
            equipment: equipment.clone(),
        }
    }

    pub fn kind(&self) -> EquipmentKind {
        self.kind
    }
}

impl Insertable for EquipmentRecord {
    fn statement(&self) -> StatementKind {
        self.kind.statement()
    }

    fn number(&self) -> i32 {
        self.number
    }

    fn bind(&self, stmt: &mut BoundStatement<'_>) -> DbResult<()> {
        let e = &self.equipment;
        stmt.bind_int(1, self.number.into())?;
        stmt.bind_text(2, &e.name)?;
        stmt.bind_int(3, e.zone_ptr.into())?;
        stmt.bind_int(4, e.sched_ptr.into())?;
        stmt.bind_real(5, e.design_level)?;
        stmt.bind_real(6, e.fraction_latent)?;
        stmt.bind_real(7, e.fraction_radiant)?;
        stmt.bind_real(8, e.fraction_lost)?;
        stmt.bind_real(9, e.fraction_convected)?;
        stmt.bind_text(10, &e.end_use_subcategory)
    }
}

/// Row of `NominalBaseboardHeat`
#[derive(Debug, Clone, PartialEq)]
pub struct BaseboardHeatRecord {
    number: i32,
    baseboard: BaseboardHeatData,
}

impl BaseboardHeatRecord {
    pub fn new(number: i32, baseboard: &BaseboardHeatData) -> Self {
        Self {
            number,
            baseboard: baseboard.clone(),
        }
    }
}

impl Insertable for BaseboardHeatRecord {
    fn statement(&self) -> StatementKind {
        StatementKind::NominalBaseboardHeatInsert
    }

    fn number(&self) -> i32 {
        self.number
    }

    fn bind(&self, stmt: &mut BoundStatement<'_>) -> DbResult<()> {
        let b = &self.baseboard;
        stmt.bind_int(1, self.number.into())?;
        stmt.bind_text(2, &b.name)?;
        stmt.bind_int(3, b.zone_ptr.into())?;
        stmt.bind_int(4, b.sched_ptr.into())?;
        stmt.bind_real(5, b.cap_at_low_temperature)?;
        stmt.bind_real(6, b.low_temperature)?;
        stmt.bind_real(7, b.cap_at_high_temperature)?;
        stmt.bind_real(8, b.high_temperature)?;
        stmt.bind_real(9, b.fraction_radiant)?;
        stmt.bind_real(10, b.fraction_convected)?;
        stmt.bind_text(11, &b.end_use_subcategory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::test_support::{count, setup};

    #[test]
    fn test_schedule_insert() {
        let conn = setup();
        let schedule = ScheduleData {
            name: "OCCUPANCY".into(),
            schedule_type: "Fraction".into(),
            min_value: 0.0,
            max_value: 1.0,
        };

        ScheduleRecord::new(5, &schedule).insert(&conn).unwrap();

        let (kind, max): (String, f64) = conn
            .query_row(
                "SELECT ScheduleType, ScheduleMaximum FROM Schedules WHERE ScheduleIndex = 5",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(kind, "Fraction");
        assert_eq!(max, 1.0);
    }

    #[test]
    fn test_lighting_insert() {
        let conn = setup();
        let lights = LightsData {
            name: "OFFICE LIGHTS".into(),
            zone_ptr: 1,
            sched_ptr: 2,
            design_level: 1200.0,
            end_use_subcategory: "General".into(),
            ..Default::default()
        };

        LightingRecord::new(1, &lights).insert(&conn).unwrap();

        let (level, category): (f64, String) = conn
            .query_row(
                "SELECT DesignLevel, EndUseSubcategory FROM NominalLighting WHERE NominalLightingIndex = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(level, 1200.0);
        assert_eq!(category, "General");
    }

    #[test]
    fn test_people_comfort_flags() {
        let conn = setup();
        let people = PeopleData {
            name: "OFFICE OCCUPANTS".into(),
            zone_ptr: 1,
            number_of_people: 12.0,
            fanger: true,
            ksu: true,
            show_55_warning: true,
            ..Default::default()
        };

        PeopleRecord::new(1, &people).insert(&conn).unwrap();

        let flags: (i64, i64, i64, i64) = conn
            .query_row(
                "SELECT Fanger, Pierce, KSU, Show55Warning FROM NominalPeople WHERE NominalPeopleIndex = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .unwrap();
        assert_eq!(flags, (1, 0, 1, 1));
    }

    #[test]
    fn test_equipment_kinds_route_to_own_table() {
        let conn = setup();
        let equipment = ZoneEquipData {
            name: "PLUG LOADS".into(),
            zone_ptr: 1,
            design_level: 500.0,
            ..Default::default()
        };

        for kind in EquipmentKind::ALL {
            EquipmentRecord::new(kind, 1, &equipment).insert(&conn).unwrap();
        }

        for kind in EquipmentKind::ALL {
            assert_eq!(count(&conn, kind.table()), 1, "{}", kind.table());
        }
    }

    #[test]
    fn test_baseboard_insert() {
        let conn = setup();
        let baseboard = BaseboardHeatData {
            name: "PERIMETER BASEBOARD".into(),
            zone_ptr: 2,
            cap_at_low_temperature: 1500.0,
            low_temperature: 0.0,
            cap_at_high_temperature: 500.0,
            high_temperature: 15.0,
            ..Default::default()
        };

        BaseboardHeatRecord::new(1, &baseboard).insert(&conn).unwrap();

        let (low, high): (f64, f64) = conn
            .query_row(
                "SELECT CapatLowTemperature, CapatHighTemperature FROM NominalBaseboardHeat WHERE NominalBaseboardHeaterIndex = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(low, 1500.0);
        assert_eq!(high, 500.0);
    }
}
