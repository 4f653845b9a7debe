//! Infiltration, ventilation and room air model records

use super::Insertable;
use crate::db::statement::{BoundStatement, StatementKind};
use crate::error::DbResult;
use crate::model::{AirModelData, AirflowData};

/// Table an [`AirflowRecord`] is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AirflowKind {
    Infiltration,
    Ventilation,
}

impl AirflowKind {
    pub fn statement(&self) -> StatementKind {
        match self {
            AirflowKind::Infiltration => StatementKind::InfiltrationInsert,
            AirflowKind::Ventilation => StatementKind::VentilationInsert,
        }
    }
}

/// Row of `Infiltration` or `Ventilation`
#[derive(Debug, Clone, PartialEq)]
pub struct AirflowRecord {
    kind: AirflowKind,
    number: i32,
    airflow: AirflowData,
}

impl AirflowRecord {
    pub fn new(kind: AirflowKind, number: i32, airflow: &AirflowData) -> Self {
        Self {
            kind,
            number,
            airflow: airflow.clone(),
        }
    }
}

impl Insertable for AirflowRecord {
    fn statement(&self) -> StatementKind {
        self.kind.statement()
    }

    fn number(&self) -> i32 {
        self.number
    }

    fn bind(&self, stmt: &mut BoundStatement<'_>) -> DbResult<()> {
        stmt.bind_int(1, self.number.into())?;
        stmt.bind_text(2, &self.airflow.name)?;
        stmt.bind_int(3, self.airflow.zone_ptr.into())?;
        stmt.bind_int(4, self.airflow.sched_ptr.into())?;
        stmt.bind_real(5, self.airflow.design_level)
    }
}

/// Row of `RoomAirModels`, keyed by zone number
#[derive(Debug, Clone, PartialEq)]
pub struct RoomAirModelRecord {
    zone: i32,
    model: AirModelData,
}

impl RoomAirModelRecord {
    pub fn new(zone: i32, model: &AirModelData) -> Self {
        Self {
            zone,
            model: model.clone(),
        }
    }
}

impl Insertable for RoomAirModelRecord {
    fn statement(&self) -> StatementKind {
        StatementKind::RoomAirModelsInsert
    }

    fn number(&self) -> i32 {
        self.zone
    }

    fn bind(&self, stmt: &mut BoundStatement<'_>) -> DbResult<()> {
        stmt.bind_int(1, self.zone.into())?;
        stmt.bind_text(2, &self.model.air_model_name)?;
        stmt.bind_int(3, self.model.air_model_type.into())?;
        stmt.bind_int(4, self.model.temp_couple_scheme.into())?;
        stmt.bind_bool(5, self.model.sim_air_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::test_support::{count, setup};

    #[test]
    fn test_airflow_kinds() {
        let conn = setup();
        let flow = AirflowData {
            name: "ZONE 1 INFIL".into(),
            zone_ptr: 1,
            sched_ptr: 3,
            design_level: 0.05,
        };

        AirflowRecord::new(AirflowKind::Infiltration, 1, &flow).insert(&conn).unwrap();
        assert_eq!(count(&conn, "Infiltration"), 1);
        assert_eq!(count(&conn, "Ventilation"), 0);

        AirflowRecord::new(AirflowKind::Ventilation, 1, &flow).insert(&conn).unwrap();
        let level: f64 = conn
            .query_row(
                "SELECT DesignLevel FROM Ventilation WHERE VentilationIndex = 1",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(level, 0.05);
    }

    #[test]
    fn test_room_air_model_keyed_by_zone() {
        let conn = setup();
        let model = AirModelData {
            air_model_name: "MIXING".into(),
            air_model_type: 2,
            temp_couple_scheme: 1,
            sim_air_model: false,
        };

        let record = RoomAirModelRecord::new(3, &model);
        assert_eq!(record.number(), 3);
        record.insert(&conn).unwrap();

        let (name, sim): (String, i64) = conn
            .query_row(
                "SELECT AirModelName, SimAirModel FROM RoomAirModels WHERE ZoneIndex = 3",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(name, "MIXING");
        assert_eq!(sim, 0);
    }
}
