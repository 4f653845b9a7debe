//! Prepared statement registry
//!
//! Every write the layer performs goes through one of the statements named
//! by [`StatementKind`]. Statements are compiled once per connection through
//! rusqlite's statement cache, which [`prepare_all`] sizes and warms at open.
//!
//! [`BoundStatement`] wraps a cached statement for a single logical record:
//! bind every placeholder, `step`, and the statement is reset with its
//! bindings cleared before it goes back to the cache.

use crate::error::{DbError, DbResult};
use rusqlite::types::{Null, ToSql};
use rusqlite::{CachedStatement, Connection};
use tracing::debug;

/// One compiled statement per table operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    SimulationsInsert,
    SimulationsUpdate,
    EnvironmentPeriodsInsert,
    ErrorsInsert,
    ErrorsUpdate,
    TimeInsert,
    ReportDataDictionaryInsert,
    ReportDataInsert,
    ReportExtendedDataInsert,
    StringsInsert,
    StringsLookup,
    TabularDataInsert,
    ZonesInsert,
    ZoneListsInsert,
    ZoneInfoZoneListsInsert,
    ZoneGroupsInsert,
    SchedulesInsert,
    MaterialsInsert,
    ConstructionsInsert,
    ConstructionLayersInsert,
    SurfacesInsert,
    NominalLightingInsert,
    NominalPeopleInsert,
    NominalElectricEquipmentInsert,
    NominalGasEquipmentInsert,
    NominalSteamEquipmentInsert,
    NominalHotWaterEquipmentInsert,
    NominalOtherEquipmentInsert,
    NominalBaseboardHeatInsert,
    InfiltrationInsert,
    VentilationInsert,
    RoomAirModelsInsert,
    ZoneSizesInsert,
    SystemSizesInsert,
    ComponentSizesInsert,
    DaylightMapTitlesInsert,
    DaylightMapHourlyReportsInsert,
    DaylightMapHourlyDataInsert,
}

impl StatementKind {
    /// Every statement, compiled at open
    pub const ALL: [StatementKind; 38] = [
        StatementKind::SimulationsInsert,
        StatementKind::SimulationsUpdate,
        StatementKind::EnvironmentPeriodsInsert,
        StatementKind::ErrorsInsert,
        StatementKind::ErrorsUpdate,
        StatementKind::TimeInsert,
        StatementKind::ReportDataDictionaryInsert,
        StatementKind::ReportDataInsert,
        StatementKind::ReportExtendedDataInsert,
        StatementKind::StringsInsert,
        StatementKind::StringsLookup,
        StatementKind::TabularDataInsert,
        StatementKind::ZonesInsert,
        StatementKind::ZoneListsInsert,
        StatementKind::ZoneInfoZoneListsInsert,
        StatementKind::ZoneGroupsInsert,
        StatementKind::SchedulesInsert,
        StatementKind::MaterialsInsert,
        StatementKind::ConstructionsInsert,
        StatementKind::ConstructionLayersInsert,
        StatementKind::SurfacesInsert,
        StatementKind::NominalLightingInsert,
        StatementKind::NominalPeopleInsert,
        StatementKind::NominalElectricEquipmentInsert,
        StatementKind::NominalGasEquipmentInsert,
        StatementKind::NominalSteamEquipmentInsert,
        StatementKind::NominalHotWaterEquipmentInsert,
        StatementKind::NominalOtherEquipmentInsert,
        StatementKind::NominalBaseboardHeatInsert,
        StatementKind::InfiltrationInsert,
        StatementKind::VentilationInsert,
        StatementKind::RoomAirModelsInsert,
        StatementKind::ZoneSizesInsert,
        StatementKind::SystemSizesInsert,
        StatementKind::ComponentSizesInsert,
        StatementKind::DaylightMapTitlesInsert,
        StatementKind::DaylightMapHourlyReportsInsert,
        StatementKind::DaylightMapHourlyDataInsert,
    ];

    /// SQL text for the statement
    pub fn sql(&self) -> &'static str {
        match self {
            StatementKind::SimulationsInsert => {
                "INSERT INTO Simulations (SimulationIndex, ProgramVersion, TimeStamp, NumTimestepsPerHour, Completed, CompletedSuccessfully)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
            }
            StatementKind::SimulationsUpdate => {
                "UPDATE Simulations SET Completed = ?1, CompletedSuccessfully = ?2 WHERE SimulationIndex = ?3"
            }
            StatementKind::EnvironmentPeriodsInsert => {
                "INSERT INTO EnvironmentPeriods (EnvironmentPeriodIndex, SimulationIndex, EnvironmentName, EnvironmentType)
                 VALUES (?1, ?2, ?3, ?4)"
            }
            StatementKind::ErrorsInsert => {
                "INSERT INTO Errors (SimulationIndex, ErrorType, ErrorMessage, Count)
                 VALUES (?1, ?2, ?3, ?4)"
            }
            StatementKind::ErrorsUpdate => {
                "UPDATE Errors SET ErrorMessage = ErrorMessage || ?1 WHERE ErrorIndex = ?2"
            }
            StatementKind::TimeInsert => {
                "INSERT INTO Time (TimeIndex, Month, Day, Hour, Minute, Dst, Interval, IntervalType, SimulationDays, DayType, EnvironmentPeriodIndex, WarmupFlag)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
            }
            StatementKind::ReportDataDictionaryInsert => {
                "INSERT INTO ReportDataDictionary (ReportDataDictionaryIndex, IsMeter, Type, IndexGroup, TimestepType, KeyValue, Name, ReportingFrequency, ScheduleName, Units)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            }
            StatementKind::ReportDataInsert => {
                "INSERT INTO ReportData (TimeIndex, ReportDataDictionaryIndex, Value)
                 VALUES (?1, ?2, ?3)"
            }
            StatementKind::ReportExtendedDataInsert => {
                "INSERT INTO ReportExtendedData (ReportDataIndex, MaxValue, MaxMonth, MaxDay, MaxHour, MaxStartMinute, MaxMinute, MinValue, MinMonth, MinDay, MinHour, MinStartMinute, MinMinute)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
            }
            StatementKind::StringsInsert => {
                "INSERT INTO Strings (StringTypeIndex, Value) VALUES (?1, ?2)"
            }
            StatementKind::StringsLookup => {
                "SELECT StringIndex FROM Strings WHERE StringTypeIndex = ?1 AND Value = ?2"
            }
            StatementKind::TabularDataInsert => {
                "INSERT INTO TabularData (ReportNameIndex, ReportForStringIndex, TableNameIndex, RowNameIndex, ColumnNameIndex, UnitsIndex, SimulationIndex, RowId, ColumnId, Value)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            }
            StatementKind::ZonesInsert => {
                "INSERT INTO Zones (ZoneIndex, ZoneName, RelNorth, OriginX, OriginY, OriginZ, CentroidX, CentroidY, CentroidZ, OfType, Multiplier, ListMultiplier, MinimumX, MaximumX, MinimumY, MaximumY, MinimumZ, MaximumZ, CeilingHeight, Volume, InsideConvectionAlgo, OutsideConvectionAlgo, FloorArea, ExtGrossWallArea, ExtNetWallArea, ExtWindowArea, IsPartOfTotalArea)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27)"
            }
            StatementKind::ZoneListsInsert => {
                "INSERT INTO ZoneLists (ZoneListIndex, Name) VALUES (?1, ?2)"
            }
            StatementKind::ZoneInfoZoneListsInsert => {
                "INSERT INTO ZoneInfoZoneLists (ZoneListIndex, ZoneIndex) VALUES (?1, ?2)"
            }
            StatementKind::ZoneGroupsInsert => {
                "INSERT INTO ZoneGroups (ZoneGroupIndex, ZoneGroupName, ZoneListIndex, ZoneListMultiplier)
                 VALUES (?1, ?2, ?3, ?4)"
            }
            StatementKind::SchedulesInsert => {
                "INSERT INTO Schedules (ScheduleIndex, ScheduleName, ScheduleType, ScheduleMinimum, ScheduleMaximum)
                 VALUES (?1, ?2, ?3, ?4, ?5)"
            }
            StatementKind::MaterialsInsert => {
                "INSERT INTO Materials (MaterialIndex, Name, MaterialType, Roughness, Conductivity, Density, IsoMoistCap, Porosity, Resistance, ROnly, SpecHeat, ThermGradCoef, Thickness, VaporDiffus)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
            }
            StatementKind::ConstructionsInsert => {
                "INSERT INTO Constructions (ConstructionIndex, Name, TotalLayers, TotalSolidLayers, TotalGlassLayers, InsideAbsorpVis, OutsideAbsorpVis, InsideAbsorpSolar, OutsideAbsorpSolar, InsideAbsorpThermal, OutsideAbsorpThermal, OutsideRoughness, TypeIsWindow, Uvalue)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
            }
            StatementKind::ConstructionLayersInsert => {
                "INSERT INTO ConstructionLayers (ConstructionIndex, LayerIndex, MaterialIndex) VALUES (?1, ?2, ?3)"
            }
            StatementKind::SurfacesInsert => {
                "INSERT INTO Surfaces (SurfaceIndex, SurfaceName, ConstructionIndex, ClassName, Area, GrossArea, Perimeter, Azimuth, Height, Reveal, Shape, Sides, Tilt, Width, HeatTransferSurf, BaseSurfaceIndex, ZoneIndex, ExtBoundCond, ExtSolar, ExtWind)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)"
            }
            StatementKind::NominalLightingInsert => {
                "INSERT INTO NominalLighting (NominalLightingIndex, ObjectName, ZoneIndex, ScheduleIndex, DesignLevel, FractionReturnAir, FractionRadiant, FractionShortWave, FractionReplaceable, FractionConvected, EndUseSubcategory)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
            }
            StatementKind::NominalPeopleInsert => {
                "INSERT INTO NominalPeople (NominalPeopleIndex, ObjectName, ZoneIndex, NumberOfPeople, NumberOfPeopleScheduleIndex, ActivityScheduleIndex, FractionRadiant, FractionConvected, WorkEfficiencyScheduleIndex, ClothingEfficiencyScheduleIndex, AirVelocityScheduleIndex, Fanger, Pierce, KSU, MRTCalcType, SurfaceIndex, AngleFactorListName, AngleFactorList, UserSpecifiedSensibleFraction, Show55Warning)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)"
            }
            StatementKind::NominalElectricEquipmentInsert => {
                "INSERT INTO NominalElectricEquipment (NominalElectricEquipmentIndex, ObjectName, ZoneIndex, ScheduleIndex, DesignLevel, FractionLatent, FractionRadiant, FractionLost, FractionConvected, EndUseSubcategory)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            }
            StatementKind::NominalGasEquipmentInsert => {
                "INSERT INTO NominalGasEquipment (NominalGasEquipmentIndex, ObjectName, ZoneIndex, ScheduleIndex, DesignLevel, FractionLatent, FractionRadiant, FractionLost, FractionConvected, EndUseSubcategory)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            }
            StatementKind::NominalSteamEquipmentInsert => {
                "INSERT INTO NominalSteamEquipment (NominalSteamEquipmentIndex, ObjectName, ZoneIndex, ScheduleIndex, DesignLevel, FractionLatent, FractionRadiant, FractionLost, FractionConvected, EndUseSubcategory)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            }
            StatementKind::NominalHotWaterEquipmentInsert => {
                "INSERT INTO NominalHotWaterEquipment (NominalHotWaterEquipmentIndex, ObjectName, ZoneIndex, ScheduleIndex, DesignLevel, FractionLatent, FractionRadiant, FractionLost, FractionConvected, EndUseSubcategory)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            }
            StatementKind::NominalOtherEquipmentInsert => {
                "INSERT INTO NominalOtherEquipment (NominalOtherEquipmentIndex, ObjectName, ZoneIndex, ScheduleIndex, DesignLevel, FractionLatent, FractionRadiant, FractionLost, FractionConvected, EndUseSubcategory)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            }
            StatementKind::NominalBaseboardHeatInsert => {
                "INSERT INTO NominalBaseboardHeat (NominalBaseboardHeaterIndex, ObjectName, ZoneIndex, ScheduleIndex, CapatLowTemperature, LowTemperature, CapatHighTemperature, HighTemperature, FractionRadiant, FractionConvected, EndUseSubcategory)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
            }
            StatementKind::InfiltrationInsert => {
                "INSERT INTO Infiltration (InfiltrationIndex, ObjectName, ZoneIndex, ScheduleIndex, DesignLevel)
                 VALUES (?1, ?2, ?3, ?4, ?5)"
            }
            StatementKind::VentilationInsert => {
                "INSERT INTO Ventilation (VentilationIndex, ObjectName, ZoneIndex, ScheduleIndex, DesignLevel)
                 VALUES (?1, ?2, ?3, ?4, ?5)"
            }
            StatementKind::RoomAirModelsInsert => {
                "INSERT INTO RoomAirModels (ZoneIndex, AirModelName, AirModelType, TempCoupleScheme, SimAirModel)
                 VALUES (?1, ?2, ?3, ?4, ?5)"
            }
            StatementKind::ZoneSizesInsert => {
                "INSERT INTO ZoneSizes (ZoneName, LoadType, CalcDesLoad, UserDesLoad, CalcDesFlow, UserDesFlow, DesDayName, PeakHrMin, PeakTemp, PeakHumRat, CalcOutsideAirFlow)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
            }
            StatementKind::SystemSizesInsert => {
                "INSERT INTO SystemSizes (SystemName, Description, Value, Units) VALUES (?1, ?2, ?3, ?4)"
            }
            StatementKind::ComponentSizesInsert => {
                "INSERT INTO ComponentSizes (CompType, CompName, Description, Value, Units) VALUES (?1, ?2, ?3, ?4, ?5)"
            }
            StatementKind::DaylightMapTitlesInsert => {
                "INSERT INTO DaylightMapTitles (MapNumber, MapName, Environment, Zone, ReferencePt1, ReferencePt2, Z)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
            }
            StatementKind::DaylightMapHourlyReportsInsert => {
                "INSERT INTO DaylightMapHourlyReports (MapNumber, Month, DayOfMonth, Hour) VALUES (?1, ?2, ?3, ?4)"
            }
            StatementKind::DaylightMapHourlyDataInsert => {
                "INSERT INTO DaylightMapHourlyData (HourlyReportIndex, X, Y, Illuminance) VALUES (?1, ?2, ?3, ?4)"
            }
        }
    }
}

/// Compile every statement into the connection's statement cache
///
/// A failure here is fatal for the table it names.
pub fn prepare_all(conn: &Connection) -> DbResult<()> {
    conn.set_prepared_statement_cache_capacity(StatementKind::ALL.len());
    for kind in StatementKind::ALL {
        conn.prepare_cached(kind.sql())
            .map_err(|source| DbError::Prepare {
                statement: kind,
                source,
            })?;
    }
    debug!(statements = StatementKind::ALL.len(), "Prepared statement cache warmed");
    Ok(())
}

/// Finalize every cached statement (teardown)
pub fn finalize_all(conn: &Connection) {
    conn.flush_prepared_statement_cache();
}

/// A cached statement being bound for one logical record
pub struct BoundStatement<'conn> {
    kind: StatementKind,
    stmt: CachedStatement<'conn>,
    bound: Vec<bool>,
}

impl<'conn> BoundStatement<'conn> {
    /// Fetch the compiled statement for `kind`
    pub fn prepare(conn: &'conn Connection, kind: StatementKind) -> DbResult<Self> {
        let stmt = conn
            .prepare_cached(kind.sql())
            .map_err(|source| DbError::Prepare {
                statement: kind,
                source,
            })?;
        let bound = vec![false; stmt.parameter_count()];
        Ok(Self { kind, stmt, bound })
    }

    /// Which statement this is
    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    fn bind<T: ToSql>(&mut self, index: usize, value: T) -> DbResult<()> {
        self.stmt
            .raw_bind_parameter(index, value)
            .map_err(|source| DbError::Bind {
                statement: self.kind,
                index,
                source,
            })?;
        if let Some(slot) = index.checked_sub(1).and_then(|i| self.bound.get_mut(i)) {
            *slot = true;
        }
        Ok(())
    }

    pub fn bind_int(&mut self, index: usize, value: i64) -> DbResult<()> {
        self.bind(index, value)
    }

    pub fn bind_real(&mut self, index: usize, value: f64) -> DbResult<()> {
        self.bind(index, value)
    }

    pub fn bind_text(&mut self, index: usize, value: &str) -> DbResult<()> {
        self.bind(index, value)
    }

    pub fn bind_null(&mut self, index: usize) -> DbResult<()> {
        self.bind(index, Null)
    }

    /// Booleans are stored as 0/1
    pub fn bind_bool(&mut self, index: usize, value: bool) -> DbResult<()> {
        self.bind(index, i64::from(value))
    }

    pub fn bind_opt_int(&mut self, index: usize, value: Option<i64>) -> DbResult<()> {
        self.bind(index, value)
    }

    pub fn bind_opt_real(&mut self, index: usize, value: Option<f64>) -> DbResult<()> {
        self.bind(index, value)
    }

    pub fn bind_opt_text(&mut self, index: usize, value: Option<&str>) -> DbResult<()> {
        self.bind(index, value)
    }

    fn check_bound(&self) -> DbResult<()> {
        match self.bound.iter().position(|b| !b) {
            Some(pos) => Err(DbError::UnboundParameter {
                statement: self.kind,
                index: pos + 1,
            }),
            None => Ok(()),
        }
    }

    /// Execute the statement, returning the number of rows changed
    ///
    /// The statement is reset and its bindings cleared whether or not the
    /// step succeeds.
    pub fn step(&mut self) -> DbResult<usize> {
        let result = self.check_bound().and_then(|()| {
            self.stmt.raw_execute().map_err(|source| DbError::Step {
                statement: self.kind,
                source,
            })
        });
        self.reset();
        result
    }

    /// Execute a single-column integer query, returning the first row
    pub fn query_int(&mut self) -> DbResult<Option<i64>> {
        let result = self.check_bound().and_then(|()| {
            let mut rows = self.stmt.raw_query();
            let first = match rows.next() {
                Ok(Some(row)) => row.get::<_, i64>(0).map(Some),
                Ok(None) => Ok(None),
                Err(e) => Err(e),
            };
            first.map_err(|source| DbError::Step {
                statement: self.kind,
                source,
            })
        });
        self.reset();
        result
    }

    fn reset(&mut self) {
        self.stmt.clear_bindings();
        self.bound.fill(false);
    }
}
