//! Database schema definitions and creation
//!
//! This module defines the SQLite schema for simulation output and
//! provides functions to create and configure the database. Every table is
//! created with `IF NOT EXISTS`, so running the initializer against an
//! already initialized file is a no-op.

use crate::db::strings::StringType;
use crate::error::{DbError, DbResult};
use rusqlite::Connection;

const CREATE_SIMULATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS Simulations (
    SimulationIndex INTEGER PRIMARY KEY,
    ProgramVersion TEXT,
    TimeStamp TEXT,
    NumTimestepsPerHour INTEGER,
    Completed INTEGER,
    CompletedSuccessfully INTEGER
)
"#;

const CREATE_ENVIRONMENT_PERIODS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS EnvironmentPeriods (
    EnvironmentPeriodIndex INTEGER PRIMARY KEY,
    SimulationIndex INTEGER,
    EnvironmentName TEXT,
    EnvironmentType INTEGER,              -- 1=design day, 2=design run period, 3=weather run period
    FOREIGN KEY (SimulationIndex) REFERENCES Simulations(SimulationIndex)
)
"#;

const CREATE_ERRORS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS Errors (
    ErrorIndex INTEGER PRIMARY KEY,
    SimulationIndex INTEGER,
    ErrorType INTEGER,                    -- 0=warning, 1=severe, 2=fatal
    ErrorMessage TEXT,
    Count INTEGER,
    FOREIGN KEY (SimulationIndex) REFERENCES Simulations(SimulationIndex)
)
"#;

const CREATE_TIME_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS Time (
    TimeIndex INTEGER PRIMARY KEY,
    Month INTEGER,
    Day INTEGER,
    Hour INTEGER,
    Minute INTEGER,                       -- end minute, in (0, 60]
    Dst INTEGER,
    Interval INTEGER,                     -- minutes covered by the row
    IntervalType INTEGER,                 -- reporting frequency code
    SimulationDays INTEGER,
    DayType TEXT,
    EnvironmentPeriodIndex INTEGER,
    WarmupFlag INTEGER,
    FOREIGN KEY (EnvironmentPeriodIndex) REFERENCES EnvironmentPeriods(EnvironmentPeriodIndex)
)
"#;

const CREATE_REPORT_DATA_DICTIONARY_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ReportDataDictionary (
    ReportDataDictionaryIndex INTEGER PRIMARY KEY,
    IsMeter INTEGER,
    Type TEXT,                            -- Avg or Sum
    IndexGroup TEXT,
    TimestepType TEXT,
    KeyValue TEXT,
    Name TEXT,
    ReportingFrequency TEXT,
    ScheduleName TEXT,
    Units TEXT
)
"#;

const CREATE_REPORT_DATA_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ReportData (
    ReportDataIndex INTEGER PRIMARY KEY,
    TimeIndex INTEGER,
    ReportDataDictionaryIndex INTEGER,
    Value REAL,
    FOREIGN KEY (TimeIndex) REFERENCES Time(TimeIndex),
    FOREIGN KEY (ReportDataDictionaryIndex) REFERENCES ReportDataDictionary(ReportDataDictionaryIndex)
)
"#;

const CREATE_REPORT_EXTENDED_DATA_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ReportExtendedData (
    ReportExtendedDataIndex INTEGER PRIMARY KEY,
    ReportDataIndex INTEGER,
    MaxValue REAL,
    MaxMonth INTEGER,
    MaxDay INTEGER,
    MaxHour INTEGER,
    MaxStartMinute INTEGER,
    MaxMinute INTEGER,
    MinValue REAL,
    MinMonth INTEGER,
    MinDay INTEGER,
    MinHour INTEGER,
    MinStartMinute INTEGER,
    MinMinute INTEGER,
    FOREIGN KEY (ReportDataIndex) REFERENCES ReportData(ReportDataIndex)
)
"#;

const CREATE_STRING_TYPES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS StringTypes (
    StringTypeIndex INTEGER PRIMARY KEY,
    Value TEXT
)
"#;

const CREATE_STRINGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS Strings (
    StringIndex INTEGER PRIMARY KEY,
    StringTypeIndex INTEGER,
    Value TEXT,
    UNIQUE (StringTypeIndex, Value),
    FOREIGN KEY (StringTypeIndex) REFERENCES StringTypes(StringTypeIndex)
)
"#;

const CREATE_TABULAR_DATA_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS TabularData (
    TabularDataIndex INTEGER PRIMARY KEY,
    ReportNameIndex INTEGER,
    ReportForStringIndex INTEGER,
    TableNameIndex INTEGER,
    RowNameIndex INTEGER,
    ColumnNameIndex INTEGER,
    UnitsIndex INTEGER,
    SimulationIndex INTEGER,
    RowId INTEGER,
    ColumnId INTEGER,
    Value TEXT,
    FOREIGN KEY (ReportNameIndex) REFERENCES Strings(StringIndex),
    FOREIGN KEY (ReportForStringIndex) REFERENCES Strings(StringIndex),
    FOREIGN KEY (TableNameIndex) REFERENCES Strings(StringIndex),
    FOREIGN KEY (RowNameIndex) REFERENCES Strings(StringIndex),
    FOREIGN KEY (ColumnNameIndex) REFERENCES Strings(StringIndex),
    FOREIGN KEY (UnitsIndex) REFERENCES Strings(StringIndex)
)
"#;

const CREATE_ZONES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS Zones (
    ZoneIndex INTEGER PRIMARY KEY,
    ZoneName TEXT,
    RelNorth REAL,
    OriginX REAL,
    OriginY REAL,
    OriginZ REAL,
    CentroidX REAL,
    CentroidY REAL,
    CentroidZ REAL,
    OfType INTEGER,
    Multiplier REAL,
    ListMultiplier REAL,
    MinimumX REAL,
    MaximumX REAL,
    MinimumY REAL,
    MaximumY REAL,
    MinimumZ REAL,
    MaximumZ REAL,
    CeilingHeight REAL,
    Volume REAL,
    InsideConvectionAlgo INTEGER,
    OutsideConvectionAlgo INTEGER,
    FloorArea REAL,
    ExtGrossWallArea REAL,
    ExtNetWallArea REAL,
    ExtWindowArea REAL,
    IsPartOfTotalArea INTEGER
)
"#;

const CREATE_ZONE_LISTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ZoneLists (
    ZoneListIndex INTEGER PRIMARY KEY,
    Name TEXT
)
"#;

const CREATE_ZONE_INFO_ZONE_LISTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ZoneInfoZoneLists (
    ZoneListIndex INTEGER NOT NULL,
    ZoneIndex INTEGER NOT NULL,
    PRIMARY KEY (ZoneListIndex, ZoneIndex),
    FOREIGN KEY (ZoneListIndex) REFERENCES ZoneLists(ZoneListIndex),
    FOREIGN KEY (ZoneIndex) REFERENCES Zones(ZoneIndex)
)
"#;

const CREATE_ZONE_GROUPS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ZoneGroups (
    ZoneGroupIndex INTEGER PRIMARY KEY,
    ZoneGroupName TEXT,
    ZoneListIndex INTEGER,
    ZoneListMultiplier INTEGER,
    FOREIGN KEY (ZoneListIndex) REFERENCES ZoneLists(ZoneListIndex)
)
"#;

const CREATE_SCHEDULES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS Schedules (
    ScheduleIndex INTEGER PRIMARY KEY,
    ScheduleName TEXT,
    ScheduleType TEXT,
    ScheduleMinimum REAL,
    ScheduleMaximum REAL
)
"#;

const CREATE_MATERIALS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS Materials (
    MaterialIndex INTEGER PRIMARY KEY,
    Name TEXT,
    MaterialType INTEGER,
    Roughness INTEGER,
    Conductivity REAL,
    Density REAL,
    IsoMoistCap REAL,
    Porosity REAL,
    Resistance REAL,
    ROnly INTEGER,
    SpecHeat REAL,
    ThermGradCoef REAL,
    Thickness REAL,
    VaporDiffus REAL
)
"#;

const CREATE_CONSTRUCTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS Constructions (
    ConstructionIndex INTEGER PRIMARY KEY,
    Name TEXT,
    TotalLayers INTEGER,
    TotalSolidLayers INTEGER,
    TotalGlassLayers INTEGER,
    InsideAbsorpVis REAL,
    OutsideAbsorpVis REAL,
    InsideAbsorpSolar REAL,
    OutsideAbsorpSolar REAL,
    InsideAbsorpThermal REAL,
    OutsideAbsorpThermal REAL,
    OutsideRoughness INTEGER,
    TypeIsWindow INTEGER,
    Uvalue REAL
)
"#;

const CREATE_CONSTRUCTION_LAYERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ConstructionLayers (
    ConstructionLayersIndex INTEGER PRIMARY KEY,
    ConstructionIndex INTEGER,
    LayerIndex INTEGER,                   -- 1 = outside layer
    MaterialIndex INTEGER,
    FOREIGN KEY (ConstructionIndex) REFERENCES Constructions(ConstructionIndex),
    FOREIGN KEY (MaterialIndex) REFERENCES Materials(MaterialIndex)
)
"#;

const CREATE_SURFACES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS Surfaces (
    SurfaceIndex INTEGER PRIMARY KEY,
    SurfaceName TEXT,
    ConstructionIndex INTEGER,
    ClassName TEXT,
    Area REAL,
    GrossArea REAL,
    Perimeter REAL,
    Azimuth REAL,
    Height REAL,
    Reveal REAL,
    Shape INTEGER,
    Sides INTEGER,
    Tilt REAL,
    Width REAL,
    HeatTransferSurf INTEGER,
    BaseSurfaceIndex INTEGER,
    ZoneIndex INTEGER,
    ExtBoundCond INTEGER,
    ExtSolar INTEGER,
    ExtWind INTEGER,
    FOREIGN KEY (ConstructionIndex) REFERENCES Constructions(ConstructionIndex),
    FOREIGN KEY (ZoneIndex) REFERENCES Zones(ZoneIndex)
)
"#;

const CREATE_NOMINAL_LIGHTING_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS NominalLighting (
    NominalLightingIndex INTEGER PRIMARY KEY,
    ObjectName TEXT,
    ZoneIndex INTEGER,
    ScheduleIndex INTEGER,
    DesignLevel REAL,
    FractionReturnAir REAL,
    FractionRadiant REAL,
    FractionShortWave REAL,
    FractionReplaceable REAL,
    FractionConvected REAL,
    EndUseSubcategory TEXT,
    FOREIGN KEY (ZoneIndex) REFERENCES Zones(ZoneIndex),
    FOREIGN KEY (ScheduleIndex) REFERENCES Schedules(ScheduleIndex)
)
"#;

const CREATE_NOMINAL_PEOPLE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS NominalPeople (
    NominalPeopleIndex INTEGER PRIMARY KEY,
    ObjectName TEXT,
    ZoneIndex INTEGER,
    NumberOfPeople REAL,
    NumberOfPeopleScheduleIndex INTEGER,
    ActivityScheduleIndex INTEGER,
    FractionRadiant REAL,
    FractionConvected REAL,
    WorkEfficiencyScheduleIndex INTEGER,
    ClothingEfficiencyScheduleIndex INTEGER,
    AirVelocityScheduleIndex INTEGER,
    Fanger INTEGER,
    Pierce INTEGER,
    KSU INTEGER,
    MRTCalcType INTEGER,
    SurfaceIndex INTEGER,
    AngleFactorListName TEXT,
    AngleFactorList INTEGER,
    UserSpecifiedSensibleFraction REAL,
    Show55Warning INTEGER,
    FOREIGN KEY (ZoneIndex) REFERENCES Zones(ZoneIndex)
)
"#;

/// The five equipment tables share one column layout
const EQUIPMENT_TABLES: [(&str, &str); 5] = [
    ("NominalElectricEquipment", "NominalElectricEquipmentIndex"),
    ("NominalGasEquipment", "NominalGasEquipmentIndex"),
    ("NominalSteamEquipment", "NominalSteamEquipmentIndex"),
    ("NominalHotWaterEquipment", "NominalHotWaterEquipmentIndex"),
    ("NominalOtherEquipment", "NominalOtherEquipmentIndex"),
];

const CREATE_NOMINAL_BASEBOARD_HEAT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS NominalBaseboardHeat (
    NominalBaseboardHeaterIndex INTEGER PRIMARY KEY,
    ObjectName TEXT,
    ZoneIndex INTEGER,
    ScheduleIndex INTEGER,
    CapatLowTemperature REAL,
    LowTemperature REAL,
    CapatHighTemperature REAL,
    HighTemperature REAL,
    FractionRadiant REAL,
    FractionConvected REAL,
    EndUseSubcategory TEXT,
    FOREIGN KEY (ZoneIndex) REFERENCES Zones(ZoneIndex),
    FOREIGN KEY (ScheduleIndex) REFERENCES Schedules(ScheduleIndex)
)
"#;

const CREATE_INFILTRATION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS Infiltration (
    InfiltrationIndex INTEGER PRIMARY KEY,
    ObjectName TEXT,
    ZoneIndex INTEGER,
    ScheduleIndex INTEGER,
    DesignLevel REAL,
    FOREIGN KEY (ZoneIndex) REFERENCES Zones(ZoneIndex),
    FOREIGN KEY (ScheduleIndex) REFERENCES Schedules(ScheduleIndex)
)
"#;

const CREATE_VENTILATION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS Ventilation (
    VentilationIndex INTEGER PRIMARY KEY,
    ObjectName TEXT,
    ZoneIndex INTEGER,
    ScheduleIndex INTEGER,
    DesignLevel REAL,
    FOREIGN KEY (ZoneIndex) REFERENCES Zones(ZoneIndex),
    FOREIGN KEY (ScheduleIndex) REFERENCES Schedules(ScheduleIndex)
)
"#;

const CREATE_ROOM_AIR_MODELS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS RoomAirModels (
    ZoneIndex INTEGER PRIMARY KEY,
    AirModelName TEXT,
    AirModelType INTEGER,
    TempCoupleScheme INTEGER,
    SimAirModel INTEGER,
    FOREIGN KEY (ZoneIndex) REFERENCES Zones(ZoneIndex)
)
"#;

const CREATE_ZONE_SIZES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ZoneSizes (
    ZoneSizesIndex INTEGER PRIMARY KEY,
    ZoneName TEXT,
    LoadType TEXT,
    CalcDesLoad REAL,
    UserDesLoad REAL,
    CalcDesFlow REAL,
    UserDesFlow REAL,
    DesDayName TEXT,
    PeakHrMin TEXT,
    PeakTemp REAL,
    PeakHumRat REAL,
    CalcOutsideAirFlow REAL
)
"#;

const CREATE_SYSTEM_SIZES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS SystemSizes (
    SystemSizesIndex INTEGER PRIMARY KEY,
    SystemName TEXT,
    Description TEXT,
    Value REAL,
    Units TEXT
)
"#;

const CREATE_COMPONENT_SIZES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ComponentSizes (
    ComponentSizesIndex INTEGER PRIMARY KEY,
    CompType TEXT,
    CompName TEXT,
    Description TEXT,
    Value REAL,
    Units TEXT
)
"#;

const CREATE_DAYLIGHT_MAP_TITLES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS DaylightMapTitles (
    MapNumber INTEGER PRIMARY KEY,
    MapName TEXT,
    Environment TEXT,
    Zone INTEGER,
    ReferencePt1 TEXT,
    ReferencePt2 TEXT,
    Z REAL,
    FOREIGN KEY (Zone) REFERENCES Zones(ZoneIndex)
)
"#;

const CREATE_DAYLIGHT_MAP_HOURLY_REPORTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS DaylightMapHourlyReports (
    HourlyReportIndex INTEGER PRIMARY KEY,
    MapNumber INTEGER,
    Month INTEGER,
    DayOfMonth INTEGER,
    Hour INTEGER,
    FOREIGN KEY (MapNumber) REFERENCES DaylightMapTitles(MapNumber)
)
"#;

const CREATE_DAYLIGHT_MAP_HOURLY_DATA_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS DaylightMapHourlyData (
    HourlyDataIndex INTEGER PRIMARY KEY,
    HourlyReportIndex INTEGER,
    X REAL,
    Y REAL,
    Illuminance REAL,
    FOREIGN KEY (HourlyReportIndex) REFERENCES DaylightMapHourlyReports(HourlyReportIndex)
)
"#;

const CREATE_REPORT_VARIABLE_WITH_TIME_VIEW: &str = r#"
CREATE VIEW IF NOT EXISTS ReportVariableWithTime AS
SELECT ReportData.ReportDataIndex, Time.TimeIndex, Time.EnvironmentPeriodIndex,
       Time.Month, Time.Day, Time.Hour, Time.Minute, Time.Dst, Time.Interval,
       Time.IntervalType, Time.SimulationDays, Time.DayType, Time.WarmupFlag,
       ReportData.Value, ReportDataDictionary.ReportDataDictionaryIndex,
       ReportDataDictionary.Type, ReportDataDictionary.IndexGroup,
       ReportDataDictionary.TimestepType, ReportDataDictionary.KeyValue,
       ReportDataDictionary.Name, ReportDataDictionary.ReportingFrequency,
       ReportDataDictionary.ScheduleName, ReportDataDictionary.Units
FROM ReportData
INNER JOIN ReportDataDictionary
    ON ReportData.ReportDataDictionaryIndex = ReportDataDictionary.ReportDataDictionaryIndex
INNER JOIN Time ON ReportData.TimeIndex = Time.TimeIndex
WHERE ReportDataDictionary.IsMeter = 0
"#;

const CREATE_REPORT_METER_WITH_TIME_VIEW: &str = r#"
CREATE VIEW IF NOT EXISTS ReportMeterWithTime AS
SELECT ReportData.ReportDataIndex, Time.TimeIndex, Time.EnvironmentPeriodIndex,
       Time.Month, Time.Day, Time.Hour, Time.Minute, Time.Dst, Time.Interval,
       Time.IntervalType, Time.SimulationDays, Time.DayType, Time.WarmupFlag,
       ReportData.Value, ReportDataDictionary.ReportDataDictionaryIndex,
       ReportDataDictionary.Type, ReportDataDictionary.IndexGroup,
       ReportDataDictionary.TimestepType, ReportDataDictionary.KeyValue,
       ReportDataDictionary.Name, ReportDataDictionary.ReportingFrequency,
       ReportDataDictionary.ScheduleName, ReportDataDictionary.Units
FROM ReportData
INNER JOIN ReportDataDictionary
    ON ReportData.ReportDataDictionaryIndex = ReportDataDictionary.ReportDataDictionaryIndex
INNER JOIN Time ON ReportData.TimeIndex = Time.TimeIndex
WHERE ReportDataDictionary.IsMeter = 1
"#;

const CREATE_TABULAR_DATA_WITH_STRINGS_VIEW: &str = r#"
CREATE VIEW IF NOT EXISTS TabularDataWithStrings AS
SELECT td.TabularDataIndex, td.Value AS Value,
       reportn.Value AS ReportName, fs.Value AS ReportForString,
       tn.Value AS TableName, rn.Value AS RowName, cn.Value AS ColumnName,
       u.Value AS Units, td.RowId, td.ColumnId
FROM TabularData AS td
INNER JOIN Strings AS reportn ON reportn.StringIndex = td.ReportNameIndex
INNER JOIN Strings AS fs ON fs.StringIndex = td.ReportForStringIndex
INNER JOIN Strings AS tn ON tn.StringIndex = td.TableNameIndex
INNER JOIN Strings AS rn ON rn.StringIndex = td.RowNameIndex
INNER JOIN Strings AS cn ON cn.StringIndex = td.ColumnNameIndex
INNER JOIN Strings AS u ON u.StringIndex = td.UnitsIndex
"#;

const CREATE_DAYLIGHT_MAPS_VIEW: &str = r#"
CREATE VIEW IF NOT EXISTS DaylightMaps AS
SELECT t.MapNumber, t.MapName, t.Environment, t.Zone, t.ReferencePt1,
       t.ReferencePt2, t.Z, r.Month, r.DayOfMonth, r.Hour, d.X, d.Y, d.Illuminance
FROM DaylightMapTitles AS t
INNER JOIN DaylightMapHourlyReports AS r ON r.MapNumber = t.MapNumber
INNER JOIN DaylightMapHourlyData AS d ON d.HourlyReportIndex = r.HourlyReportIndex
"#;

/// SQL to create indexes for common queries (built after the run)
const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_report_data_dictionary ON ReportData(ReportDataDictionaryIndex)",
    "CREATE INDEX IF NOT EXISTS idx_report_data_time ON ReportData(TimeIndex)",
    "CREATE INDEX IF NOT EXISTS idx_report_dictionary_meter ON ReportDataDictionary(IsMeter)",
    "CREATE INDEX IF NOT EXISTS idx_report_extended_data ON ReportExtendedData(ReportDataIndex)",
    "CREATE INDEX IF NOT EXISTS idx_construction_layers ON ConstructionLayers(ConstructionIndex)",
    "CREATE INDEX IF NOT EXISTS idx_daylight_hourly_data ON DaylightMapHourlyData(HourlyReportIndex)",
    "CREATE INDEX IF NOT EXISTS idx_tabular_data_report ON TabularData(ReportNameIndex, TableNameIndex)",
];

/// SQLite pragmas for write throughput. WAL keeps uncommitted batches out
/// of the main file, so an abandoned transaction is simply lost.
const WRITE_PRAGMAS: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA cache_size = -64000;      -- 64MB cache
PRAGMA temp_store = MEMORY;
PRAGMA locking_mode = EXCLUSIVE;
PRAGMA foreign_keys = OFF;
"#;

/// SQLite pragmas for read-optimized queries (applied after the run)
const READ_PRAGMAS: &str = r#"
PRAGMA synchronous = FULL;
PRAGMA locking_mode = NORMAL;
"#;

/// Every table in creation order
fn table_statements() -> Vec<(&'static str, String)> {
    let mut tables: Vec<(&'static str, String)> = vec![
        ("Simulations", CREATE_SIMULATIONS_TABLE.to_string()),
        ("EnvironmentPeriods", CREATE_ENVIRONMENT_PERIODS_TABLE.to_string()),
        ("Errors", CREATE_ERRORS_TABLE.to_string()),
        ("Time", CREATE_TIME_TABLE.to_string()),
        ("ReportDataDictionary", CREATE_REPORT_DATA_DICTIONARY_TABLE.to_string()),
        ("ReportData", CREATE_REPORT_DATA_TABLE.to_string()),
        ("ReportExtendedData", CREATE_REPORT_EXTENDED_DATA_TABLE.to_string()),
        ("StringTypes", CREATE_STRING_TYPES_TABLE.to_string()),
        ("Strings", CREATE_STRINGS_TABLE.to_string()),
        ("TabularData", CREATE_TABULAR_DATA_TABLE.to_string()),
        ("Zones", CREATE_ZONES_TABLE.to_string()),
        ("ZoneLists", CREATE_ZONE_LISTS_TABLE.to_string()),
        ("ZoneInfoZoneLists", CREATE_ZONE_INFO_ZONE_LISTS_TABLE.to_string()),
        ("ZoneGroups", CREATE_ZONE_GROUPS_TABLE.to_string()),
        ("Schedules", CREATE_SCHEDULES_TABLE.to_string()),
        ("Materials", CREATE_MATERIALS_TABLE.to_string()),
        ("Constructions", CREATE_CONSTRUCTIONS_TABLE.to_string()),
        ("ConstructionLayers", CREATE_CONSTRUCTION_LAYERS_TABLE.to_string()),
        ("Surfaces", CREATE_SURFACES_TABLE.to_string()),
        ("NominalLighting", CREATE_NOMINAL_LIGHTING_TABLE.to_string()),
        ("NominalPeople", CREATE_NOMINAL_PEOPLE_TABLE.to_string()),
    ];

    for (table, key) in EQUIPMENT_TABLES {
        tables.push((table, equipment_table_sql(table, key)));
    }

    tables.extend([
        ("NominalBaseboardHeat", CREATE_NOMINAL_BASEBOARD_HEAT_TABLE.to_string()),
        ("Infiltration", CREATE_INFILTRATION_TABLE.to_string()),
        ("Ventilation", CREATE_VENTILATION_TABLE.to_string()),
        ("RoomAirModels", CREATE_ROOM_AIR_MODELS_TABLE.to_string()),
        ("ZoneSizes", CREATE_ZONE_SIZES_TABLE.to_string()),
        ("SystemSizes", CREATE_SYSTEM_SIZES_TABLE.to_string()),
        ("ComponentSizes", CREATE_COMPONENT_SIZES_TABLE.to_string()),
        ("DaylightMapTitles", CREATE_DAYLIGHT_MAP_TITLES_TABLE.to_string()),
        ("DaylightMapHourlyReports", CREATE_DAYLIGHT_MAP_HOURLY_REPORTS_TABLE.to_string()),
        ("DaylightMapHourlyData", CREATE_DAYLIGHT_MAP_HOURLY_DATA_TABLE.to_string()),
    ]);

    tables
}

fn equipment_table_sql(table: &str, key: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (
    {key} INTEGER PRIMARY KEY,
    ObjectName TEXT,
    ZoneIndex INTEGER,
    ScheduleIndex INTEGER,
    DesignLevel REAL,
    FractionLatent REAL,
    FractionRadiant REAL,
    FractionLost REAL,
    FractionConvected REAL,
    EndUseSubcategory TEXT,
    FOREIGN KEY (ZoneIndex) REFERENCES Zones(ZoneIndex),
    FOREIGN KEY (ScheduleIndex) REFERENCES Schedules(ScheduleIndex)
)"
    )
}

const VIEWS: [(&str, &str); 4] = [
    ("ReportVariableWithTime", CREATE_REPORT_VARIABLE_WITH_TIME_VIEW),
    ("ReportMeterWithTime", CREATE_REPORT_METER_WITH_TIME_VIEW),
    ("TabularDataWithStrings", CREATE_TABULAR_DATA_WITH_STRINGS_VIEW),
    ("DaylightMaps", CREATE_DAYLIGHT_MAPS_VIEW),
];

/// Names of all tables created by [`create_database`]
pub fn table_names() -> Vec<&'static str> {
    table_statements().into_iter().map(|(name, _)| name).collect()
}

/// Names of all views created by [`create_database`]
pub fn view_names() -> Vec<&'static str> {
    VIEWS.iter().map(|(name, _)| *name).collect()
}

/// Create and configure a new database for writing
///
/// Applies write pragmas, creates every table and view, and seeds the
/// string type names. Any failure here is fatal for the writer.
pub fn create_database(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(WRITE_PRAGMAS)
        .map_err(|source| DbError::Schema {
            object: "pragmas",
            source,
        })?;

    for (object, sql) in table_statements() {
        conn.execute(&sql, [])
            .map_err(|source| DbError::Schema { object, source })?;
    }

    for (object, sql) in VIEWS {
        conn.execute(sql, [])
            .map_err(|source| DbError::Schema { object, source })?;
    }

    seed_string_types(conn)?;

    Ok(())
}

/// Insert the dimension names for interned strings
fn seed_string_types(conn: &Connection) -> DbResult<()> {
    for ty in StringType::ALL {
        conn.execute(
            "INSERT OR IGNORE INTO StringTypes (StringTypeIndex, Value) VALUES (?1, ?2)",
            rusqlite::params![ty.as_db_int(), ty.name()],
        )
        .map_err(|source| DbError::Schema {
            object: "StringTypes",
            source,
        })?;
    }
    Ok(())
}

/// Create indexes (called after the run for better insert performance)
pub fn create_indexes(conn: &Connection) -> DbResult<()> {
    for sql in CREATE_INDEXES {
        conn.execute(sql, [])
            .map_err(|source| DbError::Schema {
                object: "indexes",
                source,
            })?;
    }
    Ok(())
}

/// Apply read-optimized settings
pub fn optimize_for_reads(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(READ_PRAGMAS)?;

    // Update statistics for the query planner
    conn.execute("ANALYZE", [])?;

    Ok(())
}
