//! Single-connection SQLite writer for simulation output
//!
//! [`SqlOutput`] owns the database connection for the whole run. The engine
//! calls it synchronously from its own thread; rows land in exactly the
//! order the calls are made.
//!
//! # Write pipeline
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                    Simulation engine                      │
//! │  dictionaries ─ time index ─ data rows ─ entities ─ ...   │
//! └─────────────────────────────┬─────────────────────────────┘
//!                               │ create_* / add_* calls
//!                               ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │                        SqlOutput                          │
//! │  - begin/commit batches                                   │
//! │  - current time index and environment period              │
//! │  - string interning, dictionary ids                       │
//! │  - failures mirrored to the diagnostics sink              │
//! └─────────────────────────────┬─────────────────────────────┘
//!                               │ cached prepared statements
//!                               ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │                SQLite file (WAL, exclusive)               │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! When output is disabled in the configuration no connection is opened and
//! every call succeeds without writing.

use crate::config::OutputConfig;
use crate::db::diagnostics::DiagnosticsSink;
use crate::db::extended::{ExtendedOutput, ExtendedOutputSummary};
use crate::db::schema;
use crate::db::statement::{self, BoundStatement, StatementKind};
use crate::db::strings::{StringInterner, StringType};
use crate::error::{DbError, DbResult};
use crate::model::{
    AirModelData, AirflowData, BaseboardHeatData, ConstructionData, LightsData, MaterialData,
    PeopleData, ScheduleData, SurfaceData, ZoneData, ZoneEquipData, ZoneGroupData, ZoneListData,
};
use crate::records::{
    AirflowKind, AirflowRecord, BaseboardHeatRecord, ConstructionRecord, EquipmentKind,
    EquipmentRecord, LightingRecord, MaterialRecord, PeopleRecord, RoomAirModelRecord,
    ScheduleRecord, SurfaceRecord, ZoneGroupRecord, ZoneListRecord, ZoneRecord,
};
use crate::report::{
    days_in_month, normalize_hour_minute, split_units, EnvironmentKind, ErrorKind, PackedDate,
    ReportingFrequency, StoreType, TimestepType,
};
use rusqlite::Connection;
use std::collections::HashSet;
use tracing::{debug, info, trace, warn};

/// Timestamp format of `Simulations.TimeStamp`
const TIMESTAMP_FORMAT: &str = "YYYY.MM.DD HH:MM";
const CHRONO_TIMESTAMP_FORMAT: &str = "%Y.%m.%d %H:%M";

const MINUTES_PER_HOUR: i32 = 60;
const MINUTES_PER_DAY: i32 = 1440;

/// Dictionary row for one report variable or meter
#[derive(Debug, Clone, Copy)]
pub struct DictionaryEntry<'a> {
    /// Engine-assigned id, unique across variables and meters
    pub id: i32,
    pub store_type: StoreType,
    pub index_group: &'a str,
    pub timestep_type: TimestepType,
    pub key_value: &'a str,
    pub name: &'a str,
    pub frequency: ReportingFrequency,
    pub schedule_name: Option<&'a str>,
    pub units: &'a str,
}

/// Min/max statistics accompanying an aggregated data row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtendedStats {
    pub min_value: f64,
    /// Packed `MMDDHHMM` date of the minimum
    pub min_date: i32,
    pub max_value: f64,
    /// Packed `MMDDHHMM` date of the maximum
    pub max_date: i32,
    pub minutes_per_timestep: i32,
}

/// Calendar position of one reporting interval
///
/// Which fields are required depends on `frequency`: sub-hourly rows need
/// the full stamp, hourly rows month/day/hour, daily rows month/day,
/// monthly rows the month, run-period rows none.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeIndexEntry {
    pub frequency: ReportingFrequency,
    /// Engine-side record counter, logged only
    pub record_index: i32,
    pub cumulative_sim_days: i32,
    pub month: Option<i32>,
    pub day: Option<i32>,
    pub hour: Option<i32>,
    pub end_minute: Option<f64>,
    pub start_minute: Option<f64>,
    pub dst: Option<bool>,
    pub day_type: Option<String>,
    pub warmup: bool,
}

impl TimeIndexEntry {
    pub fn new(frequency: ReportingFrequency, cumulative_sim_days: i32) -> Self {
        Self {
            frequency,
            record_index: 0,
            cumulative_sim_days,
            month: None,
            day: None,
            hour: None,
            end_minute: None,
            start_minute: None,
            dst: None,
            day_type: None,
            warmup: false,
        }
    }

    pub fn date(mut self, month: i32, day: i32) -> Self {
        self.month = Some(month);
        self.day = Some(day);
        self
    }

    pub fn hour(mut self, hour: i32) -> Self {
        self.hour = Some(hour);
        self
    }

    pub fn minutes(mut self, start_minute: f64, end_minute: f64) -> Self {
        self.start_minute = Some(start_minute);
        self.end_minute = Some(end_minute);
        self
    }

    pub fn day_type(mut self, day_type: &str, dst: bool) -> Self {
        self.day_type = Some(day_type.to_string());
        self.dst = Some(dst);
        self
    }

    pub fn warmup(mut self, warmup: bool) -> Self {
        self.warmup = warmup;
        self
    }
}

/// Columns of one `Time` row after frequency rules are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TimeRow {
    month: Option<i32>,
    day: Option<i32>,
    hour: Option<i32>,
    minute: Option<i32>,
    interval: i32,
}

/// Run-level facts stored in `Simulations`
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationInfo {
    pub program_version: String,
    /// Defaults to the local time of the call, `YYYY.MM.DD HH:MM`
    pub timestamp: Option<String>,
    pub timesteps_per_hour: i32,
}

/// Design load and flow for one zone and load type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneSizing {
    pub zone_name: String,
    /// `Cooling` or `Heating`
    pub load_type: String,
    pub calc_des_load: f64,
    pub user_des_load: f64,
    pub calc_des_flow: f64,
    pub user_des_flow: f64,
    pub des_day_name: String,
    pub peak_hr_min: String,
    pub peak_temp: f64,
    pub peak_hum_rat: f64,
    pub calc_outside_air_flow: f64,
}

/// Header row of one daylighting illuminance map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DaylightMapTitle<'a> {
    pub map_number: i32,
    pub map_name: &'a str,
    pub environment: &'a str,
    pub zone: i32,
    pub reference_pt1: &'a str,
    pub reference_pt2: &'a str,
    pub z: f64,
}

/// One hour of a daylighting map
///
/// `illuminance[i][j]` is the value at `(x[i], y[j])`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DaylightMapHour<'a> {
    pub map_number: i32,
    pub month: i32,
    pub day_of_month: i32,
    pub hour: i32,
    pub x: &'a [f64],
    pub y: &'a [f64],
    pub illuminance: &'a [Vec<f64>],
}

/// SQLite output writer
pub struct SqlOutput {
    /// `None` when output is disabled
    conn: Option<Connection>,
    config: OutputConfig,
    strings: StringInterner,
    diagnostics: DiagnosticsSink,
    in_transaction: bool,
    /// Id of the last `Time` row written, 0 before the first
    time_index: i32,
    /// Row data records bind to; cleared when a time call fails
    current_time: Option<i32>,
    /// Current environment period, 0 before the first
    environment: i32,
    last_simulation: Option<i32>,
    last_error: Option<i64>,
    dictionaries: HashSet<i32>,
    pending: ExtendedOutput,
}

impl SqlOutput {
    /// Open the output database and create the schema
    ///
    /// Schema and statement preparation failures are fatal and returned
    /// here; nothing is written afterwards without a valid schema.
    pub fn open(config: OutputConfig) -> DbResult<Self> {
        if !config.write_output {
            info!("SQLite output disabled");
            return Ok(Self::with_connection(None, config, DiagnosticsSink::discard()));
        }

        let diagnostics = match config.error_path {
            Some(ref path) => {
                DiagnosticsSink::to_file(path).map_err(|e| DbError::CreateFailed {
                    path: path.clone(),
                    reason: format!("Failed to create diagnostics file: {}", e),
                })?
            }
            None => DiagnosticsSink::discard(),
        };

        let conn = Connection::open(&config.db_path).map_err(|e| DbError::CreateFailed {
            path: config.db_path.clone(),
            reason: e.to_string(),
        })?;

        let mut output = Self::with_connection(Some(conn), config, diagnostics);
        if let Err(e) = output.initialize() {
            output
                .diagnostics
                .report("Database initialization failed", &e);
            return Err(e);
        }

        info!(
            path = %output.config.db_path.display(),
            tabular = output.config.write_tabular,
            "SQLite output opened"
        );
        Ok(output)
    }

    fn with_connection(
        conn: Option<Connection>,
        config: OutputConfig,
        diagnostics: DiagnosticsSink,
    ) -> Self {
        Self {
            conn,
            config,
            strings: StringInterner::new(),
            diagnostics,
            in_transaction: false,
            time_index: 0,
            current_time: None,
            environment: 0,
            last_simulation: None,
            last_error: None,
            dictionaries: HashSet::new(),
            pending: ExtendedOutput::default(),
        }
    }

    fn initialize(&self) -> DbResult<()> {
        if let Some(ref conn) = self.conn {
            schema::create_database(conn)?;
            statement::prepare_all(conn)?;
        }
        Ok(())
    }

    pub fn write_output_enabled(&self) -> bool {
        self.conn.is_some()
    }

    pub fn write_tabular_data_enabled(&self) -> bool {
        self.conn.is_some() && self.config.write_tabular
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    /// Underlying connection, for reading back what was written
    pub fn connection(&self) -> Option<&Connection> {
        self.conn.as_ref()
    }

    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    /// Id of the `Time` row data records currently bind to
    ///
    /// 0 before the first time row and after a failed time call.
    pub fn current_time_index(&self) -> i32 {
        self.current_time.unwrap_or(0)
    }

    /// Number of messages written to the diagnostics sink
    pub fn diagnostics_count(&self) -> u64 {
        self.diagnostics.message_count()
    }

    /// Write a free-form line to the diagnostics sink
    pub fn write_message(&mut self, message: &str) {
        self.diagnostics.write_message(message);
    }

    fn checked<T>(&mut self, context: &str, result: DbResult<T>) -> DbResult<T> {
        if let Err(ref e) = result {
            self.diagnostics.report(context, e);
        }
        result
    }

    // ------------------------------------------------------------------
    // Transactions
    // ------------------------------------------------------------------

    /// Open a batch of writes
    ///
    /// # Panics
    ///
    /// Panics if a transaction is already open.
    pub fn begin(&mut self) -> DbResult<()> {
        assert!(
            !self.in_transaction,
            "begin() called while a transaction is already open"
        );
        if let Some(ref conn) = self.conn {
            let result = conn.execute_batch("BEGIN").map_err(DbError::from);
            self.checked("Begin transaction failed", result)?;
        }
        self.in_transaction = true;
        Ok(())
    }

    /// Commit the open batch
    ///
    /// # Panics
    ///
    /// Panics if no transaction is open.
    pub fn commit(&mut self) -> DbResult<()> {
        assert!(self.in_transaction, "commit() called without an open transaction");
        if let Some(ref conn) = self.conn {
            let result = conn.execute_batch("COMMIT").map_err(DbError::from);
            self.checked("Commit transaction failed", result)?;
        }
        self.in_transaction = false;
        Ok(())
    }

    /// Abandon the open transaction after a failed commit
    fn rollback(&mut self) {
        if let Some(ref conn) = self.conn {
            // A failed COMMIT may already have ended the transaction
            if let Err(e) = conn.execute_batch("ROLLBACK") {
                debug!(error = %e, "Rollback after failed commit");
            }
        }
        self.in_transaction = false;
        warn!("Transaction rolled back");
    }

    // ------------------------------------------------------------------
    // Run records
    // ------------------------------------------------------------------

    /// Insert the run-start row
    pub fn create_simulations_record(&mut self, id: i32, info: &SimulationInfo) -> DbResult<()> {
        let Some(ref conn) = self.conn else {
            return Ok(());
        };

        let timestamp = info.timestamp.clone().unwrap_or_else(|| {
            chrono::Local::now()
                .format(CHRONO_TIMESTAMP_FORMAT)
                .to_string()
        });
        trace!(format = TIMESTAMP_FORMAT, %timestamp, "Simulation timestamp");

        let result = (|| {
            let mut stmt = BoundStatement::prepare(conn, StatementKind::SimulationsInsert)?;
            stmt.bind_int(1, id.into())?;
            stmt.bind_text(2, &info.program_version)?;
            stmt.bind_text(3, &timestamp)?;
            stmt.bind_int(4, info.timesteps_per_hour.into())?;
            stmt.bind_bool(5, false)?;
            stmt.bind_bool(6, false)?;
            stmt.step()
        })();
        self.checked("Simulations", result)?;

        self.last_simulation = Some(id);
        debug!(id, version = %info.program_version, "Simulation record created");
        Ok(())
    }

    /// Set the completion flags of the most recent simulation row
    pub fn update_simulation_record(&mut self, completed: bool, success: bool) -> DbResult<()> {
        let Some(ref conn) = self.conn else {
            return Ok(());
        };

        let result = match self.last_simulation {
            None => Err(DbError::NoPriorRow {
                table: "Simulations",
            }),
            Some(id) => (|| {
                let mut stmt = BoundStatement::prepare(conn, StatementKind::SimulationsUpdate)?;
                stmt.bind_bool(1, completed)?;
                stmt.bind_bool(2, success)?;
                stmt.bind_int(3, id.into())?;
                match stmt.step()? {
                    0 => Err(DbError::NoPriorRow {
                        table: "Simulations",
                    }),
                    _ => Ok(()),
                }
            })(),
        };
        self.checked("Simulations update", result)
    }

    /// Insert an environment period under the current simulation and make
    /// it the period stamped on subsequent time rows
    pub fn create_environment_period_record(
        &mut self,
        index: i32,
        name: &str,
        kind: EnvironmentKind,
    ) -> DbResult<()> {
        let Some(ref conn) = self.conn else {
            return Ok(());
        };

        let result = match self.last_simulation {
            None => Err(DbError::NoPriorRow {
                table: "Simulations",
            }),
            Some(simulation) => (|| {
                let mut stmt =
                    BoundStatement::prepare(conn, StatementKind::EnvironmentPeriodsInsert)?;
                stmt.bind_int(1, index.into())?;
                stmt.bind_int(2, simulation.into())?;
                stmt.bind_text(3, name)?;
                stmt.bind_int(4, kind.as_db_int().into())?;
                stmt.step().map(|_| ())
            })(),
        };
        self.checked("EnvironmentPeriods", result)?;

        self.environment = index;
        debug!(index, name, "Environment period started");
        Ok(())
    }

    /// Insert an error row, which becomes the row `update_error_record`
    /// appends to
    pub fn create_error_record(
        &mut self,
        simulation_id: i32,
        kind: ErrorKind,
        message: &str,
        count: i32,
    ) -> DbResult<()> {
        let Some(ref conn) = self.conn else {
            return Ok(());
        };

        let result = (|| -> DbResult<i64> {
            let mut stmt = BoundStatement::prepare(conn, StatementKind::ErrorsInsert)?;
            stmt.bind_int(1, simulation_id.into())?;
            stmt.bind_int(2, kind.as_db_int().into())?;
            stmt.bind_text(3, message)?;
            stmt.bind_int(4, count.into())?;
            stmt.step()?;
            Ok(conn.last_insert_rowid())
        })();
        let row = self.checked("Errors", result)?;

        self.last_error = Some(row);
        Ok(())
    }

    /// Append `message` to the most recent error row
    pub fn update_error_record(&mut self, message: &str) -> DbResult<()> {
        let Some(ref conn) = self.conn else {
            return Ok(());
        };

        let result = match self.last_error {
            None => Err(DbError::NoPriorRow { table: "Errors" }),
            Some(row) => (|| {
                let mut stmt = BoundStatement::prepare(conn, StatementKind::ErrorsUpdate)?;
                stmt.bind_text(1, message)?;
                stmt.bind_int(2, row)?;
                stmt.step().map(|_| ())
            })(),
        };
        self.checked("Errors update", result)
    }

    // ------------------------------------------------------------------
    // Time series
    // ------------------------------------------------------------------

    /// Record a report variable's dictionary row
    pub fn create_report_variable_dictionary_record(
        &mut self,
        entry: &DictionaryEntry<'_>,
    ) -> DbResult<()> {
        self.create_dictionary_record(entry, false)
    }

    /// Record a meter's dictionary row
    pub fn create_meter_dictionary_record(&mut self, entry: &DictionaryEntry<'_>) -> DbResult<()> {
        self.create_dictionary_record(entry, true)
    }

    fn create_dictionary_record(&mut self, entry: &DictionaryEntry<'_>, is_meter: bool) -> DbResult<()> {
        let Some(ref conn) = self.conn else {
            return Ok(());
        };

        let result = if self.dictionaries.contains(&entry.id) {
            Err(DbError::DuplicateDictionary(entry.id))
        } else {
            (|| {
                let mut stmt =
                    BoundStatement::prepare(conn, StatementKind::ReportDataDictionaryInsert)?;
                stmt.bind_int(1, entry.id.into())?;
                stmt.bind_bool(2, is_meter)?;
                stmt.bind_text(3, entry.store_type.name())?;
                stmt.bind_text(4, entry.index_group)?;
                stmt.bind_text(5, entry.timestep_type.name())?;
                stmt.bind_text(6, entry.key_value)?;
                stmt.bind_text(7, entry.name)?;
                stmt.bind_text(8, entry.frequency.name())?;
                stmt.bind_opt_text(9, entry.schedule_name)?;
                stmt.bind_text(10, entry.units)?;
                stmt.step().map(|_| ())
            })()
        };
        self.checked("ReportDataDictionary", result)?;

        self.dictionaries.insert(entry.id);
        trace!(id = entry.id, name = entry.name, is_meter, "Dictionary record created");
        Ok(())
    }

    /// Insert a `Time` row and make it the current time index
    ///
    /// Ids are dense and only advance when the row is written. A failed
    /// call leaves no current time index, so data records are rejected
    /// with [`DbError::NoTimeIndex`] until the next time row succeeds.
    pub fn create_time_index_record(&mut self, entry: &TimeIndexEntry) -> DbResult<i32> {
        let Some(ref conn) = self.conn else {
            return Ok(0);
        };

        self.current_time = None;
        let index = self.time_index + 1;
        let environment = (self.environment > 0).then_some(self.environment);

        let result = time_row(entry).and_then(|row| {
            let mut stmt = BoundStatement::prepare(conn, StatementKind::TimeInsert)?;
            stmt.bind_int(1, index.into())?;
            stmt.bind_opt_int(2, row.month.map(i64::from))?;
            stmt.bind_opt_int(3, row.day.map(i64::from))?;
            stmt.bind_opt_int(4, row.hour.map(i64::from))?;
            stmt.bind_opt_int(5, row.minute.map(i64::from))?;
            stmt.bind_opt_int(6, entry.dst.map(i64::from))?;
            stmt.bind_int(7, row.interval.into())?;
            stmt.bind_int(8, entry.frequency.code().into())?;
            stmt.bind_int(9, entry.cumulative_sim_days.into())?;
            stmt.bind_opt_text(10, entry.day_type.as_deref())?;
            stmt.bind_opt_int(11, environment.map(i64::from))?;
            stmt.bind_bool(12, entry.warmup)?;
            stmt.step().map(|_| ())
        });
        self.checked("Time", result)?;

        self.time_index = index;
        self.current_time = Some(index);
        trace!(
            index,
            record_index = entry.record_index,
            frequency = %entry.frequency,
            "Time index record created"
        );
        Ok(index)
    }

    /// Insert a report variable value at the current time index
    pub fn create_report_variable_data_record(
        &mut self,
        id: i32,
        value: f64,
        frequency: ReportingFrequency,
        stats: Option<&ExtendedStats>,
    ) -> DbResult<()> {
        self.create_data_record("ReportData", id, value, frequency, stats)
    }

    /// Insert a meter value at the current time index
    pub fn create_meter_record(
        &mut self,
        id: i32,
        value: f64,
        frequency: ReportingFrequency,
        stats: Option<&ExtendedStats>,
    ) -> DbResult<()> {
        self.create_data_record("ReportData (meter)", id, value, frequency, stats)
    }

    fn create_data_record(
        &mut self,
        context: &str,
        id: i32,
        value: f64,
        frequency: ReportingFrequency,
        stats: Option<&ExtendedStats>,
    ) -> DbResult<()> {
        let Some(ref conn) = self.conn else {
            return Ok(());
        };

        let extended = stats.filter(|s| {
            frequency.has_extended_data() && s.min_date != 0 && s.max_date != 0
        });

        let result = if !self.dictionaries.contains(&id) {
            Err(DbError::UnknownDictionary(id))
        } else if extended.is_some_and(|s| s.minutes_per_timestep <= 0) {
            Err(DbError::InvalidInput(format!(
                "minutes per timestep must be positive for dictionary id {id}"
            )))
        } else if let Some(time_index) = self.current_time {
            (|| -> DbResult<()> {
                let mut stmt = BoundStatement::prepare(conn, StatementKind::ReportDataInsert)?;
                stmt.bind_int(1, time_index.into())?;
                stmt.bind_int(2, id.into())?;
                stmt.bind_real(3, value)?;
                stmt.step()?;

                if let Some(stats) = extended {
                    insert_extended_data(conn, conn.last_insert_rowid(), stats)?;
                }
                Ok(())
            })()
        } else {
            Err(DbError::NoTimeIndex)
        };
        self.checked(context, result)
    }

    // ------------------------------------------------------------------
    // Tabular reports
    // ------------------------------------------------------------------

    /// Write one printed report table as a fact row per cell
    ///
    /// `body[row][column]` holds the cell text. Returns the number of cells
    /// written; 0 when tabular output is disabled.
    pub fn create_tabular_data_records<S: AsRef<str>>(
        &mut self,
        body: &[Vec<S>],
        row_labels: &[S],
        column_labels: &[S],
        report_name: &str,
        report_for: &str,
        table_name: &str,
    ) -> DbResult<usize> {
        if !self.write_tabular_data_enabled() {
            return Ok(0);
        }
        let Some(ref conn) = self.conn else {
            return Ok(0);
        };

        let strings = &mut self.strings;
        let simulation = self.last_simulation;
        let result = check_grid(body, row_labels.len(), column_labels.len()).and_then(|()| {
            let report = strings.intern(conn, report_name, StringType::ReportName)?;
            let report_for = strings.intern(conn, report_for, StringType::ReportForString)?;
            let table = strings.intern(conn, table_name, StringType::TableName)?;

            let columns = column_labels
                .iter()
                .map(|label| split_units(label.as_ref()))
                .collect::<Vec<_>>();

            let mut cells = 0;
            for (row_id, (row_label, row)) in row_labels.iter().zip(body).enumerate() {
                let (row_name, row_units) = split_units(row_label.as_ref());
                let row_name = strings.intern(conn, &row_name, StringType::RowName)?;

                for (column_id, ((column_name, column_units), cell)) in
                    columns.iter().zip(row).enumerate()
                {
                    let units = if column_units.is_empty() {
                        &row_units
                    } else {
                        column_units
                    };
                    let column_name = strings.intern(conn, column_name, StringType::ColumnName)?;
                    let units = strings.intern(conn, units, StringType::Units)?;

                    let mut stmt = BoundStatement::prepare(conn, StatementKind::TabularDataInsert)?;
                    stmt.bind_int(1, report)?;
                    stmt.bind_int(2, report_for)?;
                    stmt.bind_int(3, table)?;
                    stmt.bind_int(4, row_name)?;
                    stmt.bind_int(5, column_name)?;
                    stmt.bind_int(6, units)?;
                    stmt.bind_opt_int(7, simulation.map(i64::from))?;
                    stmt.bind_int(8, row_id as i64 + 1)?;
                    stmt.bind_int(9, column_id as i64 + 1)?;
                    stmt.bind_text(10, cell.as_ref())?;
                    stmt.step()?;
                    cells += 1;
                }
            }
            Ok(cells)
        });
        let cells = self.checked("TabularData", result)?;

        debug!(report_name, table_name, cells, "Tabular report written");
        Ok(cells)
    }

    // ------------------------------------------------------------------
    // Daylighting
    // ------------------------------------------------------------------

    /// Insert the header row of a daylighting map
    pub fn create_daylight_map_title(&mut self, title: &DaylightMapTitle<'_>) -> DbResult<()> {
        let Some(ref conn) = self.conn else {
            return Ok(());
        };

        let result = (|| {
            let mut stmt = BoundStatement::prepare(conn, StatementKind::DaylightMapTitlesInsert)?;
            stmt.bind_int(1, title.map_number.into())?;
            stmt.bind_text(2, title.map_name)?;
            stmt.bind_text(3, title.environment)?;
            stmt.bind_int(4, title.zone.into())?;
            stmt.bind_text(5, title.reference_pt1)?;
            stmt.bind_text(6, title.reference_pt2)?;
            stmt.bind_real(7, title.z)?;
            stmt.step().map(|_| ())
        })();
        self.checked("DaylightMapTitles", result)
    }

    /// Insert one hour of a daylighting map: a report row plus one data row
    /// per grid point. Returns the number of grid points written.
    pub fn create_daylight_map(&mut self, hour: &DaylightMapHour<'_>) -> DbResult<usize> {
        let Some(ref conn) = self.conn else {
            return Ok(0);
        };

        let result = check_grid(hour.illuminance, hour.x.len(), hour.y.len()).and_then(|()| {
            let mut report =
                BoundStatement::prepare(conn, StatementKind::DaylightMapHourlyReportsInsert)?;
            report.bind_int(1, hour.map_number.into())?;
            report.bind_int(2, hour.month.into())?;
            report.bind_int(3, hour.day_of_month.into())?;
            report.bind_int(4, hour.hour.into())?;
            report.step()?;
            let report_index = conn.last_insert_rowid();

            let mut data = BoundStatement::prepare(conn, StatementKind::DaylightMapHourlyDataInsert)?;
            let mut points = 0;
            for (&x, column) in hour.x.iter().zip(hour.illuminance) {
                for (&y, &illuminance) in hour.y.iter().zip(column) {
                    data.bind_int(1, report_index)?;
                    data.bind_real(2, x)?;
                    data.bind_real(3, y)?;
                    data.bind_real(4, illuminance)?;
                    data.step()?;
                    points += 1;
                }
            }
            Ok(points)
        });
        self.checked("DaylightMapHourlyData", result)
    }

    // ------------------------------------------------------------------
    // Sizing
    // ------------------------------------------------------------------

    pub fn add_zone_sizing_record(&mut self, sizing: &ZoneSizing) -> DbResult<()> {
        let Some(ref conn) = self.conn else {
            return Ok(());
        };

        let result = (|| {
            let mut stmt = BoundStatement::prepare(conn, StatementKind::ZoneSizesInsert)?;
            stmt.bind_text(1, &sizing.zone_name)?;
            stmt.bind_text(2, &sizing.load_type)?;
            stmt.bind_real(3, sizing.calc_des_load)?;
            stmt.bind_real(4, sizing.user_des_load)?;
            stmt.bind_real(5, sizing.calc_des_flow)?;
            stmt.bind_real(6, sizing.user_des_flow)?;
            stmt.bind_text(7, &sizing.des_day_name)?;
            stmt.bind_text(8, &sizing.peak_hr_min)?;
            stmt.bind_real(9, sizing.peak_temp)?;
            stmt.bind_real(10, sizing.peak_hum_rat)?;
            stmt.bind_real(11, sizing.calc_outside_air_flow)?;
            stmt.step().map(|_| ())
        })();
        self.checked("ZoneSizes", result)
    }

    /// `description` may carry units, e.g. `"Design Air Flow Rate [m3/s]"`
    pub fn add_system_sizing_record(
        &mut self,
        system_name: &str,
        description: &str,
        value: f64,
    ) -> DbResult<()> {
        let Some(ref conn) = self.conn else {
            return Ok(());
        };

        let (description, units) = split_units(description);
        let result = (|| {
            let mut stmt = BoundStatement::prepare(conn, StatementKind::SystemSizesInsert)?;
            stmt.bind_text(1, system_name)?;
            stmt.bind_text(2, &description)?;
            stmt.bind_real(3, value)?;
            stmt.bind_text(4, &units)?;
            stmt.step().map(|_| ())
        })();
        self.checked("SystemSizes", result)
    }

    /// `description` may carry units, e.g. `"Design Size Nominal Capacity [W]"`
    pub fn add_component_sizing_record(
        &mut self,
        component_type: &str,
        component_name: &str,
        description: &str,
        value: f64,
    ) -> DbResult<()> {
        let Some(ref conn) = self.conn else {
            return Ok(());
        };

        let (description, units) = split_units(description);
        let result = (|| {
            let mut stmt = BoundStatement::prepare(conn, StatementKind::ComponentSizesInsert)?;
            stmt.bind_text(1, component_type)?;
            stmt.bind_text(2, component_name)?;
            stmt.bind_text(3, &description)?;
            stmt.bind_real(4, value)?;
            stmt.bind_text(5, &units)?;
            stmt.step().map(|_| ())
        })();
        self.checked("ComponentSizes", result)
    }

    // ------------------------------------------------------------------
    // Zone extended output
    // ------------------------------------------------------------------

    pub fn add_zone(&mut self, number: i32, zone: &ZoneData) {
        if self.write_output_enabled() {
            self.pending.zones.push(ZoneRecord::new(number, zone));
        }
    }

    pub fn add_zone_list(&mut self, number: i32, list: &ZoneListData) {
        if self.write_output_enabled() {
            self.pending.zone_lists.push(ZoneListRecord::new(number, list));
        }
    }

    pub fn add_zone_group(&mut self, number: i32, group: &ZoneGroupData) {
        if self.write_output_enabled() {
            self.pending.zone_groups.push(ZoneGroupRecord::new(number, group));
        }
    }

    pub fn add_schedule(&mut self, number: i32, schedule: &ScheduleData) {
        if self.write_output_enabled() {
            self.pending.schedules.push(ScheduleRecord::new(number, schedule));
        }
    }

    pub fn add_surface(&mut self, number: i32, surface: &SurfaceData, class_name: &str) {
        if self.write_output_enabled() {
            self.pending
                .surfaces
                .push(SurfaceRecord::new(number, surface, class_name));
        }
    }

    pub fn add_material(&mut self, number: i32, material: &MaterialData) {
        if self.write_output_enabled() {
            self.pending.materials.push(MaterialRecord::new(number, material));
        }
    }

    pub fn add_construction(&mut self, number: i32, construction: &ConstructionData, u_value: f64) {
        if self.write_output_enabled() {
            self.pending
                .constructions
                .push(ConstructionRecord::new(number, construction, u_value));
        }
    }

    pub fn add_lighting(&mut self, number: i32, lights: &LightsData) {
        if self.write_output_enabled() {
            self.pending.lighting.push(LightingRecord::new(number, lights));
        }
    }

    pub fn add_people(&mut self, number: i32, people: &PeopleData) {
        if self.write_output_enabled() {
            self.pending.people.push(PeopleRecord::new(number, people));
        }
    }

    pub fn add_equipment(&mut self, kind: EquipmentKind, number: i32, equipment: &ZoneEquipData) {
        if self.write_output_enabled() {
            self.pending
                .equipment
                .push(EquipmentRecord::new(kind, number, equipment));
        }
    }

    pub fn add_baseboard_heat(&mut self, number: i32, baseboard: &BaseboardHeatData) {
        if self.write_output_enabled() {
            self.pending
                .baseboards
                .push(BaseboardHeatRecord::new(number, baseboard));
        }
    }

    pub fn add_infiltration(&mut self, number: i32, airflow: &AirflowData) {
        if self.write_output_enabled() {
            self.pending.infiltration.push(AirflowRecord::new(
                AirflowKind::Infiltration,
                number,
                airflow,
            ));
        }
    }

    pub fn add_ventilation(&mut self, number: i32, airflow: &AirflowData) {
        if self.write_output_enabled() {
            self.pending.ventilation.push(AirflowRecord::new(
                AirflowKind::Ventilation,
                number,
                airflow,
            ));
        }
    }

    pub fn add_room_air_model(&mut self, zone: i32, model: &AirModelData) {
        if self.write_output_enabled() {
            self.pending
                .room_air_models
                .push(RoomAirModelRecord::new(zone, model));
        }
    }

    /// Entity snapshots queued and not yet written
    pub fn pending_extended_output(&self) -> usize {
        self.pending.len()
    }

    /// Write every queued entity snapshot and clear the queue
    ///
    /// Runs in its own transaction unless the caller already opened one.
    /// Individual record failures are reported and counted in the summary;
    /// only a failed begin or commit is returned as an error. When its own
    /// commit fails the transaction is rolled back and the queue is kept,
    /// so the call can be retried.
    pub fn create_zone_extended_output(&mut self) -> DbResult<ExtendedOutputSummary> {
        if self.conn.is_none() {
            self.pending.clear();
            return Ok(ExtendedOutputSummary::default());
        }

        let own_transaction = !self.in_transaction;
        if own_transaction {
            self.begin()?;
        }

        let pending = std::mem::take(&mut self.pending);
        let summary = match self.conn {
            Some(ref conn) => pending.write(conn, &mut self.diagnostics),
            None => ExtendedOutputSummary::default(),
        };

        if own_transaction {
            if let Err(e) = self.commit() {
                self.rollback();
                self.pending = pending;
                return Err(e);
            }
        }

        if summary.is_complete() {
            info!(records = summary.written, "Zone extended output created");
        } else {
            warn!(
                written = summary.written,
                failed = summary.failed,
                "Zone extended output created with failures"
            );
        }
        Ok(summary)
    }

    // ------------------------------------------------------------------
    // Teardown
    // ------------------------------------------------------------------

    /// Build the post-run lookup indexes
    pub fn initialize_indexes(&mut self) -> DbResult<()> {
        let Some(ref conn) = self.conn else {
            return Ok(());
        };
        let result = schema::create_indexes(conn);
        self.checked("Index creation failed", result)
    }

    /// Build indexes, switch to read settings and close the database
    ///
    /// A transaction left open is committed first.
    pub fn finish(mut self) -> DbResult<()> {
        if self.in_transaction {
            warn!("Transaction still open at finish, committing");
            self.commit()?;
        }
        self.initialize_indexes()?;

        let result = match self.conn.take() {
            Some(conn) => schema::optimize_for_reads(&conn).and_then(|()| {
                statement::finalize_all(&conn);
                conn.close().map_err(|(_, e)| DbError::from(e))
            }),
            None => Ok(()),
        };
        self.checked("Close failed", result)?;

        if let Err(e) = self.diagnostics.flush() {
            warn!(error = %e, "Failed to flush diagnostics file");
        }
        info!(messages = self.diagnostics.message_count(), "SQLite output closed");
        Ok(())
    }
}

impl std::fmt::Debug for SqlOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlOutput")
            .field("db_path", &self.config.db_path)
            .field("enabled", &self.conn.is_some())
            .field("in_transaction", &self.in_transaction)
            .field("time_index", &self.time_index)
            .field("dictionaries", &self.dictionaries.len())
            .finish()
    }
}

/// Apply the per-frequency rules to a time index entry
fn time_row(entry: &TimeIndexEntry) -> DbResult<TimeRow> {
    let missing = |field: &str| {
        DbError::InvalidInput(format!(
            "{} time index record requires {field}",
            entry.frequency
        ))
    };
    // Engine hours run 1..=24, the hour ending at the stamp
    let hour = || match entry.hour {
        Some(hour) if (1..=24).contains(&hour) => Ok(hour),
        Some(hour) => Err(DbError::InvalidInput(format!("hour {hour} out of range"))),
        None => Err(missing("hour")),
    };

    if entry.frequency.is_sub_hourly() {
        let month = entry.month.ok_or_else(|| missing("month"))?;
        let day = entry.day.ok_or_else(|| missing("day"))?;
        let hour = hour()?;
        let end = entry.end_minute.ok_or_else(|| missing("end minute"))?;
        let start = entry.start_minute.ok_or_else(|| missing("start minute"))?;

        let interval = (end - start).round() as i32;
        let (hour, minute) = normalize_hour_minute(hour, end.round() as i32);
        return Ok(TimeRow {
            month: Some(month),
            day: Some(day),
            hour: Some(hour),
            minute: Some(minute),
            interval,
        });
    }

    match entry.frequency {
        ReportingFrequency::Hourly => Ok(TimeRow {
            month: Some(entry.month.ok_or_else(|| missing("month"))?),
            day: Some(entry.day.ok_or_else(|| missing("day"))?),
            hour: Some(hour()?),
            minute: Some(0),
            interval: MINUTES_PER_HOUR,
        }),
        ReportingFrequency::Daily => Ok(TimeRow {
            month: Some(entry.month.ok_or_else(|| missing("month"))?),
            day: Some(entry.day.ok_or_else(|| missing("day"))?),
            hour: Some(24),
            minute: Some(0),
            interval: MINUTES_PER_DAY,
        }),
        ReportingFrequency::Monthly => {
            let month = entry.month.ok_or_else(|| missing("month"))?;
            let last_day = days_in_month(month)
                .ok_or_else(|| DbError::InvalidInput(format!("month {month} out of range")))?;
            Ok(TimeRow {
                month: Some(month),
                day: Some(last_day),
                hour: Some(24),
                minute: Some(0),
                interval: MINUTES_PER_DAY * last_day,
            })
        }
        // Run period; sub-hourly rows are handled above
        _ => Ok(TimeRow {
            month: None,
            day: None,
            hour: None,
            minute: None,
            interval: MINUTES_PER_DAY * entry.cumulative_sim_days,
        }),
    }
}

fn insert_extended_data(conn: &Connection, data_index: i64, stats: &ExtendedStats) -> DbResult<()> {
    let max = PackedDate::decode(stats.max_date).normalized();
    let min = PackedDate::decode(stats.min_date).normalized();

    let mut stmt = BoundStatement::prepare(conn, StatementKind::ReportExtendedDataInsert)?;
    stmt.bind_int(1, data_index)?;
    stmt.bind_real(2, stats.max_value)?;
    stmt.bind_int(3, max.month.into())?;
    stmt.bind_int(4, max.day.into())?;
    stmt.bind_int(5, max.hour.into())?;
    stmt.bind_int(6, (max.minute - stats.minutes_per_timestep + 1).into())?;
    stmt.bind_int(7, max.minute.into())?;
    stmt.bind_real(8, stats.min_value)?;
    stmt.bind_int(9, min.month.into())?;
    stmt.bind_int(10, min.day.into())?;
    stmt.bind_int(11, min.hour.into())?;
    stmt.bind_int(12, (min.minute - stats.minutes_per_timestep + 1).into())?;
    stmt.bind_int(13, min.minute.into())?;
    stmt.step()?;
    Ok(())
}

/// Check a `rows x columns` grid is rectangular
fn check_grid<T>(grid: &[Vec<T>], rows: usize, columns: usize) -> DbResult<()> {
    if grid.len() != rows {
        return Err(DbError::InvalidInput(format!(
            "expected {rows} rows, got {}",
            grid.len()
        )));
    }
    match grid.iter().position(|row| row.len() != columns) {
        Some(i) => Err(DbError::InvalidInput(format!(
            "row {} has {} cells, expected {columns}",
            i + 1,
            grid[i].len()
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open() -> SqlOutput {
        SqlOutput::open(OutputConfig::in_memory()).unwrap()
    }

    fn conn(output: &SqlOutput) -> &Connection {
        output.connection().unwrap()
    }

    fn count(output: &SqlOutput, table: &str) -> i64 {
        conn(output)
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap()
    }

    fn temperature(id: i32) -> DictionaryEntry<'static> {
        DictionaryEntry {
            id,
            store_type: StoreType::Averaged,
            index_group: "Zone",
            timestep_type: TimestepType::Zone,
            key_value: "ZONE ONE",
            name: "Zone Mean Air Temperature",
            frequency: ReportingFrequency::Hourly,
            schedule_name: None,
            units: "C",
        }
    }

    fn simulation() -> SimulationInfo {
        SimulationInfo {
            program_version: "test".into(),
            timestamp: Some("2024.01.01 00:00".into()),
            timesteps_per_hour: 4,
        }
    }

    #[test]
    fn test_hourly_value_in_variable_view() {
        let mut output = open();
        output.create_report_variable_dictionary_record(&temperature(1)).unwrap();
        let entry = TimeIndexEntry::new(ReportingFrequency::Hourly, 1)
            .date(1, 1)
            .hour(1)
            .day_type("Monday", false);
        assert_eq!(output.create_time_index_record(&entry).unwrap(), 1);
        output
            .create_report_variable_data_record(1, 21.5, ReportingFrequency::Hourly, None)
            .unwrap();

        let rows: Vec<(String, String, i32, f64)> = conn(&output)
            .prepare("SELECT Name, Units, Hour, Value FROM ReportVariableWithTime")
            .unwrap()
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(
            rows,
            vec![("Zone Mean Air Temperature".to_string(), "C".to_string(), 1, 21.5)]
        );
        assert_eq!(count(&output, "ReportMeterWithTime"), 0);
    }

    #[test]
    fn test_timestep_minute_normalization() {
        let mut output = open();
        // Interval ending exactly on 14:00
        let entry = TimeIndexEntry::new(ReportingFrequency::TimeStep, 1)
            .date(7, 4)
            .hour(14)
            .minutes(-15.0, 0.0);
        output.create_time_index_record(&entry).unwrap();

        let (hour, minute, interval): (i32, i32, i32) = conn(&output)
            .query_row("SELECT Hour, Minute, Interval FROM Time WHERE TimeIndex = 1", [], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .unwrap();
        assert_eq!((hour, minute), (13, 60));
        assert_eq!(interval, 15);
    }

    #[test]
    fn test_time_rows_by_frequency() {
        let mut output = open();
        output
            .create_time_index_record(&TimeIndexEntry::new(ReportingFrequency::Daily, 32).date(2, 1))
            .unwrap();
        output
            .create_time_index_record(&TimeIndexEntry::new(ReportingFrequency::Monthly, 59).date(2, 28))
            .unwrap();
        output
            .create_time_index_record(&TimeIndexEntry::new(ReportingFrequency::RunPeriod, 365))
            .unwrap();

        let rows: Vec<(Option<i32>, Option<i32>, i32, i32)> = conn(&output)
            .prepare("SELECT Day, Hour, Interval, IntervalType FROM Time ORDER BY TimeIndex")
            .unwrap()
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(
            rows,
            vec![
                (Some(1), Some(24), 1440, 2),
                (Some(28), Some(24), 1440 * 28, 3),
                (None, None, 1440 * 365, 4),
            ]
        );
    }

    #[test]
    fn test_time_row_requires_stamp() {
        let mut output = open();
        let err = output
            .create_time_index_record(&TimeIndexEntry::new(ReportingFrequency::Hourly, 1))
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidInput(_)));
        assert_eq!(output.diagnostics_count(), 1);
    }

    #[test]
    fn test_data_binds_latest_time_index() {
        let mut output = open();
        output.create_report_variable_dictionary_record(&temperature(1)).unwrap();
        for hour in 1..=3 {
            output
                .create_time_index_record(
                    &TimeIndexEntry::new(ReportingFrequency::Hourly, 1).date(1, 1).hour(hour),
                )
                .unwrap();
            output
                .create_report_variable_data_record(1, f64::from(hour), ReportingFrequency::Hourly, None)
                .unwrap();
        }

        let pairs: Vec<(i32, f64)> = conn(&output)
            .prepare("SELECT TimeIndex, Value FROM ReportData ORDER BY ReportDataIndex")
            .unwrap()
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(pairs, vec![(1, 1.0), (2, 2.0), (3, 3.0)]);
    }

    #[test]
    fn test_dictionary_integrity() {
        let mut output = open();
        output.create_report_variable_dictionary_record(&temperature(1)).unwrap();

        let err = output.create_meter_dictionary_record(&temperature(1)).unwrap_err();
        assert!(matches!(err, DbError::DuplicateDictionary(1)));
        assert_eq!(count(&output, "ReportDataDictionary"), 1);

        output
            .create_time_index_record(&TimeIndexEntry::new(ReportingFrequency::RunPeriod, 1))
            .unwrap();
        let err = output
            .create_meter_record(2, 10.0, ReportingFrequency::RunPeriod, None)
            .unwrap_err();
        assert!(matches!(err, DbError::UnknownDictionary(2)));
        assert_eq!(count(&output, "ReportData"), 0);
    }

    #[test]
    fn test_data_before_time_index() {
        let mut output = open();
        output.create_report_variable_dictionary_record(&temperature(1)).unwrap();
        let err = output
            .create_report_variable_data_record(1, 1.0, ReportingFrequency::Hourly, None)
            .unwrap_err();
        assert!(matches!(err, DbError::NoTimeIndex));
    }

    #[test]
    fn test_extended_data_for_daily_values() {
        let mut output = open();
        let mut entry = temperature(4);
        entry.frequency = ReportingFrequency::Daily;
        output.create_report_variable_dictionary_record(&entry).unwrap();
        output
            .create_time_index_record(&TimeIndexEntry::new(ReportingFrequency::Daily, 1).date(1, 1))
            .unwrap();

        let stats = ExtendedStats {
            min_value: 18.2,
            min_date: 1_01_06_00,
            max_value: 24.9,
            max_date: 1_01_15_30,
            minutes_per_timestep: 15,
        };
        output
            .create_report_variable_data_record(4, 21.0, ReportingFrequency::Daily, Some(&stats))
            .unwrap();

        let row: (i32, i32, i32, i32, i32, i32) = conn(&output)
            .query_row(
                "SELECT MaxHour, MaxStartMinute, MaxMinute, MinHour, MinStartMinute, MinMinute FROM ReportExtendedData",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?)),
            )
            .unwrap();
        assert_eq!(row, (15, 16, 30, 5, 46, 60));
    }

    #[test]
    fn test_extended_data_skipped() {
        let mut output = open();
        output.create_report_variable_dictionary_record(&temperature(1)).unwrap();
        output
            .create_time_index_record(&TimeIndexEntry::new(ReportingFrequency::Hourly, 1).date(1, 1).hour(1))
            .unwrap();

        let stats = ExtendedStats {
            min_value: 1.0,
            min_date: 1_01_01_00,
            max_value: 2.0,
            max_date: 1_01_01_00,
            minutes_per_timestep: 60,
        };
        // hourly values never carry statistics
        output
            .create_report_variable_data_record(1, 1.5, ReportingFrequency::Hourly, Some(&stats))
            .unwrap();
        // zero dates mean no statistics were gathered
        let empty = ExtendedStats {
            min_date: 0,
            ..stats
        };
        output
            .create_report_variable_data_record(1, 1.5, ReportingFrequency::Monthly, Some(&empty))
            .unwrap();

        assert_eq!(count(&output, "ReportData"), 2);
        assert_eq!(count(&output, "ReportExtendedData"), 0);
    }

    #[test]
    fn test_simulation_update() {
        let mut output = open();
        let err = output.update_simulation_record(true, true).unwrap_err();
        assert!(matches!(err, DbError::NoPriorRow { table: "Simulations" }));

        output.create_simulations_record(1, &simulation()).unwrap();
        output.create_simulations_record(2, &simulation()).unwrap();
        output.update_simulation_record(true, false).unwrap();

        let flags: Vec<(i32, i32, i32)> = conn(&output)
            .prepare("SELECT SimulationIndex, Completed, CompletedSuccessfully FROM Simulations ORDER BY SimulationIndex")
            .unwrap()
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(flags, vec![(1, 0, 0), (2, 1, 0)]);
    }

    #[test]
    fn test_default_timestamp() {
        let mut output = open();
        let info = SimulationInfo {
            timestamp: None,
            ..simulation()
        };
        output.create_simulations_record(1, &info).unwrap();

        let stamp: String = conn(&output)
            .query_row("SELECT TimeStamp FROM Simulations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(stamp.len(), TIMESTAMP_FORMAT.len());
    }

    #[test]
    fn test_error_append() {
        let mut output = open();
        assert!(matches!(
            output.update_error_record(" again").unwrap_err(),
            DbError::NoPriorRow { table: "Errors" }
        ));

        output.create_simulations_record(1, &simulation()).unwrap();
        output.create_error_record(1, ErrorKind::Warning, "first", 1).unwrap();
        output.create_error_record(1, ErrorKind::Severe, "Out of range", 1).unwrap();
        output.update_error_record("; value clipped").unwrap();

        let messages: Vec<(String, i32)> = conn(&output)
            .prepare("SELECT ErrorMessage, ErrorType FROM Errors ORDER BY ErrorIndex")
            .unwrap()
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(
            messages,
            vec![
                ("first".to_string(), 0),
                ("Out of range; value clipped".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_time_rows_reference_environment() {
        let mut output = open();
        output.create_simulations_record(1, &simulation()).unwrap();
        output
            .create_environment_period_record(1, "CHICAGO WINTER", EnvironmentKind::DesignDay)
            .unwrap();
        output
            .create_time_index_record(&TimeIndexEntry::new(ReportingFrequency::RunPeriod, 1).warmup(true))
            .unwrap();

        let (env, warmup): (i32, i32) = conn(&output)
            .query_row("SELECT EnvironmentPeriodIndex, WarmupFlag FROM Time", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!((env, warmup), (1, 1));
    }

    #[test]
    fn test_tabular_units() {
        let mut output = open();
        output.create_simulations_record(1, &simulation()).unwrap();
        let body = vec![
            vec!["120.5", "3.2"],
            vec!["80.0", "1.1"],
        ];
        let rows = ["Total Site Energy", "Net Site Energy"];
        let columns = ["Total Energy [GJ]", "Energy Per Total Building Area [MJ/m2]"];

        let cells = output
            .create_tabular_data_records(
                &body,
                &rows,
                &columns,
                "AnnualBuildingUtilityPerformanceSummary",
                "Entire Facility",
                "Site and Source Energy",
            )
            .unwrap();
        assert_eq!(cells, 4);

        let (column, units, row_id, column_id): (String, String, i32, i32) = conn(&output)
            .query_row(
                "SELECT ColumnName, Units, RowId, ColumnId FROM TabularDataWithStrings WHERE Value = '1.1'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .unwrap();
        assert_eq!(column, "Energy Per Total Building Area");
        assert_eq!(units, "MJ/m2");
        assert_eq!((row_id, column_id), (2, 2));

        // Report, for-string and table names are interned once
        let names: i64 = conn(&output)
            .query_row("SELECT COUNT(*) FROM Strings WHERE StringTypeIndex IN (1, 2, 3)", [], |row| row.get(0))
            .unwrap();
        assert_eq!(names, 3);
    }

    #[test]
    fn test_tabular_units_from_row_label() {
        let mut output = open();
        let body = vec![vec!["42"]];
        output
            .create_tabular_data_records(&body, &["Peak Demand [W]"], &["Value"], "Report", "Entire Facility", "Table")
            .unwrap();

        let (row, units): (String, String) = conn(&output)
            .query_row("SELECT RowName, Units FROM TabularDataWithStrings", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(row, "Peak Demand");
        assert_eq!(units, "W");
    }

    #[test]
    fn test_tabular_disabled() {
        let mut output = SqlOutput::open(OutputConfig::in_memory().with_tabular(false)).unwrap();
        let cells = output
            .create_tabular_data_records(&[vec!["1"]], &["Row"], &["Column"], "Report", "For", "Table")
            .unwrap();
        assert_eq!(cells, 0);
        assert_eq!(count(&output, "TabularData"), 0);
    }

    #[test]
    fn test_ragged_tabular_rejected() {
        let mut output = open();
        let body = vec![vec!["1", "2"], vec!["3"]];
        let err = output
            .create_tabular_data_records(&body, &["A", "B"], &["X", "Y"], "Report", "For", "Table")
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidInput(_)));
        assert_eq!(count(&output, "TabularData"), 0);
    }

    #[test]
    fn test_daylight_map() {
        let mut output = open();
        output
            .create_daylight_map_title(&DaylightMapTitle {
                map_number: 1,
                map_name: "ZONE ONE DAYLIGHT MAP",
                environment: "RUN PERIOD 1",
                zone: 1,
                reference_pt1: "RefPt1=(2.50:2.00:0.80)",
                reference_pt2: "",
                z: 0.8,
            })
            .unwrap();

        let x = [1.0, 2.0, 3.0];
        let y = [1.0, 2.0];
        let illuminance = vec![vec![500.0, 450.0], vec![400.0, 350.0], vec![300.0, 250.0]];
        let points = output
            .create_daylight_map(&DaylightMapHour {
                map_number: 1,
                month: 6,
                day_of_month: 21,
                hour: 12,
                x: &x,
                y: &y,
                illuminance: &illuminance,
            })
            .unwrap();
        assert_eq!(points, 6);

        let value: f64 = conn(&output)
            .query_row(
                "SELECT Illuminance FROM DaylightMaps WHERE Hour = 12 AND X = 2.0 AND Y = 2.0",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(value, 350.0);
        assert_eq!(count(&output, "DaylightMapHourlyReports"), 1);
    }

    #[test]
    fn test_sizing_units_split() {
        let mut output = open();
        output
            .add_system_sizing_record("VAV SYS 1", "Calculated Cooling Design Air Flow Rate [m3/s]", 1.25)
            .unwrap();
        output
            .add_component_sizing_record("Coil:Heating:Electric", "REHEAT COIL", "Design Size Nominal Capacity [W]", 3500.0)
            .unwrap();
        output
            .add_zone_sizing_record(&ZoneSizing {
                zone_name: "ZONE ONE".into(),
                load_type: "Cooling".into(),
                calc_des_load: 2500.0,
                ..Default::default()
            })
            .unwrap();

        let (description, units): (String, String) = conn(&output)
            .query_row("SELECT Description, Units FROM SystemSizes", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(description, "Calculated Cooling Design Air Flow Rate");
        assert_eq!(units, "m3/s");

        let units: String = conn(&output)
            .query_row("SELECT Units FROM ComponentSizes", [], |row| row.get(0))
            .unwrap();
        assert_eq!(units, "W");
        assert_eq!(count(&output, "ZoneSizes"), 1);
    }

    #[test]
    fn test_zone_extended_output() {
        let mut output = open();
        output.add_zone(1, &ZoneData {
            name: "ZONE ONE".into(),
            ..Default::default()
        });
        output.add_material(1, &MaterialData {
            name: "BRICK".into(),
            ..Default::default()
        });
        output.add_construction(
            1,
            &ConstructionData {
                name: "WALL".into(),
                layers: vec![1, 1],
                ..Default::default()
            },
            2.1,
        );
        output.add_equipment(EquipmentKind::Gas, 1, &ZoneEquipData::default());
        // Same zone twice: the second row is rejected and reported
        output.add_room_air_model(1, &AirModelData::default());
        output.add_room_air_model(1, &AirModelData::default());
        assert_eq!(output.pending_extended_output(), 6);

        let summary = output.create_zone_extended_output().unwrap();
        assert_eq!(summary, ExtendedOutputSummary { written: 5, failed: 1 });
        assert!(!output.in_transaction());
        assert_eq!(output.pending_extended_output(), 0);
        assert_eq!(count(&output, "ConstructionLayers"), 2);
        assert_eq!(count(&output, "NominalGasEquipment"), 1);
        assert_eq!(output.diagnostics_count(), 1);
    }

    #[test]
    fn test_extended_output_inside_caller_transaction() {
        let mut output = open();
        output.begin().unwrap();
        output.add_schedule(1, &ScheduleData::default());
        output.create_zone_extended_output().unwrap();
        assert!(output.in_transaction());
        output.commit().unwrap();
        assert_eq!(count(&output, "Schedules"), 1);
    }

    #[test]
    #[should_panic(expected = "already open")]
    fn test_nested_begin_panics() {
        let mut output = open();
        output.begin().unwrap();
        let _ = output.begin();
    }

    #[test]
    #[should_panic(expected = "without an open transaction")]
    fn test_commit_without_begin_panics() {
        let mut output = open();
        let _ = output.commit();
    }

    #[test]
    fn test_disabled_output_is_noop() {
        let mut output = SqlOutput::open(OutputConfig::disabled()).unwrap();
        assert!(!output.write_output_enabled());
        assert!(!output.write_tabular_data_enabled());

        output.create_report_variable_dictionary_record(&temperature(1)).unwrap();
        output
            .create_report_variable_data_record(1, 1.0, ReportingFrequency::Hourly, None)
            .unwrap();
        output.update_simulation_record(true, true).unwrap();
        output.add_zone(1, &ZoneData::default());
        assert_eq!(output.pending_extended_output(), 0);
        output.begin().unwrap();
        output.commit().unwrap();
        output.finish().unwrap();
    }

    #[test]
    fn test_uncommitted_batch_lost_on_reopen() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("out.sql");

        let mut output = SqlOutput::open(OutputConfig::new(&db_path)).unwrap();
        output.begin().unwrap();
        output.create_report_variable_dictionary_record(&temperature(1)).unwrap();
        output.commit().unwrap();

        output.begin().unwrap();
        output.create_report_variable_dictionary_record(&temperature(2)).unwrap();
        output.add_zone(1, &ZoneData::default());
        drop(output);

        let conn = Connection::open(&db_path).unwrap();
        let ids: Vec<i32> = conn
            .prepare("SELECT ReportDataDictionaryIndex FROM ReportDataDictionary")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_finish_builds_indexes() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("out.sql");

        let output = SqlOutput::open(OutputConfig::new(&db_path)).unwrap();
        output.finish().unwrap();

        let conn = Connection::open(&db_path).unwrap();
        let indexes: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(indexes > 0);
        assert!(dir.path().join("sqlite.err").exists());
    }

    #[test]
    fn test_failed_time_row_blocks_data() {
        let mut output = open();
        output.create_report_variable_dictionary_record(&temperature(1)).unwrap();
        let hourly = |hour| TimeIndexEntry::new(ReportingFrequency::Hourly, 1).date(1, 1).hour(hour);

        assert_eq!(output.create_time_index_record(&hourly(1)).unwrap(), 1);
        output
            .create_report_variable_data_record(1, 20.0, ReportingFrequency::Hourly, None)
            .unwrap();

        // Missing hour: nothing written and no current time row
        let err = output
            .create_time_index_record(&TimeIndexEntry::new(ReportingFrequency::Hourly, 1).date(1, 1))
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidInput(_)));
        assert_eq!(output.current_time_index(), 0);

        let err = output
            .create_report_variable_data_record(1, 5.0, ReportingFrequency::Hourly, None)
            .unwrap_err();
        assert!(matches!(err, DbError::NoTimeIndex));
        assert_eq!(count(&output, "ReportData"), 1);

        // Ids stay dense once the engine recovers
        assert_eq!(output.create_time_index_record(&hourly(2)).unwrap(), 2);
        output
            .create_report_variable_data_record(1, 21.0, ReportingFrequency::Hourly, None)
            .unwrap();

        let orphans: i64 = conn(&output)
            .query_row(
                "SELECT COUNT(*) FROM ReportData d LEFT JOIN Time t ON t.TimeIndex = d.TimeIndex WHERE t.TimeIndex IS NULL",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(orphans, 0);
        assert_eq!(count(&output, "ReportVariableWithTime"), 2);
    }

    #[test]
    fn test_hour_out_of_range_rejected() {
        let mut output = open();
        let err = output
            .create_time_index_record(&TimeIndexEntry::new(ReportingFrequency::Hourly, 1).date(1, 1).hour(0))
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidInput(_)));

        let err = output
            .create_time_index_record(
                &TimeIndexEntry::new(ReportingFrequency::TimeStep, 1)
                    .date(1, 1)
                    .hour(25)
                    .minutes(45.0, 60.0),
            )
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidInput(_)));
        assert_eq!(count(&output, "Time"), 0);

        // Hour 24 ending on the hour is the last interval of the day
        output
            .create_time_index_record(
                &TimeIndexEntry::new(ReportingFrequency::TimeStep, 1)
                    .date(1, 1)
                    .hour(24)
                    .minutes(-15.0, 0.0),
            )
            .unwrap();
        let (hour, minute): (i32, i32) = conn(&output)
            .query_row("SELECT Hour, Minute FROM Time", [], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap();
        assert_eq!((hour, minute), (23, 60));
    }

    #[test]
    fn test_failed_simulation_insert_keeps_prior_row() {
        let mut output = open();
        output.create_simulations_record(1, &simulation()).unwrap();
        assert!(output.create_simulations_record(1, &simulation()).is_err());
        output.update_simulation_record(true, true).unwrap();

        let flags: Vec<(i32, i32, i32)> = conn(&output)
            .prepare("SELECT SimulationIndex, Completed, CompletedSuccessfully FROM Simulations")
            .unwrap()
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(flags, vec![(1, 1, 1)]);
    }

    #[test]
    fn test_failed_extended_commit_keeps_queue() {
        let mut output = open();
        // Member zone 7 does not exist; the violation surfaces at COMMIT
        conn(&output)
            .execute_batch("PRAGMA foreign_keys = ON; PRAGMA defer_foreign_keys = ON;")
            .unwrap();
        output.add_zone_list(
            1,
            &ZoneListData {
                name: "ALL".into(),
                zones: vec![7],
            },
        );

        let err = output.create_zone_extended_output().unwrap_err();
        assert!(matches!(err, DbError::Sqlite(_)));
        assert!(!output.in_transaction());
        assert_eq!(output.pending_extended_output(), 1);
        assert_eq!(count(&output, "ZoneLists"), 0);

        output.add_zone(7, &ZoneData::default());
        let summary = output.create_zone_extended_output().unwrap();
        assert_eq!(summary, ExtendedOutputSummary { written: 2, failed: 0 });
        assert_eq!(output.pending_extended_output(), 0);
        assert_eq!(count(&output, "ZoneInfoZoneLists"), 1);
    }
}
