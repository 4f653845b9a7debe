//! sim-sqlite - Relational output for building energy simulation runs
//!
//! Persists the results of a simulation run into a single SQLite file that
//! post-processing tools query directly: time-series report variables and
//! meters, the static building model, sizing results, daylighting maps and
//! tabular summary reports.
//!
//! # Features
//!
//! - **Normalized schema**: report dictionary, time index and values in
//!   separate tables, joined back by the `ReportVariableWithTime` and
//!   `ReportMeterWithTime` views.
//!
//! - **Prepared statements**: every insert is compiled once per connection
//!   and reused for every row.
//!
//! - **Caller-driven transactions**: the engine batches its writes with
//!   `begin`/`commit`; a batch that is never committed leaves no rows.
//!
//! - **Non-fatal record failures**: a failed insert is returned and mirrored
//!   to a diagnostics file, and the run carries on.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Simulation engine                          │
//! └─────────────────────────────┬───────────────────────────────────┘
//!                               │ create_* / add_*
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          SqlOutput                              │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────┐   │
//! │  │ time series  │  │  records::*  │  │ tabular / sizing /   │   │
//! │  │ dictionaries │  │  (entities)  │  │ daylighting          │   │
//! │  └──────┬───────┘  └──────┬───────┘  └──────────┬───────────┘   │
//! │         └─────────────────┼─────────────────────┘               │
//! │                           ▼                                     │
//! │              prepared statement cache                           │
//! └─────────────────────────────┬───────────────────────────────────┘
//!                               ▼
//!                    ┌──────────────────┐
//!                    │   SQLite DB      │
//!                    │ (simulation.sql) │
//!                    └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use sim_sqlite::{OutputConfig, SimulationInfo, SqlOutput};
//!
//! # fn main() -> sim_sqlite::Result<()> {
//! let mut output = SqlOutput::open(OutputConfig::new("simulation.sql"))?;
//! output.begin()?;
//! output.create_simulations_record(
//!     1,
//!     &SimulationInfo {
//!         program_version: "engine 1.0".into(),
//!         timestamp: None,
//!         timesteps_per_hour: 4,
//!     },
//! )?;
//! output.commit()?;
//! output.finish()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod records;
pub mod report;

pub use config::{CliArgs, OutputConfig, SqliteOption};
pub use db::{
    DaylightMapHour, DaylightMapTitle, DictionaryEntry, ExtendedOutputSummary, ExtendedStats,
    SimulationInfo, SqlOutput, TimeIndexEntry, ZoneSizing,
};
pub use error::{ConfigError, DbError, DbResult, Result, SqlOutputError};
pub use records::{AirflowKind, EquipmentKind};
pub use report::{EnvironmentKind, ErrorKind, ReportingFrequency, StoreType, TimestepType};
