//! Configuration types for sim-sqlite
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Output configuration with validation
//!
//! Whether SQLite output is produced at all, and whether tabular reports are
//! included, is decided here once and read by the writer at open.

use crate::error::ConfigError;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Default name of the diagnostics stream written next to the database
pub const DEFAULT_ERROR_FILE: &str = "sqlite.err";

/// Path SQLite treats as a private in-memory database
const IN_MEMORY_PATH: &str = ":memory:";

/// Simulation output to SQLite
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sim-sqlite",
    version,
    about = "Create and initialize a simulation output database",
    long_about = "Creates the relational output schema for a building energy simulation run,\n\
                  records the run and its first environment period, and builds the\n\
                  post-run indexes.",
    after_help = "EXAMPLES:\n    \
        sim-sqlite out.sql\n    \
        sim-sqlite out.sql --option simple-and-tabular --environment 'RUN PERIOD 1'\n    \
        sim-sqlite out.sql --error-file /tmp/sqlite.err -v"
)]
pub struct CliArgs {
    /// Output database file
    #[arg(value_name = "FILE", default_value = "simulation.sql")]
    pub output: PathBuf,

    /// Which outputs go to the database
    #[arg(long = "option", value_enum, default_value_t = SqliteOption::Simple)]
    pub option: SqliteOption,

    /// Diagnostics file (defaults to sqlite.err next to the database)
    #[arg(long, value_name = "FILE")]
    pub error_file: Option<PathBuf>,

    /// Disable SQLite output entirely
    #[arg(long)]
    pub no_output: bool,

    /// Program version recorded in the Simulations row
    #[arg(long, default_value = concat!("sim-sqlite ", env!("CARGO_PKG_VERSION")))]
    pub program_version: String,

    /// Zone timesteps per hour
    #[arg(long, default_value = "4", value_name = "NUM")]
    pub timesteps_per_hour: i32,

    /// Environment period to record after the run row
    #[arg(long, value_name = "NAME")]
    pub environment: Option<String>,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// `Output:SQLite` option
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SqliteOption {
    /// Time series, entities and diagnostics
    #[default]
    Simple,
    /// Everything in `simple` plus tabular reports
    SimpleAndTabular,
}

/// Validated output configuration
#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    /// Output database path
    pub db_path: PathBuf,

    /// Write anything at all
    pub write_output: bool,

    /// Write tabular report data
    pub write_tabular: bool,

    /// Diagnostics stream; `None` keeps messages in the log only
    pub error_path: Option<PathBuf>,
}

impl OutputConfig {
    /// Output enabled, tabular disabled, diagnostics next to the database
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        let db_path = db_path.into();
        let error_path = Some(default_error_path(&db_path));
        Self {
            db_path,
            write_output: true,
            write_tabular: false,
            error_path,
        }
    }

    /// Private in-memory database with full output and no diagnostics file
    pub fn in_memory() -> Self {
        Self {
            db_path: PathBuf::from(IN_MEMORY_PATH),
            write_output: true,
            write_tabular: true,
            error_path: None,
        }
    }

    /// Output disabled; every writer call is a no-op
    pub fn disabled() -> Self {
        Self {
            db_path: PathBuf::from(IN_MEMORY_PATH),
            write_output: false,
            write_tabular: false,
            error_path: None,
        }
    }

    pub fn with_tabular(mut self, enabled: bool) -> Self {
        self.write_tabular = enabled;
        self
    }

    pub fn with_error_path(mut self, path: Option<PathBuf>) -> Self {
        self.error_path = path;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.db_path.as_os_str() == IN_MEMORY_PATH
    }

    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: &CliArgs) -> Result<Self, ConfigError> {
        let write_tabular = args.option == SqliteOption::SimpleAndTabular;
        if args.no_output && write_tabular {
            return Err(ConfigError::TabularWithoutOutput);
        }

        let config = Self {
            db_path: args.output.clone(),
            write_output: !args.no_output,
            write_tabular,
            error_path: Some(
                args.error_file
                    .clone()
                    .unwrap_or_else(|| default_error_path(&args.output)),
            ),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the output paths can be created
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.write_tabular && !self.write_output {
            return Err(ConfigError::TabularWithoutOutput);
        }
        if !self.write_output || self.is_in_memory() {
            return Ok(());
        }

        check_parent(&self.db_path)?;
        if let Some(ref error_path) = self.error_path {
            check_parent(error_path)?;
        }
        Ok(())
    }
}

fn default_error_path(db_path: &Path) -> PathBuf {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(DEFAULT_ERROR_FILE),
        _ => PathBuf::from(DEFAULT_ERROR_FILE),
    }
}

fn check_parent(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(ConfigError::InvalidOutputPath {
                path: path.to_path_buf(),
                reason: format!("Parent directory '{}' does not exist", parent.display()),
            });
        }
    }
    Ok(())
}
