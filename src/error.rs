//! Error types for sim-sqlite
//!
//! This module defines the error hierarchy for the output layer:
//! - SQLite errors raised while preparing, binding or stepping statements
//! - Writer invariant violations (missing prior rows, dictionary id misuse)
//! - Configuration and CLI errors
//!
//! Schema and prepare failures are fatal for the writer. Bind and step
//! failures on a single record are returned to the caller and reported on
//! the diagnostics sink; they never abort the run on their own.

use crate::db::statement::StatementKind;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for sim-sqlite
#[derive(Error, Debug)]
pub enum SqlOutputError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to create or open the database file
    #[error("Failed to create database at '{path}': {reason}")]
    CreateFailed { path: PathBuf, reason: String },

    /// Schema statement failed
    #[error("Database schema error in {object}: {source}")]
    Schema {
        object: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// Statement compilation failed
    #[error("Failed to prepare {statement:?}: {source}")]
    Prepare {
        statement: StatementKind,
        #[source]
        source: rusqlite::Error,
    },

    /// Parameter binding failed
    #[error("Failed to bind parameter {index} of {statement:?}: {source}")]
    Bind {
        statement: StatementKind,
        index: usize,
        #[source]
        source: rusqlite::Error,
    },

    /// A statement was stepped with a placeholder left unbound
    #[error("Parameter {index} of {statement:?} was not bound before step")]
    UnboundParameter {
        statement: StatementKind,
        index: usize,
    },

    /// Statement execution failed
    #[error("Failed to step {statement:?}: {source}")]
    Step {
        statement: StatementKind,
        #[source]
        source: rusqlite::Error,
    },

    /// Dictionary id already recorded
    #[error("Dictionary id {0} has already been recorded")]
    DuplicateDictionary(i32),

    /// Data record for a dictionary id that was never recorded
    #[error("Dictionary id {0} has no dictionary record")]
    UnknownDictionary(i32),

    /// Data record with no current time index record
    #[error("No current time index record")]
    NoTimeIndex,

    /// Update issued with no prior row to update
    #[error("No prior {table} row to update")]
    NoPriorRow { table: &'static str },

    /// Caller supplied inconsistent input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Output path error
    #[error("Invalid output path '{path}': {reason}")]
    InvalidOutputPath { path: PathBuf, reason: String },

    /// Tabular output requires report output
    #[error("Tabular output cannot be enabled while SQLite output is disabled")]
    TabularWithoutOutput,
}

/// Result type alias for SqlOutputError
pub type Result<T> = std::result::Result<T, SqlOutputError>;

/// Result type alias for DbError
pub type DbResult<T> = std::result::Result<T, DbError>;

impl DbError {
    /// Fatal errors leave the writer unusable
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DbError::Schema { .. } | DbError::Prepare { .. } | DbError::CreateFailed { .. }
        )
    }
}
