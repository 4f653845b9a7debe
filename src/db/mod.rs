//! Database module for the simulation output file
//!
//! This module owns everything that touches SQLite:
//! - Schema, views and post-run indexes
//! - The prepared statement registry
//! - String interning for tabular reports
//! - The [`SqlOutput`] writer and its diagnostics sink
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 SqlOutput (writer)                  │
//! │  - run, time series, tabular, sizing, daylighting   │
//! │  - queues entity snapshots (ExtendedOutput)         │
//! └──────────┬──────────────────────────────┬───────────┘
//!            │ BoundStatement               │ failures
//!            ▼                              ▼
//! ┌──────────────────────────┐   ┌──────────────────────┐
//! │  statement cache (38)    │   │  DiagnosticsSink     │
//! │  StringInterner          │   │  (sqlite.err)        │
//! └──────────┬───────────────┘   └──────────────────────┘
//!            ▼
//! ┌─────────────────────────────────────────────────────┐
//! │           SQLite file (schema + views)              │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Performance
//!
//! Writes run in WAL mode with an exclusive lock and callers batch them
//! inside `begin`/`commit`. Lookup indexes are built once, after the run.

pub mod diagnostics;
pub mod extended;
pub mod schema;
pub mod statement;
pub mod strings;
pub mod writer;

pub use diagnostics::DiagnosticsSink;
pub use extended::{ExtendedOutput, ExtendedOutputSummary};
pub use schema::{create_database, create_indexes, optimize_for_reads};
pub use statement::{BoundStatement, StatementKind};
pub use strings::{StringInterner, StringType};
pub use writer::{
    DaylightMapHour, DaylightMapTitle, DictionaryEntry, ExtendedStats, SimulationInfo, SqlOutput,
    TimeIndexEntry, ZoneSizing,
};
