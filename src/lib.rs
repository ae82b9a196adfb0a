//! Datavyu to Supercoder - batch converter for behavioral-coding annotations
//!
//! Reads Datavyu CSV exports (timestamped events in milliseconds) and writes
//! the frame-based CSV layout Supercoder expects, through a deterministic
//! pipeline: read → extract trial starts → convert units → write.
//!
//! ## Modules
//!
//! - **reader**: Parse Datavyu exports, quarantining malformed rows
//! - **trials**: Find trial-start events and compute their timings
//! - **units**: Millisecond/frame conversion and elapsed-time formatting
//! - **writer**: Render and write the two-table output CSV
//! - **pipeline**: Batch driver with per-file reports

pub mod config;
pub mod error;
pub mod pipeline;
pub mod reader;
pub mod trials;
pub mod types;
pub mod units;
pub mod writer;

pub use config::ConverterConfig;
pub use error::{ConvertError, RowError, RowErrorKind};
pub use pipeline::{convert_directory, BatchSummary, Converter, FileReport, FileStatus};
pub use types::{FrameRate, Record, TrialStart};

/// Converter version embedded in batch reports
pub const CONVERTER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for batch reports
pub const PRODUCER_NAME: &str = "datavyu-supercoder";
