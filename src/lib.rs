//! Seer - Go function metadata extractor.
//!
//! Seer walks a directory of Go sources, parses each file with tree-sitter
//! and records, for every function and method: its doc comment, receiver,
//! signature and the local variables assigned in its body. Results land in
//! a [`FunctionTable`] keyed by `package.function (path)`.
//!
//! # Architecture
//!
//! - `analysis`: parsing, the per-file tree visitor, variable extraction,
//!   statement summaries and the directory walk
//! - `report`: output formatting (text, JSON)
//! - `cli`: command-line flags and logging setup
//!
//! ```no_run
//! use seer::{walk, WalkOptions};
//!
//! let summary = walk("./cmd", &WalkOptions::new())?;
//! for (key, record) in &summary.table {
//!     println!("{} has {} variables", key, record.variables.len());
//! }
//! # Ok::<(), seer::SeerError>(())
//! ```

pub mod analysis;
pub mod cli;
pub mod error;
pub mod report;

pub use analysis::{
    describe_statement, extract_variables, render, walk, FunctionAnalyzer, FunctionRecord,
    FunctionTable, GoParser, MethodKeying, ParsedFile, VariableRecord, WalkOptions, WalkSummary,
};
pub use error::{Result, SeerError};
