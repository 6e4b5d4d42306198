//! Tree-sitter backed extraction of Go function metadata.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────┐     ┌──────────────────┐     ┌───────────────┐
//! │ walk()      │────▶│ GoParser │────▶│ FunctionAnalyzer │────▶│ FunctionTable │
//! │ (walkdir)   │     └──────────┘     │ (tree visitor)   │     │ pkg.fn (path) │
//! └─────────────┘                      └──────────────────┘     └───────────────┘
//!                                        │            │
//!                                        ▼            ▼
//!                              extract_variables   render / describe_statement
//! ```
//!
//! Each parsed file is shared (`Arc<ParsedFile>`) by the records built from
//! it, so function bodies remain inspectable after the walk finishes.

mod describe;
mod facts;
mod parsed;
mod render;
mod table;
mod variables;
mod visitor;
mod walk;

pub use describe::{describe_statement, StatementKind};
pub use facts::{FunctionBody, FunctionRecord, Parameter, Signature, Span, VariableRecord};
pub use parsed::{GoParser, ParsedFile};
pub use render::{block_statements, render, render_field_list, NIL};
pub use table::{composite_key, FunctionTable};
pub use variables::{extract_variables, Extraction, UNKNOWN};
pub use visitor::{comment_text, FunctionAnalyzer, MethodKeying};
pub use walk::{analyze_file, walk, SkippedFile, WalkOptions, WalkSummary};
