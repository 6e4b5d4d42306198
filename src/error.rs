//! Error types for the analysis pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while walking and parsing a source tree.
///
/// Only [`SeerError::Walk`] is fatal to a directory walk; read and parse
/// failures are logged and the offending file is skipped.
#[derive(Error, Debug)]
pub enum SeerError {
    #[error("cannot walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}:{line}:{column}: syntax error")]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
    },
    #[error("{path}:{line}:{column}: invalid UTF-8 encoding")]
    Encoding {
        path: PathBuf,
        line: usize,
        column: usize,
    },
    #[error("{path}: expected 'package' clause")]
    MissingPackage { path: PathBuf },
    #[error("failed to load Go grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    #[error("invalid tree-sitter query: {0}")]
    Query(#[from] tree_sitter::QueryError),
    #[error("invalid exclude pattern: {0}")]
    Glob(#[from] globset::Error),
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, SeerError>;
