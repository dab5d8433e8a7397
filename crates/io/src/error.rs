//! Errors from reading a netlist document or writing a solution.

use thiserror::Error;

/// Errors surfaced while reading or writing the CLI's file formats.
#[derive(Debug, Error)]
pub enum IoError {
    /// The netlist file could not be read from disk.
    #[error("failed to read netlist file {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The netlist file's JSON did not match the expected document shape.
    #[error("failed to parse netlist document: {0}")]
    Parse(#[from] serde_json::Error),
    /// An element's value expression failed to compile.
    #[error(transparent)]
    Model(#[from] model::ModelError),
    /// Writing the solution CSV failed.
    #[error("failed to write CSV to {path}: {source}")]
    Write {
        /// Path that failed to write.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
