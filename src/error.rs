//! Crate-level error type.
//!
//! Each layer defines its own error enum; [`Error`] groups them into the
//! four kinds a driver has to distinguish. All four are fatal for a run:
//! a partially initialised decomposition or a failed collective leaves
//! the ranks in states that cannot be reconciled locally.

use thiserror::Error;

use crate::config::ConfigError;
use crate::parallel::{CommError, TopologyError};

/// Violated precondition of a stencil evaluation or halo operation.
#[derive(Debug, Error)]
pub enum PreconditionError {
    /// Evaluation requested before `configure`.
    #[error("{module} evaluated before it was configured")]
    NotConfigured { module: &'static str },

    /// Ghost cells narrower than the stencil reach.
    #[error(
        "Halo too narrow for {operation}: need ({need_i}, {need_j}, {need_k}) ghost cells, \
         grid has ({igc}, {jgc}, {kgc})"
    )]
    InsufficientHalo {
        operation: &'static str,
        need_i: usize,
        need_j: usize,
        need_k: usize,
        igc: usize,
        jgc: usize,
        kgc: usize,
    },

    /// Array does not cover the padded grid.
    #[error("Field {name} has {actual} values, grid needs {expected}")]
    FieldSize {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Field not present in the registry.
    #[error("Field {0} does not exist")]
    MissingField(String),
}

/// Top-level error, one variant per error kind.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing parameter, incompatible discretization.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Decomposition inconsistent with the process count.
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    /// Collective or point-to-point transport failure.
    #[error("Communication error: {0}")]
    Communication(#[from] CommError),

    /// Evaluation attempted in an invalid state or on unsuitable data.
    #[error("Stencil precondition error: {0}")]
    StencilPrecondition(#[from] PreconditionError),
}

/// Result alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
