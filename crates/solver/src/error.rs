//! Errors raised while assembling or solving the system.

use calc::CalcError;
use thiserror::Error;

/// Errors from [`crate::Solver::solve`].
#[derive(Debug, Error)]
pub enum SolveError {
    /// More equations were stamped than there are unknowns.
    #[error("overconstrained system: {equations} equations for {unknowns} unknowns")]
    Overconstrained {
        /// Rows stamped.
        equations: usize,
        /// `nbP + nbQ`.
        unknowns: usize,
    },
    /// Fewer equations were stamped than there are unknowns.
    #[error("underconstrained system: {equations} equations for {unknowns} unknowns")]
    Underconstrained {
        /// Rows stamped.
        equations: usize,
        /// `nbP + nbQ`.
        unknowns: usize,
    },
    /// An edge's element kind has no stamping rule (a [`model::ElementKind::Wire`]
    /// reached the assembler, which should be impossible since the graph
    /// builder never turns a wire into an edge).
    #[error("element kind {kind:?} cannot be stamped into the system matrix")]
    UnknownElementKind {
        /// The offending kind.
        kind: model::ElementKind,
    },
    /// A value expression failed to compile or evaluate.
    #[error(transparent)]
    Calc(#[from] CalcError),
}
