//! Error types for the unroller backend.

use alsvid_ir::CircuitError;
use thiserror::Error;

/// Errors that can occur while unrolling structural events.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UnrollError {
    /// An opaque gate was encountered where expansion is required.
    ///
    /// An opaque gate has no body, so when its name is not part of the
    /// accepted basis its primitive decomposition is unknown and the
    /// unroll cannot proceed.
    #[error("cannot expand opaque gate '{name}' outside the accepted basis")]
    Opaque {
        /// Name of the opaque gate.
        name: String,
    },

    /// A circuit mutation was rejected by the IR.
    #[error(transparent)]
    Circuit(#[from] CircuitError),

    /// A collaborator handed over malformed AST data.
    #[error("malformed AST: {0}")]
    MalformedAst(String),
}

/// Result type for unroller operations.
pub type UnrollResult<T> = Result<T, UnrollError>;
