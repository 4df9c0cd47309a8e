//! Error types.
//!
//! Only argument validation and frontier contract violations are errors. Looking up a vertex
//! or edge that does not exist is not: those queries return an empty slice or `None`.

/// Graph construction and traversal error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Endpoint that cannot be a vertex id (negative, or too large for [`Node`](crate::Node)).
    #[error("Invalid vertex: {0}")]
    InvalidVertex(String),

    /// Vertex count that is negative or exceeds the representable range.
    #[error("Invalid vertex count: {0}")]
    InvalidVertexCount(String),

    /// Too many edges for [`EdgeId`](crate::EdgeId).
    #[error("Too many edges: at most {max} are supported")]
    TooManyEdges { max: u64 },

    /// Violated CSR invariant.
    #[error("Invalid CSR format: {0}")]
    InvalidCsr(String),

    /// A frontier refused an element it is expected to accept.
    #[error("Frontier rejected a discovered vertex")]
    FrontierRejected,
}

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
