//! Graph construction and loading errors.

use std::path::PathBuf;

use crate::domain::TravelMode;

use super::NodeId;

/// Errors raised while building, encoding, or loading a graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("failed to open graph file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode graph: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("failed to decode graph: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("not a graph file (bad magic bytes)")]
    BadMagic,

    #[error("unsupported graph file version {0}")]
    UnsupportedVersion(u32),

    #[error("expected a {expected} graph, found {found}")]
    ModeMismatch {
        expected: TravelMode,
        found: TravelMode,
    },

    #[error("duplicate node id {0}")]
    DuplicateNode(NodeId),

    #[error("node {id} has invalid coordinates ({lat}, {lon})")]
    InvalidNode { id: NodeId, lat: f64, lon: f64 },

    #[error("edge {from} -> {to} references an unknown node")]
    DanglingEdge { from: NodeId, to: NodeId },

    #[error("edge {from} -> {to} is invalid: {reason}")]
    InvalidEdge {
        from: NodeId,
        to: NodeId,
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = GraphError::DanglingEdge { from: 3, to: 9 };
        assert_eq!(err.to_string(), "edge 3 -> 9 references an unknown node");

        let err = GraphError::ModeMismatch {
            expected: TravelMode::Car,
            found: TravelMode::Walk,
        };
        assert_eq!(err.to_string(), "expected a car graph, found walk");

        let err = GraphError::UnsupportedVersion(7);
        assert_eq!(err.to_string(), "unsupported graph file version 7");
    }
}
