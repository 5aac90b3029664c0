//! Region error type.

use thiserror::Error;

use ds_core::{Location, NodeId};

/// Errors produced by `ds-region`.
///
/// Every construction-time variant is structural: a region that fails to
/// build is malformed input, not a transient condition.
#[derive(Debug, Error)]
pub enum RegionError {
    #[error("edge endpoints must be ascending: {a} > {b}")]
    UnorderedEndpoints { a: Location, b: Location },

    #[error("component {name:?} belongs to a different region")]
    ForeignComponent { name: String },

    #[error("a node already exists at {0}")]
    DuplicateLocation(Location),

    #[error("edge endpoint {0} is not a node of this region")]
    MissingEndpoint(Location),

    #[error("an edge between {a} and {b} already exists")]
    DuplicateEdge { a: Location, b: Location },

    #[error("node {0} not found in region")]
    NodeNotFound(NodeId),

    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("region parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RegionResult<T> = Result<T, RegionError>;
