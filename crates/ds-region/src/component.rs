//! Graph components: [`Node`], [`Edge`], and the owning-region tag.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use ds_core::{EdgeId, Location, NodeId};

use crate::{RegionError, RegionResult};

// ── RegionId ──────────────────────────────────────────────────────────────────

static NEXT_REGION_ID: AtomicU32 = AtomicU32::new(0);

/// Identity of one region instance.  Every component is stamped with the
/// region it was created for; inserting it anywhere else is rejected.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct RegionId(u32);

impl RegionId {
    pub(crate) fn fresh() -> Self {
        RegionId(NEXT_REGION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

// ── NodeKind ──────────────────────────────────────────────────────────────────

/// What a node represents.  Drives which occupancy wrapper the vehicle
/// manager builds for it and which arrival event it emits.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// A plain intersection.
    #[default]
    Plain,
    /// A restaurant: vehicles spawn and load orders here.
    Restaurant { available_food: Vec<String> },
    /// A neighborhood: orders are delivered here.
    Neighborhood,
}

impl NodeKind {
    #[inline]
    pub fn is_restaurant(&self) -> bool {
        matches!(self, NodeKind::Restaurant { .. })
    }

    #[inline]
    pub fn is_neighborhood(&self) -> bool {
        matches!(self, NodeKind::Neighborhood)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Plain             => "node",
            NodeKind::Restaurant { .. } => "restaurant",
            NodeKind::Neighborhood      => "neighborhood",
        }
    }
}

// ── Node ──────────────────────────────────────────────────────────────────────

/// A graph node.  Location is the primary key inside its region.
///
/// `connections` lists the locations of every node this node shares an edge
/// with; it is maintained by [`RegionBuilder::put_edge`](crate::RegionBuilder::put_edge).
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) id:          NodeId,
    pub(crate) region:      RegionId,
    pub(crate) name:        String,
    pub(crate) location:    Location,
    pub(crate) connections: BTreeSet<Location>,
    pub(crate) kind:        NodeKind,
}

impl Node {
    /// Create a node for `region`.  The id is assigned on insertion.
    pub fn new(region: RegionId, name: impl Into<String>, location: Location, kind: NodeKind) -> Self {
        Self {
            id: NodeId::INVALID,
            region,
            name: name.into(),
            location,
            connections: BTreeSet::new(),
            kind,
        }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn region(&self) -> RegionId {
        self.region
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn location(&self) -> Location {
        self.location
    }

    pub fn connections(&self) -> &BTreeSet<Location> {
        &self.connections
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Food a restaurant offers; empty for every other kind.
    pub fn available_food(&self) -> &[String] {
        match &self.kind {
            NodeKind::Restaurant { available_food } => available_food,
            _ => &[],
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.location == other.location
            && self.connections == other.connections
    }
}

impl Eq for Node {}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} at {}", self.kind.as_str(), self.name, self.location)
    }
}

// ── Edge ──────────────────────────────────────────────────────────────────────

/// An undirected, weighted edge between two nodes.
///
/// The endpoints are stored in ascending [`Location`] order; [`Edge::new`]
/// refuses anything else.
#[derive(Clone, Debug)]
pub struct Edge {
    pub(crate) id:         EdgeId,
    pub(crate) region:     RegionId,
    pub(crate) name:       String,
    pub(crate) location_a: Location,
    pub(crate) location_b: Location,
    pub(crate) node_a:     NodeId,
    pub(crate) node_b:     NodeId,
    pub(crate) duration:   u64,
}

impl Edge {
    /// Create an edge for `region` from `location_a` to `location_b`
    /// taking `duration` ticks to traverse.
    ///
    /// # Errors
    ///
    /// [`RegionError::UnorderedEndpoints`] if `location_a > location_b`.
    pub fn new(
        region:     RegionId,
        name:       impl Into<String>,
        location_a: Location,
        location_b: Location,
        duration:   u64,
    ) -> RegionResult<Self> {
        if location_a > location_b {
            return Err(RegionError::UnorderedEndpoints { a: location_a, b: location_b });
        }
        Ok(Self {
            id: EdgeId::INVALID,
            region,
            name: name.into(),
            location_a,
            location_b,
            node_a: NodeId::INVALID,
            node_b: NodeId::INVALID,
            duration,
        })
    }

    #[inline]
    pub fn id(&self) -> EdgeId {
        self.id
    }

    #[inline]
    pub fn region(&self) -> RegionId {
        self.region
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn location_a(&self) -> Location {
        self.location_a
    }

    #[inline]
    pub fn location_b(&self) -> Location {
        self.location_b
    }

    /// Node at the smaller endpoint.
    #[inline]
    pub fn node_a(&self) -> NodeId {
        self.node_a
    }

    /// Node at the larger endpoint.
    #[inline]
    pub fn node_b(&self) -> NodeId {
        self.node_b
    }

    /// Ticks a vehicle spends on this edge.
    #[inline]
    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// The endpoint opposite `node`, or `None` if `node` is not an endpoint.
    pub fn other_end(&self, node: NodeId) -> Option<NodeId> {
        if node == self.node_a {
            Some(self.node_b)
        } else if node == self.node_b {
            Some(self.node_a)
        } else {
            None
        }
    }

    #[inline]
    pub fn connects(&self, node: NodeId) -> bool {
        node == self.node_a || node == self.node_b
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.location_a == other.location_a
            && self.location_b == other.location_b
            && self.duration == other.duration
    }
}

impl Eq for Edge {}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "edge {:?} {} -> {} ({} ticks)",
            self.name, self.location_a, self.location_b, self.duration
        )
    }
}
