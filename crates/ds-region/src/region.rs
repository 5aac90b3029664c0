//! The [`Region`] graph and its builder.
//!
//! # Data layout
//!
//! Nodes and edges live in two `Vec`s indexed by `NodeId` / `EdgeId`.  Two
//! Fx hash maps give O(1) lookup by [`Location`] and by canonical location
//! pair.  Adjacency is stored in **Compressed Sparse Row (CSR)** form: the
//! neighbours of node `n` occupy
//!
//! ```text
//! adjacency[ adj_start[n] .. adj_start[n+1] ]
//! ```
//!
//! sorted by neighbour location, so every traversal (and therefore every
//! path calculation) visits neighbours in a deterministic order.
//!
//! A `Region` is immutable once built; there is no removal API.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use ds_core::{EdgeId, Location, NodeId};

use crate::component::{Edge, Node, NodeKind, RegionId};
use crate::{DistanceCalculator, RegionError, RegionResult};

// ── Region ────────────────────────────────────────────────────────────────────

/// An immutable location graph of [`Node`]s and undirected [`Edge`]s.
///
/// Do not construct directly; use [`RegionBuilder`].
#[derive(Debug)]
pub struct Region {
    id:           RegionId,
    nodes:        Vec<Node>,
    edges:        Vec<Edge>,
    node_index:   FxHashMap<Location, NodeId>,
    edge_index:   FxHashMap<(Location, Location), EdgeId>,
    adj_start:    Vec<u32>,
    adjacency:    Vec<(NodeId, EdgeId)>,
    distance:     DistanceCalculator,
}

impl Region {
    #[inline]
    pub fn id(&self) -> RegionId {
        self.id
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    /// The node at `location`, if any.
    pub fn node_at(&self, location: Location) -> Option<&Node> {
        self.node_index.get(&location).map(|id| &self.nodes[id.index()])
    }

    pub fn node_id_at(&self, location: Location) -> Option<NodeId> {
        self.node_index.get(&location).copied()
    }

    /// The edge joining `a` and `b`, in either direction.
    pub fn edge_at(&self, a: Location, b: Location) -> Option<&Edge> {
        self.edge_index
            .get(&a.ordered_pair(b))
            .map(|id| &self.edges[id.index()])
    }

    /// The edge joining nodes `a` and `b`, in either direction.
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<&Edge> {
        let (a, b) = (self.node(a)?, self.node(b)?);
        self.edge_at(a.location, b.location)
    }

    /// Read-only view of all nodes, indexed by `NodeId`.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Read-only view of all edges, indexed by `EdgeId`.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn restaurants(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().filter(|n| n.kind.is_restaurant())
    }

    pub fn neighborhoods(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().filter(|n| n.kind.is_neighborhood())
    }

    // ── Adjacency ─────────────────────────────────────────────────────────

    /// `(neighbour, connecting edge)` pairs of `node`, by ascending neighbour
    /// location.  Empty for unknown nodes.
    #[inline]
    pub fn neighbours(&self, node: NodeId) -> &[(NodeId, EdgeId)] {
        if node.index() >= self.nodes.len() {
            return &[];
        }
        let start = self.adj_start[node.index()] as usize;
        let end   = self.adj_start[node.index() + 1] as usize;
        &self.adjacency[start..end]
    }

    pub fn adjacent_nodes(&self, node: NodeId) -> impl Iterator<Item = &Node> + '_ {
        self.neighbours(node).iter().map(|(n, _)| &self.nodes[n.index()])
    }

    pub fn adjacent_edges(&self, node: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.neighbours(node).iter().map(|(_, e)| &self.edges[e.index()])
    }

    // ── Distance ──────────────────────────────────────────────────────────

    pub fn distance_calculator(&self) -> DistanceCalculator {
        self.distance
    }

    /// Straight-line distance between two locations under this region's metric.
    pub fn distance(&self, a: Location, b: Location) -> f64 {
        self.distance.distance(a, b)
    }
}

// ── RegionBuilder ─────────────────────────────────────────────────────────────

/// Construct a [`Region`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use ds_core::Location;
/// use ds_region::{NodeKind, RegionBuilder};
///
/// let mut b = RegionBuilder::new();
/// let a = b.add_node("A", Location::new(0, 0), NodeKind::Restaurant { available_food: vec![] }).unwrap();
/// let c = b.add_node("B", Location::new(5, 0), NodeKind::Neighborhood).unwrap();
/// b.add_edge("A-B", Location::new(5, 0), Location::new(0, 0), 5).unwrap();
/// let region = b.build();
/// assert_eq!(region.node_count(), 2);
/// assert_eq!(region.edge_between(a, c).unwrap().duration(), 5);
/// ```
pub struct RegionBuilder {
    id:         RegionId,
    nodes:      Vec<Node>,
    edges:      Vec<Edge>,
    node_index: FxHashMap<Location, NodeId>,
    edge_index: FxHashMap<(Location, Location), EdgeId>,
    distance:   DistanceCalculator,
}

impl RegionBuilder {
    pub fn new() -> Self {
        Self {
            id:         RegionId::fresh(),
            nodes:      Vec::new(),
            edges:      Vec::new(),
            node_index: FxHashMap::default(),
            edge_index: FxHashMap::default(),
            distance:   DistanceCalculator::default(),
        }
    }

    /// The id every component for this region must be created with.
    #[inline]
    pub fn id(&self) -> RegionId {
        self.id
    }

    /// Use `distance` instead of the Euclidean default.
    pub fn distance_calculator(mut self, distance: DistanceCalculator) -> Self {
        self.distance = distance;
        self
    }

    /// Insert a node created with [`Node::new`] and return its id.
    ///
    /// # Errors
    ///
    /// - [`RegionError::ForeignComponent`] if the node was created for
    ///   another region.
    /// - [`RegionError::DuplicateLocation`] if a node already sits at its
    ///   location.
    pub fn put_node(&mut self, mut node: Node) -> RegionResult<NodeId> {
        if node.region != self.id {
            return Err(RegionError::ForeignComponent { name: node.name });
        }
        if self.node_index.contains_key(&node.location) {
            return Err(RegionError::DuplicateLocation(node.location));
        }
        let id = NodeId(self.nodes.len() as u32);
        node.id = id;
        self.node_index.insert(node.location, id);
        self.nodes.push(node);
        Ok(id)
    }

    /// Insert an edge created with [`Edge::new`] and return its id.
    ///
    /// Both endpoints must already be nodes of this builder.  Each endpoint
    /// is added to the other's `connections`.
    ///
    /// # Errors
    ///
    /// - [`RegionError::ForeignComponent`] for an edge of another region.
    /// - [`RegionError::MissingEndpoint`] if an endpoint is not a node.
    /// - [`RegionError::DuplicateEdge`] if the endpoints are already joined.
    pub fn put_edge(&mut self, mut edge: Edge) -> RegionResult<EdgeId> {
        if edge.region != self.id {
            return Err(RegionError::ForeignComponent { name: edge.name });
        }
        let node_a = *self
            .node_index
            .get(&edge.location_a)
            .ok_or(RegionError::MissingEndpoint(edge.location_a))?;
        let node_b = *self
            .node_index
            .get(&edge.location_b)
            .ok_or(RegionError::MissingEndpoint(edge.location_b))?;
        let key = (edge.location_a, edge.location_b);
        if self.edge_index.contains_key(&key) {
            return Err(RegionError::DuplicateEdge { a: key.0, b: key.1 });
        }

        let id = EdgeId(self.edges.len() as u32);
        edge.id = id;
        edge.node_a = node_a;
        edge.node_b = node_b;
        self.nodes[node_a.index()].connections.insert(edge.location_b);
        self.nodes[node_b.index()].connections.insert(edge.location_a);
        self.edge_index.insert(key, id);
        self.edges.push(edge);
        Ok(id)
    }

    /// Convenience: create and insert a node in one step.
    pub fn add_node(
        &mut self,
        name:     impl Into<String>,
        location: Location,
        kind:     NodeKind,
    ) -> RegionResult<NodeId> {
        let node = Node::new(self.id, name, location, kind);
        self.put_node(node)
    }

    /// Convenience: create and insert an edge, ordering the endpoints first.
    pub fn add_edge(
        &mut self,
        name:     impl Into<String>,
        a:        Location,
        b:        Location,
        duration: u64,
    ) -> RegionResult<EdgeId> {
        let (a, b) = a.ordered_pair(b);
        let edge = Edge::new(self.id, name, a, b, duration)?;
        self.put_edge(edge)
    }

    /// Look up a node added earlier by location.
    pub fn node_id_at(&self, location: Location) -> Option<NodeId> {
        self.node_index.get(&location).copied()
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Consume the builder and produce a [`Region`].
    ///
    /// Time complexity: O(E log E) for sorting the adjacency lists.
    pub fn build(self) -> Region {
        let node_count = self.nodes.len();

        // Both directions of every undirected edge.
        let mut raw: Vec<(NodeId, Location, NodeId, EdgeId)> = Vec::with_capacity(self.edges.len() * 2);
        for e in &self.edges {
            raw.push((e.node_a, e.location_b, e.node_b, e.id));
            raw.push((e.node_b, e.location_a, e.node_a, e.id));
        }
        raw.sort_unstable_by_key(|&(from, to_loc, _, _)| (from, to_loc));

        let mut adj_start = vec![0u32; node_count + 1];
        for &(from, _, _, _) in &raw {
            adj_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            adj_start[i] += adj_start[i - 1];
        }
        debug_assert_eq!(adj_start[node_count] as usize, raw.len());

        let adjacency = raw.into_iter().map(|(_, _, to, e)| (to, e)).collect();

        Region {
            id: self.id,
            nodes: self.nodes,
            edges: self.edges,
            node_index: self.node_index,
            edge_index: self.edge_index,
            adj_start,
            adjacency,
            distance: self.distance,
        }
    }

    /// [`build`](Self::build) wrapped in an `Arc`, the form the vehicle
    /// manager and raters share.
    pub fn build_shared(self) -> Arc<Region> {
        Arc::new(self.build())
    }
}

impl Default for RegionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
