//! Per-component occupancy wrappers.
//!
//! The vehicle manager builds exactly one [`Occupied`] for every node and
//! every edge of its region and keeps them for its whole lifetime.  Each
//! wrapper records which vehicles are on its component, when they got there,
//! and where they came from.

use std::collections::BTreeMap;
use std::fmt;

use ds_core::{EdgeId, NodeId, Tick, VehicleId};
use ds_region::NodeKind;

// ── ComponentRef ──────────────────────────────────────────────────────────────

/// Handle naming any graph component.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComponentRef {
    Node(NodeId),
    Edge(EdgeId),
}

impl ComponentRef {
    pub fn as_node(self) -> Option<NodeId> {
        match self {
            ComponentRef::Node(n) => Some(n),
            ComponentRef::Edge(_) => None,
        }
    }

    pub fn as_edge(self) -> Option<EdgeId> {
        match self {
            ComponentRef::Edge(e) => Some(e),
            ComponentRef::Node(_) => None,
        }
    }

    #[inline]
    pub fn is_node(self) -> bool {
        matches!(self, ComponentRef::Node(_))
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentRef::Node(n) => write!(f, "{n}"),
            ComponentRef::Edge(e) => write!(f, "{e}"),
        }
    }
}

// ── OccupiedKind ──────────────────────────────────────────────────────────────

/// Which flavour of wrapper an [`Occupied`] is.  Decides the arrival event
/// emitted and which order operations it accepts.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OccupiedKind {
    Node,
    Restaurant,
    Neighborhood,
    Edge,
}

impl From<&NodeKind> for OccupiedKind {
    fn from(kind: &NodeKind) -> Self {
        match kind {
            NodeKind::Plain             => OccupiedKind::Node,
            NodeKind::Restaurant { .. } => OccupiedKind::Restaurant,
            NodeKind::Neighborhood      => OccupiedKind::Neighborhood,
        }
    }
}

// ── VehicleStats ──────────────────────────────────────────────────────────────

/// What a wrapper knows about one vehicle on its component.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct VehicleStats {
    /// Tick the vehicle entered the component.
    pub arrived_at: Tick,

    /// Component occupied before this one; `None` right after spawning.
    pub previous: Option<ComponentRef>,
}

// ── Occupied ──────────────────────────────────────────────────────────────────

/// Occupancy of a single node or edge.
///
/// Vehicles are kept in a `BTreeMap` so iteration (and therefore the order
/// in which vehicles move within a tick) is by ascending `VehicleId`.
#[derive(Clone, Debug)]
pub struct Occupied {
    component: ComponentRef,
    kind:      OccupiedKind,
    vehicles:  BTreeMap<VehicleId, VehicleStats>,
}

impl Occupied {
    pub(crate) fn node(id: NodeId, kind: &NodeKind) -> Self {
        Self {
            component: ComponentRef::Node(id),
            kind:      kind.into(),
            vehicles:  BTreeMap::new(),
        }
    }

    pub(crate) fn edge(id: EdgeId) -> Self {
        Self {
            component: ComponentRef::Edge(id),
            kind:      OccupiedKind::Edge,
            vehicles:  BTreeMap::new(),
        }
    }

    #[inline]
    pub fn component(&self) -> ComponentRef {
        self.component
    }

    #[inline]
    pub fn kind(&self) -> OccupiedKind {
        self.kind
    }

    pub fn vehicles(&self) -> &BTreeMap<VehicleId, VehicleStats> {
        &self.vehicles
    }

    pub fn vehicle_ids(&self) -> impl Iterator<Item = VehicleId> + '_ {
        self.vehicles.keys().copied()
    }

    #[inline]
    pub fn contains(&self, vehicle: VehicleId) -> bool {
        self.vehicles.contains_key(&vehicle)
    }

    pub fn stats(&self, vehicle: VehicleId) -> Option<&VehicleStats> {
        self.vehicles.get(&vehicle)
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub(crate) fn insert(&mut self, vehicle: VehicleId, stats: VehicleStats) {
        self.vehicles.insert(vehicle, stats);
    }

    pub(crate) fn remove(&mut self, vehicle: VehicleId) -> Option<VehicleStats> {
        self.vehicles.remove(&vehicle)
    }

    /// Vehicles ready to leave at `now`.
    ///
    /// On a node every present vehicle is due.  On an edge a vehicle is due
    /// once `now >= arrived_at + duration`.
    pub(crate) fn due_vehicles(&self, now: Tick, duration: u64) -> Vec<VehicleId> {
        match self.kind {
            OccupiedKind::Edge => self
                .vehicles
                .iter()
                .filter(|(_, s)| s.arrived_at + duration <= now)
                .map(|(&v, _)| v)
                .collect(),
            _ => self.vehicles.keys().copied().collect(),
        }
    }

    pub(crate) fn reset(&mut self) {
        self.vehicles.clear();
    }
}
