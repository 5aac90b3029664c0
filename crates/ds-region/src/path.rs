//! Path calculation trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The vehicle manager plans every move through the [`PathCalculator`]
//! trait object it was constructed with, so applications can swap in A*,
//! a cached calculator, or a behavioural model without touching the engine.
//!
//! # Path shape
//!
//! A path from `from` to `to` lists the nodes to visit **after** `from`, in
//! order, ending with `to`.  It is empty exactly when `from == to`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ds_core::NodeId;

use crate::{Region, RegionError, RegionResult};

// ── PathCalculator trait ──────────────────────────────────────────────────────

/// Pluggable path computation.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`: one calculator is shared (behind
/// an `Arc`) by the vehicle manager and the raters of a simulation, and
/// simulations may run on separate threads.
pub trait PathCalculator: Send + Sync {
    /// Compute the node sequence leading from `from` to `to`.
    ///
    /// # Errors
    ///
    /// [`RegionError::NodeNotFound`] for a node outside `region`,
    /// [`RegionError::NoPath`] if `to` is unreachable.
    fn path(&self, region: &Region, from: NodeId, to: NodeId) -> RegionResult<Vec<NodeId>>;

    /// Total edge duration along the path from `from` to `to`.
    fn path_duration(&self, region: &Region, from: NodeId, to: NodeId) -> RegionResult<u64> {
        let path = self.path(region, from, to)?;
        let mut total = 0;
        let mut last = from;
        for next in path {
            let edge = region
                .edge_between(last, next)
                .ok_or(RegionError::NoPath { from: last, to: next })?;
            total += edge.duration();
            last = next;
        }
        Ok(total)
    }
}

// ── DijkstraPathCalculator ────────────────────────────────────────────────────

/// Standard Dijkstra over the region's CSR adjacency, with edge `duration`
/// as cost.
///
/// Ties are broken by `NodeId`, so equal-cost alternatives always resolve
/// the same way and seeded runs stay reproducible.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraPathCalculator;

impl PathCalculator for DijkstraPathCalculator {
    fn path(&self, region: &Region, from: NodeId, to: NodeId) -> RegionResult<Vec<NodeId>> {
        dijkstra(region, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

fn dijkstra(region: &Region, from: NodeId, to: NodeId) -> RegionResult<Vec<NodeId>> {
    let n = region.node_count();
    if from.index() >= n {
        return Err(RegionError::NodeNotFound(from));
    }
    if to.index() >= n {
        return Err(RegionError::NodeNotFound(to));
    }
    if from == to {
        return Ok(Vec::new());
    }

    // dist[v] = best known cost to reach v.
    let mut dist = vec![u64::MAX; n];
    // prev[v] = node that reached v; INVALID for unreached nodes.
    let mut prev = vec![NodeId::INVALID; n];

    dist[from.index()] = 0;

    // Min-heap: (cost, node). Secondary key NodeId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(&prev, from, to));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for &(neighbour, edge) in region.neighbours(node) {
            let duration = region.edges()[edge.index()].duration();
            let new_cost = cost.saturating_add(duration);

            if new_cost < dist[neighbour.index()] {
                dist[neighbour.index()] = new_cost;
                prev[neighbour.index()] = node;
                heap.push(Reverse((new_cost, neighbour)));
            }
        }
    }

    Err(RegionError::NoPath { from, to })
}

fn reconstruct(prev: &[NodeId], from: NodeId, to: NodeId) -> Vec<NodeId> {
    let mut nodes = Vec::new();
    let mut cur = to;
    while cur != from {
        nodes.push(cur);
        cur = prev[cur.index()];
    }
    nodes.reverse();
    nodes
}
