//! CSV region loader.
//!
//! # CSV format
//!
//! Two files (or readers).  `nodes.csv` has one row per node:
//!
//! ```csv
//! name,x,y,kind,food
//! Pizzeria,0,0,restaurant,Margherita;Funghi
//! Elm Street,5,0,neighborhood,
//! Crossing,2,3,node,
//! ```
//!
//! **`kind`** is `node`, `restaurant`, or `neighborhood`.  **`food`** is a
//! `;`-separated menu, only read for restaurants.
//!
//! `edges.csv` has one row per undirected edge; endpoints may be listed in
//! either order:
//!
//! ```csv
//! name,ax,ay,bx,by,duration
//! Main,0,0,5,0,5
//! ```
//!
//! Every structural rule of [`RegionBuilder`] applies; the first violation
//! aborts the load.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ds_core::Location;

use crate::component::NodeKind;
use crate::{Region, RegionBuilder, RegionError, RegionResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    name: String,
    x:    i32,
    y:    i32,
    kind: String,
    #[serde(default)]
    food: String,
}

#[derive(Deserialize)]
struct EdgeRecord {
    name:     String,
    ax:       i32,
    ay:       i32,
    bx:       i32,
    by:       i32,
    duration: u64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load `nodes.csv` and `edges.csv` from `dir`.
pub fn load_region_csv(dir: &Path) -> RegionResult<Region> {
    let nodes = std::fs::File::open(dir.join("nodes.csv"))?;
    let edges = std::fs::File::open(dir.join("edges.csv"))?;
    load_region_reader(nodes, edges)
}

/// Like [`load_region_csv`] but accepts any two `Read` sources.
///
/// Useful for testing (pass `std::io::Cursor`s) or embedded maps.
pub fn load_region_reader<N: Read, E: Read>(nodes: N, edges: E) -> RegionResult<Region> {
    let mut builder = RegionBuilder::new();

    let mut node_reader = csv::Reader::from_reader(nodes);
    for result in node_reader.deserialize::<NodeRecord>() {
        let row = result.map_err(|e| RegionError::Parse(e.to_string()))?;
        let kind = parse_kind(&row.kind, &row.food)?;
        builder.add_node(row.name, Location::new(row.x, row.y), kind)?;
    }

    let mut edge_reader = csv::Reader::from_reader(edges);
    for result in edge_reader.deserialize::<EdgeRecord>() {
        let row = result.map_err(|e| RegionError::Parse(e.to_string()))?;
        builder.add_edge(
            row.name,
            Location::new(row.ax, row.ay),
            Location::new(row.bx, row.by),
            row.duration,
        )?;
    }

    Ok(builder.build())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_kind(kind: &str, food: &str) -> RegionResult<NodeKind> {
    match kind.trim() {
        "node" => Ok(NodeKind::Plain),
        "neighborhood" => Ok(NodeKind::Neighborhood),
        "restaurant" => {
            let available_food = food
                .split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect();
            Ok(NodeKind::Restaurant { available_food })
        }
        other => Err(RegionError::Parse(format!(
            "invalid node kind {other:?}: expected \"node\", \"restaurant\", or \"neighborhood\""
        ))),
    }
}
