//! `ds-region` — location graph, distance metrics, and path calculation.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`component`] | `Node`, `NodeKind`, `Edge`, `RegionId`                     |
//! | [`region`]    | `Region` (CSR adjacency + lookup maps), `RegionBuilder`    |
//! | [`distance`]  | `DistanceCalculator` (Euclidean, Manhattan, Chessboard)    |
//! | [`path`]      | `PathCalculator` trait, `DijkstraPathCalculator`           |
//! | [`loader`]    | `load_region_csv`, `load_region_reader`                    |
//! | [`error`]     | `RegionError`, `RegionResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.     |

pub mod component;
pub mod distance;
pub mod error;
pub mod loader;
pub mod path;
pub mod region;

#[cfg(test)]
mod tests;

pub use component::{Edge, Node, NodeKind, RegionId};
pub use distance::DistanceCalculator;
pub use error::{RegionError, RegionResult};
pub use loader::{load_region_csv, load_region_reader};
pub use path::{DijkstraPathCalculator, PathCalculator};
pub use region::{Region, RegionBuilder};
