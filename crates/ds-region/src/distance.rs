//! Straight-line distance metrics on the integer grid.

use ds_core::Location;

/// Metric used to measure the distance between two locations.
///
/// Distances are geometric only; travel cost along the graph is always the
/// edge `duration`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DistanceCalculator {
    #[default]
    Euclidean,
    /// Sum of absolute coordinate differences.
    Manhattan,
    /// Largest absolute coordinate difference.
    Chessboard,
}

impl DistanceCalculator {
    pub fn distance(self, a: Location, b: Location) -> f64 {
        let dx = (a.x as f64 - b.x as f64).abs();
        let dy = (a.y as f64 - b.y as f64).abs();
        match self {
            DistanceCalculator::Euclidean  => dx.hypot(dy),
            DistanceCalculator::Manhattan  => dx + dy,
            DistanceCalculator::Chessboard => dx.max(dy),
        }
    }
}
