//! Unit tests for ds-region.

#[cfg(test)]
mod builder {
    use ds_core::Location;

    use crate::{Edge, Node, NodeKind, RegionBuilder, RegionError};

    #[test]
    fn edge_requires_ascending_endpoints() {
        let b = RegionBuilder::new();
        let err = Edge::new(b.id(), "bad", Location::new(5, 0), Location::new(0, 0), 5).unwrap_err();
        assert!(matches!(err, RegionError::UnorderedEndpoints { .. }));
    }

    #[test]
    fn add_edge_orders_endpoints() {
        let mut b = RegionBuilder::new();
        b.add_node("A", Location::new(0, 0), NodeKind::Plain).unwrap();
        b.add_node("B", Location::new(5, 0), NodeKind::Plain).unwrap();
        b.add_edge("AB", Location::new(5, 0), Location::new(0, 0), 5).unwrap();
        let region = b.build();
        let e = region.edge_at(Location::new(5, 0), Location::new(0, 0)).unwrap();
        assert_eq!(e.location_a(), Location::new(0, 0));
        assert_eq!(e.location_b(), Location::new(5, 0));
    }

    #[test]
    fn edges_are_symmetric() {
        let region = super::two_node_region();
        let a = region.node_id_at(Location::new(0, 0)).unwrap();
        let c = region.node_id_at(Location::new(5, 0)).unwrap();
        assert_eq!(region.edge_between(a, c), region.edge_between(c, a));
        assert!(region.node(a).unwrap().connections().contains(&Location::new(5, 0)));
        assert!(region.node(c).unwrap().connections().contains(&Location::new(0, 0)));
    }

    #[test]
    fn foreign_node_rejected() {
        let other = RegionBuilder::new();
        let mut b = RegionBuilder::new();
        let node = Node::new(other.id(), "X", Location::new(0, 0), NodeKind::Plain);
        let err = b.put_node(node).unwrap_err();
        assert!(matches!(err, RegionError::ForeignComponent { .. }));
    }

    #[test]
    fn foreign_edge_rejected() {
        let other = RegionBuilder::new();
        let mut b = RegionBuilder::new();
        b.add_node("A", Location::new(0, 0), NodeKind::Plain).unwrap();
        b.add_node("B", Location::new(1, 0), NodeKind::Plain).unwrap();
        let edge = Edge::new(other.id(), "AB", Location::new(0, 0), Location::new(1, 0), 1).unwrap();
        assert!(matches!(b.put_edge(edge), Err(RegionError::ForeignComponent { .. })));
    }

    #[test]
    fn duplicate_location_rejected() {
        let mut b = RegionBuilder::new();
        b.add_node("A", Location::new(0, 0), NodeKind::Plain).unwrap();
        let err = b.add_node("A2", Location::new(0, 0), NodeKind::Neighborhood).unwrap_err();
        assert!(matches!(err, RegionError::DuplicateLocation(_)));
    }

    #[test]
    fn missing_endpoint_rejected() {
        let mut b = RegionBuilder::new();
        b.add_node("A", Location::new(0, 0), NodeKind::Plain).unwrap();
        let err = b.add_edge("AX", Location::new(0, 0), Location::new(9, 9), 3).unwrap_err();
        assert!(matches!(err, RegionError::MissingEndpoint(l) if l == Location::new(9, 9)));
    }

    #[test]
    fn duplicate_edge_rejected() {
        let mut b = RegionBuilder::new();
        b.add_node("A", Location::new(0, 0), NodeKind::Plain).unwrap();
        b.add_node("B", Location::new(1, 0), NodeKind::Plain).unwrap();
        b.add_edge("AB", Location::new(0, 0), Location::new(1, 0), 1).unwrap();
        let err = b.add_edge("BA", Location::new(1, 0), Location::new(0, 0), 2).unwrap_err();
        assert!(matches!(err, RegionError::DuplicateEdge { .. }));
    }

    #[test]
    fn ids_are_assigned_in_insertion_order() {
        let region = super::two_node_region();
        for (i, node) in region.nodes().iter().enumerate() {
            assert_eq!(node.id().index(), i);
        }
        assert_eq!(region.edges()[0].id().index(), 0);
    }

    #[test]
    fn kind_filters() {
        let region = super::two_node_region();
        let restaurants: Vec<_> = region.restaurants().map(|n| n.name()).collect();
        let hoods: Vec<_> = region.neighborhoods().map(|n| n.name()).collect();
        assert_eq!(restaurants, vec!["A"]);
        assert_eq!(hoods, vec!["B"]);
        assert_eq!(region.restaurants().next().unwrap().available_food(), ["pizza".to_string()]);
    }
}

#[cfg(test)]
mod adjacency {
    use ds_core::Location;

    #[test]
    fn neighbours_sorted_by_location() {
        let region = super::diamond_region();
        let s = region.node_id_at(Location::new(0, 0)).unwrap();
        let locs: Vec<_> = region
            .adjacent_nodes(s)
            .map(|n| n.location())
            .collect();
        assert_eq!(locs, vec![Location::new(1, -1), Location::new(1, 1)]);
    }

    #[test]
    fn adjacent_edges_match_neighbours() {
        let region = super::diamond_region();
        let t = region.node_id_at(Location::new(2, 0)).unwrap();
        assert_eq!(region.adjacent_edges(t).count(), 2);
        for e in region.adjacent_edges(t) {
            assert!(e.connects(t));
        }
    }

    #[test]
    fn other_end() {
        let region = super::two_node_region();
        let e = &region.edges()[0];
        assert_eq!(e.other_end(e.node_a()), Some(e.node_b()));
        assert_eq!(e.other_end(e.node_b()), Some(e.node_a()));
        assert_eq!(e.other_end(ds_core::NodeId(99)), None);
    }

    #[test]
    fn unknown_node_has_no_neighbours() {
        let region = super::two_node_region();
        assert!(region.neighbours(ds_core::NodeId(42)).is_empty());
    }
}

#[cfg(test)]
mod paths {
    use ds_core::{Location, NodeId};

    use crate::{DijkstraPathCalculator, NodeKind, PathCalculator, RegionBuilder, RegionError};

    #[test]
    fn picks_cheaper_branch() {
        let region = super::diamond_region();
        let s = region.node_id_at(Location::new(0, 0)).unwrap();
        let t = region.node_id_at(Location::new(2, 0)).unwrap();
        let lower = region.node_id_at(Location::new(1, -1)).unwrap();
        let path = DijkstraPathCalculator.path(&region, s, t).unwrap();
        assert_eq!(path, vec![lower, t]);
        assert_eq!(DijkstraPathCalculator.path_duration(&region, s, t).unwrap(), 2);
    }

    #[test]
    fn self_path_is_empty() {
        let region = super::diamond_region();
        let s = region.node_id_at(Location::new(0, 0)).unwrap();
        assert!(DijkstraPathCalculator.path(&region, s, s).unwrap().is_empty());
        assert_eq!(DijkstraPathCalculator.path_duration(&region, s, s).unwrap(), 0);
    }

    #[test]
    fn unreachable_is_no_path() {
        let mut b = RegionBuilder::new();
        let a = b.add_node("A", Location::new(0, 0), NodeKind::Plain).unwrap();
        let c = b.add_node("C", Location::new(3, 3), NodeKind::Plain).unwrap();
        let region = b.build();
        let err = DijkstraPathCalculator.path(&region, a, c).unwrap_err();
        assert!(matches!(err, RegionError::NoPath { .. }));
    }

    #[test]
    fn unknown_node_is_not_found() {
        let region = super::two_node_region();
        let err = DijkstraPathCalculator.path(&region, NodeId(0), NodeId(7)).unwrap_err();
        assert!(matches!(err, RegionError::NodeNotFound(NodeId(7))));
    }

    #[test]
    fn equal_cost_ties_are_stable() {
        let mut b = RegionBuilder::new();
        for (name, x, y) in [("S", 0, 0), ("U", 1, 1), ("D", 1, -1), ("T", 2, 0)] {
            b.add_node(name, Location::new(x, y), NodeKind::Plain).unwrap();
        }
        b.add_edge("SU", Location::new(0, 0), Location::new(1, 1), 1).unwrap();
        b.add_edge("SD", Location::new(0, 0), Location::new(1, -1), 1).unwrap();
        b.add_edge("UT", Location::new(1, 1), Location::new(2, 0), 1).unwrap();
        b.add_edge("DT", Location::new(1, -1), Location::new(2, 0), 1).unwrap();
        let region = b.build();
        let s = region.node_id_at(Location::new(0, 0)).unwrap();
        let t = region.node_id_at(Location::new(2, 0)).unwrap();
        let first = DijkstraPathCalculator.path(&region, s, t).unwrap();
        for _ in 0..10 {
            assert_eq!(DijkstraPathCalculator.path(&region, s, t).unwrap(), first);
        }
    }
}

#[cfg(test)]
mod distance {
    use ds_core::Location;

    use crate::DistanceCalculator;

    #[test]
    fn metrics() {
        let a = Location::new(0, 0);
        let b = Location::new(3, -4);
        assert_eq!(DistanceCalculator::Euclidean.distance(a, b), 5.0);
        assert_eq!(DistanceCalculator::Manhattan.distance(a, b), 7.0);
        assert_eq!(DistanceCalculator::Chessboard.distance(a, b), 4.0);
    }

    #[test]
    fn region_uses_configured_metric() {
        let region = crate::RegionBuilder::new()
            .distance_calculator(DistanceCalculator::Manhattan)
            .build();
        assert_eq!(region.distance(Location::new(1, 1), Location::new(2, 3)), 3.0);
    }
}

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use ds_core::Location;

    use crate::{load_region_csv, load_region_reader, NodeKind, RegionError};

    const NODES: &str = "\
name,x,y,kind,food
Pizzeria,0,0,restaurant,Margherita; Funghi
Elm Street,5,0,neighborhood,
Crossing,2,3,node,
";

    const EDGES: &str = "\
name,ax,ay,bx,by,duration
Main,5,0,0,0,5
Side,0,0,2,3,2
";

    #[test]
    fn loads_nodes_and_edges() {
        let region = load_region_reader(Cursor::new(NODES), Cursor::new(EDGES)).unwrap();
        assert_eq!(region.node_count(), 3);
        assert_eq!(region.edge_count(), 2);

        let pizzeria = region.node_at(Location::new(0, 0)).unwrap();
        assert_eq!(
            pizzeria.kind(),
            &NodeKind::Restaurant { available_food: vec!["Margherita".into(), "Funghi".into()] }
        );
        let main = region.edge_at(Location::new(0, 0), Location::new(5, 0)).unwrap();
        assert_eq!(main.duration(), 5);
        assert_eq!(main.name(), "Main");
    }

    #[test]
    fn bad_kind_is_parse_error() {
        let nodes = "name,x,y,kind,food\nX,0,0,garage,\n";
        let err = load_region_reader(Cursor::new(nodes), Cursor::new("name,ax,ay,bx,by,duration\n"))
            .unwrap_err();
        assert!(matches!(err, RegionError::Parse(_)));
    }

    #[test]
    fn structural_errors_abort() {
        let edges = "name,ax,ay,bx,by,duration\nGhost,0,0,9,9,1\n";
        let err = load_region_reader(Cursor::new(NODES), Cursor::new(edges)).unwrap_err();
        assert!(matches!(err, RegionError::MissingEndpoint(_)));
    }

    #[test]
    fn loads_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("nodes.csv"), NODES).unwrap();
        std::fs::write(dir.path().join("edges.csv"), EDGES).unwrap();
        let region = load_region_csv(dir.path()).unwrap();
        assert_eq!(region.node_count(), 3);
    }

    #[test]
    fn missing_directory_is_io_error() {
        let err = load_region_csv(std::path::Path::new("/nonexistent/region")).unwrap_err();
        assert!(matches!(err, RegionError::Io(_)));
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Restaurant "A" at (0,0) joined to neighborhood "B" at (5,0), duration 5.
#[cfg(test)]
fn two_node_region() -> crate::Region {
    use ds_core::Location;

    use crate::{NodeKind, RegionBuilder};

    let mut b = RegionBuilder::new();
    b.add_node(
        "A",
        Location::new(0, 0),
        NodeKind::Restaurant { available_food: vec!["pizza".into()] },
    )
    .unwrap();
    b.add_node("B", Location::new(5, 0), NodeKind::Neighborhood).unwrap();
    b.add_edge("A-B", Location::new(0, 0), Location::new(5, 0), 5).unwrap();
    b.build()
}

/// S(0,0) → {U(1,1), D(1,-1)} → T(2,0); the lower branch costs 2, the upper 6.
#[cfg(test)]
fn diamond_region() -> crate::Region {
    use ds_core::Location;

    use crate::{NodeKind, RegionBuilder};

    let mut b = RegionBuilder::new();
    for (name, x, y) in [("S", 0, 0), ("U", 1, 1), ("D", 1, -1), ("T", 2, 0)] {
        b.add_node(name, Location::new(x, y), NodeKind::Plain).unwrap();
    }
    b.add_edge("SU", Location::new(0, 0), Location::new(1, 1), 3).unwrap();
    b.add_edge("SD", Location::new(0, 0), Location::new(1, -1), 1).unwrap();
    b.add_edge("UT", Location::new(1, 1), Location::new(2, 0), 3).unwrap();
    b.add_edge("DT", Location::new(1, -1), Location::new(2, 0), 1).unwrap();
    b.build()
}
