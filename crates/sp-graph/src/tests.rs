//! Unit tests for sp-graph.
//!
//! All tests use hand-crafted graphs.

#[cfg(test)]
mod helpers {
    use crate::{CheckpointGraph, CheckpointGraphBuilder};

    /// Square circuit with one diagonal:
    ///
    /// ```text
    ///   A ── B
    ///   │  ╲ │
    ///   D ── C
    /// ```
    pub fn square_with_diagonal() -> CheckpointGraph {
        let mut b = CheckpointGraphBuilder::new();
        b.add_path("A", "B", 90).unwrap();
        b.add_path("B", "C", 90).unwrap();
        b.add_path("C", "D", 90).unwrap();
        b.add_path("D", "A", 90).unwrap();
        b.add_path("A", "C", 120).unwrap();
        b.build()
    }
}

// ── Builder & graph structure ─────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use crate::{CheckpointGraph, CheckpointGraphBuilder, GraphError, PatrolPath};

    #[test]
    fn empty_build() {
        let g = CheckpointGraph::empty();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.is_empty());
    }

    #[test]
    fn path_is_stored_both_ways() {
        let mut b = CheckpointGraphBuilder::new();
        b.add_path("A", "B", 90).unwrap();
        let g = b.build();
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 2);
        let a = g.node("A").unwrap();
        let bb = g.node("B").unwrap();
        assert_eq!(g.out_degree(a), 1);
        assert_eq!(g.out_degree(bb), 1);
    }

    #[test]
    fn directed_path_has_no_return_edge() {
        let mut b = CheckpointGraphBuilder::new();
        b.add_directed_path("A", "B", 30).unwrap();
        let g = b.build();
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.out_degree(g.node("B").unwrap()), 0);
    }

    #[test]
    fn out_edges_keep_insertion_order() {
        let g = super::helpers::square_with_diagonal();
        let a = g.node("A").unwrap();
        let dests: Vec<&str> = g
            .out_edges(a)
            .map(|e| g.checkpoint(g.edge_to[e.index()]).as_str())
            .collect();
        assert_eq!(dests, vec!["B", "D", "C"]);
        for e in g.out_edges(a) {
            assert_eq!(g.edge_from[e.index()], a);
        }
    }

    #[test]
    fn first_out_edge_offsets_match_out_edges() {
        let g = super::helpers::square_with_diagonal();
        let c = g.node("C").unwrap();
        let first = g.first_out_edge(c);
        let listed: Vec<_> = g.out_edges(c).collect();
        assert_eq!(listed[0], first);
        assert_eq!(listed.len(), g.out_degree(c));
    }

    #[test]
    fn adding_a_checkpoint_twice_returns_same_index() {
        let mut b = CheckpointGraphBuilder::new();
        let first = b.add_checkpoint("A");
        let again = b.add_checkpoint("A");
        assert_eq!(first, again);
        assert_eq!(b.node_count(), 1);
    }

    #[test]
    fn duplicate_path_rejected() {
        let mut b = CheckpointGraphBuilder::new();
        b.add_path("A", "B", 90).unwrap();
        let err = b.add_directed_path("B", "A", 45).unwrap_err();
        assert!(matches!(err, GraphError::DuplicatePath { .. }));
    }

    #[test]
    fn self_loop_and_zero_duration_rejected() {
        let mut b = CheckpointGraphBuilder::new();
        assert!(matches!(b.add_path("A", "A", 10), Err(GraphError::SelfLoop(_))));
        assert!(matches!(b.add_path("A", "B", 0), Err(GraphError::ZeroDuration { .. })));
        assert_eq!(b.edge_count(), 0);
    }

    #[test]
    fn from_patrol_paths_matches_builder() {
        let paths = vec![PatrolPath::new("A", "B", 90), PatrolPath::new("B", "C", 60)];
        let g = CheckpointGraph::from_patrol_paths(&paths).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 4);
        let directed: Vec<_> = g.directed_paths().collect();
        assert!(directed.contains(&PatrolPath::new("C", "B", 60)));
    }

    #[test]
    fn adjacency_export_and_import_agree() {
        let g = super::helpers::square_with_diagonal();
        let map = g.to_adjacency();
        assert_eq!(map["A"].len(), 3);
        assert!(map["B"].contains(&("C".into(), 90)));

        let back = CheckpointGraph::from_adjacency(&map).unwrap();
        assert_eq!(back.node_count(), g.node_count());
        assert_eq!(back.edge_count(), g.edge_count());
        assert_eq!(back.to_adjacency(), map);
    }
}

// ── Connectivity ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod validate {
    use crate::{CheckpointGraph, CheckpointGraphBuilder, GraphError, validate_connected};

    #[test]
    fn connected_graph_passes() {
        let g = super::helpers::square_with_diagonal();
        assert!(validate_connected(&g).is_ok());
    }

    #[test]
    fn one_way_cycle_counts_as_connected() {
        let mut b = CheckpointGraphBuilder::new();
        b.add_directed_path("A", "B", 60).unwrap();
        b.add_directed_path("B", "C", 60).unwrap();
        b.add_directed_path("C", "D", 60).unwrap();
        b.add_directed_path("D", "A", 60).unwrap();
        assert!(validate_connected(&b.build()).is_ok());
    }

    #[test]
    fn island_is_reported() {
        let mut b = CheckpointGraphBuilder::new();
        b.add_path("A", "B", 90).unwrap();
        b.add_path("B", "C", 90).unwrap();
        b.add_path("X", "Y", 30).unwrap();
        let err = validate_connected(&b.build()).unwrap_err();
        match err {
            GraphError::Disconnected { unreachable } => {
                let names: Vec<&str> = unreachable.iter().map(|c| c.as_str()).collect();
                assert_eq!(names, vec!["X", "Y"]);
            }
            other => panic!("expected Disconnected, got {other:?}"),
        }
    }

    #[test]
    fn lone_checkpoint_is_unreachable() {
        let mut b = CheckpointGraphBuilder::new();
        b.add_path("A", "B", 90).unwrap();
        b.add_checkpoint("Z");
        assert!(matches!(
            validate_connected(&b.build()),
            Err(GraphError::Disconnected { .. })
        ));
    }

    #[test]
    fn empty_and_pathless_graphs_fail() {
        assert!(matches!(validate_connected(&CheckpointGraph::empty()), Err(GraphError::Empty)));
        let mut b = CheckpointGraphBuilder::new();
        b.add_checkpoint("A");
        assert!(matches!(validate_connected(&b.build()), Err(GraphError::NoPaths)));
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use crate::{GraphError, load_paths_csv, load_paths_reader};

    const PATHS_CSV: &str = "\
src,dest,duration_secs,directed\n\
A,B,90,\n\
B,C,90,false\n\
C,A,60,true\n\
";

    #[test]
    fn loads_bidirectional_and_directed_rows() {
        let g = load_paths_reader(Cursor::new(PATHS_CSV)).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 5);
        assert_eq!(g.out_degree(g.node("A").unwrap()), 1);
        assert_eq!(g.out_degree(g.node("C").unwrap()), 2);
    }

    #[test]
    fn directed_column_is_optional() {
        let csv = "src,dest,duration_secs\nA,B,90\nB,C,70\n";
        let g = load_paths_reader(Cursor::new(csv)).unwrap();
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn bad_duration_is_a_parse_error() {
        let csv = "src,dest,duration_secs\nA,B,soon\n";
        assert!(matches!(
            load_paths_reader(Cursor::new(csv)),
            Err(GraphError::Parse(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paths.csv");
        std::fs::write(&path, PATHS_CSV).unwrap();
        let g = load_paths_csv(&path).unwrap();
        assert_eq!(g.edge_count(), 5);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_paths_csv(std::path::Path::new("/nonexistent/paths.csv")).unwrap_err();
        assert!(matches!(err, GraphError::Io(_)));
    }
}
