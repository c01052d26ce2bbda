mod tests {
    use dodeca_light_composer::graph::{
        DODECAHEDRON, DirectedEdge, DodecahedronGraph, EDGES, Turn, graph,
    };
    use dodeca_light_composer::layout::{
        EDGES_PER_STRAND, LEDS_PER_EDGE, TOTAL_EDGES, TOTAL_LEDS, TOTAL_STRANDS, TOTAL_VERTICES,
        led_position, strand_edge,
    };

    fn all_directed_edges() -> impl Iterator<Item = DirectedEdge> {
        (0..TOTAL_EDGES).flat_map(|edge| [DirectedEdge::new(edge, false), DirectedEdge::new(edge, true)])
    }

    #[test]
    fn test_every_vertex_has_three_edges() {
        let mut degree = [0; TOTAL_VERTICES];
        for (first, second) in EDGES {
            degree[first] += 1;
            degree[second] += 1;
        }
        assert!(degree.iter().all(|&d| d == 3), "degrees: {degree:?}");
    }

    #[test]
    fn test_validate_accepts_built_graph() {
        assert_eq!(graph().validate(), Ok(()));
    }

    #[test]
    fn test_runtime_build_matches_static() {
        assert_eq!(DodecahedronGraph::build().as_ref(), Ok(&DODECAHEDRON));
    }

    #[test]
    fn test_successor_continues_from_end_vertex() {
        for from in all_directed_edges() {
            for turn in [Turn::Left, Turn::Right] {
                let next = from.successor(turn);
                assert_eq!(next.start_vertex(), from.end_vertex(), "{from:?} {turn:?}");
                assert_ne!(next.edge(), from.edge());
            }
        }
    }

    #[test]
    fn test_left_and_right_differ() {
        for from in all_directed_edges() {
            assert_ne!(from.successor(Turn::Left), from.successor(Turn::Right));
        }
    }

    #[test]
    fn test_reversed_successor_leads_back() {
        for from in all_directed_edges() {
            for turn in [Turn::Left, Turn::Right] {
                let back = from.successor(turn).uturn();
                let options = [back.successor(Turn::Left), back.successor(Turn::Right)];
                assert!(options.contains(&from.uturn()), "{from:?} {turn:?}");
            }
        }
    }

    #[test]
    fn test_known_successors() {
        let cases = [
            ((0, false), Turn::Left, (1, false)),
            ((0, false), Turn::Right, (6, false)),
            ((0, true), Turn::Left, (24, true)),
            ((0, true), Turn::Right, (25, false)),
            ((4, false), Turn::Left, (10, false)),
            ((4, false), Turn::Right, (9, true)),
            ((4, true), Turn::Left, (3, true)),
            ((4, true), Turn::Right, (28, true)),
        ];
        for ((edge, backward), turn, (next_edge, next_backward)) in cases {
            let from = DirectedEdge::new(edge, backward);
            assert_eq!(
                graph().successor(from, turn),
                DirectedEdge::new(next_edge, next_backward),
                "{from:?} {turn:?}"
            );
        }
    }

    #[test]
    fn test_left_turns_cycle_around_a_face() {
        let expected = [(1, false), (29, true), (26, true), (25, true), (0, false)];
        let mut path = DirectedEdge::new(0, false);
        for (edge, backward) in expected {
            path = path.successor(Turn::Left);
            assert_eq!(path, DirectedEdge::new(edge, backward));
        }
    }

    #[test]
    fn test_right_turns_cycle_around_bottom_pentagon() {
        let mut path = DirectedEdge::new(0, false);
        for edge in [6, 12, 18, 24, 0] {
            path = path.successor(Turn::Right);
            assert_eq!(path, DirectedEdge::new(edge, false));
        }
    }

    #[test]
    fn test_focal_pentagons_close() {
        for strand in 0..TOTAL_STRANDS {
            let start = DirectedEdge::new(strand_edge(strand, 4), false);
            let mut path = start;
            for _ in 0..5 {
                path = path.successor(Turn::Right);
            }
            assert_eq!(path, start);
        }
    }

    #[test]
    fn test_directed_edge_led() {
        let forward = DirectedEdge::new(3, false);
        assert_eq!(forward.led(0), 90);
        assert_eq!(forward.led(LEDS_PER_EDGE - 1), 119);
        assert_eq!(forward.uturn().led(0), 119);
        assert_eq!(forward.uturn().uturn(), forward);
        assert_eq!(forward.uturn().start_vertex(), forward.end_vertex());
        assert_eq!(forward.forward_vector(), forward.uturn().forward_vector().negate());
    }

    #[test]
    fn test_adjacent_leds_arity() {
        let mut junctions = 0;
        for led in 0..TOTAL_LEDS {
            let adjacent = graph().adjacent_leds_of(led);
            let (_, offset) = led_position(led);
            let at_vertex = offset == 0 || offset == LEDS_PER_EDGE - 1;
            assert_eq!(adjacent.len(), if at_vertex { 3 } else { 2 }, "led {led}");
            assert!(adjacent.as_slice().iter().all(|&n| n < TOTAL_LEDS && n != led));
            if adjacent.has_three() {
                junctions += 1;
            }
        }
        assert_eq!(junctions, 2 * TOTAL_EDGES);
    }

    #[test]
    fn test_adjacent_leds_symmetric() {
        for led in 0..TOTAL_LEDS {
            for &neighbor in graph().adjacent_leds_of(led).as_slice() {
                assert!(
                    graph().adjacent_leds_of(neighbor).as_slice().contains(&led),
                    "{led} -> {neighbor} is one-way"
                );
            }
        }
    }

    #[test]
    fn test_layout_constants() {
        assert_eq!(TOTAL_EDGES, EDGES_PER_STRAND * TOTAL_STRANDS);
        assert_eq!(TOTAL_LEDS, 900);
        assert_eq!(led_position(95), (3, 5));
        assert_eq!(strand_edge(2, 4), 16);
    }
}
