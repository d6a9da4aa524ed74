use crate::graph::{Graph, VertexId, VertexInfo};

/// `true` iff every vertex has exactly `V - 1` outgoing edges.
pub fn is_graph_fully_connected(graph: &Graph) -> bool {
    let expected = graph.vertex_count().saturating_sub(1);
    graph.vertices().all(|vertex| vertex.degree() == expected)
}

/// Adds a synthesized edge for every missing ordered pair, weighted by the
/// haversine distance between the two vertices (`-1` without coordinates).
///
/// `progress(done, total)` is called once per vertex. Returns the result of
/// re-checking [`is_graph_fully_connected`].
#[tsp_graph_derive::timer("connectivity.fully_connect")]
pub fn fully_connect_graph(graph: &mut Graph, mut progress: impl FnMut(usize, usize)) -> bool {
    let targets: Vec<(VertexId, VertexInfo)> = graph
        .vertices()
        .map(|vertex| (vertex.id(), vertex.info().clone()))
        .collect();
    let total = targets.len();
    let expected = total.saturating_sub(1);
    let mut added = 0usize;

    log::info!("connectivity: start vertices={total} edges={}", graph.edge_count());

    for (done, (id, info)) in targets.iter().enumerate() {
        let missing: Vec<(VertexId, f64)> = match graph.find_vertex(*id) {
            Some(vertex) if vertex.degree() != expected => targets
                .iter()
                .filter(|(other, _)| other != id && !vertex.is_connected_to(*other))
                .map(|(other, other_info)| (*other, info.distance_to(other_info)))
                .collect(),
            _ => Vec::new(),
        };

        for (other, weight) in missing {
            if graph.add_synthetic_edge(*id, other, weight) {
                added += 1;
            }
        }
        progress(done + 1, total);
    }

    let connected = is_graph_fully_connected(graph);
    log::info!(
        "connectivity: complete added={added} edges={} fully_connected={connected}",
        graph.edge_count()
    );
    connected
}

#[cfg(test)]
mod tests {
    use super::{fully_connect_graph, is_graph_fully_connected};
    use crate::{
        geo::INVALID_DISTANCE,
        graph::{Graph, VertexInfo},
        test_support::{four_city_graph, geographic_vertices, graph_from_edges},
    };

    #[test]
    fn complete_graph_is_fully_connected() {
        assert!(is_graph_fully_connected(&four_city_graph()));
    }

    #[test]
    fn path_graph_is_not_fully_connected() {
        let graph = graph_from_edges(3, &[(0, 1, 1.0), (1, 2, 1.0)]);
        assert!(!is_graph_fully_connected(&graph));
    }

    #[test]
    fn empty_and_single_vertex_graphs_are_trivially_connected() {
        assert!(is_graph_fully_connected(&Graph::new()));
        assert!(is_graph_fully_connected(&graph_from_edges(1, &[])));
    }

    #[test]
    fn fully_connect_uses_haversine_and_keeps_dataset_edges() {
        let mut graph = geographic_vertices(&[(0.0, 0.0), (0.0, 1.0), (1.0, 0.0)]);
        graph.add_bidirectional_edge(0, 1, 5.0);

        let mut calls = Vec::new();
        let connected = fully_connect_graph(&mut graph, |done, total| calls.push((done, total)));

        assert!(connected);
        assert_eq!(calls, vec![(1, 3), (2, 3), (3, 3)]);
        assert_eq!(graph.edge_count(), 6);

        let kept = graph.edge_to(0, 1).expect("dataset edge");
        assert_eq!(kept.weight(), 5.0);
        assert!(kept.is_initial());

        let synthetic = graph.edge_to(0, 2).expect("synthesized edge");
        assert!(!synthetic.is_initial());
        assert!((synthetic.weight() - 111_194.9).abs() < 1.0);
    }

    #[test]
    fn fully_connect_without_coordinates_uses_sentinel_weight() {
        let mut graph = Graph::new();
        graph.add_vertex(0, VertexInfo::Label("a".into()));
        graph.add_vertex(1, VertexInfo::Label("b".into()));

        assert!(fully_connect_graph(&mut graph, |_, _| {}));
        assert_eq!(graph.weight(0, 1), Some(INVALID_DISTANCE));
        assert_eq!(graph.weight(1, 0), Some(INVALID_DISTANCE));
    }
}
