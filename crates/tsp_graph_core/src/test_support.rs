use crate::{
    Graph,
    geo::Coordinate,
    graph::{VertexId, VertexInfo},
};

/// Vertices `0..n` with bidirectional `(a, b, weight)` edges.
pub(crate) fn graph_from_edges(n: usize, edges: &[(VertexId, VertexId, f64)]) -> Graph {
    let mut graph = Graph::new();
    for id in 0..n {
        graph.add_vertex(id, VertexInfo::Unlabelled);
    }
    for &(a, b, weight) in edges {
        assert!(graph.add_bidirectional_edge(a, b, weight), "edge {a}-{b}");
    }
    graph
}

/// Complete graph from a symmetric weight matrix.
pub(crate) fn complete_graph(weights: &[Vec<f64>]) -> Graph {
    let n = weights.len();
    let mut edges = Vec::new();
    for a in 0..n {
        for b in (a + 1)..n {
            edges.push((a, b, weights[a][b]));
        }
    }
    graph_from_edges(n, &edges)
}

/// The textbook 4-city instance: optimum 80 via 0-1-3-2-0.
pub(crate) fn four_city_graph() -> Graph {
    graph_from_edges(
        4,
        &[
            (0, 1, 10.0),
            (0, 2, 15.0),
            (0, 3, 20.0),
            (1, 2, 35.0),
            (1, 3, 25.0),
            (2, 3, 30.0),
        ],
    )
}

/// Complete graph over planar points, Euclidean weights (metric).
pub(crate) fn euclidean_graph(points: &[(f64, f64)]) -> Graph {
    let weights: Vec<Vec<f64>> = points
        .iter()
        .map(|&(ax, ay)| {
            points
                .iter()
                .map(|&(bx, by)| ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt())
                .collect()
        })
        .collect();
    complete_graph(&weights)
}

/// Vertices carrying real coordinates and no edges.
pub(crate) fn geographic_vertices(coords: &[(f64, f64)]) -> Graph {
    let mut graph = Graph::new();
    for (id, &(lon, lat)) in coords.iter().enumerate() {
        graph.add_vertex(id, VertexInfo::Coordinate(Coordinate::new(lon, lat)));
    }
    graph
}

pub(crate) fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

pub(crate) fn unique_temp_dir(name: &str) -> std::path::PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("tsp-graph-tests-{name}-{nanos}"))
}
