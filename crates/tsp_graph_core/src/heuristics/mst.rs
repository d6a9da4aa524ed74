use std::{cmp::Ordering, collections::BinaryHeap};

use crate::{
    Error, Result,
    graph::{Graph, TraversalContext, VertexId},
};

/// Heap entry; reversed ordering turns `BinaryHeap` into a min-heap on `dist`,
/// ties going to the smaller id.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    dist: f64,
    vertex: VertexId,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

/// Prim's algorithm from `root`, returned as a new graph holding every vertex
/// of `graph` and one bidirectional edge per tree edge.
///
/// Vertices unreachable from `root` stay isolated, so a disconnected input
/// yields the spanning tree of `root`'s component plus singletons.
pub fn prim_mst(graph: &Graph, root: VertexId) -> Result<Graph> {
    if !graph.contains_vertex(root) {
        return Err(Error::invalid_input(format!(
            "spanning tree root {root} is not in the graph"
        )));
    }

    let mut ctx = TraversalContext::new(graph);
    let mut queue = BinaryHeap::new();

    ctx.set_dist(root, 0.0);
    queue.push(Candidate {
        dist: 0.0,
        vertex: root,
    });

    while let Some(Candidate { vertex: u, .. }) = queue.pop() {
        if ctx.is_visited(u) {
            continue;
        }
        ctx.set_visited(u, true);

        for (handle, edge) in graph.adjacency(u) {
            let v = edge.dest();
            if !ctx.is_visited(v) && edge.weight() < ctx.dist(v) {
                ctx.set_dist(v, edge.weight());
                ctx.set_path(v, Some(handle));
                queue.push(Candidate {
                    dist: edge.weight(),
                    vertex: v,
                });
            }
        }
    }

    let mut mst = Graph::new();
    for vertex in graph.vertices() {
        mst.add_vertex(vertex.id(), vertex.info().clone());
    }

    let mut total = 0.0;
    for vertex in graph.vertices() {
        let Some(edge) = ctx.path(vertex.id()).and_then(|handle| graph.edge(handle)) else {
            continue;
        };
        mst.add_bidirectional_edge(edge.dest(), edge.origin(), edge.weight());
        total += edge.weight();
    }

    log::debug!(
        "mst: root={root} vertices={} tree_edges={} weight={total:.1}",
        mst.vertex_count(),
        mst.edge_count() / 2
    );
    Ok(mst)
}

/// Sum of tree edge weights, counting each bidirectional pair once.
pub fn tree_weight(mst: &Graph) -> f64 {
    mst.vertices()
        .flat_map(|vertex| mst.adjacency(vertex.id()))
        .map(|(_, edge)| edge.weight())
        .sum::<f64>()
        / 2.0
}

#[cfg(test)]
mod tests {
    use super::{prim_mst, tree_weight};
    use crate::{
        Error,
        test_support::{four_city_graph, graph_from_edges},
    };

    #[test]
    fn four_city_tree_uses_the_three_cheapest_safe_edges() {
        let mst = prim_mst(&four_city_graph(), 0).expect("mst");

        assert_eq!(mst.vertex_count(), 4);
        assert_eq!(mst.edge_count(), 6);
        assert_eq!(tree_weight(&mst), 10.0 + 15.0 + 20.0);
        assert!(mst.edge_to(0, 1).is_some());
        assert!(mst.edge_to(2, 0).is_some());
        assert!(mst.edge_to(3, 0).is_some());
    }

    #[test]
    fn stale_queue_entries_do_not_create_extra_edges() {
        // 2 is first reached through 0 (weight 9) and later improved through 1 (weight 1).
        let graph = graph_from_edges(3, &[(0, 1, 2.0), (0, 2, 9.0), (1, 2, 1.0)]);
        let mst = prim_mst(&graph, 0).expect("mst");

        assert_eq!(tree_weight(&mst), 3.0);
        assert!(mst.edge_to(1, 2).is_some());
        assert!(mst.edge_to(0, 2).is_none());
    }

    #[test]
    fn tree_edges_are_bidirectional_and_linked() {
        let mst = prim_mst(&four_city_graph(), 0).expect("mst");
        for vertex in mst.vertices() {
            for (handle, edge) in mst.adjacency(vertex.id()) {
                let mirror = edge.reverse().and_then(|r| mst.edge(r)).expect("mirror");
                assert_eq!(mirror.reverse(), Some(handle));
                assert_eq!(mirror.weight(), edge.weight());
            }
        }
    }

    #[test]
    fn disconnected_vertices_stay_isolated() {
        let graph = graph_from_edges(4, &[(0, 1, 1.0), (2, 3, 1.0)]);
        let mst = prim_mst(&graph, 0).expect("mst");

        assert_eq!(mst.vertex_count(), 4);
        assert_eq!(mst.degree(2), 0);
        assert_eq!(mst.degree(3), 0);
        assert_eq!(tree_weight(&mst), 1.0);
    }

    #[test]
    fn unknown_root_is_rejected() {
        let err = prim_mst(&four_city_graph(), 99).expect_err("missing root");
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn repeated_runs_on_one_graph_agree() {
        let graph = four_city_graph();
        let first = prim_mst(&graph, 0).expect("first");
        let second = prim_mst(&graph, 0).expect("second");
        assert_eq!(tree_weight(&first), tree_weight(&second));
        assert_eq!(first.describe(), second.describe());
    }
}
