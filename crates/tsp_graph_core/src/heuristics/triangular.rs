use crate::{
    Error, Result,
    graph::{Graph, TraversalContext, VertexId},
    tour::Tour,
};

use super::mst::prim_mst;

const ROOT: VertexId = 0;

/// Preorder walk of a spanning tree that has not been closed yet.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct OpenWalk {
    pub stops: Vec<VertexId>,
    pub distances: Vec<f64>,
}

impl OpenWalk {
    pub fn last(&self) -> Option<VertexId> {
        self.stops.last().copied()
    }

    pub fn total(&self) -> f64 {
        self.distances.iter().sum()
    }
}

/// Builds the MST of `graph` from `root` and walks it in preorder.
///
/// Leg weights come from `graph` itself, not the tree; a leg with no direct
/// edge is recorded as 0.
pub(crate) fn preorder_walk(graph: &Graph, root: VertexId) -> Result<OpenWalk> {
    let mst = prim_mst(graph, root)?;
    let mut ctx = TraversalContext::new(&mst);
    let mut walk = OpenWalk::default();
    let mut stack = vec![root];

    while let Some(u) = stack.pop() {
        if ctx.is_visited(u) {
            continue;
        }
        ctx.set_visited(u, true);

        if let Some(prev) = walk.last() {
            walk.distances.push(graph.weight(prev, u).unwrap_or(0.0));
        }
        walk.stops.push(u);

        let children: Vec<VertexId> = mst
            .adjacency(u)
            .map(|(_, edge)| edge.dest())
            .filter(|&v| !ctx.is_visited(v))
            .collect();
        stack.extend(children.into_iter().rev());
    }

    Ok(walk)
}

/// MST-based 2-approximation rooted at vertex 0.
#[tsp_graph_derive::timer("triangular.solve")]
pub fn solve_triangular(graph: &Graph) -> Result<Tour> {
    if !graph.contains_vertex(ROOT) {
        return Err(Error::invalid_input(format!(
            "triangular approximation needs a root vertex {ROOT}"
        )));
    }

    log::info!(
        "triangular: start n={} edges={}",
        graph.vertex_count(),
        graph.edge_count()
    );

    let OpenWalk {
        mut stops,
        mut distances,
    } = preorder_walk(graph, ROOT)?;

    if stops.len() < graph.vertex_count() {
        log::warn!(
            "triangular: tree reaches {} of {} vertices",
            stops.len(),
            graph.vertex_count()
        );
    }

    if let Some(&last) = stops.last()
        && stops.len() > 1
    {
        distances.push(graph.weight(last, ROOT).unwrap_or(0.0));
        stops.push(ROOT);
    }

    let tour = Tour::new(stops, distances);
    log::info!(
        "triangular: complete stops={} total_m={:.1}",
        tour.stops.len(),
        tour.total_distance
    );
    Ok(tour)
}
