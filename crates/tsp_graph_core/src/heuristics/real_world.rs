//! Christofides-style tour for sparse road-like graphs: spanning tree, greedy
//! matching of odd-degree vertices, Euler walk over the union, shortcut.

use std::collections::HashSet;

use crate::{
    Error, HeuristicFailure, Result,
    graph::{Graph, TraversalContext, VertexId},
    tour::Tour,
};

use super::mst::prim_mst;

/// Greedy matching of the odd-degree vertices of `mst`.
///
/// Vertices are taken in ascending id. Each one is paired with its cheapest
/// still-unmatched odd neighbour in `graph`; on equal weights the edge met
/// first in adjacency order wins. A vertex with no such neighbour stays
/// unmatched.
pub fn perfect_matching(graph: &Graph, mst: &Graph) -> Vec<(VertexId, VertexId, f64)> {
    let odd: HashSet<VertexId> = mst
        .vertices()
        .filter(|vertex| vertex.degree() % 2 == 1)
        .map(|vertex| vertex.id())
        .collect();

    let mut ctx = TraversalContext::new(mst);
    let mut matched = Vec::new();

    for u in mst.vertex_ids_sorted() {
        if !odd.contains(&u) || ctx.is_visited(u) {
            continue;
        }

        let mut best: Option<(VertexId, f64)> = None;
        for (_, edge) in graph.adjacency(u) {
            let v = edge.dest();
            if v == u || !odd.contains(&v) || ctx.is_visited(v) {
                continue;
            }
            if best.is_none_or(|(_, weight)| edge.weight() < weight) {
                best = Some((v, edge.weight()));
            }
        }

        match best {
            Some((v, weight)) => {
                ctx.set_visited(u, true);
                ctx.set_visited(v, true);
                matched.push((u, v, weight));
            }
            None => log::debug!("real_world.matching: vertex {u} left unmatched"),
        }
    }

    matched
}

/// Consumes `multigraph` and returns the walk from `base`.
///
/// The walk keeps a stack seeded with `base`. While the top vertex still has
/// outgoing edges, all of their destinations are pushed and the edges are
/// detached; a top vertex without edges is emitted and popped. Every directed
/// edge record causes exactly one push, so the walk has `edge_count + 1`
/// entries when every edge is reachable from `base`. The emitted sequence is
/// reversed so it begins at `base`.
pub fn euler_walk(mut multigraph: Graph, base: VertexId) -> Vec<VertexId> {
    let mut walk = Vec::with_capacity(multigraph.edge_count() + 1);
    let mut stack = vec![base];

    while let Some(&u) = stack.last() {
        if multigraph.degree(u) == 0 {
            walk.push(u);
            stack.pop();
            continue;
        }
        stack.extend(multigraph.adjacency(u).map(|(_, edge)| edge.dest()));
        multigraph.remove_outgoing_edges(u);
    }

    walk.reverse();
    walk
}

/// First occurrence of every vertex in walk order, closed with `base`.
pub fn hamiltonian_shortcut(walk: &[VertexId], base: VertexId) -> Vec<VertexId> {
    let mut seen = HashSet::with_capacity(walk.len());
    let mut stops: Vec<VertexId> = walk.iter().copied().filter(|&v| seen.insert(v)).collect();
    stops.push(base);
    stops
}

#[tsp_graph_derive::timer("real_world.solve")]
pub fn solve_real_world(graph: &Graph, base: VertexId) -> Result<Tour> {
    if !graph.contains_vertex(base) {
        return Err(Error::invalid_input(format!(
            "base vertex {base} is not in the graph"
        )));
    }

    if let Some((vertex, degree)) = graph
        .vertex_ids_sorted()
        .into_iter()
        .map(|id| (id, graph.degree(id)))
        .find(|&(_, degree)| degree < 2)
    {
        log::warn!("real_world: vertex={vertex} degree={degree} below 2, not attempting");
        return Err(HeuristicFailure::DegreeTooLow { vertex, degree }.into());
    }

    log::info!(
        "real_world: start n={} edges={} base={base}",
        graph.vertex_count(),
        graph.edge_count()
    );

    let mut multigraph = prim_mst(graph, base)?;
    let matching = perfect_matching(graph, &multigraph);
    for &(u, v, weight) in &matching {
        multigraph.add_bidirectional_edge(u, v, weight);
    }
    log::debug!(
        "real_world: matched_pairs={} multigraph_edges={}",
        matching.len(),
        multigraph.edge_count()
    );

    let walk = euler_walk(multigraph, base);
    let stops = hamiltonian_shortcut(&walk, base);
    log::debug!("real_world: walk_len={} stops={}", walk.len(), stops.len());

    // A spanning forest only walks the base's component.
    if stops.len() != graph.vertex_count() + 1 {
        let reached: HashSet<VertexId> = stops.iter().copied().collect();
        let from = stops[stops.len() - 2];
        if let Some(to) = graph
            .vertex_ids_sorted()
            .into_iter()
            .find(|id| !reached.contains(id))
        {
            log::warn!(
                "real_world: walk reached {} of {} vertices, {to} is cut off",
                stops.len() - 1,
                graph.vertex_count()
            );
            return Err(HeuristicFailure::MissingEdge { from, to }.into());
        }
    }

    let mut distances = Vec::with_capacity(stops.len().saturating_sub(1));
    for pair in stops.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        match graph.weight(from, to) {
            Some(weight) => distances.push(weight),
            None => {
                log::warn!("real_world: no edge {from} -> {to}, shortcut is not a valid cycle");
                return Err(HeuristicFailure::MissingEdge { from, to }.into());
            }
        }
    }

    let tour = Tour::new(stops, distances);
    log::info!(
        "real_world: complete stops={} total_m={:.1}",
        tour.stops.len(),
        tour.total_distance
    );
    Ok(tour)
}
