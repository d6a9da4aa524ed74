use std::collections::HashMap;

use crate::{
    Error, HeuristicFailure, Result,
    graph::{Graph, TraversalContext, VertexId},
    tour::Tour,
};

const START: VertexId = 0;

/// One level of the depth-first search: where we are, which neighbour to try
/// next and the distance driven so far.
#[derive(Clone, Copy, Debug)]
struct Frame {
    vertex: VertexId,
    cursor: usize,
    dist: f64,
}

/// Optimal tour from vertex 0 by branch-and-bound over every Hamiltonian cycle.
///
/// Branches are cut as soon as their running distance exceeds the best closed
/// cycle found so far. Worst case is factorial in the vertex count.
#[tsp_graph_derive::timer("backtracking.solve")]
pub fn solve_backtracking(graph: &Graph) -> Result<Tour> {
    if !graph.contains_vertex(START) {
        return Err(Error::invalid_input(format!(
            "backtracking needs a start vertex {START}"
        )));
    }

    let n = graph.vertex_count();
    if n == 1 {
        return Ok(Tour::single(START));
    }

    let neighbours: HashMap<VertexId, Vec<(VertexId, f64)>> = graph
        .vertices()
        .map(|vertex| {
            let list = graph
                .adjacency(vertex.id())
                .map(|(_, edge)| (edge.dest(), edge.weight()))
                .collect();
            (vertex.id(), list)
        })
        .collect();

    log::info!("backtracking: start n={n} edges={}", graph.edge_count());

    let mut ctx = TraversalContext::new(graph);
    let mut path = vec![START];
    // Weight of the edge taken into path[i + 1]; parallel edges differ.
    let mut legs: Vec<f64> = Vec::with_capacity(n);
    let mut best_dist = f64::INFINITY;
    let mut best: Option<(Vec<VertexId>, Vec<f64>)> = None;
    let mut expanded = 0usize;

    ctx.set_visited(START, true);
    let mut stack = vec![Frame {
        vertex: START,
        cursor: 0,
        dist: 0.0,
    }];

    while let Some(frame) = stack.last_mut() {
        let options = neighbours
            .get(&frame.vertex)
            .map_or(&[][..], Vec::as_slice);

        if frame.dist > best_dist || frame.cursor >= options.len() {
            let done = frame.vertex;
            stack.pop();
            path.pop();
            legs.pop();
            ctx.set_visited(done, false);
            continue;
        }

        let (next, weight) = options[frame.cursor];
        frame.cursor += 1;
        let dist = frame.dist + weight;

        if next == START {
            if path.len() == n && dist < best_dist {
                best_dist = dist;
                let mut closed = path.clone();
                closed.push(START);
                let mut driven = legs.clone();
                driven.push(weight);
                best = Some((closed, driven));
            }
            continue;
        }
        if ctx.is_visited(next) || dist > best_dist {
            continue;
        }

        ctx.set_visited(next, true);
        path.push(next);
        legs.push(weight);
        stack.push(Frame {
            vertex: next,
            cursor: 0,
            dist,
        });
        expanded += 1;
    }

    let Some((stops, distances)) = best else {
        log::warn!("backtracking: no hamiltonian cycle n={n} expanded={expanded}");
        return Err(HeuristicFailure::NoHamiltonianCycle.into());
    };

    let tour = Tour::new(stops, distances);
    log::info!(
        "backtracking: complete n={n} expanded={expanded} total_m={:.1}",
        tour.total_distance
    );
    Ok(tour)
}
