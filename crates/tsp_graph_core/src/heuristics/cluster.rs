use std::{collections::HashMap, time::Instant};

use rayon::prelude::*;

use crate::{
    Error, Result,
    graph::{Graph, VertexId},
    tour::Tour,
};

use super::triangular::{OpenWalk, preorder_walk};

pub const DEFAULT_CLUSTER_FRACTION: f64 = 0.2;

const BASE: VertexId = 0;

/// Members of one cluster; the first entry is its representative.
type Cluster = Vec<VertexId>;

fn pair_weight(graph: &Graph, from: VertexId, to: VertexId) -> Result<f64> {
    graph.weight(from, to).ok_or_else(|| {
        Error::invalid_data(format!(
            "cluster heuristic needs a fully connected graph, missing edge {from} -> {to}"
        ))
    })
}

/// Mean weight over every unordered pair `i < j`, read from the edge `i -> j`.
fn mean_pair_weight(graph: &Graph, ids: &[VertexId]) -> Result<f64> {
    let mut sum = 0.0;
    let mut pairs = 0usize;
    for (i, &a) in ids.iter().enumerate() {
        for &b in &ids[i + 1..] {
            sum += pair_weight(graph, a, b)?;
            pairs += 1;
        }
    }
    Ok(if pairs == 0 { 0.0 } else { sum / pairs as f64 })
}

/// Single greedy pass in ascending id: each vertex joins the first cluster
/// whose representative is within `radius`, or starts its own.
pub(crate) fn assign_clusters(graph: &Graph, radius: f64) -> Result<Vec<Cluster>> {
    let mut clusters: Vec<Cluster> = vec![vec![BASE]];

    for v in graph.vertex_ids_sorted() {
        if v == BASE {
            continue;
        }
        let mut home = None;
        for (idx, cluster) in clusters.iter().enumerate() {
            if pair_weight(graph, v, cluster[0])? <= radius {
                home = Some(idx);
                break;
            }
        }
        match home {
            Some(idx) => clusters[idx].push(v),
            None => clusters.push(vec![v]),
        }
    }

    Ok(clusters)
}

/// Graph over `members` with every ordered pair copied from `graph`.
fn induced_subgraph(graph: &Graph, members: &[VertexId]) -> Result<Graph> {
    let mut sub = Graph::new();
    for &id in members {
        let info = graph
            .find_vertex(id)
            .map(|vertex| vertex.info().clone())
            .unwrap_or_default();
        sub.add_vertex(id, info);
    }
    for &a in members {
        for &b in members {
            if a != b {
                sub.add_edge(a, b, pair_weight(graph, a, b)?);
            }
        }
    }
    Ok(sub)
}

/// Representatives joined `rep_a -> rep_b` by the leg the stitched tour drives:
/// from the last stop of cluster `a` to the representative of `b`.
fn anchor_graph(graph: &Graph, clusters: &[Cluster], walks: &[OpenWalk]) -> Result<Graph> {
    let mut anchor = Graph::new();
    for cluster in clusters {
        let info = graph
            .find_vertex(cluster[0])
            .map(|vertex| vertex.info().clone())
            .unwrap_or_default();
        anchor.add_vertex(cluster[0], info);
    }

    for (a, walk) in clusters.iter().zip(walks) {
        let last = walk.last().unwrap_or(a[0]);
        for b in clusters {
            if a[0] != b[0] {
                anchor.add_edge(a[0], b[0], pair_weight(graph, last, b[0])?);
            }
        }
    }
    Ok(anchor)
}

/// Greedy radius clustering, approximate tours inside each cluster, and an
/// approximate tour over the cluster representatives to chain them together.
///
/// `cluster_fraction` scales the mean pairwise weight into the join radius.
/// Needs an edge for every ordered pair of vertices.
#[tsp_graph_derive::timer("cluster.solve")]
pub fn solve_cluster(graph: &Graph, cluster_fraction: f64) -> Result<Tour> {
    if !graph.contains_vertex(BASE) {
        return Err(Error::invalid_input(format!(
            "cluster heuristic needs a start vertex {BASE}"
        )));
    }
    if !(cluster_fraction.is_finite() && cluster_fraction > 0.0) {
        return Err(Error::invalid_input(format!(
            "cluster fraction must be > 0, got {cluster_fraction}"
        )));
    }
    if graph.vertex_count() == 1 {
        return Ok(Tour::single(BASE));
    }

    let ids = graph.vertex_ids_sorted();
    let radius = mean_pair_weight(graph, &ids)? * cluster_fraction;
    let clusters = assign_clusters(graph, radius)?;

    log::info!(
        "cluster: start n={} radius={radius:.1} clusters={}",
        ids.len(),
        clusters.len()
    );

    let walks: Vec<OpenWalk> = clusters
        .par_iter()
        .enumerate()
        .map(|(cluster_id, members)| -> Result<OpenWalk> {
            let now = Instant::now();
            let sub = induced_subgraph(graph, members)?;
            let walk = preorder_walk(&sub, members[0])?;

            log::debug!(
                "cluster.solve: done id={cluster_id} rep={} n={} open_m={:.1} secs={:.3}",
                members[0],
                members.len(),
                walk.total(),
                now.elapsed().as_secs_f32()
            );
            Ok(walk)
        })
        .collect::<Result<Vec<_>>>()?;

    let anchor = anchor_graph(graph, &clusters, &walks)?;
    let order = preorder_walk(&anchor, BASE)?;
    log::debug!("cluster: anchor order={:?}", order.stops);

    let by_rep: HashMap<VertexId, usize> = clusters
        .iter()
        .enumerate()
        .map(|(idx, cluster)| (cluster[0], idx))
        .collect();

    let mut stops: Vec<VertexId> = Vec::with_capacity(ids.len() + 1);
    let mut distances: Vec<f64> = Vec::with_capacity(ids.len());

    for rep in order.stops {
        let Some(walk) = by_rep.get(&rep).map(|&idx| &walks[idx]) else {
            return Err(Error::other(format!(
                "anchor tour visits {rep}, which represents no cluster"
            )));
        };
        if let Some(&prev) = stops.last() {
            distances.push(pair_weight(graph, prev, rep)?);
        }
        stops.extend_from_slice(&walk.stops);
        distances.extend_from_slice(&walk.distances);
    }

    if let Some(&last) = stops.last() {
        distances.push(graph.weight(last, BASE).unwrap_or(0.0));
        stops.push(BASE);
    }

    let tour = Tour::new(stops, distances);
    log::info!(
        "cluster: complete stops={} total_m={:.1}",
        tour.stops.len(),
        tour.total_distance
    );
    Ok(tour)
}
