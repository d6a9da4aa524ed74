//! Weighted directed graph with an edge arena.
//!
//! Vertices own the handles of their outgoing edges; the `incoming` list on the
//! destination is a back-reference kept in sync on every insert and removal.
//! Bidirectional pairs point at each other through [`Edge::reverse`].

mod edge;
mod traversal;
mod vertex;

use std::{collections::HashMap, fmt::Write};

pub use edge::{Edge, EdgeHandle};
pub use traversal::{TraversalContext, VertexState};
pub use vertex::{Vertex, VertexId, VertexInfo};

#[derive(Clone, Debug, Default)]
pub struct Graph {
    vertices: Vec<Vertex>,
    positions: HashMap<VertexId, usize>,
    edges: Vec<Option<Edge>>,
    free_edges: Vec<usize>,
    edge_count: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of directed edge records; a bidirectional pair counts twice.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn find_vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.positions.get(&id).map(|&pos| &self.vertices[pos])
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.vertices.iter()
    }

    pub fn vertex_ids_sorted(&self) -> Vec<VertexId> {
        let mut ids: Vec<VertexId> = self.vertices.iter().map(Vertex::id).collect();
        ids.sort_unstable();
        ids
    }

    pub fn edge(&self, handle: EdgeHandle) -> Option<&Edge> {
        self.edges.get(handle.0).and_then(Option::as_ref)
    }

    pub fn edge_mut(&mut self, handle: EdgeHandle) -> Option<&mut Edge> {
        self.edges.get_mut(handle.0).and_then(Option::as_mut)
    }

    /// O(1) lookup of an edge `src -> dst`. With parallel edges, the most recent one.
    pub fn edge_handle(&self, src: VertexId, dst: VertexId) -> Option<EdgeHandle> {
        self.find_vertex(src)?.adj_by_dest.get(&dst).copied()
    }

    pub fn edge_to(&self, src: VertexId, dst: VertexId) -> Option<&Edge> {
        self.edge_handle(src, dst).and_then(|handle| self.edge(handle))
    }

    pub fn weight(&self, src: VertexId, dst: VertexId) -> Option<f64> {
        self.edge_to(src, dst).map(Edge::weight)
    }

    /// Outgoing edges of `id` in insertion order; empty for unknown ids.
    pub fn adjacency(&self, id: VertexId) -> impl Iterator<Item = (EdgeHandle, &Edge)> + '_ {
        self.find_vertex(id)
            .into_iter()
            .flat_map(|vertex| vertex.adj.iter())
            .filter_map(|&handle| self.edge(handle).map(|edge| (handle, edge)))
    }

    pub fn degree(&self, id: VertexId) -> usize {
        self.find_vertex(id).map_or(0, Vertex::degree)
    }

    pub fn indegree(&self, id: VertexId) -> usize {
        self.find_vertex(id).map_or(0, Vertex::indegree)
    }

    /// Returns `false` when `id` already exists.
    pub fn add_vertex(&mut self, id: VertexId, info: VertexInfo) -> bool {
        if self.positions.contains_key(&id) {
            return false;
        }
        self.positions.insert(id, self.vertices.len());
        self.vertices.push(Vertex::new(id, info));
        true
    }

    pub fn set_info(&mut self, id: VertexId, info: VertexInfo) -> bool {
        match self.positions.get(&id) {
            Some(&pos) => {
                self.vertices[pos].info = info;
                true
            }
            None => false,
        }
    }

    /// Removes the vertex with every edge that starts or ends at it.
    /// Remaining vertices keep their relative order.
    pub fn remove_vertex(&mut self, id: VertexId) -> bool {
        let Some(&pos) = self.positions.get(&id) else {
            return false;
        };

        let vertex = &self.vertices[pos];
        let attached: Vec<EdgeHandle> = vertex
            .adj
            .iter()
            .chain(vertex.incoming.iter())
            .copied()
            .collect();
        for handle in attached {
            self.detach_edge(handle);
        }

        self.vertices.remove(pos);
        self.positions.remove(&id);
        for (shifted, vertex) in self.vertices.iter().enumerate().skip(pos) {
            self.positions.insert(vertex.id, shifted);
        }
        true
    }

    /// Returns `false` if either endpoint is missing.
    pub fn add_edge(&mut self, src: VertexId, dst: VertexId, weight: f64) -> bool {
        self.insert_edge(src, dst, weight, true).is_some()
    }

    /// Like [`Graph::add_edge`], but marks the edge as not coming from the dataset.
    pub fn add_synthetic_edge(&mut self, src: VertexId, dst: VertexId, weight: f64) -> bool {
        self.insert_edge(src, dst, weight, false).is_some()
    }

    pub fn add_bidirectional_edge(&mut self, src: VertexId, dst: VertexId, weight: f64) -> bool {
        if !self.contains_vertex(src) || !self.contains_vertex(dst) {
            return false;
        }
        let (Some(forward), Some(backward)) = (
            self.insert_edge(src, dst, weight, true),
            self.insert_edge(dst, src, weight, true),
        ) else {
            return false;
        };

        if let Some(edge) = self.edge_mut(forward) {
            edge.reverse = Some(backward);
        }
        if let Some(edge) = self.edge_mut(backward) {
            edge.reverse = Some(forward);
        }
        true
    }

    /// Removes every edge `src -> dst`. Returns `false` if there was none.
    pub fn remove_edge(&mut self, src: VertexId, dst: VertexId) -> bool {
        let matching: Vec<EdgeHandle> = self
            .adjacency(src)
            .filter(|(_, edge)| edge.dest == dst)
            .map(|(handle, _)| handle)
            .collect();
        for &handle in &matching {
            self.detach_edge(handle);
        }
        !matching.is_empty()
    }

    /// Detaches all outgoing edges of `id` and returns how many were removed.
    pub fn remove_outgoing_edges(&mut self, id: VertexId) -> usize {
        let Some(vertex) = self.find_vertex(id) else {
            return 0;
        };
        let outgoing = vertex.adj.clone();
        for &handle in &outgoing {
            self.detach_edge(handle);
        }
        outgoing.len()
    }

    /// Drops every edge and vertex. Calling it on an empty graph is a no-op.
    pub fn reset_graph(&mut self) {
        self.edges.clear();
        self.free_edges.clear();
        self.edge_count = 0;
        self.vertices.clear();
        self.positions.clear();
    }

    /// Diagnostic dump: each vertex with its info and outgoing edges.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for vertex in &self.vertices {
            let _ = writeln!(
                out,
                "{} {} ({} edges)",
                vertex.id,
                vertex.info,
                vertex.degree()
            );
            for (_, edge) in self.adjacency(vertex.id) {
                let _ = writeln!(out, " - {} ({})", edge.dest, edge.weight);
            }
        }
        out
    }

    fn insert_edge(
        &mut self,
        src: VertexId,
        dst: VertexId,
        weight: f64,
        initial: bool,
    ) -> Option<EdgeHandle> {
        let src_pos = *self.positions.get(&src)?;
        let dst_pos = *self.positions.get(&dst)?;

        let handle = self.allocate(Edge::new(src, dst, weight, initial));
        let origin = &mut self.vertices[src_pos];
        origin.adj.push(handle);
        origin.adj_by_dest.insert(dst, handle);
        self.vertices[dst_pos].incoming.push(handle);
        Some(handle)
    }

    fn allocate(&mut self, edge: Edge) -> EdgeHandle {
        self.edge_count += 1;
        match self.free_edges.pop() {
            Some(idx) => {
                self.edges[idx] = Some(edge);
                EdgeHandle(idx)
            }
            None => {
                self.edges.push(Some(edge));
                EdgeHandle(self.edges.len() - 1)
            }
        }
    }

    fn detach_edge(&mut self, handle: EdgeHandle) -> Option<Edge> {
        let edge = self.edges.get_mut(handle.0)?.take()?;
        self.free_edges.push(handle.0);
        self.edge_count -= 1;

        if let Some(mirror) = edge.reverse.and_then(|r| self.edge_mut(r)) {
            mirror.reverse = None;
        }

        let edges = &self.edges;
        if let Some(&pos) = self.positions.get(&edge.origin) {
            let origin = &mut self.vertices[pos];
            origin.adj.retain(|&h| h != handle);
            if origin.adj_by_dest.get(&edge.dest) == Some(&handle) {
                let parallel = origin.adj.iter().rev().copied().find(|h| {
                    edges[h.0]
                        .as_ref()
                        .is_some_and(|other| other.dest == edge.dest)
                });
                match parallel {
                    Some(other) => origin.adj_by_dest.insert(edge.dest, other),
                    None => origin.adj_by_dest.remove(&edge.dest),
                };
            }
        }
        if let Some(&pos) = self.positions.get(&edge.dest) {
            self.vertices[pos].incoming.retain(|&h| h != handle);
        }

        Some(edge)
    }
}
