use std::collections::HashMap;

use super::{EdgeHandle, Graph, VertexId};

/// Per-vertex scratch state of one solver run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexState {
    pub visited: bool,
    pub processing: bool,
    pub dist: f64,
    pub path: Option<EdgeHandle>,
}

impl Default for VertexState {
    fn default() -> Self {
        Self {
            visited: false,
            processing: false,
            dist: f64::INFINITY,
            path: None,
        }
    }
}

/// Transient `visited`/`dist`/`path` fields for a single traversal.
///
/// Lives only as long as one solver invocation, so a [`Graph`] can be shared
/// read-only between runs. Ids the context was not built for read as the
/// default state.
#[derive(Clone, Debug, Default)]
pub struct TraversalContext {
    states: HashMap<VertexId, VertexState>,
}

impl TraversalContext {
    pub fn new(graph: &Graph) -> Self {
        Self {
            states: graph
                .vertices()
                .map(|v| (v.id(), VertexState::default()))
                .collect(),
        }
    }

    pub fn state(&self, id: VertexId) -> VertexState {
        self.states.get(&id).copied().unwrap_or_default()
    }

    fn state_mut(&mut self, id: VertexId) -> &mut VertexState {
        self.states.entry(id).or_default()
    }

    pub fn is_visited(&self, id: VertexId) -> bool {
        self.state(id).visited
    }

    pub fn set_visited(&mut self, id: VertexId, visited: bool) {
        self.state_mut(id).visited = visited;
    }

    pub fn is_processing(&self, id: VertexId) -> bool {
        self.state(id).processing
    }

    pub fn set_processing(&mut self, id: VertexId, processing: bool) {
        self.state_mut(id).processing = processing;
    }

    pub fn dist(&self, id: VertexId) -> f64 {
        self.state(id).dist
    }

    pub fn set_dist(&mut self, id: VertexId, dist: f64) {
        self.state_mut(id).dist = dist;
    }

    pub fn path(&self, id: VertexId) -> Option<EdgeHandle> {
        self.state(id).path
    }

    pub fn set_path(&mut self, id: VertexId, path: Option<EdgeHandle>) {
        self.state_mut(id).path = path;
    }

    /// Puts every tracked vertex back to the default state.
    pub fn reset(&mut self) {
        self.states
            .values_mut()
            .for_each(|state| *state = VertexState::default());
    }
}
