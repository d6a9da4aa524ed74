use super::VertexId;

/// Stable index of an edge inside its owning [`Graph`](super::Graph) arena.
///
/// Handles are only meaningful for the graph that issued them and are
/// recycled once the edge is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeHandle(pub(super) usize);

impl EdgeHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub(super) origin: VertexId,
    pub(super) dest: VertexId,
    pub(super) weight: f64,
    pub(super) selected: bool,
    pub(super) flow: f64,
    pub(super) reverse: Option<EdgeHandle>,
    pub(super) initial: bool,
}

impl Edge {
    pub(super) fn new(origin: VertexId, dest: VertexId, weight: f64, initial: bool) -> Self {
        Self {
            origin,
            dest,
            weight,
            selected: false,
            flow: 0.0,
            reverse: None,
            initial,
        }
    }

    pub fn origin(&self) -> VertexId {
        self.origin
    }

    pub fn dest(&self) -> VertexId {
        self.dest
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Mirror edge when this one was created as half of a bidirectional pair.
    pub fn reverse(&self) -> Option<EdgeHandle> {
        self.reverse
    }

    /// `true` for edges that came from the dataset, `false` for synthesized ones.
    pub fn is_initial(&self) -> bool {
        self.initial
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn flow(&self) -> f64 {
        self.flow
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn set_flow(&mut self, flow: f64) {
        self.flow = flow;
    }
}
