use std::{collections::HashMap, fmt};

use crate::geo::{Coordinate, INVALID_DISTANCE};

use super::EdgeHandle;

pub type VertexId = usize;

/// What a dataset knows about a vertex.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum VertexInfo {
    Coordinate(Coordinate),
    Label(String),
    #[default]
    Unlabelled,
}

impl VertexInfo {
    /// Coordinates win over the label whenever they are valid.
    pub fn from_fields(label: Option<&str>, longitude: Option<f64>, latitude: Option<f64>) -> Self {
        if let (Some(longitude), Some(latitude)) = (longitude, latitude) {
            let coordinate = Coordinate::new(longitude, latitude);
            if coordinate.is_valid() {
                return Self::Coordinate(coordinate);
            }
        }

        match label.map(str::trim) {
            Some(label) if !label.is_empty() => Self::Label(label.to_string()),
            _ => Self::Unlabelled,
        }
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Self::Coordinate(coordinate) => Some(*coordinate),
            _ => None,
        }
    }

    /// Haversine meters between two infos, [`INVALID_DISTANCE`] without coordinates on both sides.
    pub fn distance_to(&self, rhs: &Self) -> f64 {
        match (self.coordinate(), rhs.coordinate()) {
            (Some(a), Some(b)) => a.distance_to(&b),
            _ => INVALID_DISTANCE,
        }
    }
}

impl fmt::Display for VertexInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coordinate(coordinate) => write!(f, "{coordinate}"),
            Self::Label(label) => f.write_str(label),
            Self::Unlabelled => Ok(()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Vertex {
    pub(super) id: VertexId,
    pub(super) info: VertexInfo,
    pub(super) adj: Vec<EdgeHandle>,
    pub(super) adj_by_dest: HashMap<VertexId, EdgeHandle>,
    pub(super) incoming: Vec<EdgeHandle>,
}

impl Vertex {
    pub(super) fn new(id: VertexId, info: VertexInfo) -> Self {
        Self {
            id,
            info,
            adj: Vec::new(),
            adj_by_dest: HashMap::new(),
            incoming: Vec::new(),
        }
    }

    pub fn id(&self) -> VertexId {
        self.id
    }

    pub fn info(&self) -> &VertexInfo {
        &self.info
    }

    /// Outgoing edges in insertion order.
    pub fn adj(&self) -> &[EdgeHandle] {
        &self.adj
    }

    pub fn incoming(&self) -> &[EdgeHandle] {
        &self.incoming
    }

    pub fn degree(&self) -> usize {
        self.adj.len()
    }

    pub fn indegree(&self) -> usize {
        self.incoming.len()
    }

    pub fn is_connected_to(&self, dest: VertexId) -> bool {
        self.adj_by_dest.contains_key(&dest)
    }
}
