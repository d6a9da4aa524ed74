use std::fmt;

use thiserror::Error as ThisError;

use crate::graph::VertexId;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("heuristic failed: {0}")]
    Heuristic(HeuristicFailure),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

impl From<HeuristicFailure> for Error {
    fn from(value: HeuristicFailure) -> Self {
        Self::Heuristic(value)
    }
}

/// Expected, data-dependent ways a heuristic can fail to produce a tour.
///
/// Each maps to a distinct negative sentinel so a failed report can never be
/// mistaken for a legitimate zero-length tour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeuristicFailure {
    /// A vertex has fewer than two incident edges, so no Hamiltonian cycle can pass through it.
    DegreeTooLow { vertex: VertexId, degree: usize },
    /// The shortcut tour needs a leg the graph does not have.
    MissingEdge { from: VertexId, to: VertexId },
    /// Exhaustive search finished without closing any cycle.
    NoHamiltonianCycle,
}

impl HeuristicFailure {
    pub fn sentinel(self) -> f64 {
        match self {
            Self::DegreeTooLow { .. } => -1.0,
            Self::MissingEdge { .. } => -2.0,
            Self::NoHamiltonianCycle => -3.0,
        }
    }
}

impl fmt::Display for HeuristicFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegreeTooLow { vertex, degree } => write!(
                f,
                "vertex {vertex} has degree {degree}; every vertex needs at least 2 edges"
            ),
            Self::MissingEdge { from, to } => write!(
                f,
                "no available path: the tour needs an edge {from} -> {to} the graph does not have"
            ),
            Self::NoHamiltonianCycle => f.write_str("the graph has no Hamiltonian cycle"),
        }
    }
}
