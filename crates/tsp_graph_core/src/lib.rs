//! Weighted graph store and travelling-salesman heuristics over it.
//! Exact branch-and-bound for small inputs, an MST 2-approximation, a
//! matching/Euler heuristic for sparse real-world graphs and a parallel
//! cluster heuristic for large fully connected ones.

mod connectivity;
mod error;
pub mod geo;
pub mod graph;
pub mod heuristics;
mod io;
pub mod logging;
mod manager;
mod tour;

#[cfg(test)]
mod test_support;

pub use connectivity::{fully_connect_graph, is_graph_fully_connected};
pub use error::{Error, HeuristicFailure, Result};
pub use graph::{Edge, EdgeHandle, Graph, TraversalContext, Vertex, VertexId, VertexInfo};
pub use heuristics::Heuristic;
pub use io::dataset::{Dataset, DatasetFiles, DatasetKind, LoadStats, load_dataset};
pub use io::options::{LogFormat, LogLevel, SolverOptions};
pub use manager::Manager;
pub use tour::{Tour, TourMetrics, TourReport};
