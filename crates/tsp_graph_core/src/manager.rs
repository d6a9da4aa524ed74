use std::{
    path::Path,
    time::{Duration, Instant},
};

use crate::{
    Error, Result,
    connectivity::{fully_connect_graph, is_graph_fully_connected},
    graph::{Graph, VertexId},
    heuristics::{
        DEFAULT_CLUSTER_FRACTION, Heuristic, solve_backtracking, solve_cluster, solve_real_world,
        solve_triangular,
    },
    io::dataset::{Dataset, LoadStats, load_dataset},
    tour::TourReport,
};

/// Owns the loaded network and dispatches solver runs against it.
#[derive(Debug)]
pub struct Manager {
    network: Graph,
    dataset: Option<Dataset>,
    load_time: Duration,
    fully_connected: bool,
    cluster_fraction: f64,
}

impl Default for Manager {
    fn default() -> Self {
        Self {
            network: Graph::new(),
            dataset: None,
            load_time: Duration::ZERO,
            fully_connected: false,
            cluster_fraction: DEFAULT_CLUSTER_FRACTION,
        }
    }
}

impl Manager {
    pub fn new() -> Self {
        Self::default()
    }

    /// A manager over an already built graph, with no dataset recorded.
    pub fn with_network(network: Graph) -> Self {
        let fully_connected = is_graph_fully_connected(&network);
        Self {
            network,
            fully_connected,
            ..Self::default()
        }
    }

    pub fn cluster_fraction(mut self, cluster_fraction: f64) -> Self {
        self.cluster_fraction = cluster_fraction;
        self
    }

    /// Replaces the current network with `dataset`. On failure the manager is
    /// left empty with no dataset loaded.
    pub fn load_dataset(&mut self, dataset: &Dataset, data_dir: &Path) -> Result<LoadStats> {
        self.network.reset_graph();
        self.dataset = None;
        self.fully_connected = false;

        let now = Instant::now();
        let stats = match load_dataset(&mut self.network, dataset, data_dir) {
            Ok(stats) => stats,
            Err(err) => {
                self.network.reset_graph();
                return Err(err);
            }
        };
        self.load_time = now.elapsed();
        self.fully_connected = is_graph_fully_connected(&self.network);
        self.dataset = Some(*dataset);

        log::info!(
            "manager: loaded dataset={dataset} secs={:.3} fully_connected={}",
            self.load_time.as_secs_f64(),
            self.fully_connected
        );
        Ok(stats)
    }

    pub fn current_dataset_label(&self) -> String {
        self.dataset
            .map_or_else(|| "None".to_string(), |dataset| dataset.label())
    }

    pub fn load_time(&self) -> Duration {
        self.load_time
    }

    pub fn is_any_dataset_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    pub fn is_fully_connected(&self) -> bool {
        self.fully_connected
    }

    pub fn fully_connect_graph(&mut self, progress: impl FnMut(usize, usize)) -> bool {
        self.fully_connected = fully_connect_graph(&mut self.network, progress);
        self.fully_connected
    }

    /// Re-reads the full-connection flag after edits through [`Manager::network_mut`].
    pub fn refresh_connectivity(&mut self) -> bool {
        self.fully_connected = is_graph_fully_connected(&self.network);
        self.fully_connected
    }

    /// Runs `heuristic` and times it. `base` is only used by [`Heuristic::RealWorld`].
    pub fn tsp_caller(&self, heuristic: Heuristic, base: VertexId) -> Result<TourReport> {
        if self.network.is_empty() {
            return Err(Error::invalid_input("no graph loaded"));
        }

        log::info!(
            "manager: run heuristic={heuristic} dataset={} n={}",
            self.current_dataset_label(),
            self.network.vertex_count()
        );

        let now = Instant::now();
        let tour = match heuristic {
            Heuristic::Backtracking => solve_backtracking(&self.network)?,
            Heuristic::TriangularApproximation => solve_triangular(&self.network)?,
            Heuristic::Cluster => solve_cluster(&self.network, self.cluster_fraction)?,
            Heuristic::RealWorld => solve_real_world(&self.network, base)?,
        };
        Ok(TourReport::new(heuristic, tour, now.elapsed().as_secs_f64()))
    }

    /// Like [`Manager::tsp_caller`], but a heuristic failure comes back as a
    /// sentinel report instead of an error.
    pub fn tsp_record(&self, heuristic: Heuristic, base: VertexId) -> Result<TourReport> {
        match self.tsp_caller(heuristic, base) {
            Err(Error::Heuristic(failure)) => {
                log::warn!("manager: heuristic={heuristic} failed: {failure}");
                Ok(TourReport::failed(heuristic, &failure))
            }
            other => other,
        }
    }

    pub fn network(&self) -> &Graph {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut Graph {
        &mut self.network
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::Manager;
    use crate::{
        Error,
        heuristics::Heuristic,
        io::dataset::{Dataset, DatasetKind},
        test_support::{four_city_graph, graph_from_edges, unique_temp_dir},
    };

    #[test]
    fn fresh_manager_has_nothing_loaded() {
        let manager = Manager::new();
        assert!(!manager.is_any_dataset_loaded());
        assert_eq!(manager.current_dataset_label(), "None");
        assert!(matches!(
            manager.tsp_caller(Heuristic::Backtracking, 0).expect_err("empty"),
            Error::InvalidInput(_)
        ));
    }

    #[test]
    fn every_heuristic_runs_on_the_four_city_graph() {
        let manager = Manager::with_network(four_city_graph());
        assert!(manager.is_fully_connected());

        for heuristic in [
            Heuristic::Backtracking,
            Heuristic::TriangularApproximation,
            Heuristic::Cluster,
            Heuristic::RealWorld,
        ] {
            let report = manager.tsp_record(heuristic, 0).expect("report");
            assert_eq!(report.heuristic, heuristic);
            assert!(!report.is_failure());
            assert!(report.processing_time_seconds >= 0.0);
            assert_eq!(report.stops.len(), 5);
            assert_eq!(report.distances.len(), 4);
            assert!(report.total_distance >= 80.0);
        }
    }

    #[test]
    fn heuristic_failure_becomes_a_sentinel_record() {
        let graph = graph_from_edges(4, &[(0, 1, 1.0), (1, 3, 1.0), (3, 0, 1.0), (2, 0, 1.0)]);
        let manager = Manager::with_network(graph);

        let report = manager.tsp_record(Heuristic::RealWorld, 0).expect("record");
        assert!(report.is_failure());
        assert_eq!(report.total_distance, -1.0);
        assert_eq!(report.processing_time_seconds, -1.0);

        assert!(matches!(
            manager.tsp_caller(Heuristic::RealWorld, 0).expect_err("caller"),
            Error::Heuristic(_)
        ));
    }

    #[test]
    fn configuration_errors_are_not_folded() {
        let manager = Manager::with_network(four_city_graph());
        assert!(matches!(
            manager.tsp_record(Heuristic::RealWorld, 42).expect_err("bad base"),
            Error::InvalidInput(_)
        ));
    }

    #[test]
    fn fully_connect_updates_the_flag() {
        let mut manager = Manager::with_network(graph_from_edges(3, &[(0, 1, 1.0)]));
        assert!(!manager.is_fully_connected());

        let mut calls = 0;
        assert!(manager.fully_connect_graph(|_, _| calls += 1));
        assert_eq!(calls, 3);
        assert!(manager.is_fully_connected());

        manager.network_mut().remove_edge(0, 1);
        assert!(manager.is_fully_connected());
        assert!(!manager.refresh_connectivity());
    }

    #[test]
    fn load_dataset_replaces_previous_graph() {
        let dir = unique_temp_dir("manager");
        let toy = dir.join("Toy-Graphs");
        fs::create_dir_all(&toy).expect("create dir");
        fs::write(toy.join("shipping.csv"), "0,1,5\n1,2,6\n2,0,7\n").expect("write");

        let mut manager = Manager::with_network(four_city_graph());
        let dataset = Dataset::new(DatasetKind::ToyShipping, None).expect("dataset");
        let stats = manager.load_dataset(&dataset, &dir).expect("load");

        assert_eq!(stats.vertices, 3);
        assert_eq!(manager.network().vertex_count(), 3);
        assert!(manager.is_any_dataset_loaded());
        assert!(manager.is_fully_connected());
        assert_eq!(manager.current_dataset_label(), "Toy - Shipping");

        let report = manager.tsp_record(Heuristic::Backtracking, 0).expect("report");
        assert_eq!(report.total_distance, 18.0);

        let err = manager
            .load_dataset(&Dataset::new(DatasetKind::ToyStadiums, None).expect("dataset"), &dir)
            .expect_err("missing file");
        let _ = fs::remove_dir_all(&dir);

        assert!(err.to_string().contains("stadiums.csv"));
        assert!(!manager.is_any_dataset_loaded());
        assert!(manager.network().is_empty());
        assert!(!dir.exists());
    }
}
