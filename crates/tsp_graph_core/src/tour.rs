use crate::{HeuristicFailure, graph::VertexId, heuristics::Heuristic};

/// Closed route produced by a solver: `stops` starts and ends at the same
/// vertex and `distances[i]` is the leg `stops[i] -> stops[i + 1]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tour {
    pub stops: Vec<VertexId>,
    pub distances: Vec<f64>,
    pub total_distance: f64,
}

impl Tour {
    pub fn new(stops: Vec<VertexId>, distances: Vec<f64>) -> Self {
        let total_distance = distances.iter().sum();
        Self {
            stops,
            distances,
            total_distance,
        }
    }

    /// The one-vertex tour: no legs, zero length.
    pub fn single(stop: VertexId) -> Self {
        Self::new(vec![stop], Vec::new())
    }

    /// `(from, to, distance)` for every leg.
    pub fn legs(&self) -> impl Iterator<Item = (VertexId, VertexId, f64)> + '_ {
        self.stops
            .windows(2)
            .zip(&self.distances)
            .map(|(pair, &distance)| (pair[0], pair[1], distance))
    }

    pub fn tour_metrics(&self, threshold_factor: f64) -> TourMetrics {
        let n = self.distances.len();

        if n == 0 {
            log::info!("metrics: no legs so there's nothing to report");
            return TourMetrics::default();
        }

        let total: f64 = self.distances.iter().sum();
        let average = total / (n as f64);
        let threshold = average * threshold_factor;
        let outliers = self.distances.iter().filter(|d| **d > threshold).count();
        let longest = self.distances.iter().copied().fold(0.0_f64, f64::max);

        log::info!(
            "metrics: legs={n} total_m={total:.0} longest_m={longest:.0} avg_m={average:.0} spike_threshold_m={threshold:.0} spikes={outliers}",
        );

        TourMetrics {
            longest,
            outliers,
            total,
            average,
            threshold,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TourMetrics {
    pub longest: f64,
    pub outliers: usize,
    pub total: f64,
    pub average: f64,
    pub threshold: f64,
}

/// What the Manager hands to the presentation layer for one solver call.
///
/// A failed run is encoded in-band: `processing_time_seconds` and
/// `total_distance` both carry the negative sentinel of the failure, which a
/// real run can never produce.
#[derive(Clone, Debug, PartialEq)]
pub struct TourReport {
    pub heuristic: Heuristic,
    pub processing_time_seconds: f64,
    pub stops: Vec<VertexId>,
    pub distances: Vec<f64>,
    pub total_distance: f64,
}

impl TourReport {
    pub fn new(heuristic: Heuristic, tour: Tour, processing_time_seconds: f64) -> Self {
        Self {
            heuristic,
            processing_time_seconds,
            stops: tour.stops,
            distances: tour.distances,
            total_distance: tour.total_distance,
        }
    }

    pub fn failed(heuristic: Heuristic, failure: &HeuristicFailure) -> Self {
        let sentinel = failure.sentinel();
        Self {
            heuristic,
            processing_time_seconds: sentinel,
            stops: Vec::new(),
            distances: Vec::new(),
            total_distance: sentinel,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.processing_time_seconds < 0.0 && self.total_distance < 0.0
    }

    /// The sentinel carried by a failed report.
    pub fn sentinel(&self) -> Option<f64> {
        self.is_failure().then_some(self.total_distance)
    }

    pub fn tour(&self) -> Tour {
        Tour {
            stops: self.stops.clone(),
            distances: self.distances.clone(),
            total_distance: self.total_distance,
        }
    }
}
