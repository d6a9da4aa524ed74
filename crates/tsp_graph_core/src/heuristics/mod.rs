//! The four tour solvers and the spanning tree they share.

mod backtrack;
mod cluster;
mod mst;
mod real_world;
mod triangular;

use tsp_graph_derive::CliValue;

pub use backtrack::solve_backtracking;
pub use cluster::{DEFAULT_CLUSTER_FRACTION, solve_cluster};
pub use mst::{prim_mst, tree_weight};
pub use real_world::{euler_walk, hamiltonian_shortcut, perfect_matching, solve_real_world};
pub use triangular::solve_triangular;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, CliValue)]
#[cli_value(option = "heuristic")]
pub enum Heuristic {
    /// Exhaustive branch-and-bound; optimal, small graphs only.
    #[cli(alias = "exact")]
    Backtracking,
    /// MST preorder walk, at most twice the optimum on metric graphs.
    #[default]
    #[cli(name = "triangular", alias = "approximate")]
    TriangularApproximation,
    /// Greedy radius clustering stitched through an anchor tour.
    #[cli(alias = "other")]
    Cluster,
    /// MST plus odd-degree matching, Euler walk and shortcut.
    #[cli(alias = "matching")]
    RealWorld,
}

#[cfg(test)]
mod tests {
    use super::Heuristic;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!(Heuristic::parse("backtracking").expect("name"), Heuristic::Backtracking);
        assert_eq!(Heuristic::parse("EXACT").expect("alias"), Heuristic::Backtracking);
        assert_eq!(
            Heuristic::parse(" approximate ").expect("alias"),
            Heuristic::TriangularApproximation
        );
        assert_eq!(Heuristic::parse("other").expect("alias"), Heuristic::Cluster);
        assert_eq!(Heuristic::parse("matching").expect("alias"), Heuristic::RealWorld);
    }

    #[test]
    fn displays_canonical_name() {
        assert_eq!(Heuristic::TriangularApproximation.to_string(), "triangular");
        assert_eq!(Heuristic::RealWorld.as_str(), "real-world");
        assert_eq!(
            Heuristic::VARIANTS,
            &["backtracking", "triangular", "cluster", "real-world"]
        );
    }

    #[test]
    fn unknown_value_lists_choices() {
        let err = Heuristic::parse("greedy").expect_err("unknown");
        let text = err.to_string();
        assert!(text.contains("--heuristic"));
        assert!(text.contains("backtracking|triangular|cluster|real-world"));
    }
}
