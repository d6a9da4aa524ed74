use std::{
    env,
    path::{Path, PathBuf},
};

use log::LevelFilter;
use tsp_graph_derive::{CliOptions, CliValue, KvDisplay};

use crate::{
    Error, Result,
    graph::VertexId,
    heuristics::{DEFAULT_CLUSTER_FRACTION, Heuristic},
    io::dataset::{Dataset, DatasetKind},
};

/// Runtime options for one load-and-solve run.
#[derive(Clone, Debug, CliOptions, KvDisplay)]
pub struct SolverOptions {
    /// Root directory holding the dataset folders.
    #[cli(long = "data-dir")]
    #[kv(fmt = "path")]
    pub data_dir: PathBuf,
    /// Which dataset to load.
    #[cli(long = "dataset", parse_with = "DatasetKind::parse")]
    #[kv(fmt = "opt")]
    pub dataset: Option<DatasetKind>,
    /// Real-world graph number or extra dataset node count.
    #[cli(long = "graph")]
    #[kv(fmt = "opt")]
    pub graph: Option<usize>,
    /// Solver to run.
    #[cli(long = "heuristic", parse_with = "Heuristic::parse")]
    pub heuristic: Heuristic,
    /// Base vertex of the real-world heuristic.
    #[cli(long = "base")]
    pub base: VertexId,
    /// Share of the mean pairwise distance used as the cluster join radius.
    #[cli(long = "cluster-fraction")]
    pub cluster_fraction: f64,
    /// Legs longer than this multiple of the average leg are counted as spikes in metrics logs.
    #[cli(long = "outlier-factor")]
    pub outlier_factor: f64,
    /// Synthesize haversine edges for every missing pair before solving.
    pub fully_connect: bool,
    /// Log the loaded graph before solving.
    pub dump_graph: bool,
    /// Structured logging level.
    #[cli(long = "log-level", parse_with = "LogLevel::parse")]
    pub log_level: LogLevel,
    /// Logging output format.
    #[cli(long = "log-format", parse_with = "LogFormat::parse")]
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    pub log_timestamp: bool,
    /// Optional output file path for logs and metrics. Empty means stderr.
    #[cli(long = "log-output")]
    pub log_output: String,
    /// Optional output file path for the route. Empty means stdout.
    #[cli(long = "output")]
    pub output: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-level")]
pub enum LogLevel {
    Error,
    #[cli(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-format")]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("dataset"),
            dataset: None,
            graph: None,
            heuristic: Heuristic::default(),
            base: 0,
            cluster_fraction: DEFAULT_CLUSTER_FRACTION,
            outlier_factor: 3.0,
            fully_connect: false,
            dump_graph: false,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
            output: String::new(),
        }
    }
}

impl SolverOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse_from_iter(env::args().skip(1))
    }

    fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };

            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = Self::split_arg(raw_name, &mut args);

            if options.apply_cli_option(&name, value.clone())? {
                continue;
            }

            match name.as_str() {
                "fully-connect" => options.fully_connect = flag(&name, value)?,
                "dump-graph" => options.dump_graph = flag(&name, value)?,
                "log-timestamp" => options.log_timestamp = flag(&name, value)?,
                "no-log-timestamp" => {
                    if value.is_some() {
                        return Err(Error::invalid_input(format!(
                            "Flag --{name} does not take a value"
                        )));
                    }
                    options.log_timestamp = false;
                }
                _ => {
                    return Err(Error::invalid_input(format!(
                        "Unknown option: --{name}\n\n{}",
                        Self::usage()
                    )));
                }
            }
        }

        Ok(options)
    }

    pub fn usage() -> &'static str {
        concat!(
            "Usage:\n",
            "  tsp-graph --dataset <name> [--graph <n>] [options]\n\n",
            "Options:\n",
            "  --data-dir <path>\n",
            "  --dataset <toy-shipping|toy-stadiums|toy-tourism|real-world|extra>\n",
            "  --graph <n>            real-world: 1..3, extra: 25|50|75|100..900\n",
            "  --heuristic <backtracking|triangular|cluster|real-world>\n",
            "  --base <id>\n",
            "  --cluster-fraction <f64>\n",
            "  --outlier-factor <f64>\n",
            "  --fully-connect[=<bool>]\n",
            "  --dump-graph[=<bool>]\n",
            "  --log-level <error|warn|info|debug|trace|off>\n",
            "  --log-format <compact|pretty>\n",
            "  --log-timestamp[=<bool>]\n",
            "  --no-log-timestamp\n",
            "  --log-output <path>\n",
            "  --output <path>\n",
            "  --help\n",
            "\n",
            "Examples:\n",
            "  tsp-graph --dataset toy-shipping --heuristic exact\n",
            "  tsp-graph --dataset real-world --graph 2 --heuristic matching --base 0\n",
            "  tsp-graph --dataset extra --graph 300 --heuristic cluster --cluster-fraction 0.25\n",
            "  tsp-graph --dataset toy-tourism --fully-connect --log-level=info --output route.csv\n",
        )
    }

    /// The selected dataset, validated against its `--graph` option.
    pub fn dataset(&self) -> Result<Option<Dataset>> {
        match (self.dataset, self.graph) {
            (Some(kind), option) => Dataset::new(kind, option).map(Some),
            (None, Some(_)) => Err(Error::invalid_input("--graph requires --dataset")),
            (None, None) => Ok(None),
        }
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        let log_output = self.log_output.trim();
        if log_output.is_empty() || log_output == "-" {
            None
        } else {
            Some(Path::new(log_output))
        }
    }

    pub fn output_path(&self) -> Option<&Path> {
        let output = self.output.trim();
        if output.is_empty() || output == "-" {
            None
        } else {
            Some(Path::new(output))
        }
    }
}

/// A bare flag means `true`.
fn flag(name: &str, value: Option<String>) -> Result<bool> {
    match value {
        Some(v) => parse_bool(name, &v),
        None => Ok(true),
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "on" | "ON" => Ok(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "off" | "OFF" => Ok(false),
        _ => Err(Error::invalid_input(format!(
            "Invalid boolean for --{name}: {value} (expected true/false)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use log::LevelFilter;

    use super::{LogFormat, LogLevel, SolverOptions, parse_bool};
    use crate::{
        Error,
        heuristics::Heuristic,
        io::dataset::{Dataset, DatasetKind},
    };

    #[test]
    fn parse_bool_accepts_common_values() {
        assert!(parse_bool("x", "true").expect("parse"));
        assert!(parse_bool("x", "YES").expect("parse"));
        assert!(!parse_bool("x", "0").expect("parse"));
        assert!(!parse_bool("x", "off").expect("parse"));
    }

    #[test]
    fn parse_bool_rejects_unknown_values() {
        let err = parse_bool("fully-connect", "maybe").expect_err("invalid bool should fail");
        assert!(
            err.to_string()
                .contains("Invalid boolean for --fully-connect: maybe")
        );
    }

    #[test]
    fn log_level_maps_to_expected_filter() {
        assert_eq!(LogLevel::Error.to_filter(), LevelFilter::Error);
        assert_eq!(LogLevel::Warn.to_filter(), LevelFilter::Warn);
        assert_eq!(LogLevel::Debug.to_filter(), LevelFilter::Debug);
        assert_eq!(LogLevel::Off.to_filter(), LevelFilter::Off);
    }

    #[test]
    fn parse_from_iter_applies_known_cli_options() {
        let options = SolverOptions::parse_from_iter([
            "--data-dir=/srv/data",
            "--dataset=real-world",
            "--graph",
            "2",
            "--heuristic=matching",
            "--base=7",
            "--cluster-fraction=0.3",
            "--outlier-factor=2.5",
            "--fully-connect",
            "--dump-graph=false",
            "--log-level=debug",
            "--log-format=pretty",
            "--log-timestamp=false",
            "--log-output=run.log",
            "--output=route.csv",
        ])
        .expect("parse options");

        assert_eq!(options.data_dir, std::path::Path::new("/srv/data"));
        assert_eq!(options.dataset, Some(DatasetKind::RealWorld));
        assert_eq!(options.graph, Some(2));
        assert_eq!(options.heuristic, Heuristic::RealWorld);
        assert_eq!(options.base, 7);
        assert_eq!(options.cluster_fraction, 0.3);
        assert_eq!(options.outlier_factor, 2.5);
        assert!(options.fully_connect);
        assert!(!options.dump_graph);
        assert_eq!(options.log_level, LogLevel::Debug);
        assert_eq!(options.log_format, LogFormat::Pretty);
        assert!(!options.log_timestamp);
        assert_eq!(options.log_output, "run.log");
        assert_eq!(options.output, "route.csv");
    }

    #[test]
    fn defaults() {
        let options = SolverOptions::default();
        assert_eq!(options.data_dir, std::path::Path::new("dataset"));
        assert_eq!(options.heuristic, Heuristic::TriangularApproximation);
        assert_eq!(options.base, 0);
        assert_eq!(options.cluster_fraction, 0.2);
        assert!(!options.fully_connect);
        assert!(options.log_timestamp);
    }

    #[test]
    fn bare_flag_does_not_swallow_the_next_option() {
        let options = SolverOptions::parse_from_iter(["--fully-connect", "--heuristic", "exact"])
            .expect("parse options");
        assert!(options.fully_connect);
        assert_eq!(options.heuristic, Heuristic::Backtracking);
    }

    #[test]
    fn parse_from_iter_accepts_no_log_timestamp_flag() {
        let options =
            SolverOptions::parse_from_iter(["--no-log-timestamp"]).expect("parse options");
        assert!(!options.log_timestamp);
    }

    #[test]
    fn parse_from_iter_rejects_no_log_timestamp_with_value() {
        let err = SolverOptions::parse_from_iter(["--no-log-timestamp=true"])
            .expect_err("expected flag value rejection");
        assert!(err.to_string().contains("does not take a value"));
    }

    #[test]
    fn parse_from_iter_rejects_unknown_option() {
        let err = SolverOptions::parse_from_iter(["--unknown-opt=1"])
            .expect_err("expected unknown option error");
        assert!(err.to_string().contains("Unknown option: --unknown-opt"));
    }

    #[test]
    fn parse_from_iter_rejects_unexpected_positional_argument() {
        let err =
            SolverOptions::parse_from_iter(["graph.csv"]).expect_err("expected positional error");
        assert!(err.to_string().contains("Unexpected argument: graph.csv"));
    }

    #[test]
    fn parse_from_iter_requires_value_for_heuristic() {
        let err = SolverOptions::parse_from_iter(["--heuristic"])
            .expect_err("missing value should fail");
        assert!(err.to_string().contains("Missing value for --heuristic"));
    }

    #[test]
    fn invalid_heuristic_lists_choices() {
        let err = SolverOptions::parse_from_iter(["--heuristic=fastest"])
            .expect_err("unknown heuristic");
        assert!(err.to_string().contains("Invalid value for --heuristic: fastest"));
    }

    #[test]
    fn parse_from_iter_help_returns_usage_error() {
        let err =
            SolverOptions::parse_from_iter(["--help"]).expect_err("help should short-circuit");
        assert!(err.to_string().contains("Usage:"));
    }

    #[test]
    fn dataset_selection_is_validated() {
        let options = SolverOptions {
            dataset: Some(DatasetKind::Extra),
            graph: Some(50),
            ..SolverOptions::default()
        };
        assert_eq!(
            options.dataset().expect("valid"),
            Some(Dataset::new(DatasetKind::Extra, Some(50)).expect("dataset"))
        );

        let options = SolverOptions {
            dataset: Some(DatasetKind::RealWorld),
            ..SolverOptions::default()
        };
        assert!(matches!(
            options.dataset().expect_err("missing graph"),
            Error::InvalidInput(_)
        ));

        let options = SolverOptions {
            graph: Some(1),
            ..SolverOptions::default()
        };
        assert!(options.dataset().is_err());
        assert_eq!(SolverOptions::default().dataset().expect("none"), None);
    }

    #[test]
    fn output_path_treats_empty_and_dash_as_stdout() {
        let options = SolverOptions::default();
        assert!(options.output_path().is_none());

        let options = SolverOptions {
            output: "-".to_string(),
            ..SolverOptions::default()
        };
        assert!(options.output_path().is_none());

        let options = SolverOptions {
            output: "out/route.csv".to_string(),
            ..SolverOptions::default()
        };
        assert_eq!(
            options.output_path().expect("path should exist"),
            std::path::Path::new("out/route.csv")
        );
    }

    #[test]
    fn log_output_path_treats_empty_and_dash_as_stderr() {
        let options = SolverOptions {
            log_output: "-".to_string(),
            ..SolverOptions::default()
        };
        assert!(options.log_output_path().is_none());

        let options = SolverOptions {
            log_output: "out/run.log".to_string(),
            ..SolverOptions::default()
        };
        assert_eq!(
            options.log_output_path().expect("path should exist"),
            std::path::Path::new("out/run.log")
        );
    }

    #[test]
    fn display_lists_every_option() {
        let rendered = SolverOptions::default().to_string();
        assert!(rendered.contains("heuristic"));
        assert!(rendered.contains("triangular"));
        assert!(rendered.contains("dataset"));
    }
}
