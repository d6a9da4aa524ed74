use std::{fs::File, io::Write};

use env_logger::{Builder, Target, fmt::Formatter};
use log::Level;

use crate::{
    Error, Graph, Result,
    io::options::{LogFormat, SolverOptions},
};

/// Installs the process-wide logger. Fails if one is already installed.
pub fn init_logger(options: &SolverOptions) -> Result<()> {
    let log_format = options.log_format;
    let log_timestamp = options.log_timestamp;

    let mut builder = Builder::new();
    builder
        .filter_level(options.log_level.to_filter())
        .write_style(env_logger::WriteStyle::Never)
        .format(move |buf: &mut Formatter, record| {
            if log_timestamp {
                write!(buf, "{} ", buf.timestamp_millis())?;
            }

            match log_format {
                LogFormat::Compact => {
                    writeln!(buf, "{} {}", level_tag(record.level()), record.args())
                }
                LogFormat::Pretty => {
                    writeln!(
                        buf,
                        "{} [{}] {}",
                        level_tag(record.level()),
                        record.target(),
                        record.args()
                    )
                }
            }
        });

    match options.log_output_path() {
        Some(log_path) => {
            let log_file = File::create(log_path).map_err(|e| {
                Error::other(format!(
                    "failed to create log output file {}: {e}",
                    log_path.display()
                ))
            })?;
            builder.target(Target::Pipe(Box::new(log_file)));
        }
        None => {
            builder.target(Target::Stderr);
        }
    }

    builder
        .try_init()
        .map_err(|e| Error::other(format!("logger init failed: {e}")))
}

/// Logs the `--dump-graph` listing at info level, one record per vertex.
pub fn log_graph_dump(graph: &Graph) {
    log::info!(
        "graph.dump: vertices={} edges={}",
        graph.vertex_count(),
        graph.edge_count()
    );
    for record in graph_dump_records(graph) {
        log::info!("{record}");
    }
}

/// Vertices in insertion order; synthesized edges are marked with `~`.
fn graph_dump_records(graph: &Graph) -> Vec<String> {
    graph
        .vertices()
        .map(|vertex| {
            let edges: Vec<String> = graph
                .adjacency(vertex.id())
                .map(|(_, edge)| {
                    let mark = if edge.is_initial() { "" } else { "~" };
                    format!("{mark}{}:{}", edge.dest(), edge.weight())
                })
                .collect();
            format!(
                "graph.dump: id={} info={} out={} in={} edges=[{}]",
                vertex.id(),
                vertex.info(),
                vertex.degree(),
                vertex.indegree(),
                edges.join(" ")
            )
        })
        .collect()
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}
