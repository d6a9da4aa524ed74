use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
    time::Instant,
};

use log::info;

use tsp_graph_core::{Error, Manager, Result, SolverOptions, TourReport, logging};

fn main() -> Result<()> {
    let now = Instant::now();
    let options = SolverOptions::from_args()?;
    logging::init_logger(&options)?;

    info!("options: {options}");

    let Some(dataset) = options.dataset()? else {
        return Err(Error::invalid_input(format!(
            "No dataset selected\n\n{}",
            SolverOptions::usage()
        )));
    };

    let mut manager = Manager::new().cluster_fraction(options.cluster_fraction);
    let stats = manager.load_dataset(&dataset, &options.data_dir)?;
    info!(
        "input: dataset={} vertices={} edges={} skipped={} fully_connected={} load={:.3}s",
        manager.current_dataset_label(),
        stats.vertices,
        stats.edges,
        stats.skipped,
        manager.is_fully_connected(),
        manager.load_time().as_secs_f64()
    );

    if options.fully_connect && !manager.is_fully_connected() {
        manager.fully_connect_graph(|done, total| {
            log::debug!("connectivity: progress {done}/{total}");
        });
    }

    if options.dump_graph {
        logging::log_graph_dump(manager.network());
    }

    let report = manager.tsp_record(options.heuristic, options.base)?;
    write_route(&report, options.output_path())?;

    match report.sentinel() {
        Some(sentinel) => log::warn!(
            "output: heuristic={} failed sentinel={sentinel}",
            report.heuristic
        ),
        None => {
            info!(
                "output: stops={} total_m={:.1} time={:.3}s",
                report.stops.len(),
                report.total_distance,
                report.processing_time_seconds
            );
            report.tour().tour_metrics(options.outlier_factor);
        }
    }

    info!("run: secs={:.2}", now.elapsed().as_secs_f32());
    Ok(())
}

/// One `from,to,distance` line per leg, or `failed,<sentinel>`.
fn write_route(report: &TourReport, path: Option<&Path>) -> Result<()> {
    let target: Box<dyn Write> = match path {
        Some(path) => Box::new(File::create(path).map_err(|e| {
            Error::other(format!("failed to create output file {}: {e}", path.display()))
        })?),
        None => Box::new(io::stdout().lock()),
    };
    let mut out = BufWriter::new(target);

    match report.sentinel() {
        Some(sentinel) => writeln!(out, "failed,{sentinel}")?,
        None => {
            for (from, to, distance) in report.tour().legs() {
                writeln!(out, "{from},{to},{distance}")?;
            }
        }
    }

    out.flush()?;
    Ok(())
}
