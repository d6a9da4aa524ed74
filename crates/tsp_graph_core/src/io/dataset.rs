use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use tsp_graph_derive::CliValue;

use crate::{
    Error, Result,
    graph::{Graph, VertexId, VertexInfo},
};

const TOY_DIR: &str = "Toy-Graphs";
const REAL_WORLD_DIR: &str = "Real-World-Graphs";
const EXTRA_DIR: &str = "Extra_Fully_Connected_Graphs";
const NODES_FILE: &str = "nodes.csv";
const EDGES_FILE: &str = "edges.csv";

const REAL_WORLD_GRAPHS: [usize; 3] = [1, 2, 3];
const EXTRA_SMALL_SIZES: [usize; 3] = [25, 50, 75];
const EXTRA_MAX_SIZE: usize = 900;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, CliValue)]
#[cli_value(option = "dataset")]
pub enum DatasetKind {
    ToyShipping,
    ToyStadiums,
    ToyTourism,
    RealWorld,
    Extra,
}

/// A dataset kind together with its validated option (graph number or node count).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dataset {
    kind: DatasetKind,
    option: Option<usize>,
}

impl Dataset {
    pub fn new(kind: DatasetKind, option: Option<usize>) -> Result<Self> {
        match (kind, option) {
            (DatasetKind::RealWorld, Some(graph)) if REAL_WORLD_GRAPHS.contains(&graph) => {}
            (DatasetKind::RealWorld, _) => {
                return Err(Error::invalid_input(
                    "real-world dataset needs --graph 1, 2 or 3",
                ));
            }
            (DatasetKind::Extra, Some(nodes)) if is_extra_size(nodes) => {}
            (DatasetKind::Extra, _) => {
                return Err(Error::invalid_input(format!(
                    "extra dataset needs --graph 25, 50, 75 or a multiple of 100 up to {EXTRA_MAX_SIZE}"
                )));
            }
            (_, Some(option)) => {
                return Err(Error::invalid_input(format!(
                    "{kind} dataset takes no --graph option (got {option})"
                )));
            }
            (_, None) => {}
        }
        Ok(Self { kind, option })
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    pub fn option(&self) -> Option<usize> {
        self.option
    }

    /// Menu-style name, e.g. `Real World - Graph 2` or `Extra - 300 Nodes`.
    pub fn label(&self) -> String {
        match (self.kind, self.option) {
            (DatasetKind::ToyShipping, _) => "Toy - Shipping".to_string(),
            (DatasetKind::ToyStadiums, _) => "Toy - Stadiums".to_string(),
            (DatasetKind::ToyTourism, _) => "Toy - Tourism".to_string(),
            (DatasetKind::RealWorld, Some(graph)) => format!("Real World - Graph {graph}"),
            (DatasetKind::Extra, Some(nodes)) => format!("Extra - {nodes} Nodes"),
            (DatasetKind::RealWorld | DatasetKind::Extra, None) => self.kind.to_string(),
        }
    }

    pub fn files(&self, data_dir: &Path) -> DatasetFiles {
        let toy = |name: &str| DatasetFiles {
            nodes: None,
            edges: data_dir.join(TOY_DIR).join(format!("{name}.csv")),
            node_limit: None,
        };

        match self.kind {
            DatasetKind::ToyShipping => toy("shipping"),
            DatasetKind::ToyStadiums => toy("stadiums"),
            DatasetKind::ToyTourism => toy("tourism"),
            DatasetKind::RealWorld => {
                let dir = data_dir
                    .join(REAL_WORLD_DIR)
                    .join(format!("graph{}", self.option.unwrap_or_default()));
                DatasetFiles {
                    nodes: Some(dir.join(NODES_FILE)),
                    edges: dir.join(EDGES_FILE),
                    node_limit: None,
                }
            }
            DatasetKind::Extra => {
                let dir = data_dir.join(EXTRA_DIR);
                let nodes = self.option.unwrap_or_default();
                DatasetFiles {
                    nodes: Some(dir.join(NODES_FILE)),
                    edges: dir.join(format!("edges_{nodes}.csv")),
                    node_limit: Some(nodes),
                }
            }
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn is_extra_size(nodes: usize) -> bool {
    EXTRA_SMALL_SIZES.contains(&nodes) || (nodes > 0 && nodes <= EXTRA_MAX_SIZE && nodes % 100 == 0)
}

/// Where a dataset lives on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetFiles {
    pub nodes: Option<PathBuf>,
    pub edges: PathBuf,
    /// Only node ids below this are read from a shared node file.
    pub node_limit: Option<usize>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub vertices: usize,
    pub edges: usize,
    pub skipped: usize,
}

/// Reads `dataset` from `data_dir` into `graph`. Edge rows become bidirectional edges.
///
/// Rows that do not parse abort the load; rows the graph refuses (duplicate
/// vertex, unknown endpoint) are skipped and counted.
pub fn load_dataset(graph: &mut Graph, dataset: &Dataset, data_dir: &Path) -> Result<LoadStats> {
    let files = dataset.files(data_dir);
    let mut stats = LoadStats::default();

    if let Some(nodes) = &files.nodes {
        let text = read_file(nodes)?;
        load_nodes(graph, &text, nodes, files.node_limit, &mut stats)?;
    }
    let text = read_file(&files.edges)?;
    load_edges(graph, &text, &files.edges, &mut stats)?;

    if stats.skipped > 0 {
        log::warn!(
            "loader: dataset={dataset} skipped={} rows the graph refused",
            stats.skipped
        );
    }
    log::info!(
        "loader: dataset={dataset} vertices={} edges={} skipped={}",
        stats.vertices,
        stats.edges,
        stats.skipped
    );
    Ok(stats)
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::other(format!("failed to read {}: {e}", path.display())))
}

/// Non-empty rows split on commas, with a leading header row dropped.
/// A row is a header when its first field is not a number.
fn data_rows(text: &str) -> impl Iterator<Item = (usize, Vec<&str>)> + '_ {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(line_no, line)| (line_no, line.split(',').map(str::trim).collect::<Vec<_>>()))
        .enumerate()
        .filter(|(row, (_, fields))| *row > 0 || fields[0].parse::<f64>().is_ok())
        .map(|(_, row)| row)
}

fn field<T: std::str::FromStr>(
    fields: &[&str],
    idx: usize,
    what: &str,
    path: &Path,
    line_no: usize,
) -> Result<T> {
    let raw = fields.get(idx).ok_or_else(|| {
        Error::invalid_data(format!("{}:{line_no}: missing {what}", path.display()))
    })?;
    raw.parse().map_err(|_| {
        Error::invalid_data(format!(
            "{}:{line_no}: invalid {what}: {raw}",
            path.display()
        ))
    })
}

fn load_nodes(
    graph: &mut Graph,
    text: &str,
    path: &Path,
    node_limit: Option<usize>,
    stats: &mut LoadStats,
) -> Result<()> {
    for (line_no, fields) in data_rows(text) {
        let id: VertexId = field(&fields, 0, "node id", path, line_no)?;
        if node_limit.is_some_and(|limit| id >= limit) {
            continue;
        }
        let longitude: f64 = field(&fields, 1, "longitude", path, line_no)?;
        let latitude: f64 = field(&fields, 2, "latitude", path, line_no)?;

        let info = VertexInfo::from_fields(None, Some(longitude), Some(latitude));
        if graph.add_vertex(id, info) {
            stats.vertices += 1;
        } else {
            stats.skipped += 1;
        }
    }
    Ok(())
}

fn load_edges(graph: &mut Graph, text: &str, path: &Path, stats: &mut LoadStats) -> Result<()> {
    for (line_no, fields) in data_rows(text) {
        let origin: VertexId = field(&fields, 0, "origin", path, line_no)?;
        let dest: VertexId = field(&fields, 1, "destination", path, line_no)?;
        let weight: f64 = field(&fields, 2, "distance", path, line_no)?;

        for (id, label) in [(origin, fields.get(3)), (dest, fields.get(4))] {
            if !graph.contains_vertex(id) {
                let info = VertexInfo::from_fields(label.copied(), None, None);
                graph.add_vertex(id, info);
                stats.vertices += 1;
            }
        }

        if graph.add_bidirectional_edge(origin, dest, weight) {
            stats.edges += 1;
        } else {
            stats.skipped += 1;
        }
    }
    Ok(())
}
