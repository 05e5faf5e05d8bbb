//! Edge-List Loading
//!
//! Two whitespace-separated text formats:
//!
//! - plain: `source target` per line, loaded as an undirected unsigned graph
//! - signed: `source target sign` per line with `sign` in {1, -1}
//!
//! Blank lines and lines starting with `#` are skipped in both.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::components::{Graph, NodeId, Sign};

/// Errors raised while reading an edge list.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected {expected} columns, found {found}")]
    Columns {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: invalid node id '{token}'")]
    NodeId { line: usize, token: String },
    #[error("line {line}: invalid sign '{token}' (expected 1 or -1)")]
    Sign { line: usize, token: String },
}

/// Reads a plain edge list into an undirected graph.
pub fn read_edge_list<R: BufRead>(reader: R) -> Result<Graph, LoadError> {
    let mut graph = Graph::undirected();
    for_each_record(reader, 2, |line, cols| {
        let u = parse_node(line, cols[0])?;
        let v = parse_node(line, cols[1])?;
        graph.add_edge(u, v, None);
        Ok(())
    })?;
    Ok(graph)
}

/// Reads a signed edge list.
///
/// A directed graph keeps each edge's sign. An undirected graph drops the
/// signs and keeps only the connectivity.
pub fn read_signed_edge_list<R: BufRead>(reader: R, directed: bool) -> Result<Graph, LoadError> {
    let mut graph = if directed {
        Graph::directed()
    } else {
        Graph::undirected()
    };
    for_each_record(reader, 3, |line, cols| {
        let u = parse_node(line, cols[0])?;
        let v = parse_node(line, cols[1])?;
        let sign = cols[2]
            .parse::<i64>()
            .ok()
            .and_then(Sign::from_value)
            .ok_or_else(|| LoadError::Sign {
                line,
                token: cols[2].to_string(),
            })?;
        graph.add_edge(u, v, directed.then_some(sign));
        Ok(())
    })?;
    Ok(graph)
}

/// Opens `path` and reads it as a plain edge list.
pub fn load_edge_list(path: impl AsRef<Path>) -> Result<Graph, LoadError> {
    let graph = read_edge_list(BufReader::new(File::open(path.as_ref())?))?;
    tracing::info!(
        path = %path.as_ref().display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded edge list"
    );
    Ok(graph)
}

/// Opens `path` and reads it as a signed edge list.
pub fn load_signed_edge_list(path: impl AsRef<Path>, directed: bool) -> Result<Graph, LoadError> {
    let graph = read_signed_edge_list(BufReader::new(File::open(path.as_ref())?), directed)?;
    tracing::info!(
        path = %path.as_ref().display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        directed,
        "loaded signed edge list"
    );
    Ok(graph)
}

fn for_each_record<R, F>(reader: R, columns: usize, mut f: F) -> Result<(), LoadError>
where
    R: BufRead,
    F: FnMut(usize, &[&str]) -> Result<(), LoadError>,
{
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let cols: Vec<&str> = trimmed.split_whitespace().collect();
        if cols.len() != columns {
            return Err(LoadError::Columns {
                line: i + 1,
                expected: columns,
                found: cols.len(),
            });
        }
        f(i + 1, &cols)?;
    }
    Ok(())
}

fn parse_node(line: usize, token: &str) -> Result<NodeId, LoadError> {
    token.parse().map_err(|_| LoadError::NodeId {
        line,
        token: token.to_string(),
    })
}
