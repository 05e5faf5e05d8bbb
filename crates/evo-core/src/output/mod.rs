//! Run output: JSON summaries and per-round strategy snapshots.

use std::fs;
use std::path::{Path, PathBuf};

use evo_events::{RunSummary, StrategySnapshot};
use thiserror::Error;

/// Errors writing or reading run output.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ReportError + '_ {
    move |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes the run summary as pretty JSON, creating parent directories.
pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json).map_err(io_error(path))
}

/// Writes `snapshot` to `<dir>/<snapshot_id>.json` and returns the path.
pub fn write_snapshot_to_dir(dir: &Path, snapshot: &StrategySnapshot) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(dir).map_err(io_error(dir))?;
    let path = dir.join(format!("{}.json", snapshot.snapshot_id));
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(&path, json).map_err(io_error(&path))?;
    Ok(path)
}

/// Reads a snapshot written by [`write_snapshot_to_dir`] or another tool.
pub fn read_snapshot(path: &Path) -> Result<StrategySnapshot, ReportError> {
    let content = fs::read_to_string(path).map_err(io_error(path))?;
    Ok(serde_json::from_str(&content)?)
}
