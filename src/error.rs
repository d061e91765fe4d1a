//! Error types for startup and file loading
//!
//! Simulation code is infallible; only the file-facing layers return these.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Required asset files could not be found
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("missing asset file(s): {}", format_paths(.paths))]
    Missing { paths: Vec<PathBuf> },
    #[error("cannot read asset manifest {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A level file could not be loaded
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level file not found: {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("cannot read level file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
