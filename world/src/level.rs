//! Reading level layouts from disk.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use meltdown_core::Level;

/// Errors raised while reading a level file.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    /// The file could not be read.
    #[error("failed to read level file {path}")]
    Io {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Reads and parses the level stored at `path`.
pub fn read_level(path: &Path, columns: u32, rows: u32) -> Result<Level, LevelError> {
    let text = fs::read_to_string(path).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Level::parse(&text, columns, rows))
}

/// Reads the level at `path`, substituting open ground when it is unreadable.
#[must_use]
pub fn load_level_or_fallback(path: &Path, columns: u32, rows: u32) -> Level {
    match read_level(path, columns, rows) {
        Ok(level) => level,
        Err(error) => {
            tracing::warn!(%error, "using a ground-only fallback level");
            Level::fallback(columns, rows)
        }
    }
}
