//! Error type for the catalog library.
//!
//! Binaries wrap [`CatalogError`] in `anyhow` at their edges.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The data file could not be read or written.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The data file is not a JSON array of course records.
    #[error("malformed course data in {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The embedding model failed to load or to encode text.
    #[error("embedding error: {0}")]
    Embedding(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json { path: path.into(), source }
    }

    pub fn embedding(msg: impl std::fmt::Display) -> Self {
        Self::Embedding(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = CatalogError::embedding("model not found");
        assert_eq!(err.to_string(), "embedding error: model not found");

        let err = CatalogError::io("data/courses_data.json", std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(err.to_string().contains("courses_data.json"));
    }
}
