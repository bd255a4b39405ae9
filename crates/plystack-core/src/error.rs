//! Errors raised while acquiring read-only file mappings.

use std::io;
use std::path::PathBuf;

/// Why a file could not be opened or mapped.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// The file does not exist or is not readable.
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file's length could not be queried.
    #[error("cannot stat {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Zero-length files have nothing to map.
    #[error("{path} is empty")]
    Empty { path: PathBuf },

    /// The operating system refused the mapping.
    #[error("cannot map {path}: {source}")]
    Map {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::MapError;

    #[test]
    fn empty_display_names_the_file() {
        let err = MapError::Empty {
            path: "tables/kpk.bin".into(),
        };
        assert_eq!(err.to_string(), "tables/kpk.bin is empty");
    }

    #[test]
    fn open_error_keeps_source() {
        use std::error::Error;

        let err = MapError::Open {
            path: "missing.bin".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("cannot open missing.bin"));
    }
}
