use std::path::PathBuf;

use thiserror::Error;

/// Fatal import failures. Everything recoverable (skipped records, rejected
/// entries, consistency findings) is counted instead of raised.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed XML in {path}: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No logbook files found")]
    NoLogbooks,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Maximum length for record dumps embedded in log lines
const MAX_DUMP_LENGTH: usize = 500;

impl ImportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ImportError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn xml(path: impl Into<PathBuf>, source: quick_xml::Error) -> Self {
        ImportError::Xml {
            path: path.into(),
            source,
        }
    }
}

/// Truncate a record dump to avoid logging excessive data
pub fn truncate_dump(dump: &str) -> String {
    if dump.len() <= MAX_DUMP_LENGTH {
        dump.to_string()
    } else {
        let mut end = MAX_DUMP_LENGTH;
        while !dump.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &dump[..end], dump.len())
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_dump_short() {
        assert_eq!(truncate_dump("Id=1"), "Id=1");
    }

    #[test]
    fn test_truncate_dump_long() {
        let long = "ä".repeat(400);
        let out = truncate_dump(&long);
        assert!(out.contains("truncated, 800 total bytes"));
    }
}
