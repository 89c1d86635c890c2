//! Export writer for the normalized tables.
//!
//! Each table is written as one JSON array to `<name>.json`, or to
//! `<name>.json.gz` when compression is on. The run summary always goes to
//! an uncompressed, indented `summary.json`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ImportError, Result};
use crate::importer::RunSummary;
use crate::models::LogEntry;
use crate::registry::Registries;

pub const BOATS_TABLE: &str = "boats";
pub const PERSONS_TABLE: &str = "persons";
pub const DESTINATIONS_TABLE: &str = "destinations";
pub const LOGBOOKS_TABLE: &str = "logbooks";

const SUMMARY_FILE: &str = "summary.json";

pub struct ExportWriter {
    output_dir: PathBuf,
    compress: bool,
    pretty: bool,
}

impl ExportWriter {
    pub fn new(output_dir: PathBuf, compress: bool, pretty: bool) -> Result<Self> {
        std::fs::create_dir_all(&output_dir).map_err(|e| ImportError::io(&output_dir, e))?;
        Ok(Self {
            output_dir,
            compress,
            pretty,
        })
    }

    /// Path a table with this name is written to
    pub fn table_path(&self, name: &str) -> PathBuf {
        if self.compress {
            self.output_dir.join(format!("{}.json.gz", name))
        } else {
            self.output_dir.join(format!("{}.json", name))
        }
    }

    /// Write all four tables, returning the files written
    pub fn write_tables(&self, registries: &Registries, entries: &[LogEntry]) -> Result<Vec<PathBuf>> {
        info!(dir = %self.output_dir.display(), compress = self.compress, "Exporting");
        Ok(vec![
            self.write_table(BOATS_TABLE, &registries.boats)?,
            self.write_table(PERSONS_TABLE, &registries.persons)?,
            self.write_table(DESTINATIONS_TABLE, &registries.destinations)?,
            self.write_table(LOGBOOKS_TABLE, entries)?,
        ])
    }

    pub fn write_table<T: Serialize + ?Sized>(&self, name: &str, data: &T) -> Result<PathBuf> {
        let path = self.table_path(name);
        let file = File::create(&path).map_err(|e| ImportError::io(&path, e))?;
        let writer = BufWriter::new(file);

        if self.compress {
            let mut encoder = GzEncoder::new(writer, Compression::default());
            self.encode(&mut encoder, data)?;
            let mut writer = encoder.finish().map_err(|e| ImportError::io(&path, e))?;
            writer.flush().map_err(|e| ImportError::io(&path, e))?;
        } else {
            let mut writer = writer;
            self.encode(&mut writer, data)?;
            writer.flush().map_err(|e| ImportError::io(&path, e))?;
        }

        debug!(path = %path.display(), "Wrote table");
        Ok(path)
    }

    pub fn write_summary(&self, summary: &RunSummary) -> Result<PathBuf> {
        let path = self.output_dir.join(SUMMARY_FILE);
        let contents = serde_json::to_string_pretty(summary)?;
        std::fs::write(&path, contents).map_err(|e| ImportError::io(&path, e))?;
        Ok(path)
    }

    fn encode<W: Write, T: Serialize + ?Sized>(&self, writer: W, data: &T) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(writer, data)?;
        } else {
            serde_json::to_writer(writer, data)?;
        }
        Ok(())
    }
}

/// Read back a table written by [`ExportWriter`], compressed or not
pub fn read_table<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| ImportError::io(path, e))?;
    let reader = std::io::BufReader::new(file);
    let is_gz = path.extension().is_some_and(|ext| ext == "gz");
    let data = if is_gz {
        serde_json::from_reader(flate2::read::GzDecoder::new(reader))?
    } else {
        serde_json::from_reader(reader)?
    };
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Destination;

    fn registries() -> Registries {
        let mut regs = Registries::default();
        regs.destinations.insert(Destination::placeholder("former-000001", "Wehr"));
        regs
    }

    #[test]
    fn test_table_path() {
        let dir = tempfile::tempdir().unwrap();
        let gz = ExportWriter::new(dir.path().to_path_buf(), true, false).unwrap();
        let plain = ExportWriter::new(dir.path().to_path_buf(), false, false).unwrap();
        assert_eq!(gz.table_path("boats"), dir.path().join("boats.json.gz"));
        assert_eq!(plain.table_path("boats"), dir.path().join("boats.json"));
    }

    #[test]
    fn test_write_plain_compact() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ExportWriter::new(dir.path().to_path_buf(), false, false).unwrap();
        let paths = writer.write_tables(&registries(), &[]).unwrap();
        assert_eq!(paths.len(), 4);

        let text = std::fs::read_to_string(dir.path().join("destinations.json")).unwrap();
        assert_eq!(text, r#"[{"id":"former-000001","name":"Wehr","fmr":true}]"#);
        let logbooks = std::fs::read_to_string(dir.path().join("logbooks.json")).unwrap();
        assert_eq!(logbooks, "[]");
    }

    #[test]
    fn test_write_gzip_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ExportWriter::new(dir.path().join("out"), true, true).unwrap();
        writer.write_tables(&registries(), &[]).unwrap();

        let dests: Vec<Destination> =
            read_table(&dir.path().join("out").join("destinations.json.gz")).unwrap();
        assert_eq!(dests.len(), 1);
        assert_eq!(dests[0].name, "Wehr");
        assert!(dests[0].is_placeholder);
    }

    #[test]
    fn test_read_corrupt_table_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boats.json");
        std::fs::write(&path, "[{").unwrap();

        let err = read_table::<Vec<Destination>>(&path).unwrap_err();
        assert!(matches!(err, ImportError::Json(_)));
        assert!(err.to_string().starts_with("JSON error:"));
    }
}
