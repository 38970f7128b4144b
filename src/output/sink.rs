use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use super::csv_writer::write_csv;
use super::provenance::Provenance;
use crate::normalize::NormalizedTable;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to serialize provenance: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Object store error: {0}")]
    Store(#[from] object_store::Error),
}

/// Destination for normalized tables
pub trait RecordSink {
    /// Persist `table`, normalized from the workbook `source_name`, and return
    /// the location of the dataset.
    fn persist(&self, source_name: &str, table: &NormalizedTable) -> Result<String, OutputError>;
}

impl<T: RecordSink + ?Sized> RecordSink for Box<T> {
    fn persist(&self, source_name: &str, table: &NormalizedTable) -> Result<String, OutputError> {
        (**self).persist(source_name, table)
    }
}

/// Writes `<stem>_normalized.csv` plus a `<stem>_normalized.meta.json`
/// provenance sidecar into a local directory
#[derive(Debug, Clone)]
pub struct LocalCsvSink {
    output_dir: PathBuf,
}

impl LocalCsvSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// Output file stem for a workbook entry (`dados/ipca.xls` -> `ipca_normalized`)
pub fn output_stem(source_name: &str) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| source_name.to_string());
    format!("{stem}_normalized")
}

impl RecordSink for LocalCsvSink {
    fn persist(&self, source_name: &str, table: &NormalizedTable) -> Result<String, OutputError> {
        fs::create_dir_all(&self.output_dir)?;

        let stem = output_stem(source_name);
        let csv_path = self.output_dir.join(format!("{stem}.csv"));
        let meta_path = self.output_dir.join(format!("{stem}.meta.json"));

        write_csv(BufWriter::new(File::create(&csv_path)?), &table.records)?;
        fs::write(&meta_path, Provenance::new(source_name, table).to_json()?)?;

        info!(
            "Saved {} records to {}",
            table.records.len(),
            csv_path.display()
        );
        Ok(csv_path.display().to_string())
    }
}
