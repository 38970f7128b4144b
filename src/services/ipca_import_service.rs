use std::time::Instant;

use tracing::{error, info, instrument, warn};

use crate::importers::archive::{ArchiveError, SpreadsheetArchive};
use crate::importers::workbook_reader::{read_first_sheet, WorkbookError};
use crate::normalize::{normalize, NormalizationFailure, RawGrid};
use crate::output::{OutputError, RecordSink};

/// Error types for a single archive entry
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Workbook error: {0}")]
    Workbook(#[from] WorkbookError),

    #[error(transparent)]
    Normalize(#[from] NormalizationFailure),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

/// A workbook that was normalized and persisted
#[derive(Debug, Clone)]
pub struct ImportedEntry {
    pub entry: String,
    /// File path or object URL of the persisted dataset
    pub location: String,
    pub record_count: usize,
}

/// A workbook that was skipped
#[derive(Debug, Clone)]
pub struct FailedEntry {
    pub entry: String,
    pub reason: String,
}

/// Outcome of one archive run
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub imported: Vec<ImportedEntry>,
    pub failures: Vec<FailedEntry>,
}

impl ImportReport {
    pub fn total_records(&self) -> usize {
        self.imported.iter().map(|e| e.record_count).sum()
    }
}

/// Service for turning an IBGE series archive into normalized datasets
pub struct IpcaImportService<S: RecordSink> {
    sink: S,
}

impl<S: RecordSink> IpcaImportService<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Process every spreadsheet in the archive
    ///
    /// Only an unreadable archive is an error; a workbook that fails to
    /// decode, normalize or persist is logged, recorded in the report, and the
    /// batch continues with the next entry. Synchronous; run it inside
    /// `spawn_blocking()` from async code.
    #[instrument(skip(self, archive_bytes), fields(archive_size = archive_bytes.len()))]
    pub fn process_archive(&self, archive_bytes: Vec<u8>) -> Result<ImportReport, ArchiveError> {
        let start = Instant::now();
        let mut archive = SpreadsheetArchive::from_bytes(archive_bytes)?;
        let entries = archive.spreadsheet_names();
        info!("Found {} spreadsheets in archive: {:?}", entries.len(), entries);

        let mut report = ImportReport::default();
        for entry in entries {
            match self.process_entry(&mut archive, &entry) {
                Ok(imported) => report.imported.push(imported),
                Err(e) => {
                    error!("Skipping {}: {}", entry, e);
                    report.failures.push(FailedEntry {
                        entry,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if !report.failures.is_empty() {
            warn!(
                "{} of {} spreadsheets failed",
                report.failures.len(),
                report.failures.len() + report.imported.len()
            );
        }
        info!(
            "Archive processed in {:.2}s: {} imported, {} failed, {} records",
            start.elapsed().as_secs_f64(),
            report.imported.len(),
            report.failures.len(),
            report.total_records()
        );
        Ok(report)
    }

    /// Normalize an already-decoded worksheet and persist it
    pub fn process_grid(
        &self,
        source_name: &str,
        grid: &RawGrid,
    ) -> Result<ImportedEntry, ImportError> {
        let table = normalize(grid, source_name)?;
        if table.low_confidence() {
            warn!(
                "{}: data start was guessed at row {}, check the output",
                source_name, table.data_start.row
            );
        }

        let location = self.sink.persist(source_name, &table)?;
        Ok(ImportedEntry {
            entry: source_name.to_string(),
            location,
            record_count: table.records.len(),
        })
    }

    fn process_entry(
        &self,
        archive: &mut SpreadsheetArchive,
        entry: &str,
    ) -> Result<ImportedEntry, ImportError> {
        info!("Reading {}", entry);
        let bytes = archive.read_entry(entry)?;
        let grid = read_first_sheet(bytes)?;
        self.process_grid(entry, &grid)
    }
}
