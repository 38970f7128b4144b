use std::io::{Cursor, Read};

use thiserror::Error;
use tracing::debug;
use zip::ZipArchive;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Failed to read ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error while reading archive entry: {0}")]
    Io(#[from] std::io::Error),

    #[error("Entry not found in archive: {0}")]
    EntryNotFound(String),
}

/// In-memory ZIP of IBGE series spreadsheets
pub struct SpreadsheetArchive {
    zip: ZipArchive<Cursor<Vec<u8>>>,
}

impl SpreadsheetArchive {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ArchiveError> {
        let zip = ZipArchive::new(Cursor::new(bytes))?;
        debug!("Opened archive with {} entries", zip.len());
        Ok(Self { zip })
    }

    /// Names of `.xls` / `.xlsx` entries, in archive order
    pub fn spreadsheet_names(&self) -> Vec<String> {
        self.zip
            .file_names()
            .filter(|name| is_spreadsheet_name(name))
            .map(str::to_string)
            .collect()
    }

    pub fn read_entry(&mut self, name: &str) -> Result<Vec<u8>, ArchiveError> {
        let mut file = match self.zip.by_name(name) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(ArchiveError::EntryNotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        // Declared sizes are untrusted; let the Vec grow as data arrives
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        debug!("Read {} ({} bytes)", name, bytes.len());
        Ok(bytes)
    }
}

/// Whether an archive entry name looks like an Excel workbook
pub fn is_spreadsheet_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    !lower.ends_with('/') && (lower.ends_with(".xls") || lower.ends_with(".xlsx"))
}
