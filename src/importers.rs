// ! Importers for the IBGE series archive: download, unzip, decode worksheets

pub mod archive;
pub mod downloader;
pub mod workbook_reader;

// Re-export commonly used items
pub use archive::{ArchiveError, SpreadsheetArchive};
pub use downloader::{DownloadError, IbgeDownloader};
pub use workbook_reader::{read_first_sheet, WorkbookError};
