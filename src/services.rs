pub mod ipca_import_service;

pub use ipca_import_service::{ImportError, ImportReport, IpcaImportService};
