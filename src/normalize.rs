// Worksheet normalization
//
// This module turns the raw first worksheet of an IBGE IPCA series workbook
// into one record per (year, month):
// - grid: decoded cells as handed over by the workbook reader
// - layout: where the data region starts
// - month: Portuguese month tokens
// - normalizer: forward fill, row filtering and type coercion

pub mod grid;
pub mod layout;
pub mod month;
pub mod normalizer;
pub mod record;
pub mod summary;

pub use grid::{Cell, RawGrid};
pub use layout::{DataStart, LayoutStrategy};
pub use normalizer::{normalize, NormalizationFailure, NormalizeError, NormalizedTable};
pub use record::{ObservationRecord, OutputField};
pub use summary::NormalizationSummary;
