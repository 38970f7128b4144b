use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::normalize::{DataStart, NormalizationSummary, NormalizedTable};

/// Source system tag attached to every persisted table
pub const SOURCE_TAG: &str = "ibge-ipca-serie-historica";

/// Where a persisted table came from and when it was produced
#[derive(Debug, Clone, Serialize)]
pub struct Provenance {
    pub source: &'static str,
    /// Workbook name inside the archive
    pub source_file: String,
    pub processed_at: DateTime<Utc>,
    pub record_count: usize,
    pub data_start: DataStart,
    /// Data start was the fixed-offset guess
    pub low_confidence_layout: bool,
    pub summary: NormalizationSummary,
}

impl Provenance {
    pub fn new(source_file: impl Into<String>, table: &NormalizedTable) -> Self {
        Self {
            source: SOURCE_TAG,
            source_file: source_file.into(),
            processed_at: Utc::now(),
            record_count: table.records.len(),
            data_start: table.data_start,
            low_confidence_layout: table.low_confidence(),
            summary: table.summary.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
