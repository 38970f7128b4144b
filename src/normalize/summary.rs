use std::collections::BTreeSet;

use serde::Serialize;
use tracing::info;

use super::record::{ObservationRecord, OutputField};

/// Advisory statistics about a normalized table
///
/// Logged after every successful normalization and embedded in the output
/// provenance. Nothing downstream depends on these values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizationSummary {
    pub record_count: usize,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    pub distinct_years: usize,
    pub distinct_months: usize,
    /// Distinct month numbers present, ascending
    pub months: Vec<u32>,
    pub fields: Vec<&'static str>,
}

impl NormalizationSummary {
    pub fn from_records(records: &[ObservationRecord], fields: &[OutputField]) -> Self {
        let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
        let months: BTreeSet<u32> = records.iter().map(|r| r.month).collect();

        Self {
            record_count: records.len(),
            first_year: years.first().copied(),
            last_year: years.last().copied(),
            distinct_years: years.len(),
            distinct_months: months.len(),
            months: months.into_iter().collect(),
            fields: fields.iter().map(OutputField::name).collect(),
        }
    }

    pub fn log(&self, source_label: &str) {
        info!("Normalized {}: {} records", source_label, self.record_count);
        if let (Some(first), Some(last)) = (self.first_year, self.last_year) {
            info!("Period: {}-{}", first, last);
        }
        info!(
            "Distinct years: {}, distinct months: {}",
            self.distinct_years, self.distinct_months
        );
        info!("Months found: {:?}", self.months);
        info!("Fields: {:?}", self.fields);
    }
}
