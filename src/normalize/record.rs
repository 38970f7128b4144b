use serde::{Deserialize, Serialize};

/// One normalized (year, month) observation of the IPCA series
///
/// Field order matches the canonical output column order; the CSV header is
/// derived from these names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub year: i32,
    pub month: u32,
    /// Index number, base December 1993 = 100
    pub index_value: Option<f64>,
    pub monthly_change: Option<f64>,
    /// Accumulated change over 3 months
    pub quarterly_change: Option<f64>,
    /// Accumulated change over 6 months
    pub semiannual_change: Option<f64>,
    /// Accumulated change in the calendar year
    pub annual_change: Option<f64>,
    /// Accumulated change over the last 12 months
    pub trailing_12m_change: Option<f64>,
}

/// Canonical output columns, in sheet order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputField {
    Year,
    Month,
    IndexValue,
    MonthlyChange,
    QuarterlyChange,
    SemiannualChange,
    AnnualChange,
    Trailing12mChange,
}

impl OutputField {
    pub const ALL: [OutputField; 8] = [
        OutputField::Year,
        OutputField::Month,
        OutputField::IndexValue,
        OutputField::MonthlyChange,
        OutputField::QuarterlyChange,
        OutputField::SemiannualChange,
        OutputField::AnnualChange,
        OutputField::Trailing12mChange,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OutputField::Year => "year",
            OutputField::Month => "month",
            OutputField::IndexValue => "index_value",
            OutputField::MonthlyChange => "monthly_change",
            OutputField::QuarterlyChange => "quarterly_change",
            OutputField::SemiannualChange => "semiannual_change",
            OutputField::AnnualChange => "annual_change",
            OutputField::Trailing12mChange => "trailing_12m_change",
        }
    }

    /// Zero-based worksheet column holding this field in the data region
    pub fn column(&self) -> usize {
        *self as usize
    }
}

impl ObservationRecord {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            index_value: None,
            monthly_change: None,
            quarterly_change: None,
            semiannual_change: None,
            annual_change: None,
            trailing_12m_change: None,
        }
    }

    /// Store a numeric field value; `Year` and `Month` are ignored.
    pub fn set_value(&mut self, field: OutputField, value: Option<f64>) {
        match field {
            OutputField::Year | OutputField::Month => {}
            OutputField::IndexValue => self.index_value = value,
            OutputField::MonthlyChange => self.monthly_change = value,
            OutputField::QuarterlyChange => self.quarterly_change = value,
            OutputField::SemiannualChange => self.semiannual_change = value,
            OutputField::AnnualChange => self.annual_change = value,
            OutputField::Trailing12mChange => self.trailing_12m_change = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_columns_follow_sheet_order() {
        for (idx, field) in OutputField::ALL.iter().enumerate() {
            assert_eq!(field.column(), idx);
        }
        assert_eq!(OutputField::Trailing12mChange.name(), "trailing_12m_change");
    }

    #[test]
    fn test_set_value_ignores_key_fields() {
        let mut record = ObservationRecord::new(1994, 1);
        record.set_value(OutputField::Year, Some(3.0));
        record.set_value(OutputField::AnnualChange, Some(2.5));
        assert_eq!(record.year, 1994);
        assert_eq!(record.annual_change, Some(2.5));
    }
}
