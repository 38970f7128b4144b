/// IPCA worksheet normalizer
///
/// Turns the raw first worksheet of an IBGE series workbook into
/// `ObservationRecord`s. Year labels appear only on the first month of each
/// year, so the year is forward-filled down the sheet. Rows that are not
/// (year, month) observations (titles, footnotes, blank separators) are
/// dropped without failing the sheet.
use std::ops::Range;

use thiserror::Error;
use tracing::{debug, error, instrument, trace};

use super::grid::{Cell, RawGrid};
use super::layout::{locate_data_start, DataStart};
use super::month::{is_month_token, month_number};
use super::record::{ObservationRecord, OutputField};
use super::summary::NormalizationSummary;
use crate::utils::{is_year_token, parse_number};

const YEAR_COL: usize = 0;
const MONTH_COL: usize = 1;
const MIN_YEAR: i32 = 1000;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("Invalid year label at row {row}: {value:?}")]
    InvalidYear { row: usize, value: String },
}

/// A worksheet that could not be normalized
///
/// Callers should skip the source and carry on with the rest of the batch.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to normalize {source_label}: {cause}")]
pub struct NormalizationFailure {
    pub source_label: String,
    #[source]
    pub cause: NormalizeError,
}

/// Why a row did not become a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Continuation row seen before any year label
    NoYearEstablished,
    NoMonthToken,
    /// Year missing, not numeric, or below 1000
    InvalidYear,
    /// Month blank or `NAN`
    MissingMonth,
    UnknownMonth,
}

/// Keep/drop decision for one data row during the forward fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDecision {
    /// Keep the row under `year`, reading its month from `month_col`
    Keep { year: i32, month_col: usize },
    Drop(DropReason),
}

/// Result of a successful normalization
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    pub records: Vec<ObservationRecord>,
    /// Canonical fields present in the sheet (never fewer than year and month)
    pub fields: Vec<OutputField>,
    pub data_start: DataStart,
    /// Data rows that did not become records
    pub dropped_rows: usize,
    pub summary: NormalizationSummary,
}

impl NormalizedTable {
    /// Data start came from the fixed-offset guess rather than the sheet itself
    pub fn low_confidence(&self) -> bool {
        self.data_start.low_confidence()
    }
}

#[derive(Debug, Clone, Copy)]
enum CandidateYear<'a> {
    Filled(i32),
    Raw(&'a Cell),
}

#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    row: usize,
    year: CandidateYear<'a>,
    month: &'a Cell,
}

#[derive(Debug, Default)]
struct ForwardFill<'a> {
    current_year: Option<i32>,
    kept: Vec<Candidate<'a>>,
    dropped: usize,
}

/// Normalize one worksheet grid
///
/// `source_label` (usually the workbook file name) is only used for logging
/// and failure attribution. An empty grid, or one without any month rows, is
/// an empty success.
#[instrument(skip(grid), fields(rows = grid.height()))]
pub fn normalize(
    grid: &RawGrid,
    source_label: &str,
) -> Result<NormalizedTable, NormalizationFailure> {
    match normalize_grid(grid) {
        Ok(table) => {
            table.summary.log(source_label);
            Ok(table)
        }
        Err(cause) => {
            error!("Failed to normalize {}: {}", source_label, cause);
            Err(NormalizationFailure {
                source_label: source_label.to_string(),
                cause,
            })
        }
    }
}

fn normalize_grid(grid: &RawGrid) -> Result<NormalizedTable, NormalizeError> {
    let data_start = locate_data_start(grid);
    let field_count = grid
        .width_from(data_start.row)
        .min(OutputField::ALL.len())
        .max(MONTH_COL + 1);
    let fields = OutputField::ALL[..field_count].to_vec();
    let data_rows = data_start.row.min(grid.height())..grid.height();

    let fill = forward_fill(grid, data_rows.clone())?;
    let (candidates, mut dropped_rows) = if fill.kept.is_empty() {
        debug!("No month rows found by the forward fill, falling back to plain year fill");
        (fill_years_only(grid, data_rows)?, 0)
    } else {
        (fill.kept, fill.dropped)
    };

    let mut records = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        match finalize_row(grid, candidate, &fields) {
            Ok(record) => records.push(record),
            Err(reason) => {
                trace!("Dropping row {}: {:?}", candidate.row, reason);
                dropped_rows += 1;
            }
        }
    }

    let summary = NormalizationSummary::from_records(&records, &fields);
    Ok(NormalizedTable {
        records,
        fields,
        data_start,
        dropped_rows,
        summary,
    })
}

/// Decide whether a data row is an observation, given the year carried down
/// from the rows above it.
///
/// Returns the year to carry forward together with the decision.
pub fn classify_row(
    grid: &RawGrid,
    row: usize,
    current_year: Option<i32>,
) -> Result<(Option<i32>, RowDecision), NormalizeError> {
    let year_cell = grid.cell(row, YEAR_COL);
    let year_text = year_cell.as_text();
    let month_is_token = is_month_token(&grid.cell(row, MONTH_COL).as_text());

    if is_year_token(&year_text) {
        let year = year_from_cell(year_cell).ok_or_else(|| NormalizeError::InvalidYear {
            row,
            value: year_text.to_string(),
        })?;
        let decision = if month_is_token {
            RowDecision::Keep {
                year,
                month_col: MONTH_COL,
            }
        } else {
            RowDecision::Drop(DropReason::NoMonthToken)
        };
        return Ok((Some(year), decision));
    }

    let Some(year) = current_year else {
        return Ok((None, RowDecision::Drop(DropReason::NoYearEstablished)));
    };

    // Some sheets shift the month into the year column on continuation rows
    let decision = if is_month_token(&year_text) {
        RowDecision::Keep {
            year,
            month_col: YEAR_COL,
        }
    } else if month_is_token {
        RowDecision::Keep {
            year,
            month_col: MONTH_COL,
        }
    } else {
        RowDecision::Drop(DropReason::NoMonthToken)
    };
    Ok((Some(year), decision))
}

fn forward_fill(
    grid: &RawGrid,
    mut rows: Range<usize>,
) -> Result<ForwardFill<'_>, NormalizeError> {
    rows.try_fold(ForwardFill::default(), |mut acc, row| {
        let (current_year, decision) = classify_row(grid, row, acc.current_year)?;
        acc.current_year = current_year;
        match decision {
            RowDecision::Keep { year, month_col } => acc.kept.push(Candidate {
                row,
                year: CandidateYear::Filled(year),
                month: grid.cell(row, month_col),
            }),
            RowDecision::Drop(reason) => {
                trace!("Dropping row {}: {:?}", row, reason);
                acc.dropped += 1;
            }
        }
        Ok(acc)
    })
}

/// Fallback for sheets where the forward fill kept nothing: fill the year
/// column alone and let `finalize_row` do all of the filtering.
fn fill_years_only(
    grid: &RawGrid,
    rows: Range<usize>,
) -> Result<Vec<Candidate<'_>>, NormalizeError> {
    let mut current_year = None;
    let mut candidates = Vec::with_capacity(rows.len());

    for row in rows {
        let year_cell = grid.cell(row, YEAR_COL);
        let year_text = year_cell.as_text();
        let month = grid.cell(row, MONTH_COL);

        let year = if is_year_token(&year_text) {
            let year = year_from_cell(year_cell).ok_or_else(|| NormalizeError::InvalidYear {
                row,
                value: year_text.to_string(),
            })?;
            current_year = Some(year);
            CandidateYear::Filled(year)
        } else {
            match current_year {
                Some(year) if is_month_token(&month.as_text()) => CandidateYear::Filled(year),
                _ => CandidateYear::Raw(year_cell),
            }
        };

        candidates.push(Candidate { row, year, month });
    }

    Ok(candidates)
}

fn finalize_row(
    grid: &RawGrid,
    candidate: &Candidate<'_>,
    fields: &[OutputField],
) -> Result<ObservationRecord, DropReason> {
    let year = match candidate.year {
        CandidateYear::Filled(year) => year,
        CandidateYear::Raw(cell) => coerce_number(cell)
            .and_then(truncate_to_i32)
            .ok_or(DropReason::InvalidYear)?,
    };
    if year < MIN_YEAR {
        return Err(DropReason::InvalidYear);
    }

    let month_text = candidate.month.as_text();
    let month_text = month_text.trim();
    if candidate.month.is_empty() || month_text.eq_ignore_ascii_case("nan") {
        return Err(DropReason::MissingMonth);
    }
    let month = month_number(month_text).ok_or(DropReason::UnknownMonth)?;

    let mut record = ObservationRecord::new(year, month);
    for field in fields.iter().skip(MONTH_COL + 1) {
        record.set_value(*field, coerce_number(grid.cell(candidate.row, field.column())));
    }
    Ok(record)
}

/// Numeric value of a cell, or `None` when it does not read as a number
pub fn coerce_number(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Int(i) => Some(*i as f64),
        Cell::Float(f) if f.is_finite() => Some(*f),
        Cell::Text(s) => parse_number(s),
        _ => None,
    }
}

fn year_from_cell(cell: &Cell) -> Option<i32> {
    match cell {
        Cell::Int(i) => i32::try_from(*i).ok(),
        Cell::Float(f) => truncate_to_i32(*f),
        Cell::Text(s) => s
            .trim()
            .replace(',', "")
            .parse::<f64>()
            .ok()
            .and_then(truncate_to_i32),
        _ => None,
    }
}

fn truncate_to_i32(value: f64) -> Option<i32> {
    let truncated = value.trunc();
    if truncated.is_finite() && truncated >= i32::MIN as f64 && truncated <= i32::MAX as f64 {
        Some(truncated as i32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::layout::LayoutStrategy;

    fn grid(rows: Vec<Vec<&str>>) -> RawGrid {
        RawGrid::from_strings(rows)
    }

    #[test]
    fn test_year_row_with_month_is_kept() {
        let g = grid(vec![vec!["1994", "JAN", "1"]]);
        let (year, decision) = classify_row(&g, 0, None).unwrap();
        assert_eq!(year, Some(1994));
        assert_eq!(
            decision,
            RowDecision::Keep {
                year: 1994,
                month_col: MONTH_COL
            }
        );
    }

    #[test]
    fn test_year_row_without_month_updates_year_only() {
        let g = grid(vec![vec!["1995", "Total"]]);
        let (year, decision) = classify_row(&g, 0, Some(1994)).unwrap();
        assert_eq!(year, Some(1995));
        assert_eq!(decision, RowDecision::Drop(DropReason::NoMonthToken));
    }

    #[test]
    fn test_continuation_before_any_year_is_dropped() {
        let g = grid(vec![vec!["", "FEV"]]);
        let (year, decision) = classify_row(&g, 0, None).unwrap();
        assert_eq!(year, None);
        assert_eq!(decision, RowDecision::Drop(DropReason::NoYearEstablished));
    }

    #[test]
    fn test_month_in_year_column() {
        let g = grid(vec![vec!["MAR", "1.5"]]);
        let (_, decision) = classify_row(&g, 0, Some(2001)).unwrap();
        assert_eq!(
            decision,
            RowDecision::Keep {
                year: 2001,
                month_col: YEAR_COL
            }
        );
    }

    #[test]
    fn test_footnote_row_is_dropped() {
        let g = grid(vec![vec!["Fonte: IBGE", ""]]);
        let (year, decision) = classify_row(&g, 0, Some(2001)).unwrap();
        assert_eq!(year, Some(2001));
        assert_eq!(decision, RowDecision::Drop(DropReason::NoMonthToken));
    }

    #[test]
    fn test_float_year_cell() {
        let g = RawGrid::new(vec![vec![Cell::Float(1994.0), Cell::from("JAN")]]);
        let (year, _) = classify_row(&g, 0, None).unwrap();
        assert_eq!(year, Some(1994));
    }

    #[test]
    fn test_oversized_year_is_a_failure() {
        let g = grid(vec![vec!["ANO", "MES"], vec!["99999999999", "JAN"]]);
        let err = normalize(&g, "big.xls").unwrap_err();
        assert_eq!(err.source_label, "big.xls");
        assert_eq!(
            err.cause,
            NormalizeError::InvalidYear {
                row: 1,
                value: "99999999999".to_string()
            }
        );
    }

    #[test]
    fn test_fallback_keeps_raw_numeric_years() {
        // "1994e0" is not a year label, so the forward fill keeps nothing,
        // but it still coerces to a number in the final pass
        let g = grid(vec![vec!["ANO", "MES", "IDX"], vec!["1994e0", "JUL", "10"]]);
        let table = normalize(&g, "odd.xls").unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].year, 1994);
        assert_eq!(table.records[0].month, 7);
        assert_eq!(table.records[0].index_value, Some(10.0));
    }

    #[test]
    fn test_fallback_drops_short_years() {
        let g = grid(vec![vec!["ANO", "MES"], vec!["12", "JUL"]]);
        let table = normalize(&g, "short.xls").unwrap();
        assert!(table.records.is_empty());
        assert_eq!(table.dropped_rows, 1);
    }

    #[test]
    fn test_narrow_grid_truncates_fields() {
        let g = grid(vec![vec!["ANO", "MES", "IDX"], vec!["1994", "JAN", "5"]]);
        let table = normalize(&g, "narrow.xls").unwrap();
        assert_eq!(
            table.fields,
            vec![OutputField::Year, OutputField::Month, OutputField::IndexValue]
        );
        assert_eq!(table.records[0].index_value, Some(5.0));
        assert_eq!(table.records[0].monthly_change, None);
        assert_eq!(table.data_start.strategy, LayoutStrategy::HeaderMarker);
    }

    #[test]
    fn test_coerce_number_variants() {
        assert_eq!(coerce_number(&Cell::Int(3)), Some(3.0));
        assert_eq!(coerce_number(&Cell::Float(f64::NAN)), None);
        assert_eq!(coerce_number(&Cell::from("-")), None);
        assert_eq!(coerce_number(&Cell::Bool(true)), None);
        assert_eq!(coerce_number(&Cell::Error("#N/A".to_string())), None);
    }
}
