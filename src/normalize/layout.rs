/// Data-start detection for IBGE series worksheets
///
/// The source workbooks carry a variable number of title, note and header rows
/// above the data. Detection runs an ordered list of strategies and takes the
/// first answer:
///
/// 1. `HeaderMarker` - a cell reading `ANO` (the year header); data starts on
///    the row below it.
/// 2. `LeadingYear` - the first row whose first cell looks like a 4+ digit year;
///    data starts on that row.
/// 3. `FixedOffset` - row 5. This always answers and is only a guess: nothing
///    checks that row 5 holds data. Results found this way are flagged
///    `low_confidence`, and the row filter in the normalizer is the only real
///    safeguard.
use serde::Serialize;
use tracing::{debug, warn};

use super::grid::RawGrid;

const HEADER_MARKER: &str = "ANO";
const FIXED_START_ROW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LayoutStrategy {
    HeaderMarker,
    LeadingYear,
    FixedOffset,
}

/// Strategies in the order they are tried
pub const STRATEGIES: [LayoutStrategy; 3] = [
    LayoutStrategy::HeaderMarker,
    LayoutStrategy::LeadingYear,
    LayoutStrategy::FixedOffset,
];

/// Where the data region begins and how that was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataStart {
    pub row: usize,
    pub strategy: LayoutStrategy,
}

impl DataStart {
    pub fn low_confidence(&self) -> bool {
        self.strategy == LayoutStrategy::FixedOffset
    }
}

impl LayoutStrategy {
    /// Run this strategy alone; `None` means it found nothing.
    pub fn locate(&self, grid: &RawGrid) -> Option<usize> {
        match self {
            LayoutStrategy::HeaderMarker => find_header_marker(grid),
            LayoutStrategy::LeadingYear => find_leading_year(grid),
            LayoutStrategy::FixedOffset => Some(FIXED_START_ROW),
        }
    }
}

/// Run the strategies in order and return the first hit
pub fn locate_data_start(grid: &RawGrid) -> DataStart {
    for strategy in STRATEGIES {
        if let Some(row) = strategy.locate(grid) {
            let start = DataStart { row, strategy };
            if start.low_confidence() {
                warn!(
                    "No header marker or year row found; assuming data starts at row {}",
                    row
                );
            } else {
                debug!("Data starts at row {} ({:?})", row, strategy);
            }
            return start;
        }
    }

    // FixedOffset never declines
    DataStart {
        row: FIXED_START_ROW,
        strategy: LayoutStrategy::FixedOffset,
    }
}

fn find_header_marker(grid: &RawGrid) -> Option<usize> {
    grid.rows().iter().position(|row| {
        row.iter()
            .any(|cell| cell.as_text().trim().to_uppercase() == HEADER_MARKER)
    })
    .map(|idx| idx + 1)
}

fn find_leading_year(grid: &RawGrid) -> Option<usize> {
    (0..grid.height()).find(|&row| {
        let text = grid.cell(row, 0).as_text();
        let trimmed = text.trim();
        let digits = trimmed.replace('.', "");
        trimmed.chars().count() >= 4
            && !digits.is_empty()
            && digits.chars().all(|c| c.is_ascii_digit())
    })
}
