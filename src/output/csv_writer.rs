use std::io::Write;

use crate::normalize::{ObservationRecord, OutputField};

/// Write records as UTF-8 CSV with a header row
///
/// Columns are always the 8 canonical fields; absent values are written as
/// empty cells.
pub fn write_csv<W: Write>(writer: W, records: &[ObservationRecord]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);

    if records.is_empty() {
        // serialize() derives the header from the first record, so write it explicitly
        csv_writer.write_record(OutputField::ALL.iter().map(OutputField::name))?;
    }

    for record in records {
        csv_writer.serialize(record)?;
    }

    csv_writer.flush()?;
    Ok(())
}
