// Output layer for normalized tables
//
// - csv_writer: the delimited dataset (one row per observation)
// - provenance: JSON sidecar describing where the data came from
// - sink: where both end up
// - bucket_sink: the same dataset uploaded to an S3 bucket

pub mod bucket_sink;
pub mod csv_writer;
pub mod provenance;
pub mod sink;

pub use bucket_sink::{BucketSink, BUCKET_PREFIX};
pub use csv_writer::write_csv;
pub use provenance::{Provenance, SOURCE_TAG};
pub use sink::{output_stem, LocalCsvSink, OutputError, RecordSink};
