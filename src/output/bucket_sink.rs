use std::sync::Arc;

use object_store::aws::AmazonS3Builder;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info};

use super::csv_writer::write_csv;
use super::provenance::Provenance;
use super::sink::{output_stem, OutputError, RecordSink};
use crate::normalize::NormalizedTable;

/// Key prefix for every uploaded dataset
pub const BUCKET_PREFIX: &str = "ipca-raw/";

/// Uploads `ipca-raw/<stem>_normalized.csv` to an S3 bucket
///
/// Provenance travels as object metadata (`fonte`, `processado`, `registros`)
/// instead of a sidecar file. `persist` is synchronous like the rest of the
/// batch, so the sink drives its uploads on its own single-threaded runtime.
/// Call it from a blocking thread (`spawn_blocking()`), not from async code.
pub struct BucketSink {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    runtime: Runtime,
}

impl BucketSink {
    /// Sink for `bucket` with credentials and region from the standard
    /// `AWS_*` environment variables. `endpoint` points at an S3-compatible
    /// server instead of AWS.
    pub fn from_env(bucket: &str, endpoint: Option<&str>) -> Result<Self, OutputError> {
        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
        if let Some(endpoint) = endpoint {
            builder = builder.with_endpoint(endpoint).with_allow_http(true);
        }
        Self::with_store(Arc::new(builder.build()?), bucket)
    }

    pub fn with_store(
        store: Arc<dyn ObjectStore>,
        bucket: impl Into<String>,
    ) -> Result<Self, OutputError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            store,
            bucket: bucket.into(),
            runtime,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Object key for a workbook entry (`ipca.xls` -> `ipca-raw/ipca_normalized.csv`)
    pub fn object_key(source_name: &str) -> String {
        format!("{BUCKET_PREFIX}{}.csv", output_stem(source_name))
    }
}

fn object_attributes(provenance: &Provenance) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert(Attribute::ContentType, "text/csv".into());
    attributes.insert(Attribute::Metadata("fonte".into()), provenance.source.into());
    attributes.insert(
        Attribute::Metadata("processado".into()),
        provenance.processed_at.to_rfc3339().into(),
    );
    attributes.insert(
        Attribute::Metadata("registros".into()),
        provenance.record_count.to_string().into(),
    );
    attributes
}

impl RecordSink for BucketSink {
    fn persist(&self, source_name: &str, table: &NormalizedTable) -> Result<String, OutputError> {
        let mut body = Vec::new();
        write_csv(&mut body, &table.records)?;

        let key = Self::object_key(source_name);
        let options = PutOptions {
            attributes: object_attributes(&Provenance::new(source_name, table)),
            ..Default::default()
        };

        debug!("Uploading {} bytes to s3://{}/{}", body.len(), self.bucket, key);
        self.runtime.block_on(self.store.put_opts(
            &ObjectPath::from(key.as_str()),
            PutPayload::from(body),
            options,
        ))?;

        let location = format!("s3://{}/{}", self.bucket, key);
        info!("Saved {} records to {}", table.records.len(), location);
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{normalize, RawGrid};
    use crate::output::SOURCE_TAG;
    use object_store::memory::InMemory;

    #[test]
    fn test_object_key_uses_prefix() {
        assert_eq!(
            BucketSink::object_key("dados/ipca_202409SerieHist.xls"),
            "ipca-raw/ipca_202409SerieHist_normalized.csv"
        );
    }

    #[test]
    fn test_upload_carries_provenance_metadata() {
        let store = Arc::new(InMemory::new());
        let sink = BucketSink::with_store(store.clone(), "ipca-bucket").unwrap();
        let grid = RawGrid::from_strings(vec![
            vec!["ANO", "MES", "INDICE"],
            vec!["1994", "JAN", "1709.94"],
            vec!["", "FEV", "1775.88"],
        ]);
        let table = normalize(&grid, "ipca.xls").unwrap();

        let location = sink.persist("ipca.xls", &table).unwrap();
        assert_eq!(location, "s3://ipca-bucket/ipca-raw/ipca_normalized.csv");

        let (attributes, body) = sink.runtime.block_on(async {
            let result = store
                .get(&ObjectPath::from("ipca-raw/ipca_normalized.csv"))
                .await
                .unwrap();
            let attributes = result.attributes.clone();
            (attributes, result.bytes().await.unwrap())
        });

        let meta = |key: &'static str| {
            attributes
                .get(&Attribute::Metadata(key.into()))
                .map(|v| v.as_ref().to_string())
        };
        assert_eq!(meta("fonte").as_deref(), Some(SOURCE_TAG));
        assert_eq!(meta("registros").as_deref(), Some("2"));
        assert!(meta("processado").is_some());

        let csv = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(csv.lines().nth(1), Some("1994,1,1709.94,,,,,"));
    }
}
