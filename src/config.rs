use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::importers::downloader::DEFAULT_ARCHIVE_URL;
use crate::output::{BucketSink, LocalCsvSink, OutputError, RecordSink};

#[derive(Debug, Clone)]
pub struct Config {
    pub source_url: String,
    pub output_dir: PathBuf,
    pub download_timeout_secs: u64,
    /// Upload to this bucket instead of writing to `output_dir`
    pub s3_bucket: Option<String>,
    /// S3-compatible endpoint, for MinIO and similar
    pub s3_endpoint: Option<String>,
}

/// Where normalized datasets are persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Local(PathBuf),
    Bucket {
        name: String,
        endpoint: Option<String>,
    },
}

impl Config {
    /// Read configuration from the environment, falling back to defaults for
    /// anything unset
    pub fn from_env() -> Self {
        Config {
            source_url: env::var("IPCA_SOURCE_URL")
                .unwrap_or_else(|_| DEFAULT_ARCHIVE_URL.to_string()),
            output_dir: env::var("OUTPUT_DIR")
                .unwrap_or_else(|_| "ipca-raw".to_string())
                .into(),
            download_timeout_secs: env::var("DOWNLOAD_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
            s3_bucket: non_empty_var("S3_BUCKET_NAME"),
            s3_endpoint: non_empty_var("S3_ENDPOINT"),
        }
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    /// The bucket when `S3_BUCKET_NAME` is set, the local directory otherwise
    pub fn output_target(&self) -> OutputTarget {
        match &self.s3_bucket {
            Some(name) => OutputTarget::Bucket {
                name: name.clone(),
                endpoint: self.s3_endpoint.clone(),
            },
            None => OutputTarget::Local(self.output_dir.clone()),
        }
    }

    /// Build the sink for `output_target()`
    pub fn record_sink(&self) -> Result<Box<dyn RecordSink + Send>, OutputError> {
        Ok(match self.output_target() {
            OutputTarget::Local(dir) => Box::new(LocalCsvSink::new(dir)),
            OutputTarget::Bucket { name, endpoint } => {
                Box::new(BucketSink::from_env(&name, endpoint.as_deref())?)
            }
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
