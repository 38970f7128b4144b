// Tests for environment-driven configuration
// Environment variables are process-global, so these run serially

use std::path::PathBuf;

use ipca_normalizer::config::{Config, OutputTarget};
use ipca_normalizer::importers::downloader::DEFAULT_ARCHIVE_URL;
use serial_test::serial;

fn clear_env() {
    std::env::remove_var("IPCA_SOURCE_URL");
    std::env::remove_var("OUTPUT_DIR");
    std::env::remove_var("DOWNLOAD_TIMEOUT_SECS");
    std::env::remove_var("S3_BUCKET_NAME");
    std::env::remove_var("S3_ENDPOINT");
}

#[test]
#[serial]
fn test_defaults() {
    clear_env();
    let config = Config::from_env();

    assert_eq!(config.source_url, DEFAULT_ARCHIVE_URL);
    assert_eq!(config.output_dir, PathBuf::from("ipca-raw"));
    assert_eq!(config.download_timeout_secs, 60);
    assert_eq!(config.s3_bucket, None);
    assert_eq!(
        config.output_target(),
        OutputTarget::Local(PathBuf::from("ipca-raw"))
    );
}

#[test]
#[serial]
fn test_overrides() {
    clear_env();
    std::env::set_var("IPCA_SOURCE_URL", "http://localhost:9000/ipca.zip");
    std::env::set_var("OUTPUT_DIR", "/tmp/ipca");
    std::env::set_var("DOWNLOAD_TIMEOUT_SECS", "5");

    let config = Config::from_env();
    clear_env();

    assert_eq!(config.source_url, "http://localhost:9000/ipca.zip");
    assert_eq!(config.output_dir, PathBuf::from("/tmp/ipca"));
    assert_eq!(config.download_timeout().as_secs(), 5);
}

#[test]
#[serial]
fn test_bad_timeout_falls_back() {
    clear_env();
    std::env::set_var("DOWNLOAD_TIMEOUT_SECS", "soon");

    let config = Config::from_env();
    clear_env();

    assert_eq!(config.download_timeout_secs, 60);
}

#[test]
#[serial]
fn test_bucket_name_selects_bucket_target() {
    clear_env();
    std::env::set_var("S3_BUCKET_NAME", "ipca-datalake");
    std::env::set_var("S3_ENDPOINT", "http://localhost:9000");
    std::env::set_var("OUTPUT_DIR", "/tmp/ipca");

    let config = Config::from_env();
    clear_env();

    assert_eq!(
        config.output_target(),
        OutputTarget::Bucket {
            name: "ipca-datalake".to_string(),
            endpoint: Some("http://localhost:9000".to_string()),
        }
    );
    assert!(config.record_sink().is_ok());
}

#[test]
#[serial]
fn test_blank_bucket_name_keeps_local_target() {
    clear_env();
    std::env::set_var("S3_BUCKET_NAME", "  ");

    let config = Config::from_env();
    clear_env();

    assert_eq!(config.s3_bucket, None);
    assert!(matches!(config.output_target(), OutputTarget::Local(_)));
}
