//! Loading the daemon document from disk

use tempfile::TempDir;
use ztp_daemon::{ZtpConfig, ZtpError};
use ztp_tests::TestSettingsBuilder;

#[test]
fn test_load_rejects_invalid_settings() {
    let temp_dir = TempDir::new().unwrap();
    let mut core = TestSettingsBuilder::new(temp_dir.path()).with_domain("").build();
    core.default_lease = 9000;
    let path = temp_dir.path().join("config.yaml");
    std::fs::write(&path, ZtpConfig::new(core, Default::default()).encode().unwrap()).unwrap();

    let err = ZtpConfig::load(&path).unwrap_err().to_string();
    assert!(err.contains("core.domain_name must be set"), "{err}");
    assert!(err.contains("exceeds core.max_lease"), "{err}");
}

#[test]
fn test_load_reports_field_path_of_bad_value() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");
    std::fs::write(
        &path,
        "core:\n  domain_name: example.com\nhosts:\n  10.0.0.5:\n    hostname: [sw1]\n",
    )
    .unwrap();

    let err = ZtpConfig::load(&path).unwrap_err();
    assert!(matches!(err, ZtpError::ConfigParse { .. }));
    assert!(err.to_string().contains("hosts.10.0.0.5.hostname"), "{err}");
}

#[test]
fn test_example_config_loads() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("config.example.yaml");
    let config = ZtpConfig::load(&path).unwrap();
    assert_eq!(config.core.domain_name, "example.com");
    assert!(config.hosts.contains_key("10.0.0.5"));
}
