//! Configuration file loading.

use std::io::Write;
use std::time::Duration;

use almacen_engine::{AlmacenConfig, ConfigError, DEFAULT_BASE_URL};

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn full_config_round_trips_into_app_settings() {
    let file = write_config(
        r#"
[api]
base_url = "https://almacen.example.com/api"
timeout_secs = 12
connect_timeout_secs = 3

[app]
high_contrast = true
"#,
    );

    let config = AlmacenConfig::load_from(file.path()).unwrap().unwrap();
    let client = config.client_config();
    assert_eq!(client.timeout(), Duration::from_secs(12));

    let options = config.ui_options();
    assert!(options.high_contrast);
    assert!(!options.ascii_only);
}

#[test]
fn unknown_keys_are_tolerated() {
    let file = write_config("[api]\nbase_url = \"http://x/api\"\nretries = 3\n");
    assert!(AlmacenConfig::load_from(file.path()).unwrap().is_some());
}

#[test]
fn invalid_types_are_parse_errors() {
    let file = write_config("[app]\nascii_only = \"yes\"\n");
    let err = AlmacenConfig::load_from(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn missing_api_section_uses_default_url() {
    let file = write_config("[app]\nreduced_motion = true\n");
    let config = AlmacenConfig::load_from(file.path()).unwrap().unwrap();
    assert!(config.api.is_none());
    // The env override may be set in the developer's shell; only check the fallback path.
    if std::env::var(almacen_engine::BASE_URL_ENV).is_err() {
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
    }
}
