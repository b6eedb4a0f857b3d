use esteira::core::config::{ConfigLoader, EsteiraConfig};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn missing_file_yields_defaults() {
    let config = ConfigLoader::load_from_file(std::path::Path::new(
        "/definitivamente/nao/existe/esteira.toml",
    ))
    .unwrap();
    assert!(config.is_none());

    let defaults = EsteiraConfig::default();
    assert_eq!(defaults.poll_interval().unwrap(), Duration::from_secs(20));
    assert_eq!(defaults.priority_refresh().unwrap(), Duration::from_secs(60));
    assert_eq!(defaults.request_timeout().unwrap(), Duration::from_secs(30));
}

#[test]
fn partial_file_keeps_defaults_for_the_rest() {
    let file = write_config(
        r#"
[api]
base_url = "http://localhost:5000/api"
token = "t0ken"
"#,
    );
    let config = ConfigLoader::load_from_file(file.path()).unwrap().unwrap();
    assert_eq!(config.api.base_url, "http://localhost:5000/api");
    assert_eq!(config.api.token.as_deref(), Some("t0ken"));
    assert_eq!(config.pipeline.poll_interval, "20s");
    assert_eq!(config.api.request_timeout, "30s");
}

#[test]
fn full_file_round_trips_durations() {
    let file = write_config(
        r#"
[api]
base_url = "http://localhost:5000/api"
request_timeout = "5s"

[pipeline]
poll_interval = "10s"
priority_refresh = "2m"
"#,
    );
    let config = ConfigLoader::load_from_file(file.path()).unwrap().unwrap();
    assert_eq!(config.request_timeout().unwrap(), Duration::from_secs(5));
    assert_eq!(config.poll_interval().unwrap(), Duration::from_secs(10));
    assert_eq!(config.priority_refresh().unwrap(), Duration::from_secs(120));
    assert!(config.validate().is_ok());
}

#[test]
fn malformed_toml_is_a_config_error() {
    let file = write_config("[api\nbase_url = ");
    let error = ConfigLoader::load_from_file(file.path()).unwrap_err();
    assert!(error.message.contains("parse"));
}

#[test]
fn invalid_durations_fail_validation() {
    let file = write_config(
        r#"
[pipeline]
poll_interval = "logo depois"
"#,
    );
    let config = ConfigLoader::load_from_file(file.path()).unwrap().unwrap();
    let error = config.validate().unwrap_err();
    assert!(error.message.contains("pipeline.poll_interval"));
}

#[test]
fn empty_base_url_fails_validation() {
    let file = write_config(
        r#"
[api]
base_url = "  "
"#,
    );
    let config = ConfigLoader::load_from_file(file.path()).unwrap().unwrap();
    let error = config.validate().unwrap_err();
    assert!(error.message.contains("base_url"));
}

// Environment overrides are process-global, so every ESTEIRA_* mutation
// lives in this single test to avoid races with parallel tests.
#[test]
fn environment_overrides_beat_file_values() {
    let file = write_config(
        r#"
[api]
base_url = "http://do-arquivo:5000/api"

[pipeline]
poll_interval = "20s"
"#,
    );

    std::env::set_var("ESTEIRA_API_URL", "http://do-ambiente:5000/api");
    std::env::set_var("ESTEIRA_API_TOKEN", "env-token");
    std::env::set_var("ESTEIRA_POLL_INTERVAL", "7s");

    let config = ConfigLoader::load(Some(file.path())).unwrap();

    std::env::remove_var("ESTEIRA_API_URL");
    std::env::remove_var("ESTEIRA_API_TOKEN");
    std::env::remove_var("ESTEIRA_POLL_INTERVAL");

    assert_eq!(config.api.base_url, "http://do-ambiente:5000/api");
    assert_eq!(config.api.token.as_deref(), Some("env-token"));
    assert_eq!(config.poll_interval().unwrap(), Duration::from_secs(7));
}

#[test]
fn env_var_documentation_covers_every_override() {
    let docs = ConfigLoader::env_var_documentation();
    for var in [
        "ESTEIRA_CONFIG",
        "ESTEIRA_API_URL",
        "ESTEIRA_API_TOKEN",
        "ESTEIRA_API_TIMEOUT",
        "ESTEIRA_POLL_INTERVAL",
        "ESTEIRA_PRIORITY_REFRESH",
    ] {
        assert!(
            docs.iter().any(|line| line.starts_with(var)),
            "missing docs for {}",
            var
        );
    }
}
