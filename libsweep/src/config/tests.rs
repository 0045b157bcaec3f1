use super::*;
use std::io::Write;
use std::time::Duration;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.registry.url, "http://localhost:5000");
    assert!(!config.registry.insecure);
    assert_eq!(config.network.timeout, 5);
    assert_eq!(config.throttle.interval_ms, 100);
    assert_eq!(config.throttle.interval(), Duration::from_millis(100));
    assert_eq!(config.output.format, OutputFormat::Pretty);
    assert_eq!(config.output.color, ColorChoice::Auto);
}

#[test]
fn test_from_str_empty_yaml() {
    let config = Config::from_yaml_str("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_from_str_partial_yaml() {
    let yaml = r#"
registry:
  url: "https://registry.internal:5000"
throttle:
  interval_ms: 250
"#;
    let config = Config::from_yaml_str(yaml).unwrap();

    assert_eq!(config.registry.url, "https://registry.internal:5000");
    assert_eq!(config.throttle.interval(), Duration::from_millis(250));

    // Untouched sections keep their defaults
    assert!(!config.registry.insecure);
    assert_eq!(config.network.timeout, 5);
    assert_eq!(config.output, Output::default());
}

#[test]
fn test_from_str_full_yaml() {
    let yaml = r#"
registry:
  url: "https://registry.example.com"
  insecure: true
network:
  timeout: 20
throttle:
  interval_ms: 50
output:
  format: yaml
  color: never
"#;
    let config = Config::from_yaml_str(yaml).unwrap();

    assert!(config.registry.insecure);
    assert_eq!(config.network.timeout, 20);
    assert_eq!(config.throttle.interval_ms, 50);
    assert_eq!(config.output.format, OutputFormat::Yaml);
    assert_eq!(config.output.color, ColorChoice::Never);
}

#[test]
fn test_from_str_invalid_format_value() {
    let result = Config::from_yaml_str("output: { format: table }");
    assert!(matches!(result, Err(SweepError::Config { .. })));
}

#[test]
fn test_from_str_zero_interval_rejected() {
    let result = Config::from_yaml_str("throttle: { interval_ms: 0 }");
    assert!(matches!(result, Err(SweepError::Config { .. })));
}

#[test]
fn test_from_str_unknown_field_ignored() {
    let result = Config::from_yaml_str("cache: { enabled: true }");
    assert!(result.is_ok());
}

#[test]
fn test_load_without_path_returns_defaults() {
    let config = Config::load(None).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "network:\n  timeout: 12").unwrap();

    let config = Config::load(Some(file.path())).unwrap();
    assert_eq!(config.network.timeout, 12);
}

#[test]
fn test_load_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.yaml");

    let result = Config::load(Some(missing.as_path()));
    match result {
        Err(SweepError::Config { path, .. }) => {
            assert_eq!(path, Some(missing.display().to_string()));
        }
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn test_client_config_follows_settings() {
    let config = Config::from_yaml_str("registry: { insecure: true }\nnetwork: { timeout: 9 }")
        .unwrap();
    let client_config = config.client_config();
    assert_eq!(client_config.timeout_seconds, 9);
    assert!(client_config.insecure);
}

#[test]
fn test_output_format_from_str() {
    assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
    assert_eq!("YML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
    assert_eq!("pretty".parse::<OutputFormat>().unwrap(), OutputFormat::Pretty);
    assert!("table".parse::<OutputFormat>().is_err());
}

#[test]
fn test_color_choice_from_str() {
    assert_eq!("never".parse::<ColorChoice>().unwrap(), ColorChoice::Never);
    assert_eq!("Always".parse::<ColorChoice>().unwrap(), ColorChoice::Always);
    assert!("sometimes".parse::<ColorChoice>().is_err());
}
