use super::*;
use std::collections::HashMap;
use std::io::Write;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

#[test]
fn test_verbosity_from_count() {
    assert_eq!(VerbosityLevel::from_count(0), VerbosityLevel::Normal);
    assert_eq!(VerbosityLevel::from_count(1), VerbosityLevel::Verbose);
    assert_eq!(VerbosityLevel::from_count(2), VerbosityLevel::VeryVerbose);
    assert_eq!(VerbosityLevel::from_count(9), VerbosityLevel::Trace);
}

#[test]
fn test_log_filter_per_level() {
    assert_eq!(VerbosityLevel::Normal.log_filter(), "warn");
    assert_eq!(VerbosityLevel::Verbose.log_filter(), "info");
    assert_eq!(VerbosityLevel::VeryVerbose.log_filter(), "debug");
    assert_eq!(VerbosityLevel::Trace.log_filter(), "trace");
}

#[test]
fn test_env_overrides_file() {
    let mut config = Config::from_yaml_str("registry:\n  url: http://file:5000").unwrap();
    apply_env(
        &mut config,
        env_from(&[(ENV_URL, "http://env:5000"), (ENV_COLOR, "never")]),
    )
    .unwrap();

    assert_eq!(config.registry.url, "http://env:5000");
    assert_eq!(config.output.color, ColorChoice::Never);
}

#[test]
fn test_empty_env_url_is_ignored() {
    let mut config = Config::default();
    apply_env(&mut config, env_from(&[(ENV_URL, "  ")])).unwrap();
    assert_eq!(config.registry.url, "http://localhost:5000");
}

#[test]
fn test_invalid_env_color_fails() {
    let mut config = Config::default();
    let result = apply_env(&mut config, env_from(&[(ENV_COLOR, "purple")]));
    assert!(matches!(result, Err(SweepError::Config { .. })));
}

#[test]
fn test_flags_override_config_file() {
    let file = write_config("registry:\n  url: http://file:5000\noutput:\n  color: always\n");

    let ctx = AppContext::build(
        CliOverrides {
            config_path: Some(file.path().to_path_buf()),
            url: Some("http://flag:5000".to_string()),
            insecure: true,
            color: Some(ColorChoice::Never),
        },
        VerbosityLevel::Verbose,
    )
    .unwrap();

    assert_eq!(ctx.config.registry.url, "http://flag:5000");
    assert!(ctx.config.registry.insecure);
    assert_eq!(ctx.config.output.color, ColorChoice::Never);
    assert_eq!(ctx.verbosity, VerbosityLevel::Verbose);
}

#[test]
fn test_config_file_used_without_flags() {
    let file = write_config("throttle:\n  interval_ms: 250\n");

    let ctx = AppContext::build(
        CliOverrides {
            config_path: Some(file.path().to_path_buf()),
            ..Default::default()
        },
        VerbosityLevel::Normal,
    )
    .unwrap();

    assert_eq!(ctx.config.throttle.interval_ms, 250);
    assert!(!ctx.config.registry.insecure);
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = AppContext::build(
        CliOverrides {
            config_path: Some(dir.path().join("absent.yaml")),
            ..Default::default()
        },
        VerbosityLevel::Normal,
    );
    assert!(result.is_err());
}

#[test]
fn test_default_config_path_ends_with_sweep() {
    if let Some(path) = default_config_path() {
        assert!(path.ends_with("sweep/config.yaml"));
    }
}
