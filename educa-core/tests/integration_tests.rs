//! Integration tests for the shared infrastructure

use educa_core::{
    config_error, init_logging, storage_error, EducaConfig, EducaError, LogFormat, LoggingConfig,
};
use std::io::Write;

#[test]
fn test_config_file_then_validation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[server]
port = 8088

[auth]
jwt_secret = "from-file"
token_ttl_hours = 2

[[auth.seed_users]]
email = "profe@escuela.cl"
password = "clave"

[logging]
format = "json"
"#
    )
    .unwrap();

    let config = EducaConfig::from_file(file.path()).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.address(), "127.0.0.1:8088");
    assert_eq!(config.auth.jwt_secret, "from-file");
    assert_eq!(config.auth.seed_users.len(), 1);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_missing_and_broken_files() {
    let missing = EducaConfig::from_file("/definitely/not/here.toml").unwrap_err();
    let context = missing.context();
    assert_eq!(context.operation.as_deref(), Some("read_file"));

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[server\nport = ").unwrap();
    let broken = EducaConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(broken, EducaError::Config { .. }));
    assert_eq!(
        broken.context().operation.as_deref(),
        Some("parse_toml")
    );
}

#[test]
fn test_seed_user_without_password_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[[auth.seed_users]]
email = "sin-clave@escuela.cl"
password = ""
"#
    )
    .unwrap();

    let config = EducaConfig::from_file(file.path()).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("sin-clave@escuela.cl"));
}

#[test]
fn test_error_macros() {
    let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
    let err = storage_error!("insert failed", "insert_grade", io);
    assert!(matches!(err, EducaError::Storage { .. }));
    assert!(std::error::Error::source(&err).is_some());
    err.log();

    let err = config_error!("bad port");
    assert!(std::error::Error::source(&err).is_none());
    assert_eq!(err.context().component, "config");
    err.log();
}

#[test]
fn test_logging_initialization() {
    let bad = LoggingConfig {
        filter_directives: vec!["educa_web=notalevel".to_string()],
        ..LoggingConfig::default()
    };
    assert!(init_logging(&bad).is_err());

    let config = LoggingConfig {
        level: "debug".to_string(),
        format: LogFormat::Compact,
        ..LoggingConfig::default()
    };
    // Only the first subscriber in the process can be installed
    let first = init_logging(&config);
    assert!(first.is_ok() || init_logging(&config).is_err());
}
