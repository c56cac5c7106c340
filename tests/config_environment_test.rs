// ABOUTME: Configuration and storage environment tests
// ABOUTME: Covers environment variable loading and file-backed database creation

use serial_test::serial;

use agendly::config::{DatabaseUrl, Environment, ServerConfig};
use agendly::database::Database;

fn clear_env() {
    for key in [
        "HTTP_PORT",
        "DATABASE_URL",
        "ENVIRONMENT",
        "JWT_SECRET",
        "JWT_EXPIRY_HOURS",
        "REFRESH_TOKEN_EXPIRY_DAYS",
        "LOG_LEVEL",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_defaults_apply_when_env_is_empty() {
    clear_env();

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 8080);
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.token_expiry_hours, 24);
    assert_eq!(config.refresh_token_expiry_days, 30);
    // A development secret is generated when none is configured
    assert!(!config.jwt_secret.is_empty());
}

#[test]
#[serial]
fn test_env_overrides_are_honored() {
    clear_env();
    std::env::set_var("HTTP_PORT", "9090");
    std::env::set_var("DATABASE_URL", "sqlite::memory:");
    std::env::set_var("JWT_SECRET", "configured-secret");
    std::env::set_var("JWT_EXPIRY_HOURS", "2");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 9090);
    assert!(matches!(config.database_url, DatabaseUrl::Memory));
    assert_eq!(config.jwt_secret, "configured-secret");
    assert_eq!(config.token_expiry_hours, 2);

    clear_env();
}

#[test]
#[serial]
fn test_production_requires_a_jwt_secret() {
    clear_env();
    std::env::set_var("ENVIRONMENT", "production");

    assert!(ServerConfig::from_env().is_err());

    clear_env();
}

#[test]
#[serial]
fn test_malformed_port_is_rejected() {
    clear_env();
    std::env::set_var("HTTP_PORT", "not-a-port");

    assert!(ServerConfig::from_env().is_err());

    clear_env();
}

#[tokio::test]
async fn test_file_backed_database_is_created_and_migrated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agendly.db");
    let url = DatabaseUrl::SQLite { path: path.clone() };

    let database = Database::new(&url.to_connection_string()).await.unwrap();
    database.migrate().await.unwrap();
    // Re-running migrations against the same file is a no-op
    database.migrate().await.unwrap();

    assert!(path.exists());
}
