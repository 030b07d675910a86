use crate::models::AppConfig;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Load configuration from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Arc<AppConfig>, String> {
    let path = path.as_ref();
    info!("Loading configuration from: {}", path.display());

    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

    let config: AppConfig = serde_yaml::from_str(&contents)
        .map_err(|e| format!("Failed to parse YAML config: {}", e))?;

    config.validate()?;

    info!(
        "Configuration loaded successfully with {} user account(s)",
        config.users.len()
    );
    if let Some(days) = config.auth_logs.retention_days {
        info!("Auth log retention: {} day(s)", days);
    }

    Ok(Arc::new(config))
}

/// Load configuration with fallback options
pub fn load_config_with_fallback() -> Result<Arc<AppConfig>, String> {
    // Try loading from environment variable first
    if let Ok(config_path) = std::env::var("CONFIG_PATH") {
        match load_config(&config_path) {
            Ok(config) => return Ok(config),
            Err(e) => warn!(
                "Failed to load config from CONFIG_PATH ({}): {}",
                config_path, e
            ),
        }
    }

    // Try common config file locations
    let paths = vec!["config.yaml", "config.yml", "./config.yaml", "./config.yml"];

    for path in paths {
        if Path::new(path).exists() {
            match load_config(path) {
                Ok(config) => return Ok(config),
                Err(e) => warn!("Failed to load config from '{}': {}", path, e),
            }
        }
    }

    Err(
        "No configuration file found. Please create a config.yaml file or set CONFIG_PATH environment variable. \
        See config.example.yaml for an example configuration.".to_string()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    #[test]
    fn test_parse_valid_config() {
        let yaml = r#"
server:
  bind_addr: "127.0.0.1:8000"
auth_logs:
  default_limit: 50
  max_limit: 200
  retention_days: 90
users:
  - id: 1
    email: admin@cococonnect.lk
    username: admin
    password_hash: "$2b$12$abcdefghijklmnopqrstuv"
    role: admin
  - id: 2
    email: user@cococonnect.lk
    username: user
    password_hash: "$2b$12$abcdefghijklmnopqrstuv"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.bind_addr, "127.0.0.1:8000");
        assert_eq!(config.auth_logs.default_limit, 50);
        assert_eq!(config.auth_logs.retention_days, Some(90));
        assert_eq!(config.users.len(), 2);
        assert_eq!(config.users[0].role, UserRole::Admin);
        // Role defaults to plain user when omitted
        assert_eq!(config.users[1].role, UserRole::User);
    }

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let yaml = r#"
users:
  - id: 1
    email: admin@cococonnect.lk
    username: admin
    password_hash: "$2b$12$abcdefghijklmnopqrstuv"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.auth_logs.default_limit, 100);
        assert_eq!(config.auth_logs.max_limit, 500);
        assert_eq!(config.auth_logs.retention_days, None);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("/nonexistent/config.yaml");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Failed to read config file"));
    }
}
