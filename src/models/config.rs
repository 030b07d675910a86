use serde::{Deserialize, Serialize};

use crate::authlog::types::{DEFAULT_QUERY_LIMIT, MAX_QUERY_LIMIT};
use crate::models::UserRole;

/// Top-level application configuration, loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Auth log query limits and retention
    #[serde(default)]
    pub auth_logs: AuthLogConfig,
    /// Seeded user accounts (this service carries no user database of its
    /// own; accounts come from configuration)
    pub users: Vec<UserAccount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. "0.0.0.0:3000"
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthLogConfig {
    /// Page size when the query does not specify a limit
    #[serde(default = "default_query_limit")]
    pub default_limit: usize,
    /// Hard cap on the page size a query may request
    #[serde(default = "max_query_limit")]
    pub max_limit: usize,
    /// Drop log rows older than this many days; `None` keeps everything
    #[serde(default)]
    pub retention_days: Option<u32>,
}

impl Default for AuthLogConfig {
    fn default() -> Self {
        Self {
            default_limit: default_query_limit(),
            max_limit: max_query_limit(),
            retention_days: None,
        }
    }
}

fn default_query_limit() -> usize {
    DEFAULT_QUERY_LIMIT
}

fn max_query_limit() -> usize {
    MAX_QUERY_LIMIT
}

/// A user account seeded from configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: i64,
    pub email: String,
    pub username: String,
    /// bcrypt hash of the account password
    pub password_hash: String,
    #[serde(default)]
    pub role: UserRole,
}

impl AppConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.users.is_empty() {
            return Err("Configuration must define at least one user account".to_string());
        }

        let mut seen_ids = std::collections::HashSet::new();
        let mut seen_emails = std::collections::HashSet::new();
        let mut seen_usernames = std::collections::HashSet::new();

        for account in &self.users {
            if !seen_ids.insert(account.id) {
                return Err(format!("Duplicate user id in configuration: {}", account.id));
            }
            if account.email.trim().is_empty() || account.username.trim().is_empty() {
                return Err(format!(
                    "User {} must have a non-empty email and username",
                    account.id
                ));
            }
            if !seen_emails.insert(account.email.to_lowercase()) {
                return Err(format!(
                    "Duplicate user email in configuration: {}",
                    account.email
                ));
            }
            if !seen_usernames.insert(account.username.clone()) {
                return Err(format!(
                    "Duplicate username in configuration: {}",
                    account.username
                ));
            }
        }

        if self.auth_logs.default_limit == 0 || self.auth_logs.max_limit == 0 {
            return Err("Auth log limits must be greater than zero".to_string());
        }
        if self.auth_logs.default_limit > self.auth_logs.max_limit {
            return Err(format!(
                "Auth log default_limit ({}) exceeds max_limit ({})",
                self.auth_logs.default_limit, self.auth_logs.max_limit
            ));
        }
        // Storage enforces MAX_QUERY_LIMIT as a hard cap; a larger
        // configured max_limit would be silently ignored, so reject it
        if self.auth_logs.max_limit > MAX_QUERY_LIMIT {
            return Err(format!(
                "Auth log max_limit ({}) exceeds the supported maximum ({})",
                self.auth_logs.max_limit, MAX_QUERY_LIMIT
            ));
        }

        Ok(())
    }
}
