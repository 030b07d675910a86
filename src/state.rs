// Shared application state.
//
// Everything handlers need travels in one explicit state object through
// axum's `State` extractor; there are no ambient globals.

use crate::authlog::{AuthLogRecorder, AuthLogStorage, MemoryAuthLogStorage};
use crate::models::{AppConfig, User};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<UserStore>,
    pub auth_logs: Arc<dyn AuthLogStorage>,
    pub recorder: AuthLogRecorder,
}

impl AppState {
    /// Build the state with the in-memory auth log backend
    pub fn new(config: Arc<AppConfig>) -> Self {
        let auth_logs: Arc<dyn AuthLogStorage> = Arc::new(MemoryAuthLogStorage::new());
        Self {
            users: Arc::new(UserStore::from_config(&config)),
            recorder: AuthLogRecorder::new(auth_logs.clone()),
            auth_logs,
            config,
        }
    }
}

/// Read-only user directory seeded from configuration
pub struct UserStore {
    users: Vec<User>,
    by_email: HashMap<String, usize>,
    by_username: HashMap<String, usize>,
}

impl UserStore {
    pub fn from_config(config: &AppConfig) -> Self {
        let users: Vec<User> = config
            .users
            .iter()
            .map(|account| User {
                id: account.id,
                email: account.email.clone(),
                username: account.username.clone(),
                password_hash: account.password_hash.clone(),
                role: account.role,
                created_at: Utc::now(),
            })
            .collect();

        let by_email = users
            .iter()
            .enumerate()
            .map(|(i, u)| (u.email.to_lowercase(), i))
            .collect();
        let by_username = users
            .iter()
            .enumerate()
            .map(|(i, u)| (u.username.clone(), i))
            .collect();

        Self {
            users,
            by_email,
            by_username,
        }
    }

    pub fn find_by_id(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Resolve a login identifier, username first and then email,
    /// the same lookup order the original login view used
    pub fn find_by_identifier(&self, identifier: &str) -> Option<&User> {
        if let Some(&i) = self.by_username.get(identifier) {
            return Some(&self.users[i]);
        }
        self.by_email
            .get(&identifier.to_lowercase())
            .map(|&i| &self.users[i])
    }
}
