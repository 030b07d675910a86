// Auth log recorder

use super::storage::AuthLogStorage;
use super::types::{LogAction, LogStatus, NewAuthLog};
use crate::models::User;
use std::sync::Arc;
use tracing::{error, info};

/// Records authentication events to the auth log.
///
/// Every login attempt and logout goes through here so the admin log view
/// sees failures as well as successes.
#[derive(Clone)]
pub struct AuthLogRecorder {
    storage: Arc<dyn AuthLogStorage>,
}

impl AuthLogRecorder {
    pub fn new(storage: Arc<dyn AuthLogStorage>) -> Self {
        Self { storage }
    }

    /// Record an auth event
    pub async fn log(&self, event: NewAuthLog) {
        info!(
            "Auth event: {:?} {:?} user={:?} - {}",
            event.action, event.status, event.user, event.message
        );

        if let Err(e) = self.storage.store(event).await {
            error!("Failed to store auth log entry: {}", e);
        }
    }

    /// Record a successful login
    pub async fn log_login_success(&self, user: &User) {
        self.log(NewAuthLog {
            user: Some(user.id),
            username: Some(user.username.clone()),
            email: Some(user.email.clone()),
            action: LogAction::Login,
            status: LogStatus::Success,
            message: "Login success".to_string(),
        })
        .await;
    }

    /// Record a failed login attempt.
    ///
    /// The attempt is attributed to `user` when the submitted identifier
    /// resolved to a known account, so repeated failures against one
    /// account stay visible even though no session ever opens.
    pub async fn log_login_failed(&self, user: Option<&User>, message: String) {
        self.log(NewAuthLog {
            user: user.map(|u| u.id),
            username: user.map(|u| u.username.clone()),
            email: user.map(|u| u.email.clone()),
            action: LogAction::Login,
            status: LogStatus::Failed,
            message,
        })
        .await;
    }

    /// Record a successful logout
    pub async fn log_logout_success(&self, user: &User) {
        self.log(NewAuthLog {
            user: Some(user.id),
            username: Some(user.username.clone()),
            email: Some(user.email.clone()),
            action: LogAction::Logout,
            status: LogStatus::Success,
            message: "Logout success".to_string(),
        })
        .await;
    }

    /// Record a logout that could not be attributed to a known account
    pub async fn log_logout_failed(&self, message: String) {
        self.log(NewAuthLog {
            user: None,
            username: None,
            email: None,
            action: LogAction::Logout,
            status: LogStatus::Failed,
            message,
        })
        .await;
    }
}
