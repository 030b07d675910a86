// Auth log storage backends

use super::types::{
    AuthLogEntry, AuthLogPage, AuthLogQuery, NewAuthLog, DEFAULT_QUERY_LIMIT, MAX_QUERY_LIMIT,
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Trait for auth log storage backends
#[async_trait]
pub trait AuthLogStorage: Send + Sync {
    /// Record an auth event, assigning its row id and timestamp
    async fn store(&self, event: NewAuthLog) -> Result<AuthLogEntry, String>;

    /// Query auth log rows, newest first
    async fn query(&self, query: AuthLogQuery) -> Result<AuthLogPage, String>;

    /// Delete rows older than the specified timestamp.
    /// Used for the retention policy.
    async fn cleanup_old_entries(
        &self,
        before: chrono::DateTime<chrono::Utc>,
    ) -> Result<usize, String>;
}

/// In-memory auth log storage
/// Suitable for development and testing
pub struct MemoryAuthLogStorage {
    entries: Arc<RwLock<Vec<AuthLogEntry>>>,
    next_id: AtomicI64,
}

impl MemoryAuthLogStorage {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryAuthLogStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthLogStorage for MemoryAuthLogStorage {
    async fn store(&self, event: NewAuthLog) -> Result<AuthLogEntry, String> {
        let entry = AuthLogEntry {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            user: event.user,
            username: event.username,
            email: event.email,
            action: event.action,
            status: event.status,
            message: event.message,
            created_at: Some(Utc::now()),
        };

        let mut entries = self.entries.write().await;
        debug!("Storing auth log entry: {:?} {:?}", entry.action, entry.status);
        entries.push(entry.clone());

        Ok(entry)
    }

    async fn query(&self, query: AuthLogQuery) -> Result<AuthLogPage, String> {
        let entries = self.entries.read().await;

        let needle = query
            .q
            .as_ref()
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        let mut results: Vec<AuthLogEntry> = entries
            .iter()
            .filter(|entry| {
                // Filter by search text over username, email and message
                if let Some(ref needle) = needle {
                    let in_username = entry
                        .username
                        .as_ref()
                        .is_some_and(|u| u.to_lowercase().contains(needle));
                    let in_email = entry
                        .email
                        .as_ref()
                        .is_some_and(|e| e.to_lowercase().contains(needle));
                    let in_message = entry.message.to_lowercase().contains(needle);

                    if !in_username && !in_email && !in_message {
                        return false;
                    }
                }

                // Filter by action
                if let Some(action) = query.action
                    && entry.action != action
                {
                    return false;
                }

                // Filter by status
                if let Some(status) = query.status
                    && entry.status != status
                {
                    return false;
                }

                // Filter by time range; rows without a timestamp cannot
                // satisfy a range filter
                if let Some(from) = query.from {
                    match entry.created_at {
                        Some(at) if at >= from => {}
                        _ => return false,
                    }
                }
                if let Some(to) = query.to {
                    match entry.created_at {
                        Some(at) if at <= to => {}
                        _ => return false,
                    }
                }

                true
            })
            .cloned()
            .collect();

        // Newest first; id breaks ties for rows logged in the same instant
        results.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let count = results.len();
        let limit = query
            .limit
            .unwrap_or(DEFAULT_QUERY_LIMIT)
            .clamp(1, MAX_QUERY_LIMIT);
        results.truncate(limit);

        Ok(AuthLogPage {
            count,
            limit,
            results,
        })
    }

    async fn cleanup_old_entries(
        &self,
        before: chrono::DateTime<chrono::Utc>,
    ) -> Result<usize, String> {
        let mut entries = self.entries.write().await;
        let original_count = entries.len();

        entries.retain(|entry| entry.created_at.is_none_or(|at| at >= before));

        let removed = original_count - entries.len();
        debug!("Cleaned up {} old auth log entries", removed);

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authlog::types::{LogAction, LogStatus};

    fn event(
        user: Option<i64>,
        action: LogAction,
        status: LogStatus,
        message: &str,
    ) -> NewAuthLog {
        NewAuthLog {
            user,
            username: user.map(|id| format!("user{}", id)),
            email: user.map(|id| format!("user{}@example.com", id)),
            action,
            status,
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_store_assigns_sequential_ids() {
        let storage = MemoryAuthLogStorage::new();

        let first = storage
            .store(event(Some(1), LogAction::Login, LogStatus::Success, "ok"))
            .await
            .unwrap();
        let second = storage
            .store(event(Some(1), LogAction::Logout, LogStatus::Success, "ok"))
            .await
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(first.created_at.is_some());
    }

    #[tokio::test]
    async fn test_query_filters_by_action_and_status() {
        let storage = MemoryAuthLogStorage::new();

        storage
            .store(event(Some(1), LogAction::Login, LogStatus::Success, "ok"))
            .await
            .unwrap();
        storage
            .store(event(Some(1), LogAction::Login, LogStatus::Failed, "bad password"))
            .await
            .unwrap();
        storage
            .store(event(Some(1), LogAction::Logout, LogStatus::Success, "ok"))
            .await
            .unwrap();

        let page = storage
            .query(AuthLogQuery {
                action: Some(LogAction::Login),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.count, 2);

        let page = storage
            .query(AuthLogQuery {
                action: Some(LogAction::Login),
                status: Some(LogStatus::Failed),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.results[0].message, "bad password");
    }

    #[tokio::test]
    async fn test_query_search_matches_username_email_and_message() {
        let storage = MemoryAuthLogStorage::new();

        storage
            .store(NewAuthLog {
                user: Some(1),
                username: Some("nadeesha".to_string()),
                email: Some("nadeesha@example.com".to_string()),
                action: LogAction::Login,
                status: LogStatus::Success,
                message: "Login success".to_string(),
            })
            .await
            .unwrap();
        storage
            .store(NewAuthLog {
                user: None,
                username: None,
                email: None,
                action: LogAction::Login,
                status: LogStatus::Failed,
                message: "Login failed for login_id=ghost".to_string(),
            })
            .await
            .unwrap();

        let page = storage
            .query(AuthLogQuery {
                q: Some("NADEE".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.results[0].username.as_deref(), Some("nadeesha"));

        let page = storage
            .query(AuthLogQuery {
                q: Some("ghost".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.results[0].status, LogStatus::Failed);
    }

    #[tokio::test]
    async fn test_query_returns_newest_first_and_applies_limit() {
        let storage = MemoryAuthLogStorage::new();

        for i in 0..5 {
            storage
                .store(event(
                    Some(i),
                    LogAction::Login,
                    LogStatus::Success,
                    "ok",
                ))
                .await
                .unwrap();
        }

        let page = storage
            .query(AuthLogQuery {
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();

        // count reflects all matches, results only the page
        assert_eq!(page.count, 5);
        assert_eq!(page.limit, 2);
        assert_eq!(page.results.len(), 2);
        assert!(page.results[0].id > page.results[1].id);
    }

    #[tokio::test]
    async fn test_query_limit_is_clamped() {
        let storage = MemoryAuthLogStorage::new();
        storage
            .store(event(Some(1), LogAction::Login, LogStatus::Success, "ok"))
            .await
            .unwrap();

        let page = storage
            .query(AuthLogQuery {
                limit: Some(100_000),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.limit, MAX_QUERY_LIMIT);

        let page = storage
            .query(AuthLogQuery {
                limit: Some(0),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.limit, 1);
    }

    #[tokio::test]
    async fn test_query_date_range_bounds_are_inclusive() {
        let storage = MemoryAuthLogStorage::new();

        let stored = storage
            .store(event(Some(1), LogAction::Login, LogStatus::Success, "ok"))
            .await
            .unwrap();
        let at = stored.created_at.unwrap();

        // A window starting and ending exactly on the row keeps it
        let page = storage
            .query(AuthLogQuery {
                from: Some(at),
                to: Some(at),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.count, 1);

        // Windows strictly before or strictly after exclude it
        let before = storage
            .query(AuthLogQuery {
                to: Some(at - chrono::Duration::milliseconds(1)),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(before.count, 0);

        let after = storage
            .query(AuthLogQuery {
                from: Some(at + chrono::Duration::milliseconds(1)),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(after.count, 0);
    }

    #[tokio::test]
    async fn test_cleanup_old_entries() {
        let storage = MemoryAuthLogStorage::new();

        storage
            .store(event(Some(1), LogAction::Login, LogStatus::Success, "ok"))
            .await
            .unwrap();

        let removed = storage
            .cleanup_old_entries(Utc::now() - chrono::Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(removed, 0);

        let removed = storage
            .cleanup_old_entries(Utc::now() + chrono::Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(removed, 1);

        let page = storage.query(AuthLogQuery::default()).await.unwrap();
        assert_eq!(page.count, 0);
    }
}
