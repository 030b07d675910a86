// Session reconciliation over auth log rows.
//
// A "session" here is derived after the fact: a LOGIN/SUCCESS row paired
// with the next LOGOUT/SUCCESS row for the same identity. Sessions are
// recomputed from the row list on every read and never persisted.

use crate::authlog::{AuthLogEntry, LogAction, LogStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Placeholder shown for rows with no computable session duration
pub const UNKNOWN_DURATION: &str = "—";

/// Identity used to correlate a LOGIN with its matching LOGOUT.
///
/// Not every row carries a stable foreign key, so correlation falls back
/// through the identifiers in order: numeric user id, then email, then
/// username, then the row's own id. The row-id fallback guarantees two
/// unrelated anonymous rows never link to each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum IdentityKey {
    User(i64),
    Email(String),
    Username(String),
    Row(i64),
}

impl IdentityKey {
    pub fn for_entry(entry: &AuthLogEntry) -> Self {
        if let Some(user) = entry.user {
            IdentityKey::User(user)
        } else if let Some(email) = entry.email.as_deref().filter(|e| !e.is_empty()) {
            IdentityKey::Email(email.to_string())
        } else if let Some(username) = entry.username.as_deref().filter(|u| !u.is_empty()) {
            IdentityKey::Username(username.to_string())
        } else {
            IdentityKey::Row(entry.id)
        }
    }

    /// Display label for report tables
    pub fn label(&self) -> String {
        match self {
            IdentityKey::User(id) => format!("user:{}", id),
            IdentityKey::Email(email) => email.clone(),
            IdentityKey::Username(username) => username.clone(),
            IdentityKey::Row(id) => format!("row:{}", id),
        }
    }
}

/// A closed login-to-logout interval reconstructed from the log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosedSession {
    pub key: IdentityKey,
    pub login_at: DateTime<Utc>,
    pub logout_at: DateTime<Utc>,
    pub duration_ms: i64,
}

/// An auth log row decorated with its session duration, when one could be
/// computed. Only matched LOGOUT/SUCCESS rows ever carry a duration;
/// everything else keeps the [`UNKNOWN_DURATION`] placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedLogRow {
    #[serde(flatten)]
    pub entry: AuthLogEntry,
    pub session_duration_ms: Option<i64>,
    pub session_text: String,
}

/// Result of reconciling a list of auth log rows
#[derive(Debug, Clone, Serialize)]
pub struct Reconciliation {
    /// The input rows, in input order, decorated with durations
    pub rows: Vec<AnnotatedLogRow>,
    /// Closed sessions, newest logout first
    pub sessions: Vec<ClosedSession>,
}

/// Pair LOGIN/SUCCESS and LOGOUT/SUCCESS rows into closed sessions.
///
/// Pure function of the input: no I/O, no mutation of `entries`, and
/// identical output on every call. Pairing is causal, so the walk runs in
/// chronological order regardless of how the input was sorted (callers
/// typically hand in newest-first pages straight from storage).
///
/// Rules, in walk order per identity key:
/// - LOGIN/SUCCESS opens (or silently replaces) the open login; an
///   unresolved earlier login is discarded, not reported;
/// - LOGOUT/SUCCESS with an open login closes it and annotates that
///   logout row; with none, the row stays unannotated and yields nothing;
/// - FAILED rows and rows without a timestamp never open or close a
///   session but remain in the decorated output unchanged.
pub fn reconcile(entries: &[AuthLogEntry]) -> Reconciliation {
    let mut rows: Vec<AnnotatedLogRow> = entries
        .iter()
        .map(|entry| AnnotatedLogRow {
            entry: entry.clone(),
            session_duration_ms: None,
            session_text: UNKNOWN_DURATION.to_string(),
        })
        .collect();

    // Chronological walk order; the sort is stable so rows logged in the
    // same instant keep their input order.
    let mut order: Vec<usize> = (0..entries.len())
        .filter(|&i| entries[i].created_at.is_some())
        .collect();
    order.sort_by_key(|&i| entries[i].created_at);

    let mut open_logins: HashMap<IdentityKey, DateTime<Utc>> = HashMap::new();
    let mut sessions: Vec<ClosedSession> = Vec::new();

    for i in order {
        let entry = &entries[i];
        if entry.status != LogStatus::Success {
            continue;
        }
        let Some(at) = entry.created_at else {
            continue;
        };
        let key = IdentityKey::for_entry(entry);

        match entry.action {
            LogAction::Login => {
                open_logins.insert(key, at);
            }
            LogAction::Logout => {
                if let Some(login_at) = open_logins.remove(&key) {
                    // Non-negative by construction: the logout cannot
                    // precede the login it closes in walk order.
                    let duration_ms = (at - login_at).num_milliseconds();
                    rows[i].session_duration_ms = Some(duration_ms);
                    rows[i].session_text = format_duration_ms(duration_ms);
                    sessions.push(ClosedSession {
                        key,
                        login_at,
                        logout_at: at,
                        duration_ms,
                    });
                }
            }
        }
    }

    // Newest session first for display
    sessions.sort_by(|a, b| b.logout_at.cmp(&a.logout_at));

    Reconciliation { rows, sessions }
}

/// Render a duration as `HH:MM:SS`, truncating sub-second precision.
/// Hours are unbounded rather than wrapped at 24.
pub fn format_duration_ms(duration_ms: i64) -> String {
    let total_secs = duration_ms.max(0) / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
