// Session report assembly

use super::reconcile::{reconcile, AnnotatedLogRow, ClosedSession};
use crate::authlog::AuthLogEntry;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Two-table report over a window of auth log rows: the raw (decorated)
/// rows and the closed-session summaries. This is the data handed to
/// whatever renders the export; layout is the renderer's concern.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub total_rows: usize,
    pub total_sessions: usize,
    pub rows: Vec<AnnotatedLogRow>,
    pub sessions: Vec<SessionSummaryRow>,
}

/// One line of the session summary table
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummaryRow {
    /// Display label of the identity the session belongs to
    pub who: String,
    pub login_at: DateTime<Utc>,
    pub logout_at: DateTime<Utc>,
    pub duration_ms: i64,
    /// `HH:MM:SS` rendering of the duration
    pub duration: String,
}

impl From<&ClosedSession> for SessionSummaryRow {
    fn from(session: &ClosedSession) -> Self {
        Self {
            who: session.key.label(),
            login_at: session.login_at,
            logout_at: session.logout_at,
            duration_ms: session.duration_ms,
            duration: super::reconcile::format_duration_ms(session.duration_ms),
        }
    }
}

/// Build the report for a window of rows. Reconciliation runs over exactly
/// this window, the same scope the admin view displays.
pub fn build_report(entries: &[AuthLogEntry]) -> SessionReport {
    let reconciliation = reconcile(entries);

    SessionReport {
        title: "Auth Logs Report".to_string(),
        generated_at: Utc::now(),
        total_rows: reconciliation.rows.len(),
        total_sessions: reconciliation.sessions.len(),
        sessions: reconciliation.sessions.iter().map(Into::into).collect(),
        rows: reconciliation.rows,
    }
}
