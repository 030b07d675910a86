// Auth log types and query structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default page size for auth log queries
pub const DEFAULT_QUERY_LIMIT: usize = 100;
/// Hard cap on the page size a single query may request
pub const MAX_QUERY_LIMIT: usize = 500;

/// A single authentication event recorded at login/logout time.
///
/// Entries are immutable once stored. Everything derived from them
/// (session pairing, duration annotations) is recomputed on each read and
/// never written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthLogEntry {
    /// Storage-assigned row id, unique and monotonically increasing
    pub id: i64,
    /// Numeric id of the user the event is attributed to, when known
    pub user: Option<i64>,
    /// Username of the attributed user, when known
    pub username: Option<String>,
    /// Email of the attributed user, when known
    pub email: Option<String>,
    /// What happened
    pub action: LogAction,
    /// Whether it succeeded
    pub status: LogStatus,
    /// Free-text diagnostic recorded with the event
    #[serde(default)]
    pub message: String,
    /// When the event happened. `None` for rows whose timestamp was
    /// missing or unparseable; such rows are kept but never paired into
    /// sessions.
    pub created_at: Option<DateTime<Utc>>,
}

/// Kind of authentication event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogAction {
    Login,
    Logout,
}

impl FromStr for LogAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LOGIN" => Ok(LogAction::Login),
            "LOGOUT" => Ok(LogAction::Logout),
            other => Err(format!("Unknown action '{}'", other)),
        }
    }
}

/// Outcome of an authentication event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogStatus {
    Success,
    Failed,
}

impl FromStr for LogStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SUCCESS" => Ok(LogStatus::Success),
            "FAILED" => Ok(LogStatus::Failed),
            other => Err(format!("Unknown status '{}'", other)),
        }
    }
}

/// An event to be recorded; id and timestamp are assigned by storage
#[derive(Debug, Clone)]
pub struct NewAuthLog {
    pub user: Option<i64>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub action: LogAction,
    pub status: LogStatus,
    pub message: String,
}

/// Query parameters for searching the auth log
#[derive(Debug, Clone, Default)]
pub struct AuthLogQuery {
    /// Case-insensitive substring match over username, email and message
    pub q: Option<String>,
    /// Filter by action
    pub action: Option<LogAction>,
    /// Filter by status
    pub status: Option<LogStatus>,
    /// Include only rows at or after this timestamp
    pub from: Option<DateTime<Utc>>,
    /// Include only rows at or before this timestamp
    pub to: Option<DateTime<Utc>>,
    /// Maximum number of rows to return (defaults to
    /// [`DEFAULT_QUERY_LIMIT`], capped at [`MAX_QUERY_LIMIT`])
    pub limit: Option<usize>,
}

/// One page of auth log rows, newest first.
///
/// `count` is the number of rows matching the filters before the limit was
/// applied, so clients can show "N of M".
#[derive(Debug, Clone, Serialize)]
pub struct AuthLogPage {
    pub count: usize,
    pub limit: usize,
    pub results: Vec<AuthLogEntry>,
}
