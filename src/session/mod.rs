// Derived-session module: reconciliation of auth log rows into closed
// login-to-logout sessions, plus the report built from them

pub mod reconcile;
pub mod report;

pub use reconcile::{
    format_duration_ms, reconcile, AnnotatedLogRow, ClosedSession, IdentityKey, Reconciliation,
    UNKNOWN_DURATION,
};
pub use report::{build_report, SessionReport, SessionSummaryRow};
