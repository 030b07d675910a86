use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::authlog::{AuthLogPage, AuthLogQuery, LogAction, LogStatus};
use crate::session::{build_report, reconcile, SessionReport};
use crate::state::AppState;

/// Filter parameters accepted by the auth log endpoints, matching the
/// admin UI: `q`, `action`, `status`, `from`, `to` (YYYY-MM-DD), `limit`
#[derive(Debug, Default, Deserialize)]
pub struct AuthLogParams {
    pub q: Option<String>,
    pub action: Option<String>,
    pub status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<usize>,
}

type ApiError = (StatusCode, Json<Value>);

fn bad_request(message: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn parse_date(value: &str, param: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| bad_request(format!("Invalid '{}' date '{}', expected YYYY-MM-DD", param, value)))
}

impl AuthLogParams {
    /// Translate the raw query string parameters into a storage query.
    /// Unknown action/status values and malformed dates are a 400, not a
    /// silently empty filter.
    fn to_query(&self, state: &AppState) -> Result<AuthLogQuery, ApiError> {
        let action = self
            .action
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<LogAction>())
            .transpose()
            .map_err(bad_request)?;

        let status = self
            .status
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<LogStatus>())
            .transpose()
            .map_err(bad_request)?;

        let from = match self.from.as_deref().filter(|s| !s.is_empty()) {
            Some(value) => {
                let date = parse_date(value, "from")?;
                Some(
                    date.and_hms_opt(0, 0, 0)
                        .expect("midnight is always a valid time")
                        .and_utc(),
                )
            }
            None => None,
        };

        let to = match self.to.as_deref().filter(|s| !s.is_empty()) {
            Some(value) => {
                let date = parse_date(value, "to")?;
                // Inclusive end of day
                Some(
                    date.and_hms_milli_opt(23, 59, 59, 999)
                        .expect("end of day is always a valid time")
                        .and_utc(),
                )
            }
            None => None,
        };

        if let (Some(from), Some(to)) = (from, to)
            && from > to
        {
            return Err(bad_request("'from' is after 'to'".to_string()));
        }

        let limits = &state.config.auth_logs;
        let limit = self
            .limit
            .unwrap_or(limits.default_limit)
            .clamp(1, limits.max_limit);

        Ok(AuthLogQuery {
            q: self.q.clone(),
            action,
            status,
            from,
            to,
            limit: Some(limit),
        })
    }
}

/// `GET /api/admin/auth-logs`: filtered raw log rows, newest first,
/// as `{ count, limit, results }`
pub async fn list_auth_logs(
    State(state): State<AppState>,
    Query(params): Query<AuthLogParams>,
) -> Result<Json<AuthLogPage>, ApiError> {
    debug!("Auth log query: {:?}", params);

    let query = params.to_query(&state)?;
    let page = state.auth_logs.query(query).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e })),
        )
    })?;

    Ok(Json(page))
}

/// `GET /api/admin/auth-logs/sessions`: the same filtered window, run
/// through the session reconciler: decorated rows plus closed sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(params): Query<AuthLogParams>,
) -> Result<Json<Value>, ApiError> {
    debug!("Session reconciliation query: {:?}", params);

    let query = params.to_query(&state)?;
    let page = state.auth_logs.query(query).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e })),
        )
    })?;

    let reconciliation = reconcile(&page.results);

    Ok(Json(json!({
        "count": page.count,
        "limit": page.limit,
        "rows": reconciliation.rows,
        "sessions": reconciliation.sessions,
    })))
}

/// `GET /api/admin/auth-logs/report`: the two-table session report for
/// the filtered window
pub async fn session_report(
    State(state): State<AppState>,
    Query(params): Query<AuthLogParams>,
) -> Result<Json<SessionReport>, ApiError> {
    debug!("Session report query: {:?}", params);

    let query = params.to_query(&state)?;
    let page = state.auth_logs.query(query).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e })),
        )
    })?;

    Ok(Json(build_report(&page.results)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppConfig, AuthLogConfig, ServerConfig, UserAccount, UserRole};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn test_state() -> AppState {
        AppState::new(Arc::new(AppConfig {
            server: ServerConfig::default(),
            auth_logs: AuthLogConfig {
                default_limit: 100,
                max_limit: 200,
                retention_days: None,
            },
            users: vec![UserAccount {
                id: 1,
                email: "admin@cococonnect.lk".to_string(),
                username: "admin".to_string(),
                password_hash: "$2b$12$fake".to_string(),
                role: UserRole::Admin,
            }],
        }))
    }

    #[test]
    fn test_to_query_builds_inclusive_day_window() {
        let state = test_state();
        let params = AuthLogParams {
            from: Some("2025-01-01".to_string()),
            to: Some("2025-01-01".to_string()),
            ..Default::default()
        };

        let query = params.to_query(&state).unwrap();
        assert_eq!(
            query.from,
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
        );
        // The 'to' bound reaches the last millisecond of the named day,
        // not its midnight start
        assert_eq!(
            query.to,
            Some(
                Utc.with_ymd_and_hms(2025, 1, 1, 23, 59, 59).unwrap()
                    + chrono::Duration::milliseconds(999)
            )
        );
    }

    #[test]
    fn test_to_query_rejects_malformed_dates() {
        let state = test_state();

        let params = AuthLogParams {
            from: Some("01/01/2025".to_string()),
            ..Default::default()
        };
        let (status, _) = params.to_query(&state).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let params = AuthLogParams {
            to: Some("2025-13-40".to_string()),
            ..Default::default()
        };
        let (status, _) = params.to_query(&state).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_to_query_rejects_inverted_range() {
        let state = test_state();
        let params = AuthLogParams {
            from: Some("2025-02-01".to_string()),
            to: Some("2025-01-01".to_string()),
            ..Default::default()
        };

        let (status, _) = params.to_query(&state).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_to_query_clamps_limit_to_configured_max() {
        let state = test_state();

        let params = AuthLogParams {
            limit: Some(10_000),
            ..Default::default()
        };
        let query = params.to_query(&state).unwrap();
        assert_eq!(query.limit, Some(200));

        let params = AuthLogParams::default();
        let query = params.to_query(&state).unwrap();
        assert_eq!(query.limit, Some(100));
    }
}
