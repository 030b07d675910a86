use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::{claims_for, create_token, verify_password};
use crate::middleware::AuthUser;
use crate::models::{AuthResponse, LoginRequest, UserInfo};
use crate::state::AppState;

/// Login with email or username plus password.
///
/// Every attempt lands in the auth log: payload problems and bad
/// credentials as LOGIN/FAILED (attributed to the account when the
/// identifier resolves to one), successful token issuance as
/// LOGIN/SUCCESS.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), (StatusCode, Json<Value>)> {
    let email = payload
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase())
        .unwrap_or_default();
    let username = payload
        .username
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    // Normalize login id: email wins when both are present
    let login_id = if !email.is_empty() { email } else { username };

    let known_user = if login_id.is_empty() {
        None
    } else {
        state.users.find_by_identifier(&login_id).cloned()
    };

    // Validate payload
    let password = match payload.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) if !login_id.is_empty() => password,
        _ => {
            state
                .recorder
                .log_login_failed(
                    known_user.as_ref(),
                    format!(
                        "Login payload invalid (missing username/email/password) for login_id={}",
                        login_id
                    ),
                )
                .await;
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "username/email and password are required" })),
            ));
        }
    };

    // Resolve the account and check the password; both failure modes look
    // identical to the caller
    let user = match &known_user {
        Some(user) if verify_password(password, &user.password_hash).unwrap_or(false) => {
            user.clone()
        }
        _ => {
            state
                .recorder
                .log_login_failed(
                    known_user.as_ref(),
                    format!("Login failed for login_id={}", login_id),
                )
                .await;
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid credentials" })),
            ));
        }
    };

    let claims = claims_for(&user);
    let token = create_token(&claims).map_err(|_| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to create token" })),
        )
    })?;

    state.recorder.log_login_success(&user).await;
    info!("User logged in successfully: {}", user.email);

    Ok((
        StatusCode::OK,
        Json(AuthResponse {
            token,
            user: UserInfo::from(user),
        }),
    ))
}

/// Logout. Requires authentication; records LOGOUT/SUCCESS for the
/// account behind the token.
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let user = state.users.find_by_id(auth_user.user_id).cloned();

    match user {
        Some(user) => {
            state.recorder.log_logout_success(&user).await;
            info!("User logged out: {}", user.email);
            Ok((StatusCode::OK, Json(json!({ "detail": "Logged out" }))))
        }
        None => {
            // Valid token for an account that no longer exists in config
            state
                .recorder
                .log_logout_failed(format!(
                    "Logout for unknown user id={}",
                    auth_user.user_id
                ))
                .await;
            Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unknown user" })),
            ))
        }
    }
}
