/// Authentication endpoints
///
/// This module provides the session login/logout endpoints:
///
/// - `POST /login` - Verify credentials and issue a session cookie
/// - `GET /logout` - Delete the session and clear the cookie
///
/// Login distinguishes two failure modes: an unknown email or an account
/// that has never been activated (no password hash) answers 404, while a
/// wrong password for an activated account answers 401. An unset account
/// must never authenticate.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use memberhub_shared::{
    auth::{password, session},
    models::session::{CreateSession, Session},
    models::user::User,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Status message
    pub message: String,
}

/// Login endpoint
///
/// Verifies the submitted credentials and, on success, issues a session:
/// a random token is generated, its SHA-256 digest is persisted with the
/// user id and a 30-day expiry, and the plaintext token is set in an
/// HttpOnly cookie whose Max-Age matches the session expiry.
///
/// # Endpoint
///
/// ```text
/// POST /login
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "hunter2hunter2"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Wrong password
/// - `404 Not Found`: Unknown email, or account never activated
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Response> {
    req.validate()?;

    // An unactivated account (no password hash) is treated exactly like an
    // unknown email so it cannot be probed or logged into.
    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .filter(|u| u.is_activated())
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let valid = match user.password_hash.as_deref() {
        Some(hash) => password::verify_password(&req.password, hash)?,
        None => false,
    };
    if !valid {
        return Err(ApiError::Unauthorized("Invalid password".to_string()));
    }

    let token = session::generate_session_token();
    let expires_at = Utc::now() + session::session_ttl();

    Session::create(
        &state.db,
        CreateSession {
            token_hash: session::hash_session_token(&token),
            user_id: user.id,
            expires_at,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User logged in");

    let cookie = session::build_session_cookie(&token, session::session_ttl());

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie.to_string())],
        Json(LoginResponse {
            message: "Login successful".to_string(),
        }),
    )
        .into_response())
}

/// Logout endpoint
///
/// Deletes the session record referenced by the cookie (if any) and
/// clears the cookie. Logout without an active session is a safe no-op;
/// the redirect and cookie clearing happen either way.
///
/// # Endpoint
///
/// ```text
/// GET /logout
/// ```
///
/// # Response
///
/// `302 Found` redirect to `/` with an expired session cookie.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    let token = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(session::parse_session_cookie);

    if let Some(token) = token {
        let token_hash = session::hash_session_token(&token);
        let deleted = Session::delete_by_token_hash(&state.db, &token_hash).await?;
        if deleted {
            tracing::info!("Session invalidated on logout");
        }
    }

    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, "/".to_string()),
            (
                header::SET_COOKIE,
                session::build_clear_session_cookie().to_string(),
            ),
        ],
    )
        .into_response())
}
