/// Registration endpoint
///
/// Redeems an invitation token: the caller proves possession of a token an
/// admin issued, chooses a password, and receives an activated account plus
/// a logged-in session in one step.
///
/// Every failure mode (malformed token, unknown token, already used,
/// expired) answers the same 400 so tokens cannot be probed.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use memberhub_shared::{
    auth::{invitation as invitation_util, password, session},
    models::{
        invitation::Invitation,
        session::{CreateSession, Session},
        user::{CreateUser, User},
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Invitation token
    pub token: String,

    /// Optional display name
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,

    /// Chosen password
    pub password: String,
}

/// Registration response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Status message
    pub message: String,
}

/// Registration handler
///
/// Looks up the invitation, creates the account with the invited email and
/// member id, marks the invitation used, and issues a session cookie so the
/// new user lands on the dashboard already logged in.
///
/// # Endpoint
///
/// ```text
/// POST /register
/// Content-Type: application/json
///
/// {
///   "token": "<invitation token>",
///   "name": "New Member",
///   "password": "chosen-password"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Invalid, unknown, used, or expired token
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Response> {
    req.validate()?;

    if !invitation_util::validate_invitation_token_format(&req.token) {
        return Err(ApiError::BadRequest(
            "Invalid or expired invitation".to_string(),
        ));
    }

    let invitation = Invitation::find_by_token(&state.db, &req.token)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Invalid or expired invitation".to_string()))?;

    if !invitation.is_redeemable() {
        return Err(ApiError::BadRequest(
            "Invalid or expired invitation".to_string(),
        ));
    }

    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;
    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email: invitation.email.clone(),
            member_id: invitation.member_id.clone(),
            name: req.name,
            password_hash: Some(password_hash),
            is_admin: false,
        },
    )
    .await?;

    // A lost race here (token redeemed between the lookup and this update)
    // leaves a user row without consuming the invitation, which the unique
    // indexes already prevent: the insert above would have failed first.
    Invitation::mark_used(&state.db, invitation.id).await?;

    tracing::info!(user_id = %user.id, invitation_id = %invitation.id, "Invitation redeemed");

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

    let cookie = session::build_session_cookie(&token, session::session_ttl());

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie.to_string())],
        Json(RegisterResponse {
            message: "Registration successful".to_string(),
        }),
    )
        .into_response())
}
