/// Session authentication for Axum middleware layers
///
/// This module validates the session cookie against the database and
/// produces an [`AuthContext`] for request extensions. The API crate
/// wraps [`authenticate_session`] in a middleware layer so protected
/// handlers can extract the context with `Extension<AuthContext>`.
///
/// # Example
///
/// ```no_run
/// use memberhub_shared::auth::middleware::authenticate_session;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) {
/// let auth = authenticate_session(&pool, Some("memberhub_session=abc")).await;
/// # }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::session::{hash_session_token, parse_session_cookie};
use crate::models::{session::Session, user::User};

/// Authentication context added to request extensions
///
/// Carries the current user's public fields; the password hash never
/// enters the context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// User email
    pub email: String,

    /// External member identifier
    pub member_id: String,

    /// Display name
    pub name: Option<String>,

    /// Whether the user may access the admin routes
    pub is_admin: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// Lookup key of the session that authenticated this request
    pub token_hash: String,
}

impl AuthContext {
    /// Builds an auth context from a user row and the session lookup key
    pub fn from_user(user: &User, token_hash: String) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            member_id: user.member_id.clone(),
            name: user.name.clone(),
            is_admin: user.is_admin,
            created_at: user.created_at,
            token_hash,
        }
    }
}

/// Error type for session authentication
#[derive(Debug)]
pub enum AuthError {
    /// No session cookie on the request
    MissingSession,

    /// Session token unknown or already invalidated
    InvalidSession,

    /// Session record exists but has expired
    SessionExpired,

    /// Database error during lookup
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingSession => {
                (StatusCode::UNAUTHORIZED, "Missing session").into_response()
            }
            AuthError::InvalidSession => {
                (StatusCode::UNAUTHORIZED, "Invalid session").into_response()
            }
            AuthError::SessionExpired => {
                (StatusCode::UNAUTHORIZED, "Session expired").into_response()
            }
            AuthError::DatabaseError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Authenticates a request from its Cookie header value
///
/// Steps:
/// 1. Parse the session cookie out of the header
/// 2. Derive the lookup key (SHA-256 of the token)
/// 3. Load the session; reject and delete it when expired
/// 4. Load the owning user
///
/// # Errors
///
/// - `MissingSession`: no cookie header or no session cookie in it
/// - `InvalidSession`: token not found, or owning user gone
/// - `SessionExpired`: session row existed but was past its expiry
/// - `DatabaseError`: lookup failed
pub async fn authenticate_session(
    pool: &PgPool,
    cookie_header: Option<&str>,
) -> Result<AuthContext, AuthError> {
    let token = cookie_header
        .and_then(parse_session_cookie)
        .ok_or(AuthError::MissingSession)?;

    let token_hash = hash_session_token(&token);

    let session = Session::find_by_token_hash(pool, &token_hash)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or(AuthError::InvalidSession)?;

    if session.is_expired() {
        // Stale row; remove it so the table doesn't accumulate garbage
        let _ = Session::delete_by_token_hash(pool, &token_hash).await;
        return Err(AuthError::SessionExpired);
    }

    let user = User::find_by_id(pool, session.user_id)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or(AuthError::InvalidSession)?;

    Ok(AuthContext::from_user(&user, token_hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "member@example.com".to_string(),
            member_id: "M-0001".to_string(),
            name: Some("Member".to_string()),
            password_hash: Some("$argon2id$...".to_string()),
            is_admin: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_auth_context_from_user() {
        let user = sample_user();
        let context = AuthContext::from_user(&user, "h".repeat(64));

        assert_eq!(context.user_id, user.id);
        assert_eq!(context.email, user.email);
        assert_eq!(context.member_id, user.member_id);
        assert!(context.is_admin);
        assert_eq!(context.token_hash.len(), 64);
    }

    #[test]
    fn test_auth_error_into_response() {
        let response = AuthError::MissingSession.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::SessionExpired.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::DatabaseError("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
