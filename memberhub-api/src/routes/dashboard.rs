/// Dashboard endpoint
///
/// Returns the current user's public fields. The route sits behind the
/// session authentication layer; the handler only echoes the context the
/// middleware resolved.
///
/// # Endpoint
///
/// ```text
/// GET /dashboard
/// Cookie: memberhub_session=<token>
/// ```
///
/// # Response
///
/// ```json
/// {
///   "user": {
///     "id": "uuid",
///     "email": "user@example.com",
///     "name": "Jordan Doe",
///     "member_id": "M-1001",
///     "is_admin": false,
///     "created_at": "2025-08-12T12:00:00Z"
///   }
/// }
/// ```

use crate::error::ApiResult;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use memberhub_shared::auth::middleware::AuthContext;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public view of a user, safe to send to the browser
#[derive(Debug, Serialize, Deserialize)]
pub struct UserProfile {
    /// User ID
    pub id: Uuid,

    /// Email address
    pub email: String,

    /// Display name
    pub name: Option<String>,

    /// External member identifier
    pub member_id: String,

    /// Admin flag
    pub is_admin: bool,

    /// Account creation time
    pub created_at: DateTime<Utc>,
}

impl From<&AuthContext> for UserProfile {
    fn from(auth: &AuthContext) -> Self {
        Self {
            id: auth.user_id,
            email: auth.email.clone(),
            name: auth.name.clone(),
            member_id: auth.member_id.clone(),
            is_admin: auth.is_admin,
            created_at: auth.created_at,
        }
    }
}

/// Dashboard response
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    /// Current user
    pub user: UserProfile,
}

/// Dashboard handler
///
/// # Errors
///
/// - `401 Unauthorized`: No valid session (rejected by the middleware)
pub async fn dashboard(Extension(auth): Extension<AuthContext>) -> ApiResult<Json<DashboardResponse>> {
    Ok(Json(DashboardResponse {
        user: UserProfile::from(&auth),
    }))
}
