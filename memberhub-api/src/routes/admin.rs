/// Admin endpoints
///
/// User-account management and invitation issuance. Every handler first
/// checks the admin flag on the session context so a logged-in non-admin
/// receives 403 (the session layer already answered 401 for anonymous
/// callers).
///
/// # Endpoints
///
/// - `GET    /admin/users` - List users and pending invitations
/// - `POST   /admin/users` - Create a user
/// - `PUT    /admin/users` - Update a user (optional password change)
/// - `DELETE /admin/users` - Delete a user by id
/// - `POST   /admin/invitations` - Issue an invitation
///
/// Invitation tokens are delivered out-of-band; no response from these
/// endpoints ever contains a token.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use memberhub_shared::{
    auth::{invitation as invitation_util, middleware::AuthContext, password},
    models::{
        invitation::{CreateInvitation, Invitation},
        session::Session,
        user::{CreateUser, UpdateUser, User},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::dashboard::UserProfile;

/// Rejects non-admin callers with 403
fn require_admin(auth: &AuthContext) -> Result<(), ApiError> {
    if !auth.is_admin {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }
    Ok(())
}

fn profile(user: &User) -> UserProfile {
    UserProfile {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        member_id: user.member_id.clone(),
        is_admin: user.is_admin,
        created_at: user.created_at,
    }
}

/// A pending invitation as shown to admins (token withheld)
#[derive(Debug, Serialize, Deserialize)]
pub struct PendingInvitation {
    /// Invitation ID
    pub id: Uuid,

    /// Invited email
    pub email: String,

    /// Member id the invitee will register under
    pub member_id: String,

    /// When the invitation expires
    pub expires_at: DateTime<Utc>,

    /// When the invitation was created
    pub created_at: DateTime<Utc>,
}

/// List users response
#[derive(Debug, Serialize, Deserialize)]
pub struct ListUsersResponse {
    /// All users, newest first
    pub users: Vec<UserProfile>,

    /// Pending (unused, unexpired) invitations, newest first
    pub invitations: Vec<PendingInvitation>,
}

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// External member identifier
    #[validate(length(min = 1, max = 64, message = "Member id must be 1-64 characters"))]
    pub member_id: String,

    /// Optional display name
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,

    /// Optional initial password; omitting it creates an unactivated
    /// account that cannot log in until a password is set
    pub password: Option<String>,

    /// Admin flag
    #[serde(default)]
    pub is_admin: bool,
}

/// Update user request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// ID of the user to update
    pub id: Uuid,

    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New display name
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,

    /// New password; the stored hash is only replaced when this is present
    pub password: Option<String>,

    /// New admin flag
    pub is_admin: Option<bool>,
}

/// Delete user request
#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    /// ID of the user to delete
    pub id: Uuid,
}

/// Delete user response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    /// Whether the user was deleted
    pub deleted: bool,
}

/// Create invitation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvitationRequest {
    /// Email to invite
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Member id the invitee will register under
    #[validate(length(min = 1, max = 64, message = "Member id must be 1-64 characters"))]
    pub member_id: String,
}

/// Create invitation response
///
/// Carries invitation metadata only; the token itself is delivered to the
/// invitee out-of-band and never appears in a response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateInvitationResponse {
    /// Invitation ID
    pub id: Uuid,

    /// Invited email
    pub email: String,

    /// Member id
    pub member_id: String,

    /// When the invitation expires
    pub expires_at: DateTime<Utc>,
}

/// List users and pending invitations
///
/// # Endpoint
///
/// ```text
/// GET /admin/users
/// Cookie: memberhub_session=<token>
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: No valid session
/// - `403 Forbidden`: Caller is not an admin
/// - `500 Internal Server Error`: Server error
pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ListUsersResponse>> {
    require_admin(&auth)?;

    let users = User::list(&state.db).await?;
    let invitations = Invitation::list_pending(&state.db).await?;

    Ok(Json(ListUsersResponse {
        users: users.iter().map(profile).collect(),
        invitations: invitations
            .into_iter()
            .map(|inv| PendingInvitation {
                id: inv.id,
                email: inv.email,
                member_id: inv.member_id,
                expires_at: inv.expires_at,
                created_at: inv.created_at,
            })
            .collect(),
    }))
}

/// Create a user
///
/// # Endpoint
///
/// ```text
/// POST /admin/users
/// Cookie: memberhub_session=<token>
/// Content-Type: application/json
///
/// {
///   "email": "new@example.com",
///   "member_id": "M-1002",
///   "name": "New Member",
///   "password": "initial-password",
///   "is_admin": false
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Email or member id already exists
/// - `401 Unauthorized`: No valid session
/// - `403 Forbidden`: Caller is not an admin
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Server error
pub async fn create_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<Json<UserProfile>> {
    require_admin(&auth)?;
    req.validate()?;

    let password_hash = match &req.password {
        Some(pw) => {
            password::validate_password_strength(pw).map_err(|e| {
                ApiError::ValidationError(vec![ValidationErrorDetail {
                    field: "password".to_string(),
                    message: e,
                }])
            })?;
            Some(password::hash_password(pw)?)
        }
        None => None,
    };

    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            member_id: req.member_id,
            name: req.name,
            password_hash,
            is_admin: req.is_admin,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, created_by = %auth.user_id, "User created");

    Ok(Json(profile(&user)))
}

/// Update a user
///
/// Only the supplied fields change; the password is rehashed only when a
/// new one is present in the request.
///
/// # Endpoint
///
/// ```text
/// PUT /admin/users
/// Cookie: memberhub_session=<token>
/// Content-Type: application/json
///
/// {
///   "id": "uuid",
///   "email": "renamed@example.com",
///   "name": "Renamed",
///   "is_admin": true
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: New email already belongs to another user
/// - `401 Unauthorized`: No valid session
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: Unknown user id
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Server error
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserProfile>> {
    require_admin(&auth)?;
    req.validate()?;

    let password_hash = match &req.password {
        Some(pw) => {
            password::validate_password_strength(pw).map_err(|e| {
                ApiError::ValidationError(vec![ValidationErrorDetail {
                    field: "password".to_string(),
                    message: e,
                }])
            })?;
            Some(password::hash_password(pw)?)
        }
        None => None,
    };

    let user = User::update(
        &state.db,
        req.id,
        UpdateUser {
            email: req.email,
            name: req.name.map(Some),
            password_hash,
            is_admin: req.is_admin,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %user.id, updated_by = %auth.user_id, "User updated");

    Ok(Json(profile(&user)))
}

/// Delete a user by id
///
/// Removal is unconditional; the user's sessions go with them via the
/// foreign key cascade. Deleting an unknown id answers 404.
///
/// # Endpoint
///
/// ```text
/// DELETE /admin/users
/// Cookie: memberhub_session=<token>
/// Content-Type: application/json
///
/// { "id": "uuid" }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: No valid session
/// - `403 Forbidden`: Caller is not an admin
/// - `404 Not Found`: Unknown user id
/// - `500 Internal Server Error`: Server error
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<DeleteUserRequest>,
) -> ApiResult<Json<DeleteUserResponse>> {
    require_admin(&auth)?;

    // Sessions cascade with the user row, but delete explicitly first so a
    // failed user delete cannot leave live sessions for a half-removed account
    Session::delete_for_user(&state.db, req.id).await?;

    let deleted = User::delete(&state.db, req.id).await?;
    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = %req.id, deleted_by = %auth.user_id, "User deleted");

    Ok(Json(DeleteUserResponse { deleted }))
}

/// Issue an invitation
///
/// Rejects with 400 when the email or member id already belongs to a user
/// or already has an active (unused, unexpired) invitation. On success a
/// token is generated and persisted with a 7-day expiry; the token is
/// logged as ready for out-of-band delivery and is not returned to the
/// caller.
///
/// # Endpoint
///
/// ```text
/// POST /admin/invitations
/// Cookie: memberhub_session=<token>
/// Content-Type: application/json
///
/// {
///   "email": "invitee@example.com",
///   "member_id": "M-1003"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Email/member id taken, or active invitation exists
/// - `401 Unauthorized`: No valid session
/// - `403 Forbidden`: Caller is not an admin
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Server error
pub async fn create_invitation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateInvitationRequest>,
) -> ApiResult<Json<CreateInvitationResponse>> {
    require_admin(&auth)?;
    req.validate()?;

    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::BadRequest(
            "Email already belongs to a user".to_string(),
        ));
    }

    if User::find_by_member_id(&state.db, &req.member_id)
        .await?
        .is_some()
    {
        return Err(ApiError::BadRequest(
            "Member id already belongs to a user".to_string(),
        ));
    }

    if Invitation::active_exists(&state.db, &req.email, &req.member_id).await? {
        return Err(ApiError::BadRequest(
            "An active invitation already exists for this email or member id".to_string(),
        ));
    }

    let token = invitation_util::generate_invitation_token();
    let expires_at = Utc::now() + invitation_util::invitation_ttl();

    let invitation = Invitation::create(
        &state.db,
        CreateInvitation {
            token,
            email: req.email,
            member_id: req.member_id,
            expires_at,
        },
    )
    .await?;

    // The token stays out of the response and out of the logs; delivery to
    // the invitee happens out-of-band
    tracing::info!(
        invitation_id = %invitation.id,
        email = %invitation.email,
        created_by = %auth.user_id,
        "Invitation created, pending out-of-band delivery"
    );

    Ok(Json(CreateInvitationResponse {
        id: invitation.id,
        email: invitation.email,
        member_id: invitation.member_id,
        expires_at: invitation.expires_at,
    }))
}
