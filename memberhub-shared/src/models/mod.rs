/// Database models for MemberHub
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: Member accounts with an optional password hash and admin flag
/// - `session`: Server-side login sessions keyed by hashed token
/// - `invitation`: One-time invitation tokens for onboarding
///
/// # Example
///
/// ```no_run
/// use memberhub_shared::models::user::{User, CreateUser};
/// use memberhub_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     email: "user@example.com".to_string(),
///     member_id: "M-1001".to_string(),
///     name: Some("Jordan Doe".to_string()),
///     password_hash: None,
///     is_admin: false,
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod invitation;
pub mod session;
pub mod user;
