/// Authentication utilities for MemberHub
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`session`]: Session token generation, lookup keys, and cookies
/// - [`invitation`]: Invitation token generation
/// - [`middleware`]: Session authentication middleware context
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Session Tokens**: 32 random base62 chars, stored as SHA-256 digests
/// - **Invitation Tokens**: one-time random values with a fixed expiry window
///
/// # Example
///
/// ```no_run
/// use memberhub_shared::auth::password::{hash_password, verify_password};
/// use memberhub_shared::auth::session::{generate_session_token, hash_session_token};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let token = generate_session_token();
/// let lookup_key = hash_session_token(&token);
/// # Ok(())
/// # }
/// ```

pub mod invitation;
pub mod middleware;
pub mod password;
pub mod session;
