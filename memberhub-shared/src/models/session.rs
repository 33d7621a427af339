/// Session model and database operations
///
/// A session maps the SHA-256 digest of an opaque browser token to a user
/// id and an expiry. Sessions are created on login and deleted on logout
/// or expiry; they are never otherwise mutated.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sessions (
///     token_hash CHAR(64) PRIMARY KEY,
///     user_id UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
///     expires_at TIMESTAMPTZ NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A server-side login session
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// SHA-256 hex digest of the session token (the cookie carries the
    /// plaintext token, never this value)
    pub token_hash: String,

    /// Owning user
    pub user_id: Uuid,

    /// When the session stops being valid
    pub expires_at: DateTime<Utc>,

    /// When the session was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new session
#[derive(Debug, Clone)]
pub struct CreateSession {
    /// SHA-256 hex digest of the session token
    pub token_hash: String,

    /// Owning user
    pub user_id: Uuid,

    /// Expiry timestamp
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Persists a new session
    ///
    /// # Errors
    ///
    /// Returns an error if the token hash collides with an existing
    /// session or the database connection fails.
    pub async fn create(pool: &PgPool, data: CreateSession) -> Result<Self, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (token_hash, user_id, expires_at)
            VALUES ($1, $2, $3)
            RETURNING token_hash, user_id, expires_at, created_at
            "#,
        )
        .bind(data.token_hash)
        .bind(data.user_id)
        .bind(data.expires_at)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }

    /// Finds a session by its token hash
    ///
    /// Returns the row even if expired; callers decide what to do with a
    /// stale session (the auth middleware deletes it).
    pub async fn find_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT token_hash, user_id, expires_at, created_at
            FROM sessions
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Deletes a session by its token hash
    ///
    /// # Returns
    ///
    /// True if a session was deleted, false if none existed
    pub async fn delete_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes all sessions belonging to a user
    ///
    /// Used when an account is disabled or its password changes.
    pub async fn delete_for_user(pool: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Deletes all expired sessions
    ///
    /// # Returns
    ///
    /// Number of sessions removed
    pub async fn delete_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Whether the session has passed its expiry
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session_expiring_in(delta: Duration) -> Session {
        Session {
            token_hash: "a".repeat(64),
            user_id: Uuid::new_v4(),
            expires_at: Utc::now() + delta,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_expired_future() {
        let session = session_expiring_in(Duration::days(30));
        assert!(!session.is_expired());
    }

    #[test]
    fn test_is_expired_past() {
        let session = session_expiring_in(Duration::seconds(-1));
        assert!(session.is_expired());
    }

    #[test]
    fn test_create_session_struct() {
        let data = CreateSession {
            token_hash: "b".repeat(64),
            user_id: Uuid::new_v4(),
            expires_at: Utc::now() + Duration::days(30),
        };

        assert_eq!(data.token_hash.len(), 64);
    }
}
