/// Invitation model and database operations
///
/// An invitation ties a one-time token to an email/member-id pair with a
/// fixed expiry window. Invitations are created by an admin, consumed
/// (marked used) on redemption, and otherwise expire.
///
/// At most one active (unused, unexpired) invitation may exist per email
/// or member id. Unused rows are backed by partial unique indexes;
/// expired unused rows are cleaned up before insert so they cannot block
/// a re-invite.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE invitations (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     token VARCHAR(64) NOT NULL UNIQUE,
///     email CITEXT NOT NULL,
///     member_id VARCHAR(64) NOT NULL,
///     used BOOLEAN NOT NULL DEFAULT FALSE,
///     expires_at TIMESTAMPTZ NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A pending or consumed invitation
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Invitation {
    /// Unique invitation ID
    pub id: Uuid,

    /// One-time token delivered to the invitee out-of-band
    ///
    /// Never include this value in an API response.
    pub token: String,

    /// Invited email address
    pub email: String,

    /// Member id the invitee will register under
    pub member_id: String,

    /// Whether the invitation has been redeemed
    pub used: bool,

    /// When the invitation stops being redeemable
    pub expires_at: DateTime<Utc>,

    /// When the invitation was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new invitation
#[derive(Debug, Clone)]
pub struct CreateInvitation {
    /// One-time token (see `auth::invitation::generate_invitation_token`)
    pub token: String,

    /// Invited email address
    pub email: String,

    /// Member id the invitee will register under
    pub member_id: String,

    /// Expiry timestamp
    pub expires_at: DateTime<Utc>,
}

impl Invitation {
    /// Persists a new invitation
    ///
    /// Expired unused invitations for the same email or member id are
    /// removed first so the partial unique indexes only guard genuinely
    /// active rows.
    ///
    /// # Errors
    ///
    /// Returns an error if an active invitation already exists for the
    /// email or member id (unique constraint violation) or the database
    /// connection fails.
    pub async fn create(pool: &PgPool, data: CreateInvitation) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            DELETE FROM invitations
            WHERE used = FALSE
              AND expires_at <= NOW()
              AND (email = $1 OR member_id = $2)
            "#,
        )
        .bind(&data.email)
        .bind(&data.member_id)
        .execute(pool)
        .await?;

        let invitation = sqlx::query_as::<_, Invitation>(
            r#"
            INSERT INTO invitations (token, email, member_id, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, token, email, member_id, used, expires_at, created_at
            "#,
        )
        .bind(data.token)
        .bind(data.email)
        .bind(data.member_id)
        .bind(data.expires_at)
        .fetch_one(pool)
        .await?;

        Ok(invitation)
    }

    /// Finds an invitation by its token
    pub async fn find_by_token(pool: &PgPool, token: &str) -> Result<Option<Self>, sqlx::Error> {
        let invitation = sqlx::query_as::<_, Invitation>(
            r#"
            SELECT id, token, email, member_id, used, expires_at, created_at
            FROM invitations
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(pool)
        .await?;

        Ok(invitation)
    }

    /// Checks whether an active (unused, unexpired) invitation exists for
    /// the given email or member id
    pub async fn active_exists(
        pool: &PgPool,
        email: &str,
        member_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM invitations
                WHERE used = FALSE
                  AND expires_at > NOW()
                  AND (email = $1 OR member_id = $2)
            )
            "#,
        )
        .bind(email)
        .bind(member_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Lists pending (unused, unexpired) invitations, newest first
    pub async fn list_pending(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let invitations = sqlx::query_as::<_, Invitation>(
            r#"
            SELECT id, token, email, member_id, used, expires_at, created_at
            FROM invitations
            WHERE used = FALSE
              AND expires_at > NOW()
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(invitations)
    }

    /// Marks an invitation as used
    ///
    /// # Returns
    ///
    /// True if the invitation existed and was still unused
    pub async fn mark_used(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE invitations
            SET used = TRUE
            WHERE id = $1
              AND used = FALSE
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes an invitation by ID
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM invitations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether the invitation has passed its expiry
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Whether the invitation can still be redeemed
    pub fn is_redeemable(&self) -> bool {
        !self.used && !self.is_expired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn invitation(used: bool, delta: Duration) -> Invitation {
        Invitation {
            id: Uuid::new_v4(),
            token: "t".repeat(32),
            email: "invitee@example.com".to_string(),
            member_id: "M-0002".to_string(),
            used,
            expires_at: Utc::now() + delta,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_redeemable_fresh() {
        let inv = invitation(false, Duration::days(7));
        assert!(!inv.is_expired());
        assert!(inv.is_redeemable());
    }

    #[test]
    fn test_is_redeemable_used() {
        let inv = invitation(true, Duration::days(7));
        assert!(!inv.is_redeemable());
    }

    #[test]
    fn test_is_redeemable_expired() {
        let inv = invitation(false, Duration::seconds(-1));
        assert!(inv.is_expired());
        assert!(!inv.is_redeemable());
    }
}
