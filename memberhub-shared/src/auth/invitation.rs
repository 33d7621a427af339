/// Invitation token utilities
///
/// Invitation tokens are one-time random values that allow an invited
/// email/member-id pair to self-register. Tokens are delivered to the
/// invitee out-of-band and are never included in API responses.
///
/// # Example
///
/// ```
/// use memberhub_shared::auth::invitation::{generate_invitation_token, validate_invitation_token_format};
///
/// let token = generate_invitation_token();
/// assert!(validate_invitation_token_format(&token));
/// ```

use chrono::Duration;

use super::session::generate_random_string;

/// Length of an invitation token (characters)
pub const INVITATION_TOKEN_LENGTH: usize = 32;

/// How long an invitation stays redeemable
pub fn invitation_ttl() -> Duration {
    Duration::days(7)
}

/// Generates a new invitation token
///
/// 32 random base62 characters from the OS CSPRNG, same token space as
/// session tokens (~2^190 combinations).
pub fn generate_invitation_token() -> String {
    generate_random_string(INVITATION_TOKEN_LENGTH)
}

/// Validates invitation token format
///
/// Checks length and that the token is purely alphanumeric. This is a
/// cheap pre-check before the database lookup; it does not prove the
/// token exists.
pub fn validate_invitation_token_format(token: &str) -> bool {
    token.len() == INVITATION_TOKEN_LENGTH && token.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_invitation_token() {
        let token = generate_invitation_token();
        assert_eq!(token.len(), INVITATION_TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(generate_invitation_token(), generate_invitation_token());
    }

    #[test]
    fn test_validate_format() {
        assert!(validate_invitation_token_format(&generate_invitation_token()));
        assert!(!validate_invitation_token_format("too_short"));
        assert!(!validate_invitation_token_format(
            "has-punctuation-in-it-aaaaaaaaaa!"
        ));
    }

    #[test]
    fn test_invitation_ttl_is_seven_days() {
        assert_eq!(invitation_ttl().num_days(), 7);
    }
}
