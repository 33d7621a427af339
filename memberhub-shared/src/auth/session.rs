/// Session token and cookie utilities
///
/// This module provides generation of opaque session tokens, derivation of
/// their database lookup keys, and construction of the session cookie.
///
/// # Security
///
/// - **Token**: 32 random base62 chars (~2^190 combinations), generated
///   from the OS CSPRNG
/// - **Storage**: only the SHA-256 hex digest of the token is persisted;
///   the plaintext token lives in the client cookie alone
/// - **Cookie**: `HttpOnly`, `SameSite=Lax`, `Path=/`, Max-Age matching
///   the session expiry
///
/// # Example
///
/// ```
/// use memberhub_shared::auth::session::{generate_session_token, hash_session_token};
///
/// let token = generate_session_token();
/// assert_eq!(token.len(), 32);
///
/// // Deterministic lookup key for the database
/// let key = hash_session_token(&token);
/// assert_eq!(key.len(), 64);
/// assert_eq!(key, hash_session_token(&token));
/// ```

use chrono::Duration;
use cookie::{Cookie, SameSite};
use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of a session token (characters)
pub const SESSION_TOKEN_LENGTH: usize = 32;

/// Name of the session cookie
pub const SESSION_COOKIE_NAME: &str = "memberhub_session";

/// How long a session (and its cookie) lives
pub fn session_ttl() -> Duration {
    Duration::days(30)
}

/// Generates a new opaque session token
///
/// The token is 32 base62 characters drawn from the OS CSPRNG. It is
/// returned to the caller for cookie placement and must never be stored
/// server-side; store [`hash_session_token`] of it instead.
pub fn generate_session_token() -> String {
    generate_random_string(SESSION_TOKEN_LENGTH)
}

/// Generates a random alphanumeric string
///
/// Uses base62 encoding (A-Z, a-z, 0-9) for URL- and cookie-safe tokens.
pub(crate) fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Derives the database lookup key for a session token
///
/// # Returns
///
/// Hex-encoded SHA-256 digest (64 characters)
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Builds the session cookie carrying the plaintext token
///
/// The Max-Age matches the server-side session expiry so the browser
/// drops the cookie when the session record becomes invalid.
pub fn build_session_cookie(token: &str, max_age: Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(cookie::time::Duration::seconds(max_age.num_seconds()))
        .path("/")
        .build()
}

/// Builds a cookie that clears the session (for logout)
pub fn build_clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(cookie::time::Duration::seconds(0))
        .path("/")
        .build()
}

/// Parses the session token out of a Cookie request header
///
/// Returns `None` if the header carries no session cookie.
pub fn parse_session_cookie(cookie_header: &str) -> Option<String> {
    cookie_header
        .split(';')
        .filter_map(|pair| Cookie::parse(pair.trim()).ok())
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_session_token_length_and_charset() {
        let token = generate_session_token();
        assert_eq!(token.len(), SESSION_TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_session_token_unique() {
        let a = generate_session_token();
        let b = generate_session_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_session_token_deterministic() {
        let token = "abcdefghijklmnopqrstuvwxyz123456";
        let hash1 = hash_session_token(token);
        let hash2 = hash_session_token(token);

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
        assert!(hash1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_session_token_differs_per_token() {
        assert_ne!(hash_session_token("token-a"), hash_session_token("token-b"));
    }

    #[test]
    fn test_build_session_cookie() {
        let cookie = build_session_cookie("test_token", session_ttl());

        assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
        assert_eq!(cookie.value(), "test_token");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(
            cookie.max_age(),
            Some(cookie::time::Duration::seconds(session_ttl().num_seconds()))
        );
    }

    #[test]
    fn test_build_clear_session_cookie() {
        let cookie = build_clear_session_cookie();
        assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(cookie::time::Duration::seconds(0)));
    }

    #[test]
    fn test_parse_session_cookie() {
        let header = "memberhub_session=abc123; Path=/; HttpOnly";
        assert_eq!(parse_session_cookie(header), Some("abc123".to_string()));
    }

    #[test]
    fn test_parse_session_cookie_multiple() {
        let header = "other=value; memberhub_session=abc123; another=test";
        assert_eq!(parse_session_cookie(header), Some("abc123".to_string()));
    }

    #[test]
    fn test_parse_session_cookie_missing() {
        let header = "other=value; another=test";
        assert_eq!(parse_session_cookie(header), None);
    }
}
