/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup and cleanup
/// - Test user creation (one admin, one regular member)
/// - Login helper that returns a usable session cookie
///
/// Integration tests need a running PostgreSQL instance and are marked
/// `#[ignore]`; run them with `cargo test -- --ignored`.

use memberhub_api::app::{build_router, AppState};
use memberhub_api::config::Config;
use memberhub_shared::auth::password::hash_password;
use memberhub_shared::models::user::{CreateUser, User};
use sqlx::PgPool;
use uuid::Uuid;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::Service as _;

pub const ADMIN_PASSWORD: &str = "admin-password-1";
pub const MEMBER_PASSWORD: &str = "member-password-1";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub admin: User,
    pub member: User,
}

impl TestContext {
    /// Creates a new test context with a migrated database and two users
    pub async fn new() -> anyhow::Result<Self> {
        // Load test configuration
        let config = Config::from_env()?;

        // Connect to database
        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../migrations").run(&db).await?;

        let suffix = Uuid::new_v4();

        // Create admin user
        let admin = User::create(
            &db,
            CreateUser {
                email: format!("admin-{}@example.com", suffix),
                member_id: format!("ADM-{}", suffix),
                name: Some("Test Admin".to_string()),
                password_hash: Some(hash_password(ADMIN_PASSWORD)?),
                is_admin: true,
            },
        )
        .await?;

        // Create regular member
        let member = User::create(
            &db,
            CreateUser {
                email: format!("member-{}@example.com", suffix),
                member_id: format!("MEM-{}", suffix),
                name: Some("Test Member".to_string()),
                password_hash: Some(hash_password(MEMBER_PASSWORD)?),
                is_admin: false,
            },
        )
        .await?;

        // Build app
        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            admin,
            member,
        })
    }

    /// Logs in with the given credentials and returns the session cookie
    /// in `name=value` form, ready for a `Cookie` header
    pub async fn login(&self, email: &str, password: &str) -> anyhow::Result<String> {
        let request = Request::builder()
            .method("POST")
            .uri("/login")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({
                    "email": email,
                    "password": password,
                })
                .to_string(),
            ))?;

        let response = self.app.clone().call(request).await?;

        if response.status() != StatusCode::OK {
            anyhow::bail!("Login failed with status {}", response.status());
        }

        let set_cookie = response
            .headers()
            .get("set-cookie")
            .ok_or_else(|| anyhow::anyhow!("Login response missing Set-Cookie"))?
            .to_str()?;

        // Keep only the name=value pair; the attributes are for the browser
        let pair = set_cookie
            .split(';')
            .next()
            .ok_or_else(|| anyhow::anyhow!("Malformed Set-Cookie header"))?;

        Ok(pair.to_string())
    }

    /// Logs in as the admin user
    pub async fn admin_cookie(&self) -> anyhow::Result<String> {
        self.login(&self.admin.email, ADMIN_PASSWORD).await
    }

    /// Logs in as the regular member
    pub async fn member_cookie(&self) -> anyhow::Result<String> {
        self.login(&self.member.email, MEMBER_PASSWORD).await
    }

    /// Cleans up test data
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        // Sessions cascade with the users
        User::delete(&self.db, self.admin.id).await?;
        User::delete(&self.db, self.member.id).await?;
        Ok(())
    }
}

/// Reads a JSON response body
pub async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
