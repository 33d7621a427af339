/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Login and logout
/// - `dashboard`: Current-user endpoint
/// - `register`: Invitation redemption
/// - `admin`: User management and invitation issuance

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod register;
