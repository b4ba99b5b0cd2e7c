pub mod auth;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register      register (public)
/// /auth/otp/send      send login OTP (public, rate limited)
/// /auth/otp/verify    verify OTP and open a session (public)
/// /auth/login         password login (public)
/// /auth/refresh       mint access token from session cookie (public)
/// /auth/logout        revoke session (requires auth)
/// /auth/me            current identity (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/auth", auth::router())
}
