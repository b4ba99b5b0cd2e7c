//! Identity extractor for Axum handlers.
//!
//! Resolution runs an ordered chain of credential tiers, each returning
//! `Option` so the next tier can take over:
//!
//! 1. `Authorization: Bearer <jwt>` -- the common stateless path. Any
//!    failure (malformed header, bad signature, expired token, unknown
//!    subject) falls through rather than rejecting, so an expired access
//!    token degrades to tier 2 instead of forcing a client-side refresh
//!    round-trip.
//! 2. Session cookie -- full database-backed validation.
//!
//! Only when no tier yields an identity does the request get a 401. New
//! credential kinds slot in as additional tiers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use ucarx_core::error::CoreError;
use ucarx_db::models::user::User;
use ucarx_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::auth::session::verify_session_from_jar;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller, resolved by whichever credential tier succeeded.
///
/// Carries the full user row; handlers convert to `UserResponse` before
/// anything leaves the service.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = resolve_bearer(parts, state).await? {
            return Ok(AuthUser { user });
        }

        if let Some(user) = resolve_session_cookie(parts, state).await? {
            return Ok(AuthUser { user });
        }

        Err(AppError::Core(CoreError::Unauthorized(
            "Unauthorized".into(),
        )))
    }
}

/// Tier 1: Bearer access token. `Ok(None)` means "not this tier" -- the
/// caller moves on. Only infrastructure failures (database errors) surface
/// as `Err`.
async fn resolve_bearer(parts: &Parts, state: &AppState) -> Result<Option<User>, AppError> {
    let Some(header) = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
    else {
        return Ok(None);
    };
    let Some(token) = header.strip_prefix("Bearer ") else {
        return Ok(None);
    };

    let Ok(claims) = validate_token(token, &state.config.jwt) else {
        return Ok(None);
    };

    // A valid token whose subject no longer exists also falls through.
    Ok(UserRepo::find_by_id(&state.pool, claims.sub).await?)
}

/// Tier 2: session cookie, validated against the store.
async fn resolve_session_cookie(
    parts: &Parts,
    state: &AppState,
) -> Result<Option<User>, AppError> {
    let jar = CookieJar::from_headers(&parts.headers);
    let resolved = verify_session_from_jar(&state.pool, &state.config, &jar).await?;
    Ok(resolved.map(|(_session, user)| user))
}
