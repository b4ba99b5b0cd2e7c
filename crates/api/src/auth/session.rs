//! Refresh-session issuance and validation.
//!
//! A session is an opaque cookie `"{session_id}.{refresh_token}"` backed by
//! a database row holding only the token's Argon2id hash. The cookie is the
//! single place the plaintext refresh token ever exists.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use ucarx_core::types::SessionId;
use ucarx_db::models::session::{CreateSession, Session, SessionStatus};
use ucarx_db::models::user::User;
use ucarx_db::repositories::{SessionRepo, UserRepo};
use ucarx_db::DbPool;
use uuid::Uuid;

use crate::auth::jwt;
use crate::auth::password::{hash_secret, verify_secret};
use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};

/// Everything a login-style handler needs to answer a successful
/// authentication: the signed access token, its lifetime in seconds, and the
/// session cookie to set.
#[derive(Debug)]
pub struct IssuedSession {
    pub access_token: String,
    pub expires_in: i64,
    pub cookie: Cookie<'static>,
}

/// Create a refresh session for `user` and issue an access token.
///
/// Generates a random session id and refresh token, persists only the
/// token's hash together with the client metadata, and builds the session
/// cookie. The refresh token itself leaves this function only inside the
/// cookie value.
pub async fn create_session(
    pool: &DbPool,
    config: &ServerConfig,
    user: &User,
    ip: Option<String>,
    user_agent: Option<String>,
) -> AppResult<IssuedSession> {
    let session_id = Uuid::new_v4();
    let refresh_token = Uuid::new_v4().to_string();
    let refresh_token_hash = hash_secret(&refresh_token)
        .map_err(|e| AppError::InternalError(format!("Refresh token hashing error: {e}")))?;

    let expires_at = Utc::now() + Duration::days(config.auth.session_ttl_days);

    let input = CreateSession {
        id: session_id,
        user_id: user.id,
        refresh_token_hash,
        expires_at,
        ip,
        user_agent,
    };
    SessionRepo::create(pool, &input).await?;

    let cookie = build_session_cookie(
        config,
        format!("{session_id}.{refresh_token}"),
    );

    let access_token = jwt::generate_access_token(user.id, &user.role, &config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(IssuedSession {
        access_token,
        expires_in: config.jwt.access_token_expiry_secs(),
        cookie,
    })
}

/// Build the session cookie: HTTP-only, SameSite=Lax, secure in production,
/// with the session lifetime as max-age.
fn build_session_cookie(config: &ServerConfig, value: String) -> Cookie<'static> {
    Cookie::build((config.auth.cookie_name.clone(), value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.auth.secure_cookies)
        .max_age(time::Duration::days(config.auth.session_ttl_days))
        .build()
}

/// Build a removal cookie matching the session cookie's name and path.
pub fn clear_session_cookie(config: &ServerConfig) -> Cookie<'static> {
    Cookie::build((config.auth.cookie_name.clone(), ""))
        .path("/")
        .build()
}

/// Parse a session cookie value into `(session_id, refresh_token)`.
///
/// The value must split into exactly two non-empty dot-separated parts and
/// the first must be a UUID; anything else is treated as no cookie at all.
pub fn parse_session_cookie(value: &str) -> Option<(SessionId, &str)> {
    let mut parts = value.splitn(3, '.');
    let session_id = parts.next()?;
    let refresh_token = parts.next()?;
    if parts.next().is_some() || session_id.is_empty() || refresh_token.is_empty() {
        return None;
    }
    let session_id = Uuid::parse_str(session_id).ok()?;
    Some((session_id, refresh_token))
}

/// Validate the session cookie in `jar`, returning the session and its user.
///
/// Returns `Ok(None)` for every invalid shape: missing or malformed cookie,
/// unknown session id, revoked or expired session, token mismatch, or a
/// vanished user. Callers turn `None` into their own 401.
pub async fn verify_session_from_jar(
    pool: &DbPool,
    config: &ServerConfig,
    jar: &CookieJar,
) -> AppResult<Option<(Session, User)>> {
    let Some(cookie) = jar.get(&config.auth.cookie_name) else {
        return Ok(None);
    };
    let Some((session_id, refresh_token)) = parse_session_cookie(cookie.value()) else {
        return Ok(None);
    };

    let Some(session) = SessionRepo::find_by_id(pool, session_id).await? else {
        return Ok(None);
    };

    match session.status(Utc::now()) {
        SessionStatus::Active => {}
        SessionStatus::Revoked | SessionStatus::Expired => return Ok(None),
    }

    let token_matches = verify_secret(refresh_token, &session.refresh_token_hash)
        .map_err(|e| AppError::InternalError(format!("Refresh token verification error: {e}")))?;
    if !token_matches {
        return Ok(None);
    }

    let Some(user) = UserRepo::find_by_id(pool, session.user_id).await? else {
        return Ok(None);
    };

    Ok(Some((session, user)))
}
