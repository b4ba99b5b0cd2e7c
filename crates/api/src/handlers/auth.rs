//! Handlers for the `/api/auth` resource.
//!
//! Two login paths converge on the same session issuance: OTP verification
//! (which also marks the phone verified) and phone+password. Both answer
//! with the sanitized user, a short-lived access token, and the session
//! cookie.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use axum_extra::extract::CookieJar;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use ucarx_core::error::CoreError;
use ucarx_core::validation::{
    validate_email, validate_name, validate_otp_code, validate_password, validate_phone,
};
use ucarx_db::models::otp::{CreateOtpLog, OtpReason};
use ucarx_db::models::user::{CreateUser, UserResponse};
use ucarx_db::repositories::{OtpRepo, SessionRepo, UserRepo};

use crate::auth::jwt;
use crate::auth::otp::generate_code;
use crate::auth::password::{hash_secret, verify_secret};
use crate::auth::session::{
    clear_session_cookie, create_session, parse_session_cookie, verify_session_from_jar,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Delivery channel recorded on issued OTPs. SMS is the only channel wired
/// up today.
const OTP_CHANNEL: &str = "SMS";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// Request body for `POST /api/auth/otp/send`.
#[derive(Debug, Deserialize)]
pub struct OtpSendRequest {
    pub phone: String,
}

/// Request body for `POST /api/auth/otp/verify`.
#[derive(Debug, Deserialize)]
pub struct OtpVerifyRequest {
    pub phone: String,
    pub code: String,
}

/// Response for `POST /api/auth/register`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserResponse,
    /// Plaintext OTP, present only when the preview is enabled (never in
    /// production).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp_preview: Option<String>,
}

/// Response for `POST /api/auth/otp/send`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpSendResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp_preview: Option<String>,
}

/// Successful authentication response returned by otp/verify and login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSuccessResponse {
    pub message: String,
    pub user: UserResponse,
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Response for `POST /api/auth/refresh`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    pub expires_in: i64,
}

/// Response for `POST /api/auth/logout`.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Response for `GET /api/auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
///
/// Create a user and issue a registration OTP. The OTP rate limit does not
/// apply here -- a brand-new user has no way to verify without this first
/// code.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    validate_name(&input.name)?;
    validate_phone(&input.phone)?;
    if let Some(email) = &input.email {
        validate_email(email)?;
    }
    if let Some(password) = &input.password {
        validate_password(password)?;
    }

    let taken =
        UserRepo::exists_with_phone_or_email(&state.pool, &input.phone, input.email.as_deref())
            .await?;
    if taken {
        return Err(AppError::Core(CoreError::Conflict(
            "User with this phone or email already exists".into(),
        )));
    }

    let password_hash = match &input.password {
        Some(password) => Some(
            hash_secret(password)
                .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?,
        ),
        None => None,
    };

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name,
            phone: input.phone,
            email: input.email,
            password_hash,
        },
    )
    .await?;

    let otp_code = issue_otp(&state, user.id, OtpReason::Register).await?;
    tracing::info!(user_id = user.id, "registered new user");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful. Please verify the OTP sent to your phone."
                .to_string(),
            user: user.into(),
            otp_preview: state.config.auth.otp_preview_enabled.then_some(otp_code),
        }),
    ))
}

/// POST /api/auth/otp/send
///
/// Issue a login OTP, subject to the per-user hourly rate limit.
pub async fn otp_send(
    State(state): State<AppState>,
    Json(input): Json<OtpSendRequest>,
) -> AppResult<Json<OtpSendResponse>> {
    validate_phone(&input.phone)?;

    let user = UserRepo::find_by_phone(&state.pool, &input.phone)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound("User not found".into())))?;

    let window_start = Utc::now() - Duration::hours(1);
    let recent = OtpRepo::count_since(&state.pool, user.id, OtpReason::Login, window_start).await?;
    if recent >= state.config.auth.otp_hourly_limit {
        return Err(AppError::Core(CoreError::RateLimited(
            "Too many OTP requests. Please try again later.".into(),
        )));
    }

    let otp_code = issue_otp(&state, user.id, OtpReason::Login).await?;

    Ok(Json(OtpSendResponse {
        message: "OTP sent successfully.".to_string(),
        otp_preview: state.config.auth.otp_preview_enabled.then_some(otp_code),
    }))
}

/// POST /api/auth/otp/verify
///
/// Check the presented code against the latest pending OTP, consume it
/// atomically, and open a session.
pub async fn otp_verify(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(input): Json<OtpVerifyRequest>,
) -> AppResult<(CookieJar, Json<AuthSuccessResponse>)> {
    validate_phone(&input.phone)?;
    validate_otp_code(&input.code)?;

    let user = UserRepo::find_by_phone(&state.pool, &input.phone)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound("User not found".into())))?;

    let otp = OtpRepo::find_latest_pending(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::BadRequest("OTP expired or not found".into()))?;

    let code_matches = verify_secret(&input.code, &otp.code_hash)
        .map_err(|e| AppError::InternalError(format!("OTP verification error: {e}")))?;
    if !code_matches {
        return Err(AppError::BadRequest("Invalid OTP code".into()));
    }

    // Conditional consume: if a concurrent request beat us to this row the
    // update affects nothing and this attempt loses.
    let consumed = OtpRepo::consume_and_stamp_user(&state.pool, otp.id, user.id).await?;
    if !consumed {
        return Err(AppError::BadRequest("OTP expired or not found".into()));
    }

    // Reload to pick up the verification and last-login stamps.
    let user = UserRepo::find_by_id(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::InternalError("User vanished during OTP verification".into()))?;

    let (ip, user_agent) = client_meta(&headers);
    let issued = create_session(&state.pool, &state.config, &user, ip, user_agent).await?;
    tracing::info!(user_id = user.id, "user authenticated via OTP");

    Ok((
        jar.add(issued.cookie),
        Json(AuthSuccessResponse {
            message: "OTP verified successfully.".to_string(),
            user: user.into(),
            access_token: issued.access_token,
            expires_in: issued.expires_in,
        }),
    ))
}

/// POST /api/auth/login
///
/// Phone + password authentication. Bypasses OTP entirely; only available
/// to users who set a password at registration.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(input): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<AuthSuccessResponse>)> {
    validate_phone(&input.phone)?;
    validate_password(&input.password)?;

    let user = UserRepo::find_by_phone(&state.pool, &input.phone).await?;

    // One uniform rejection for unknown phone, password-less account, and
    // wrong password -- don't leak which it was.
    let Some(user) = user else {
        return Err(AppError::BadRequest(
            "Invalid credentials or password login not enabled".into(),
        ));
    };
    let Some(password_hash) = &user.password_hash else {
        return Err(AppError::BadRequest(
            "Invalid credentials or password login not enabled".into(),
        ));
    };

    let password_valid = verify_secret(&input.password, password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::BadRequest("Invalid credentials".into()));
    }

    UserRepo::record_login(&state.pool, user.id).await?;
    let user = UserRepo::find_by_id(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::InternalError("User vanished during login".into()))?;

    let (ip, user_agent) = client_meta(&headers);
    let issued = create_session(&state.pool, &state.config, &user, ip, user_agent).await?;
    tracing::info!(user_id = user.id, "user authenticated via password");

    Ok((
        jar.add(issued.cookie),
        Json(AuthSuccessResponse {
            message: "Login successful.".to_string(),
            user: user.into(),
            access_token: issued.access_token,
            expires_in: issued.expires_in,
        }),
    ))
}

/// POST /api/auth/logout
///
/// Revoke the session named by the request's cookie and clear the cookie.
/// The cookie is cleared even when it names no live session, so a stale
/// client always ends up signed out.
pub async fn logout(
    State(state): State<AppState>,
    _auth: AuthUser,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<LogoutResponse>)> {
    if let Some(cookie) = jar.get(&state.config.auth.cookie_name) {
        if let Some((session_id, _token)) = parse_session_cookie(cookie.value()) {
            SessionRepo::revoke(&state.pool, session_id).await?;
        }
    }

    let jar = jar.remove(clear_session_cookie(&state.config));
    Ok((jar, Json(LogoutResponse { success: true })))
}

/// POST /api/auth/refresh
///
/// Exchange a valid session cookie for a fresh access token. Bearer tokens
/// are deliberately not accepted here, and neither the refresh token nor
/// the session expiry changes.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<Json<RefreshResponse>> {
    let resolved = verify_session_from_jar(&state.pool, &state.config, &jar).await?;
    let Some((_session, user)) = resolved else {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid session".into(),
        )));
    };

    let access_token = jwt::generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(RefreshResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_secs(),
    }))
}

/// GET /api/auth/me
///
/// Return the identity resolved by whichever credential tier succeeded.
pub async fn me(auth: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        user: auth.user.into(),
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate a code, store its hash with the configured expiry, and return
/// the plaintext for out-of-band delivery.
async fn issue_otp(state: &AppState, user_id: i64, reason: OtpReason) -> AppResult<String> {
    let code = generate_code();
    let code_hash = hash_secret(&code)
        .map_err(|e| AppError::InternalError(format!("OTP hashing error: {e}")))?;

    OtpRepo::create(
        &state.pool,
        &CreateOtpLog {
            user_id,
            channel: OTP_CHANNEL.to_string(),
            code_hash,
            expires_at: Utc::now() + Duration::minutes(state.config.auth.otp_ttl_mins),
            reason,
        },
    )
    .await?;

    Ok(code)
}

/// Client metadata captured on session creation: forwarded IP and
/// user-agent, when present.
fn client_meta(headers: &HeaderMap) -> (Option<String>, Option<String>) {
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());
    (ip, user_agent)
}
