use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT access-token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Session-cookie and OTP policy configuration.
    pub auth: AuthConfig,
}

/// Session-cookie and OTP policy settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name (default: `ucarx.sid`).
    pub cookie_name: String,
    /// Mark the session cookie `Secure`. On in production.
    pub secure_cookies: bool,
    /// Include the plaintext OTP in API responses. A dev convenience that
    /// MUST be off in production -- the code would otherwise leak in-band.
    pub otp_preview_enabled: bool,
    /// Refresh-session lifetime in days (default: `30`).
    pub session_ttl_days: i64,
    /// OTP lifetime in minutes (default: `5`).
    pub otp_ttl_mins: i64,
    /// Maximum send-triggered OTPs per user per rolling hour (default: `5`).
    pub otp_hourly_limit: i64,
}

/// Default session cookie name.
const DEFAULT_COOKIE_NAME: &str = "ucarx.sid";
/// Default refresh-session lifetime in days.
const DEFAULT_SESSION_TTL_DAYS: i64 = 30;
/// Default OTP lifetime in minutes.
const DEFAULT_OTP_TTL_MINS: i64 = 5;
/// Default hourly OTP send limit per user.
const DEFAULT_OTP_HOURLY_LIMIT: i64 = 5;

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SESSION_COOKIE_NAME`  | `ucarx.sid`                |
    /// | `APP_ENV`              | `development`              |
    ///
    /// `APP_ENV=production` turns on secure cookies and disables the OTP
    /// preview. The JWT secret is required; see [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let production = std::env::var("APP_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);

        let cookie_name = std::env::var("SESSION_COOKIE_NAME")
            .unwrap_or_else(|_| DEFAULT_COOKIE_NAME.into());

        let auth = AuthConfig {
            cookie_name,
            secure_cookies: production,
            otp_preview_enabled: !production,
            session_ttl_days: DEFAULT_SESSION_TTL_DAYS,
            otp_ttl_mins: DEFAULT_OTP_TTL_MINS,
            otp_hourly_limit: DEFAULT_OTP_HOURLY_LIMIT,
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            auth,
        }
    }
}
