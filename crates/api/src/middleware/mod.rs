//! Authentication middleware extractors.
//!
//! - [`auth::AuthUser`] -- resolves the caller's identity from a Bearer
//!   access token or, failing that, the session cookie.

pub mod auth;
