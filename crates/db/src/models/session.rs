//! Refresh-session model and DTOs.

use sqlx::FromRow;
use ucarx_core::types::{DbId, SessionId, Timestamp};

/// A refresh-token grant from the `sessions` table.
///
/// The plaintext refresh token never appears here -- only its Argon2id hash.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: SessionId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
}

/// Lifecycle state of a session at a given instant.
///
/// Derived from the row rather than stored, so callers match exhaustively
/// instead of re-checking nullable timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Revoked,
    Expired,
}

impl Session {
    /// Classify this session at time `now`. Revocation wins over expiry.
    pub fn status(&self, now: Timestamp) -> SessionStatus {
        if self.revoked_at.is_some() {
            SessionStatus::Revoked
        } else if now >= self.expires_at {
            SessionStatus::Expired
        } else {
            SessionStatus::Active
        }
    }
}

/// DTO for creating a new session.
#[derive(Debug)]
pub struct CreateSession {
    pub id: SessionId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}
