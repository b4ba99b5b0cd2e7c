//! One-time-password challenge log model and DTOs.

use sqlx::FromRow;
use ucarx_core::types::{DbId, Timestamp};

/// A single issued OTP from the `otp_logs` table.
///
/// Only the Argon2id hash of the code is stored. `consumed_at` gates single
/// use; rows are never mutated after consumption.
#[derive(Debug, Clone, FromRow)]
pub struct OtpLog {
    pub id: DbId,
    pub user_id: DbId,
    pub channel: String,
    pub code_hash: String,
    pub expires_at: Timestamp,
    pub consumed_at: Option<Timestamp>,
    pub reason: String,
    pub created_at: Timestamp,
}

/// Why an OTP was issued. Stored as text in the `reason` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpReason {
    Register,
    Login,
}

impl OtpReason {
    pub fn as_str(self) -> &'static str {
        match self {
            OtpReason::Register => "register",
            OtpReason::Login => "login",
        }
    }
}

/// DTO for inserting a new OTP log row.
#[derive(Debug)]
pub struct CreateOtpLog {
    pub user_id: DbId,
    pub channel: String,
    pub code_hash: String,
    pub expires_at: Timestamp,
    pub reason: OtpReason,
}
