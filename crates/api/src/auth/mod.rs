//! Authentication primitives.
//!
//! - [`password`] -- Argon2id hashing for passwords, OTP codes, and refresh tokens.
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`otp`] -- one-time-code generation.
//! - [`session`] -- refresh-session issuance, cookie handling, validation.

pub mod jwt;
pub mod otp;
pub mod password;
pub mod session;
