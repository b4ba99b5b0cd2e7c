//! Input validation for registration and login payloads.
//!
//! Each helper returns [`CoreError::Validation`] with a human-readable
//! message so handlers can bubble the error straight to the 400 response.

use validator::ValidateEmail;

use crate::error::CoreError;

/// Minimum display-name length in characters.
pub const NAME_MIN_CHARS: usize = 2;
/// Minimum phone-number length in characters.
pub const PHONE_MIN_CHARS: usize = 6;
/// Minimum password length in characters.
pub const PASSWORD_MIN_CHARS: usize = 6;
/// Minimum accepted OTP code length in characters.
pub const OTP_CODE_MIN_CHARS: usize = 4;
/// Maximum accepted OTP code length in characters.
pub const OTP_CODE_MAX_CHARS: usize = 6;

pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.chars().count() < NAME_MIN_CHARS {
        return Err(CoreError::Validation(format!(
            "Name must be at least {NAME_MIN_CHARS} characters"
        )));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), CoreError> {
    if phone.chars().count() < PHONE_MIN_CHARS {
        return Err(CoreError::Validation(format!(
            "Phone must be at least {PHONE_MIN_CHARS} characters"
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if !email.validate_email() {
        return Err(CoreError::Validation(
            "Email address is not valid".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < PASSWORD_MIN_CHARS {
        return Err(CoreError::Validation(format!(
            "Password must be at least {PASSWORD_MIN_CHARS} characters"
        )));
    }
    Ok(())
}

/// OTP codes are numeric, but the length check alone matches what the
/// verification flow needs -- a wrong-format code simply fails hash
/// verification downstream.
pub fn validate_otp_code(code: &str) -> Result<(), CoreError> {
    let len = code.chars().count();
    if !(OTP_CODE_MIN_CHARS..=OTP_CODE_MAX_CHARS).contains(&len) {
        return Err(CoreError::Validation(format!(
            "Code must be between {OTP_CODE_MIN_CHARS} and {OTP_CODE_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_too_short() {
        assert!(validate_name("A").is_err());
        assert!(validate_name("Ab").is_ok());
    }

    #[test]
    fn test_phone_length() {
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("123456").is_ok());
    }

    #[test]
    fn test_email_format() {
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("ada@example.com").is_ok());
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("longenough").is_ok());
    }

    #[test]
    fn test_otp_code_bounds() {
        assert!(validate_otp_code("123").is_err());
        assert!(validate_otp_code("1234").is_ok());
        assert!(validate_otp_code("123456").is_ok());
        assert!(validate_otp_code("1234567").is_err());
    }

    #[test]
    fn test_validation_error_message_names_the_field() {
        let err = validate_password("x").unwrap_err();
        assert!(err.to_string().contains("Password"));
    }
}
