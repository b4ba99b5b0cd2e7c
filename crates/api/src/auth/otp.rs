//! One-time-code generation.

use rand::Rng;

/// Inclusive bounds of the 6-digit code space.
const CODE_MIN: u32 = 100_000;
const CODE_MAX: u32 = 999_999;

/// Generate a uniformly sampled 6-digit numeric code.
///
/// The caller hashes the code before storage and delivers the plaintext
/// out-of-band; this function never persists anything.
pub fn generate_code() -> String {
    let code = rand::rng().random_range(CODE_MIN..=CODE_MAX);
    code.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6, "code must be exactly six digits: {code}");
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            // No leading zero: the range starts at 100000.
            assert_ne!(code.as_bytes()[0], b'0');
        }
    }

    #[test]
    fn test_code_in_range() {
        for _ in 0..100 {
            let code: u32 = generate_code().parse().unwrap();
            assert!((CODE_MIN..=CODE_MAX).contains(&code));
        }
    }
}
