//! Shared domain types, errors, and input validation for the UCarX auth service.

pub mod error;
pub mod types;
pub mod validation;
