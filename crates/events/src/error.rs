//! Error types for event normalization.
//!
//! Rust error handling concepts demonstrated:
//! - thiserror for defining custom error types
//! - Enum variants for different error cases
//! - Automatic `Display` and `Error` trait implementations

use thiserror::Error;

/// Errors raised while normalizing a raw preference event.
///
/// These are always recovered locally: the offending event is dropped and
/// logged at the call site, and the pipeline continues.
///
/// Rust concept: Using an enum for errors lets us handle different cases
/// The `#[derive(Error)]` macro from thiserror automatically implements
/// the `std::error::Error` trait and `Display` based on our `#[error(...)]` attributes
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// A required top-level field was absent or blank
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    /// A nested payload was present but could not be decoded
    #[error("malformed {field} payload: {reason}")]
    MalformedField { field: &'static str, reason: String },
}

/// Convenience type alias for Results in this crate
///
/// Rust concept: Type aliases make code more readable
/// Instead of writing `Result<T, NormalizeError>` everywhere,
/// we can write `Result<T>`
pub type Result<T> = std::result::Result<T, NormalizeError>;
