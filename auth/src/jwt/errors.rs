use thiserror::Error;

/// Error type for JWT operations.
///
/// Verification failures are split into the three reasons callers may want to log;
/// none of them should be shown to an untrusted client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token is expired")]
    Expired,

    #[error("Token signature is invalid")]
    InvalidSignature,
}
