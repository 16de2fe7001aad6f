use thiserror::Error;

/// Failures of the password hasher itself.
///
/// A password that simply does not match is not an error; `verify` returns `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("Invalid Argon2 parameters: {0}")]
    InvalidParameters(String),

    #[error("Could not hash password: {0}")]
    HashingFailed(String),

    #[error("Stored password hash is unreadable: {0}")]
    VerificationFailed(String),
}
