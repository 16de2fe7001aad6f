//! Authentication utilities library
//!
//! Provides the identity primitives used by the HTTP service:
//! - Password hashing (Argon2id)
//! - Stateless HS256 access tokens (issue and verify)
//!
//! The service defines its own ports and error mapping on top of these types.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::{Authenticator, JwtError};
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(1));
//!
//! let issued = auth.issue_token("user123").unwrap();
//! assert_eq!(auth.verify_token(&issued.access_token).unwrap(), "user123");
//!
//! let later = issued.expires_at;
//! assert_eq!(
//!     auth.verify_token_at(&issued.access_token, later),
//!     Err(JwtError::Expired)
//! );
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::IssuedToken;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
