//! Authentication utilities library
//!
//! Provides the credential and token infrastructure for the account service:
//! - Password hashing (Argon2id)
//! - JWT session token generation and validation
//! - Email-verification token issuance with expiry
//! - Authentication coordination
//!
//! The service defines its own domain ports and adapts these implementations,
//! keeping credential handling out of the domain and storage layers.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let digest = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &digest).unwrap());
//! assert!(!hasher.verify("other_password", &digest).unwrap());
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{Authenticator, Claims};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! let hash = auth.hash_password("password123").unwrap();
//! let claims = Claims::for_account("account123", "a@b.com".to_string(), 1);
//! let result = auth.authenticate("password123", &hash, &claims).unwrap();
//!
//! let decoded: Claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(decoded.sub.as_deref(), Some("account123"));
//! ```
//!
//! ## Verification Tokens
//! ```
//! use auth::VerificationTokenIssuer;
//!
//! let issuer = VerificationTokenIssuer::new();
//! let issued = issuer.issue();
//! assert_eq!(issued.token.len(), 64); // 32 random bytes, hex encoded
//! assert!(!issuer.is_expired(issued.expires_at));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod verification;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use verification::IssuedToken;
pub use verification::VerificationTokenIssuer;
