use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes per token; hex encoding doubles the length.
const TOKEN_BYTES: usize = 32;

/// Email-verification token issuer.
///
/// Produces opaque single-use tokens with an expiry. Tokens are 32 bytes of
/// OS randomness, hex encoded; consuming and clearing them is the caller's
/// responsibility.
pub struct VerificationTokenIssuer {
    ttl: Duration,
}

/// A freshly issued verification token and its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl VerificationTokenIssuer {
    /// Create an issuer with the default 1-hour time-to-live.
    pub fn new() -> Self {
        Self {
            ttl: Duration::hours(1),
        }
    }

    /// Create an issuer with a custom time-to-live.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Issue a new random token expiring `ttl` from now.
    pub fn issue(&self) -> IssuedToken {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);

        IssuedToken {
            token: hex::encode(bytes),
            expires_at: Utc::now() + self.ttl,
        }
    }

    /// Check whether an expiry timestamp has passed.
    pub fn is_expired(&self, expires_at: DateTime<Utc>) -> bool {
        expires_at < Utc::now()
    }
}

impl Default for VerificationTokenIssuer {
    fn default() -> Self {
        Self::new()
    }
}
