use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::account::errors::AccountIdError;
use crate::account::errors::AccountTypeError;
use crate::account::errors::EmailError;
use crate::account::errors::PasswordError;
use crate::account::errors::PhoneNumberError;

/// Account aggregate entity.
///
/// A registered user with credential and email-verification state. The raw
/// password never appears here, only its one-way digest.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub password_hash: String,
    pub account_type: AccountType,
    pub email_verified: bool,
    pub verification_token: Option<String>,
    pub token_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID (UUID v4).
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an account ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        Uuid::parse_str(s)
            .map(AccountId)
            .map_err(|e| AccountIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates format using an RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Phone number value type
///
/// Accepts 7-15 digits with an optional leading `+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    const MIN_DIGITS: usize = 7;
    const MAX_DIGITS: usize = 15;

    /// Create a new validated phone number.
    ///
    /// # Errors
    /// * `InvalidFormat` - Contains characters other than digits and a
    ///   leading `+`, or has the wrong number of digits
    pub fn new(phone: String) -> Result<Self, PhoneNumberError> {
        let digits = phone.strip_prefix('+').unwrap_or(&phone);

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(PhoneNumberError::InvalidFormat(phone));
        }

        if digits.len() < Self::MIN_DIGITS || digits.len() > Self::MAX_DIGITS {
            return Err(PhoneNumberError::InvalidLength {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
                actual: digits.len(),
            });
        }

        Ok(Self(phone))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password awaiting hashing.
///
/// Exists only between request parsing and the hashing step in the service;
/// it is never persisted and never serialized.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 6;

    /// Create a new password, enforcing the minimum length policy.
    ///
    /// # Errors
    /// * `TooShort` - Fewer than 6 characters
    pub fn new(password: String) -> Result<Self, PasswordError> {
        if password.len() < Self::MIN_LENGTH {
            return Err(PasswordError::TooShort {
                min: Self::MIN_LENGTH,
                actual: password.len(),
            });
        }
        Ok(Self(password))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep plaintext out of debug output.
impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Kind of account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    Brand,
    Influencer,
    Admin,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Brand => "brand",
            AccountType::Influencer => "influencer",
            AccountType::Admin => "admin",
        }
    }

    /// Whether this type may be chosen through self-service registration.
    /// Admin accounts are only created through the directory endpoint.
    pub fn is_self_registrable(&self) -> bool {
        matches!(self, AccountType::Brand | AccountType::Influencer)
    }
}

impl FromStr for AccountType {
    type Err = AccountTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brand" => Ok(AccountType::Brand),
            "influencer" => Ok(AccountType::Influencer),
            "admin" => Ok(AccountType::Admin),
            other => Err(AccountTypeError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Command to create a new account with validated fields.
///
/// Used by both self-service registration and the directory create
/// operation; only registration issues a verification token.
#[derive(Debug)]
pub struct NewAccountCommand {
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub password: Password,
    pub account_type: AccountType,
}

/// Command to update an existing account with optional validated fields.
///
/// Only provided fields are merged; a provided password is re-hashed before
/// persistence. The verification state is not updatable through this path.
#[derive(Debug, Default)]
pub struct UpdateAccountCommand {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<EmailAddress>,
    pub phone: Option<PhoneNumber>,
    pub password: Option<Password>,
    pub account_type: Option<AccountType>,
}

/// Credentials presented at login: an identifier that may be either the
/// email or the phone number, plus the plaintext password.
#[derive(Debug)]
pub struct LoginCommand {
    pub identifier: String,
    pub password: String,
}
