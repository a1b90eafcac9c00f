use thiserror::Error;

/// Error for AccountId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for PhoneNumber validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PhoneNumberError {
    #[error("Invalid phone number: {0}")]
    InvalidFormat(String),

    #[error("Phone number must have between {min} and {max} digits, got {actual}")]
    InvalidLength {
        min: usize,
        max: usize,
        actual: usize,
    },
}

/// Error for password policy violations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password must be at least {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Error for AccountType parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountTypeError {
    #[error("Invalid account type: {0}")]
    Unknown(String),
}

/// Error for outbound mail delivery
#[derive(Debug, Clone, Error)]
pub enum MailerError {
    #[error("Invalid mail address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build mail message: {0}")]
    BuildFailed(String),

    #[error("Mail transport failed: {0}")]
    TransportFailed(String),
}

/// Top-level error for all account operations
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    // Value object validation errors (converted via #[from])
    #[error("Invalid account ID: {0}")]
    InvalidAccountId(#[from] AccountIdError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid phone number: {0}")]
    InvalidPhoneNumber(#[from] PhoneNumberError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordError),

    #[error("Invalid account type: {0}")]
    InvalidAccountType(#[from] AccountTypeError),

    // Domain-level errors
    #[error("Account not found: {0}")]
    NotFound(String),

    #[error("Email is already registered: {0}")]
    EmailAlreadyExists(String),

    #[error("Phone number is already registered: {0}")]
    PhoneAlreadyExists(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email address has not been verified")]
    EmailNotVerified,

    #[error("Invalid or expired verification token")]
    InvalidVerificationToken,

    #[error("Verification token has expired")]
    VerificationTokenExpired,

    // Infrastructure errors
    #[error("Failed to send verification email: {0}")]
    MailDelivery(#[from] MailerError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        AccountError::Unknown(err.to_string())
    }
}
