use async_trait::async_trait;

use crate::account::errors::AccountError;
use crate::account::errors::MailerError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::EmailAddress;
use crate::account::models::LoginCommand;
use crate::account::models::NewAccountCommand;
use crate::account::models::PhoneNumber;
use crate::account::models::UpdateAccountCommand;

/// Port for account lifecycle and directory operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account and dispatch its verification email.
    ///
    /// The account is created unverified with a fresh single-use
    /// verification token expiring one hour after issuance.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` / `PhoneAlreadyExists` - Duplicate unique field
    /// * `MailDelivery` - Verification email could not be sent (the account
    ///   itself is persisted)
    /// * `DatabaseError` - Persistence failed
    async fn register(&self, command: NewAccountCommand) -> Result<Account, AccountError>;

    /// Consume a verification token and mark the account verified.
    ///
    /// On success the token and its expiry are cleared so the token can
    /// never be presented again.
    ///
    /// # Errors
    /// * `InvalidVerificationToken` - No account holds this token
    /// * `VerificationTokenExpired` - Token found but its expiry has passed
    /// * `DatabaseError` - Persistence failed
    async fn confirm_email(&self, token: &str) -> Result<Account, AccountError>;

    /// Authenticate by email or phone number plus password.
    ///
    /// Returns the account on success; the caller issues the session token.
    ///
    /// # Errors
    /// * `NotFound` - No account matches the identifier
    /// * `InvalidCredentials` - Password does not match
    /// * `EmailNotVerified` - Credential is correct but the email is not
    ///   yet confirmed
    async fn login(&self, command: LoginCommand) -> Result<Account, AccountError>;

    /// Create an account directly, without the verification flow.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` / `PhoneAlreadyExists` - Duplicate unique field
    /// * `DatabaseError` - Persistence failed
    async fn create_account(&self, command: NewAccountCommand) -> Result<Account, AccountError>;

    /// Retrieve all accounts.
    async fn list_accounts(&self) -> Result<Vec<Account>, AccountError>;

    /// Retrieve an account by identifier.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    async fn get_account(&self, id: &AccountId) -> Result<Account, AccountError>;

    /// Merge the provided fields into an existing account.
    ///
    /// A provided password is re-hashed; all other fields are stored as
    /// given.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `EmailAlreadyExists` / `PhoneAlreadyExists` - New value collides
    async fn update_account(
        &self,
        id: &AccountId,
        command: UpdateAccountCommand,
    ) -> Result<Account, AccountError>;

    /// Delete an existing account.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    async fn delete_account(&self, id: &AccountId) -> Result<(), AccountError>;
}

/// Persistence operations for the account aggregate.
///
/// The store enforces email and phone uniqueness through unique indexes;
/// `create` and `update` surface violations as the matching domain errors.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist a new account.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` / `PhoneAlreadyExists` - Unique index violation
    /// * `DatabaseError` - Operation failed
    async fn create(&self, account: Account) -> Result<Account, AccountError>;

    /// Retrieve an account by identifier (None if not found).
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError>;

    /// Retrieve an account by email address (None if not found).
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError>;

    /// Retrieve an account by phone number (None if not found).
    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<Account>, AccountError>;

    /// Retrieve an account whose email or phone equals the identifier.
    async fn find_by_identifier(&self, identifier: &str)
        -> Result<Option<Account>, AccountError>;

    /// Retrieve the account currently holding a verification token.
    async fn find_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<Account>, AccountError>;

    /// Retrieve all accounts.
    async fn list_all(&self) -> Result<Vec<Account>, AccountError>;

    /// Store the full state of an existing account.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `EmailAlreadyExists` / `PhoneAlreadyExists` - Unique index violation
    async fn update(&self, account: Account) -> Result<Account, AccountError>;

    /// Remove an account.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    async fn delete(&self, id: &AccountId) -> Result<(), AccountError>;
}

/// Outbound mail dispatch.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Send the verification email containing a link embedding the token.
    ///
    /// # Errors
    /// * `MailerError` - Message could not be built or the transport failed
    async fn send_verification_email(
        &self,
        to: &EmailAddress,
        first_name: &str,
        token: &str,
    ) -> Result<(), MailerError>;
}
