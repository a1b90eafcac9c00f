use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::LoginCommand;
use crate::account::models::NewAccountCommand;
use crate::account::models::UpdateAccountCommand;
use crate::account::ports::AccountRepository;
use crate::account::ports::AccountServicePort;
use crate::account::ports::Mailer;

/// Domain service implementation for account lifecycle and directory
/// operations.
///
/// Hashing and verification-token issuance are explicit steps here, never
/// hidden in the storage layer.
pub struct AccountService<AR, MN>
where
    AR: AccountRepository,
    MN: Mailer,
{
    repository: Arc<AR>,
    mailer: Arc<MN>,
    password_hasher: auth::PasswordHasher,
    token_issuer: auth::VerificationTokenIssuer,
}

impl<AR, MN> AccountService<AR, MN>
where
    AR: AccountRepository,
    MN: Mailer,
{
    /// Create a new account service with injected dependencies.
    pub fn new(repository: Arc<AR>, mailer: Arc<MN>) -> Self {
        Self {
            repository,
            mailer,
            password_hasher: auth::PasswordHasher::new(),
            token_issuer: auth::VerificationTokenIssuer::new(),
        }
    }

    /// Reject the command when its email or phone is already registered.
    ///
    /// The unique indexes remain the authority under concurrent inserts;
    /// this check exists to give callers the precise conflict error.
    async fn ensure_unique(&self, command: &NewAccountCommand) -> Result<(), AccountError> {
        if let Some(existing) = self.repository.find_by_email(&command.email).await? {
            return Err(AccountError::EmailAlreadyExists(
                existing.email.as_str().to_string(),
            ));
        }

        if let Some(existing) = self.repository.find_by_phone(&command.phone).await? {
            return Err(AccountError::PhoneAlreadyExists(
                existing.phone.as_str().to_string(),
            ));
        }

        Ok(())
    }

    fn hash_password(&self, plaintext: &str) -> Result<String, AccountError> {
        self.password_hasher
            .hash(plaintext)
            .map_err(|e| AccountError::Unknown(format!("Password hashing failed: {}", e)))
    }
}

#[async_trait]
impl<AR, MN> AccountServicePort for AccountService<AR, MN>
where
    AR: AccountRepository,
    MN: Mailer,
{
    async fn register(&self, command: NewAccountCommand) -> Result<Account, AccountError> {
        self.ensure_unique(&command).await?;

        let password_hash = self.hash_password(command.password.as_str())?;
        let issued = self.token_issuer.issue();

        let account = Account {
            id: AccountId::new(),
            first_name: command.first_name,
            last_name: command.last_name,
            email: command.email,
            phone: command.phone,
            password_hash,
            account_type: command.account_type,
            email_verified: false,
            verification_token: Some(issued.token.clone()),
            token_expiry: Some(issued.expires_at),
            created_at: Utc::now(),
        };

        let created = self.repository.create(account).await?;

        tracing::info!(
            account_id = %created.id,
            email = %created.email,
            "Account registered, dispatching verification email"
        );

        // The account is already persisted; a delivery failure surfaces as
        // a distinct error without rolling back.
        self.mailer
            .send_verification_email(&created.email, &created.first_name, &issued.token)
            .await?;

        Ok(created)
    }

    async fn confirm_email(&self, token: &str) -> Result<Account, AccountError> {
        let mut account = self
            .repository
            .find_by_verification_token(token)
            .await?
            .ok_or(AccountError::InvalidVerificationToken)?;

        let expiry = account
            .token_expiry
            .ok_or(AccountError::InvalidVerificationToken)?;

        if self.token_issuer.is_expired(expiry) {
            // Clear the expired token so the same string can never be
            // presented again.
            account.verification_token = None;
            account.token_expiry = None;
            self.repository.update(account).await?;
            return Err(AccountError::VerificationTokenExpired);
        }

        account.email_verified = true;
        account.verification_token = None;
        account.token_expiry = None;

        let updated = self.repository.update(account).await?;

        tracing::info!(account_id = %updated.id, "Email verified");

        Ok(updated)
    }

    async fn login(&self, command: LoginCommand) -> Result<Account, AccountError> {
        let account = self
            .repository
            .find_by_identifier(&command.identifier)
            .await?
            .ok_or_else(|| AccountError::NotFound(command.identifier.clone()))?;

        let matches = self
            .password_hasher
            .verify(&command.password, &account.password_hash)
            .map_err(|e| AccountError::Unknown(format!("Password verification failed: {}", e)))?;

        if !matches {
            return Err(AccountError::InvalidCredentials);
        }

        if !account.email_verified {
            return Err(AccountError::EmailNotVerified);
        }

        Ok(account)
    }

    async fn create_account(&self, command: NewAccountCommand) -> Result<Account, AccountError> {
        self.ensure_unique(&command).await?;

        let password_hash = self.hash_password(command.password.as_str())?;

        let account = Account {
            id: AccountId::new(),
            first_name: command.first_name,
            last_name: command.last_name,
            email: command.email,
            phone: command.phone,
            password_hash,
            account_type: command.account_type,
            email_verified: false,
            verification_token: None,
            token_expiry: None,
            created_at: Utc::now(),
        };

        self.repository.create(account).await
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, AccountError> {
        self.repository.list_all().await
    }

    async fn get_account(&self, id: &AccountId) -> Result<Account, AccountError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id.to_string()))
    }

    async fn update_account(
        &self,
        id: &AccountId,
        command: UpdateAccountCommand,
    ) -> Result<Account, AccountError> {
        let mut account = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id.to_string()))?;

        if let Some(first_name) = command.first_name {
            account.first_name = first_name;
        }

        if let Some(last_name) = command.last_name {
            account.last_name = last_name;
        }

        if let Some(email) = command.email {
            account.email = email;
        }

        if let Some(phone) = command.phone {
            account.phone = phone;
        }

        if let Some(password) = command.password {
            account.password_hash = self.hash_password(password.as_str())?;
        }

        if let Some(account_type) = command.account_type {
            account.account_type = account_type;
        }

        self.repository.update(account).await
    }

    async fn delete_account(&self, id: &AccountId) -> Result<(), AccountError> {
        self.repository.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::account::errors::MailerError;
    use crate::account::models::AccountType;
    use crate::account::models::EmailAddress;
    use crate::account::models::Password;
    use crate::account::models::PhoneNumber;
    use crate::account::ports::Mailer;

    mock! {
        pub TestAccountRepository {}

        #[async_trait]
        impl AccountRepository for TestAccountRepository {
            async fn create(&self, account: Account) -> Result<Account, AccountError>;
            async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError>;
            async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<Account>, AccountError>;
            async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Account>, AccountError>;
            async fn find_by_verification_token(&self, token: &str) -> Result<Option<Account>, AccountError>;
            async fn list_all(&self) -> Result<Vec<Account>, AccountError>;
            async fn update(&self, account: Account) -> Result<Account, AccountError>;
            async fn delete(&self, id: &AccountId) -> Result<(), AccountError>;
        }
    }

    mock! {
        pub TestMailer {}

        #[async_trait]
        impl Mailer for TestMailer {
            async fn send_verification_email(
                &self,
                to: &EmailAddress,
                first_name: &str,
                token: &str,
            ) -> Result<(), MailerError>;
        }
    }

    fn new_account_command() -> NewAccountCommand {
        NewAccountCommand {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: EmailAddress::new("ada@example.com".to_string()).unwrap(),
            phone: PhoneNumber::new("5551234567".to_string()).unwrap(),
            password: Password::new("secret1".to_string()).unwrap(),
            account_type: AccountType::Influencer,
        }
    }

    fn stored_account(password_hash: &str, verified: bool) -> Account {
        Account {
            id: AccountId::new(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: EmailAddress::new("ada@example.com".to_string()).unwrap(),
            phone: PhoneNumber::new("5551234567".to_string()).unwrap(),
            password_hash: password_hash.to_string(),
            account_type: AccountType::Influencer,
            email_verified: verified,
            verification_token: None,
            token_expiry: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password_and_issues_token() {
        let mut repository = MockTestAccountRepository::new();
        let mut mailer = MockTestMailer::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_find_by_phone()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .withf(|account| {
                account.password_hash.starts_with("$argon2")
                    && account.password_hash != "secret1"
                    && !account.email_verified
                    && account.verification_token.as_ref().map(String::len) == Some(64)
                    && account.token_expiry.is_some()
            })
            .times(1)
            .returning(|account| Ok(account));

        mailer
            .expect_send_verification_email()
            .withf(|to, first_name, token| {
                to.as_str() == "ada@example.com" && first_name == "Ada" && token.len() == 64
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = AccountService::new(Arc::new(repository), Arc::new(mailer));

        let account = service.register(new_account_command()).await.unwrap();
        assert!(!account.email_verified);
        assert!(account.verification_token.is_some());
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut repository = MockTestAccountRepository::new();
        let mut mailer = MockTestMailer::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(stored_account("$argon2id$x", true))));
        repository.expect_create().times(0);
        mailer.expect_send_verification_email().times(0);

        let service = AccountService::new(Arc::new(repository), Arc::new(mailer));

        let result = service.register(new_account_command()).await;
        assert!(matches!(
            result.unwrap_err(),
            AccountError::EmailAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_register_duplicate_phone() {
        let mut repository = MockTestAccountRepository::new();
        let mut mailer = MockTestMailer::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_find_by_phone()
            .times(1)
            .returning(|_| Ok(Some(stored_account("$argon2id$x", true))));
        repository.expect_create().times(0);
        mailer.expect_send_verification_email().times(0);

        let service = AccountService::new(Arc::new(repository), Arc::new(mailer));

        let result = service.register(new_account_command()).await;
        assert!(matches!(
            result.unwrap_err(),
            AccountError::PhoneAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_register_mail_failure_is_distinct_and_account_persists() {
        let mut repository = MockTestAccountRepository::new();
        let mut mailer = MockTestMailer::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_find_by_phone()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .times(1)
            .returning(|account| Ok(account));

        mailer
            .expect_send_verification_email()
            .times(1)
            .returning(|_, _, _| Err(MailerError::TransportFailed("connection refused".into())));

        let service = AccountService::new(Arc::new(repository), Arc::new(mailer));

        let result = service.register(new_account_command()).await;
        assert!(matches!(result.unwrap_err(), AccountError::MailDelivery(_)));
    }

    #[tokio::test]
    async fn test_confirm_email_success_clears_token() {
        let mut repository = MockTestAccountRepository::new();
        let mailer = MockTestMailer::new();

        let mut account = stored_account("$argon2id$x", false);
        account.verification_token = Some("a".repeat(64));
        account.token_expiry = Some(Utc::now() + Duration::minutes(30));

        let found = account.clone();
        repository
            .expect_find_by_verification_token()
            .with(eq("a".repeat(64)))
            .times(1)
            .returning(move |_| Ok(Some(found.clone())));

        repository
            .expect_update()
            .withf(|account| {
                account.email_verified
                    && account.verification_token.is_none()
                    && account.token_expiry.is_none()
            })
            .times(1)
            .returning(|account| Ok(account));

        let service = AccountService::new(Arc::new(repository), Arc::new(mailer));

        let updated = service.confirm_email(&"a".repeat(64)).await.unwrap();
        assert!(updated.email_verified);
        assert!(updated.verification_token.is_none());
    }

    #[tokio::test]
    async fn test_confirm_email_unknown_token() {
        let mut repository = MockTestAccountRepository::new();
        let mailer = MockTestMailer::new();

        repository
            .expect_find_by_verification_token()
            .times(1)
            .returning(|_| Ok(None));

        let service = AccountService::new(Arc::new(repository), Arc::new(mailer));

        let result = service.confirm_email("deadbeef").await;
        assert!(matches!(
            result.unwrap_err(),
            AccountError::InvalidVerificationToken
        ));
    }

    #[tokio::test]
    async fn test_confirm_email_expired_token_is_cleared() {
        let mut repository = MockTestAccountRepository::new();
        let mailer = MockTestMailer::new();

        let mut account = stored_account("$argon2id$x", false);
        account.verification_token = Some("b".repeat(64));
        account.token_expiry = Some(Utc::now() - Duration::minutes(1));

        let found = account.clone();
        repository
            .expect_find_by_verification_token()
            .times(1)
            .returning(move |_| Ok(Some(found.clone())));

        // The expired token must be cleared without marking the email
        // verified.
        repository
            .expect_update()
            .withf(|account| {
                !account.email_verified
                    && account.verification_token.is_none()
                    && account.token_expiry.is_none()
            })
            .times(1)
            .returning(|account| Ok(account));

        let service = AccountService::new(Arc::new(repository), Arc::new(mailer));

        let result = service.confirm_email(&"b".repeat(64)).await;
        assert!(matches!(
            result.unwrap_err(),
            AccountError::VerificationTokenExpired
        ));
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut repository = MockTestAccountRepository::new();
        let mailer = MockTestMailer::new();

        let hash = auth::PasswordHasher::new().hash("secret1").unwrap();
        let account = stored_account(&hash, true);
        let account_id = account.id;

        repository
            .expect_find_by_identifier()
            .with(eq("ada@example.com"))
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        let service = AccountService::new(Arc::new(repository), Arc::new(mailer));

        let logged_in = service
            .login(LoginCommand {
                identifier: "ada@example.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(logged_in.id, account_id);
    }

    #[tokio::test]
    async fn test_login_unknown_identifier() {
        let mut repository = MockTestAccountRepository::new();
        let mailer = MockTestMailer::new();

        repository
            .expect_find_by_identifier()
            .times(1)
            .returning(|_| Ok(None));

        let service = AccountService::new(Arc::new(repository), Arc::new(mailer));

        let result = service
            .login(LoginCommand {
                identifier: "nobody@example.com".to_string(),
                password: "secret1".to_string(),
            })
            .await;

        assert!(matches!(result.unwrap_err(), AccountError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut repository = MockTestAccountRepository::new();
        let mailer = MockTestMailer::new();

        let hash = auth::PasswordHasher::new().hash("secret1").unwrap();
        let account = stored_account(&hash, true);

        repository
            .expect_find_by_identifier()
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        let service = AccountService::new(Arc::new(repository), Arc::new(mailer));

        let result = service
            .login(LoginCommand {
                identifier: "ada@example.com".to_string(),
                password: "wrong_password".to_string(),
            })
            .await;

        assert!(matches!(
            result.unwrap_err(),
            AccountError::InvalidCredentials
        ));
    }

    #[tokio::test]
    async fn test_login_unverified_email_is_forbidden() {
        let mut repository = MockTestAccountRepository::new();
        let mailer = MockTestMailer::new();

        let hash = auth::PasswordHasher::new().hash("secret1").unwrap();
        let account = stored_account(&hash, false);

        repository
            .expect_find_by_identifier()
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        let service = AccountService::new(Arc::new(repository), Arc::new(mailer));

        // Correct credentials, unverified email
        let result = service
            .login(LoginCommand {
                identifier: "ada@example.com".to_string(),
                password: "secret1".to_string(),
            })
            .await;

        assert!(matches!(result.unwrap_err(), AccountError::EmailNotVerified));
    }

    #[tokio::test]
    async fn test_create_account_skips_verification_flow() {
        let mut repository = MockTestAccountRepository::new();
        let mailer = MockTestMailer::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_find_by_phone()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .withf(|account| {
                account.verification_token.is_none()
                    && account.token_expiry.is_none()
                    && !account.email_verified
            })
            .times(1)
            .returning(|account| Ok(account));

        let service = AccountService::new(Arc::new(repository), Arc::new(mailer));

        let result = service.create_account(new_account_command()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_get_account_not_found() {
        let mut repository = MockTestAccountRepository::new();
        let mailer = MockTestMailer::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = AccountService::new(Arc::new(repository), Arc::new(mailer));

        let result = service.get_account(&AccountId::new()).await;
        assert!(matches!(result.unwrap_err(), AccountError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_account_rehashes_password() {
        let mut repository = MockTestAccountRepository::new();
        let mailer = MockTestMailer::new();

        let account = stored_account("$argon2id$old_hash", true);
        let account_id = account.id;

        let found = account.clone();
        repository
            .expect_find_by_id()
            .withf(move |id| *id == account_id)
            .times(1)
            .returning(move |_| Ok(Some(found.clone())));

        repository
            .expect_update()
            .withf(|account| {
                account.first_name == "Grace"
                    && account.password_hash.starts_with("$argon2")
                    && account.password_hash != "$argon2id$old_hash"
            })
            .times(1)
            .returning(|account| Ok(account));

        let service = AccountService::new(Arc::new(repository), Arc::new(mailer));

        let command = UpdateAccountCommand {
            first_name: Some("Grace".to_string()),
            password: Some(Password::new("new_password".to_string()).unwrap()),
            ..Default::default()
        };

        let updated = service.update_account(&account_id, command).await.unwrap();
        assert_eq!(updated.first_name, "Grace");
    }

    #[tokio::test]
    async fn test_update_account_not_found() {
        let mut repository = MockTestAccountRepository::new();
        let mailer = MockTestMailer::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = AccountService::new(Arc::new(repository), Arc::new(mailer));

        let result = service
            .update_account(
                &AccountId::new(),
                UpdateAccountCommand {
                    first_name: Some("Grace".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result.unwrap_err(), AccountError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_account_not_found() {
        let mut repository = MockTestAccountRepository::new();
        let mailer = MockTestMailer::new();

        let account_id = AccountId::new();
        repository
            .expect_delete()
            .times(1)
            .returning(move |_| Err(AccountError::NotFound(account_id.to_string())));

        let service = AccountService::new(Arc::new(repository), Arc::new(mailer));

        let result = service.delete_account(&account_id).await;
        assert!(matches!(result.unwrap_err(), AccountError::NotFound(_)));
    }
}
