use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use account_service::domain::account::errors::AccountError;
use account_service::domain::account::errors::MailerError;
use account_service::domain::account::models::Account;
use account_service::domain::account::models::AccountId;
use account_service::domain::account::models::EmailAddress;
use account_service::domain::account::models::PhoneNumber;
use account_service::domain::account::ports::AccountRepository;
use account_service::domain::account::ports::Mailer;
use account_service::domain::account::service::AccountService;
use account_service::inbound::http::router::create_router;
use async_trait::async_trait;
use auth::Authenticator;
use auth::JwtHandler;

const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
    pub outbox: Outbox,
    pub frontend_url: String,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryAccountRepository::default());
        let mailer = Arc::new(RecordingMailer::default());
        let outbox = mailer.outbox();

        let account_service = Arc::new(AccountService::new(repository, mailer));
        let authenticator = Arc::new(Authenticator::new(TEST_JWT_SECRET));

        let frontend_url = "http://frontend.test".to_string();
        let router = create_router(account_service, authenticator, 1, frontend_url.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        let jwt_handler = JwtHandler::new(TEST_JWT_SECRET);

        Self {
            address,
            // Redirects stay unfollowed so verify-email responses can be
            // asserted directly.
            api_client: reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .expect("Failed to create reqwest client"),
            jwt_handler,
            outbox,
            frontend_url,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request
    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }
}

/// A captured verification email.
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub first_name: String,
    pub token: String,
}

pub type Outbox = Arc<Mutex<Vec<SentEmail>>>;

/// Mailer that records every send instead of talking to an SMTP relay.
#[derive(Default)]
pub struct RecordingMailer {
    outbox: Outbox,
}

impl RecordingMailer {
    pub fn outbox(&self) -> Outbox {
        Arc::clone(&self.outbox)
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_verification_email(
        &self,
        to: &EmailAddress,
        first_name: &str,
        token: &str,
    ) -> Result<(), MailerError> {
        self.outbox.lock().unwrap().push(SentEmail {
            to: to.as_str().to_string(),
            first_name: first_name.to_string(),
            token: token.to_string(),
        });
        Ok(())
    }
}

/// In-memory account store enforcing the same email and phone uniqueness
/// the Postgres unique indexes provide.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: Mutex<HashMap<AccountId, Account>>,
}

impl InMemoryAccountRepository {
    fn check_unique(
        accounts: &HashMap<AccountId, Account>,
        candidate: &Account,
    ) -> Result<(), AccountError> {
        for existing in accounts.values() {
            if existing.id == candidate.id {
                continue;
            }
            if existing.email == candidate.email {
                return Err(AccountError::EmailAlreadyExists(
                    candidate.email.as_str().to_string(),
                ));
            }
            if existing.phone == candidate.phone {
                return Err(AccountError::PhoneAlreadyExists(
                    candidate.phone.as_str().to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.lock().unwrap();
        Self::check_unique(&accounts, &account)?;
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError> {
        Ok(self.accounts.lock().unwrap().get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.email == *email)
            .cloned())
    }

    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<Account>, AccountError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.phone == *phone)
            .cloned())
    }

    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Account>, AccountError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.email.as_str() == identifier || a.phone.as_str() == identifier)
            .cloned())
    }

    async fn find_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<Account>, AccountError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.verification_token.as_deref() == Some(token))
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Account>, AccountError> {
        Ok(self.accounts.lock().unwrap().values().cloned().collect())
    }

    async fn update(&self, account: Account) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.lock().unwrap();
        if !accounts.contains_key(&account.id) {
            return Err(AccountError::NotFound(account.id.to_string()));
        }
        Self::check_unique(&accounts, &account)?;
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn delete(&self, id: &AccountId) -> Result<(), AccountError> {
        match self.accounts.lock().unwrap().remove(id) {
            Some(_) => Ok(()),
            None => Err(AccountError::NotFound(id.to_string())),
        }
    }
}
