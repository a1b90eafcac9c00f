use std::str::FromStr;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::AccountType;
use crate::account::models::EmailAddress;
use crate::account::models::PhoneNumber;
use crate::account::ports::AccountRepository;

const SELECT_COLUMNS: &str = "id, first_name, last_name, email, phone, password_hash, \
     account_type, email_verified, verification_token, token_expiry, created_at";

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(row: &PgRow) -> Result<Account, AccountError> {
        let id: Uuid = row.try_get("id").map_err(db_err)?;
        let first_name: String = row.try_get("first_name").map_err(db_err)?;
        let last_name: String = row.try_get("last_name").map_err(db_err)?;
        let email: String = row.try_get("email").map_err(db_err)?;
        let phone: String = row.try_get("phone").map_err(db_err)?;
        let password_hash: String = row.try_get("password_hash").map_err(db_err)?;
        let account_type: String = row.try_get("account_type").map_err(db_err)?;
        let email_verified: bool = row.try_get("email_verified").map_err(db_err)?;
        let verification_token: Option<String> =
            row.try_get("verification_token").map_err(db_err)?;
        let token_expiry: Option<DateTime<Utc>> = row.try_get("token_expiry").map_err(db_err)?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(db_err)?;

        Ok(Account {
            id: AccountId(id),
            first_name,
            last_name,
            email: EmailAddress::new(email)?,
            phone: PhoneNumber::new(phone)?,
            password_hash,
            account_type: AccountType::from_str(&account_type)?,
            email_verified,
            verification_token,
            token_expiry,
            created_at,
        })
    }

    async fn find_one(&self, query: &str, bind: &str) -> Result<Option<Account>, AccountError> {
        let row = sqlx::query(query)
            .bind(bind)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.as_ref().map(Self::map_row).transpose()
    }
}

fn db_err(e: sqlx::Error) -> AccountError {
    AccountError::DatabaseError(e.to_string())
}

/// Map unique-index violations onto the matching domain error; the indexes
/// are the authority for email/phone uniqueness under concurrent writes.
fn map_unique_violation(e: sqlx::Error, account: &Account) -> AccountError {
    if let Some(db_e) = e.as_database_error() {
        if db_e.is_unique_violation() {
            if db_e.constraint() == Some("accounts_email_key") {
                return AccountError::EmailAlreadyExists(account.email.as_str().to_string());
            }
            if db_e.constraint() == Some("accounts_phone_key") {
                return AccountError::PhoneAlreadyExists(account.phone.as_str().to_string());
            }
        }
    }
    AccountError::DatabaseError(e.to_string())
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, first_name, last_name, email, phone, password_hash,
                                  account_type, email_verified, verification_token,
                                  token_expiry, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(account.id.0)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.email.as_str())
        .bind(account.phone.as_str())
        .bind(&account.password_hash)
        .bind(account.account_type.as_str())
        .bind(account.email_verified)
        .bind(&account.verification_token)
        .bind(account.token_expiry)
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &account))?;

        Ok(account)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError> {
        self.find_one(
            &format!("SELECT {SELECT_COLUMNS} FROM accounts WHERE email = $1"),
            email.as_str(),
        )
        .await
    }

    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<Account>, AccountError> {
        self.find_one(
            &format!("SELECT {SELECT_COLUMNS} FROM accounts WHERE phone = $1"),
            phone.as_str(),
        )
        .await
    }

    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Account>, AccountError> {
        self.find_one(
            &format!("SELECT {SELECT_COLUMNS} FROM accounts WHERE email = $1 OR phone = $1"),
            identifier,
        )
        .await
    }

    async fn find_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<Account>, AccountError> {
        self.find_one(
            &format!("SELECT {SELECT_COLUMNS} FROM accounts WHERE verification_token = $1"),
            token,
        )
        .await
    }

    async fn list_all(&self) -> Result<Vec<Account>, AccountError> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM accounts ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn update(&self, account: Account) -> Result<Account, AccountError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET first_name = $2, last_name = $3, email = $4, phone = $5,
                password_hash = $6, account_type = $7, email_verified = $8,
                verification_token = $9, token_expiry = $10
            WHERE id = $1
            "#,
        )
        .bind(account.id.0)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.email.as_str())
        .bind(account.phone.as_str())
        .bind(&account.password_hash)
        .bind(account.account_type.as_str())
        .bind(account.email_verified)
        .bind(&account.verification_token)
        .bind(account.token_expiry)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &account))?;

        if result.rows_affected() == 0 {
            return Err(AccountError::NotFound(account.id.to_string()));
        }

        Ok(account)
    }

    async fn delete(&self, id: &AccountId) -> Result<(), AccountError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(AccountError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
