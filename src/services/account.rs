//! # Account Service
//!
//! Registration, credential checks and settings updates for accounts kept in
//! the `Users` collection. Passwords are hashed with Argon2id and a random
//! salt; only the PHC string is stored.

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::models::account::{EMAIL_FIELD, PASSWORD_HASH_FIELD, ROLE_FIELD};
use crate::models::{Account, Role};
use crate::store::{Collection, Filter, ID_FIELD, MANAGED_FIELDS, Record, RecordStore, StoreError};

/// Errors that can occur during account operations
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Account not found")]
    NotFound,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Account already exists")]
    AlreadyExists,
    #[error("Field `{0}` cannot be changed through settings")]
    ProtectedField(String),
    #[error("Store error: {0}")]
    Store(StoreError),
    #[error("Password hashing failed: {0}")]
    Hash(argon2::password_hash::Error),
    #[error("Malformed account record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl From<StoreError> for AccountError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate { .. } => AccountError::AlreadyExists,
            StoreError::RecordNotFound => AccountError::NotFound,
            other => AccountError::Store(other),
        }
    }
}

impl From<argon2::password_hash::Error> for AccountError {
    fn from(e: argon2::password_hash::Error) -> Self {
        AccountError::Hash(e)
    }
}

/// Fields that settings updates may never touch.
const PROTECTED_FIELDS: [&str; 3] = [EMAIL_FIELD, PASSWORD_HASH_FIELD, ROLE_FIELD];

/// Identity operations over the record store
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn RecordStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Creates an account after checking that the email is not taken.
    ///
    /// The email is expected to be normalised already (see [`normalize_email`]).
    /// The store's unique index on email backs the preceding read, so a racing
    /// duplicate still ends up as [`AccountError::AlreadyExists`].
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Account, AccountError> {
        if self.find_by_email(email).await?.is_some() {
            warn!("Registration attempted for an existing email");
            return Err(AccountError::AlreadyExists);
        }

        let password_hash = hash_password(password)?;
        let record = self
            .store
            .insert(
                Collection::Users,
                Account::new_record(email, password_hash, role),
            )
            .await?;

        let account = Account::from_record(record)?;
        info!(user_id = %account.id, "Account created");
        Ok(account)
    }

    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountError> {
        let record = self
            .store
            .find_first(Collection::Users, &Filter::eq(EMAIL_FIELD, email))
            .await?;
        Ok(record.map(Account::from_record).transpose()?)
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, user_id: &Uuid) -> Result<Account, AccountError> {
        let record = self
            .store
            .find_first(Collection::Users, &Filter::eq(ID_FIELD, user_id.to_string()))
            .await?
            .ok_or(AccountError::NotFound)?;
        Ok(Account::from_record(record)?)
    }

    /// Checks a password against the stored hash.
    ///
    /// # Errors
    ///
    /// - [`AccountError::NotFound`] - no account for this email
    /// - [`AccountError::InvalidCredentials`] - wrong password
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Account, AccountError> {
        let account = self
            .find_by_email(email)
            .await?
            .ok_or(AccountError::NotFound)?;

        if !verify_password(password, &account.password_hash)? {
            debug!(user_id = %account.id, "Password mismatch");
            return Err(AccountError::InvalidCredentials);
        }

        debug!(user_id = %account.id, "Credentials accepted");
        Ok(account)
    }

    /// Merges `settings` into the account record.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::ProtectedField`] if the settings try to change
    /// the id, email, password hash or role.
    #[instrument(skip(self, settings), fields(setting_count = settings.len()))]
    pub async fn update_settings(
        &self,
        user_id: &Uuid,
        settings: Record,
    ) -> Result<Account, AccountError> {
        if let Some(field) = settings
            .keys()
            .find(|k| PROTECTED_FIELDS.contains(&k.as_str()) || MANAGED_FIELDS.contains(&k.as_str()))
        {
            return Err(AccountError::ProtectedField(field.clone()));
        }

        let mut record = self
            .store
            .find_first(Collection::Users, &Filter::eq(ID_FIELD, user_id.to_string()))
            .await?
            .ok_or(AccountError::NotFound)?;
        record.extend(settings);

        let updated = self.store.update(Collection::Users, record).await?;
        let account = Account::from_record(updated)?;
        info!("Account settings updated");
        Ok(account)
    }
}

/// Trims and lowercases an email so lookups and the unique index agree.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt_bytes: [u8; 16] = rand::rng().random();
    let salt = SaltString::encode_b64(&salt_bytes)?;
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AccountError> {
    let parsed = PasswordHash::new(stored_hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AccountError::Hash(e)),
    }
}
