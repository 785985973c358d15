//! Credential storage and session handling.
//!
//! Handlers talk to an [`IdentityProvider`]; the local implementation keeps
//! argon2 hashes in the `credentials` table and sessions in a moka cache.

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use model::entities::credential;
use moka::future::Cache;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, Set, SqlErr,
};
use std::fmt::Debug;
use thiserror::Error;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::config::AuthSettings;

/// Who a session token belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: String,
    pub email: String,
}

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Email {email} is already registered")]
    EmailTaken { email: String },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Failed to hash password: {0}")]
    Hashing(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type Result<T> = std::result::Result<T, IdentityError>;

/// Authenticates credentials and tracks signed-in sessions.
#[async_trait]
pub trait IdentityProvider: Send + Sync + Debug {
    /// Stores new credentials inside the caller's transaction and returns the
    /// identity id. Nothing is visible until the transaction commits.
    async fn register(&self, txn: &DatabaseTransaction, email: &str, password: &str) -> Result<String>;

    /// Checks credentials and opens a session, returning its token.
    async fn sign_in(&self, email: &str, password: &str) -> Result<(String, SessionIdentity)>;

    /// Resolves a token. Sessions whose credentials were removed resolve to `None`.
    async fn current_user(&self, token: &str) -> Result<Option<SessionIdentity>>;

    async fn sign_out(&self, token: &str);
}

#[derive(Debug, Clone)]
pub struct LocalIdentityProvider {
    db: DatabaseConnection,
    sessions: Cache<String, SessionIdentity>,
}

impl LocalIdentityProvider {
    pub fn new(db: DatabaseConnection, settings: &AuthSettings) -> Self {
        let sessions = Cache::builder()
            .max_capacity(settings.max_sessions)
            .time_to_idle(settings.session_ttl())
            .build();
        Self { db, sessions }
    }
}

/// Emails are compared trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| IdentityError::Hashing(e.to_string()))
}

fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!("Stored password hash cannot be parsed: {}", e);
            false
        }
    }
}

async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<credential::Model>> {
    Ok(credential::Entity::find()
        .filter(credential::Column::Email.eq(email))
        .one(db)
        .await?)
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn register(&self, txn: &DatabaseTransaction, email: &str, password: &str) -> Result<String> {
        let email = normalize_email(email);
        trace!("Registering credentials for {}", email);

        if find_by_email(txn, &email).await?.is_some() {
            debug!("Email {} is already registered", email);
            return Err(IdentityError::EmailTaken { email });
        }

        let id = Uuid::new_v4().to_string();
        let row = credential::ActiveModel {
            id: Set(id.clone()),
            email: Set(email.clone()),
            password_hash: Set(hash_password(password)?),
            created_at: Set(chrono::Utc::now()),
        };

        match row.insert(txn).await {
            Ok(_) => {
                debug!("Credentials {} registered for {}", id, email);
                Ok(id)
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(IdentityError::EmailTaken { email })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<(String, SessionIdentity)> {
        let email = normalize_email(email);
        trace!("Sign in attempt for {}", email);

        let Some(stored) = find_by_email(&self.db, &email).await? else {
            debug!("No credentials for {}", email);
            return Err(IdentityError::InvalidCredentials);
        };

        if !verify_password(password, &stored.password_hash) {
            debug!("Wrong password for {}", email);
            return Err(IdentityError::InvalidCredentials);
        }

        let token = Uuid::new_v4().simple().to_string();
        let identity = SessionIdentity {
            user_id: stored.id,
            email: stored.email,
        };
        self.sessions.insert(token.clone(), identity.clone()).await;
        info!("Session opened for {}", identity.user_id);
        Ok((token, identity))
    }

    async fn current_user(&self, token: &str) -> Result<Option<SessionIdentity>> {
        let Some(identity) = self.sessions.get(token).await else {
            trace!("Unknown session token");
            return Ok(None);
        };

        if credential::Entity::find_by_id(identity.user_id.clone())
            .one(&self.db)
            .await?
            .is_none()
        {
            debug!("Credentials of {} are gone, dropping session", identity.user_id);
            self.sessions.invalidate(token).await;
            return Ok(None);
        }

        Ok(Some(identity))
    }

    async fn sign_out(&self, token: &str) {
        self.sessions.invalidate(token).await;
        debug!("Session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::setup_test_db;
    use sea_orm::TransactionTrait;

    async fn provider() -> LocalIdentityProvider {
        let db = setup_test_db().await;
        LocalIdentityProvider::new(db, &AuthSettings::default())
    }

    async fn register(provider: &LocalIdentityProvider, email: &str, password: &str) -> Result<String> {
        let txn = provider.db.begin().await.unwrap();
        let id = provider.register(&txn, email, password).await?;
        txn.commit().await.unwrap();
        Ok(id)
    }

    #[tokio::test]
    async fn test_sign_in_round_trip() {
        let provider = provider().await;
        let id = register(&provider, "  Cora@Shop.test ", "s3cret").await.unwrap();

        let (token, identity) = provider.sign_in("cora@shop.test", "s3cret").await.unwrap();
        assert_eq!(identity.user_id, id);
        assert_eq!(identity.email, "cora@shop.test");

        let current = provider.current_user(&token).await.unwrap();
        assert_eq!(current, Some(identity));

        provider.sign_out(&token).await;
        assert_eq!(provider.current_user(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_are_rejected() {
        let provider = provider().await;
        register(&provider, "cora@shop.test", "s3cret").await.unwrap();

        assert!(matches!(
            provider.sign_in("cora@shop.test", "nope").await,
            Err(IdentityError::InvalidCredentials)
        ));
        assert!(matches!(
            provider.sign_in("ghost@shop.test", "s3cret").await,
            Err(IdentityError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_refused() {
        let provider = provider().await;
        register(&provider, "cora@shop.test", "a").await.unwrap();

        let err = register(&provider, "CORA@shop.test", "b").await.unwrap_err();
        assert!(matches!(err, IdentityError::EmailTaken { ref email } if email == "cora@shop.test"));
    }

    #[tokio::test]
    async fn test_rolled_back_registration_leaves_nothing() {
        let provider = provider().await;
        let txn = provider.db.begin().await.unwrap();
        provider.register(&txn, "cora@shop.test", "s3cret").await.unwrap();
        txn.rollback().await.unwrap();

        assert!(matches!(
            provider.sign_in("cora@shop.test", "s3cret").await,
            Err(IdentityError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_session_dies_with_its_credentials() {
        let provider = provider().await;
        let id = register(&provider, "cora@shop.test", "s3cret").await.unwrap();
        let (token, _) = provider.sign_in("cora@shop.test", "s3cret").await.unwrap();

        credential::Entity::delete_by_id(id).exec(&provider.db).await.unwrap();

        assert_eq!(provider.current_user(&token).await.unwrap(), None);
    }
}
