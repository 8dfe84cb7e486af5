use crate::config::AdminSeed;
use crate::db::{normalize_email, Database};
use crate::error::AuthError;
use crate::i18n::{Language, LanguageContext};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// The administrator an email/password pair resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub email: String,
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AdminIdentity, AuthError>;
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| AuthError::Hashing(e.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hashing(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[async_trait]
impl Authenticator for Database {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AdminIdentity, AuthError> {
        let hash = self
            .admin_password_hash(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if verify_password(password, &hash)? {
            Ok(AdminIdentity {
                email: normalize_email(email),
            })
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Creates or refreshes the configured administrator account.
pub async fn seed_admin(db: &Database, seed: &AdminSeed) -> Result<(), AuthError> {
    let hash = hash_password(&seed.password)?;
    db.upsert_admin(&seed.email, &hash).await?;
    info!("Administrator account {} is ready", normalize_email(&seed.email));
    Ok(())
}

/// A signed-in administrator on one Discord account.
#[derive(Debug, Clone)]
pub struct Session {
    pub identity: AdminIdentity,
    pub language: LanguageContext,
    pub signed_in_at: DateTime<Utc>,
}

/// Administrator sessions keyed by Discord user id. A session starts at
/// sign-in, changes language only on request and ends at sign-out.
pub struct SessionStore {
    sessions: RwLock<HashMap<u64, Session>>,
    default_language: Language,
}

impl SessionStore {
    pub fn new(default_language: Language) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            default_language,
        }
    }

    pub async fn sign_in(
        &self,
        auth: &dyn Authenticator,
        user_id: u64,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let identity = match auth.sign_in(email, password).await {
            Ok(identity) => identity,
            Err(e) => {
                warn!("Sign-in failed for Discord user {}: {}", user_id, e);
                return Err(e);
            }
        };

        let mut sessions = self.sessions.write().await;
        // keep the language of a session being replaced
        let language = sessions
            .get(&user_id)
            .map(|s| s.language)
            .unwrap_or_else(|| LanguageContext::new(self.default_language));
        let session = Session {
            identity,
            language,
            signed_in_at: Utc::now(),
        };
        sessions.insert(user_id, session.clone());
        info!("Discord user {} signed in as {}", user_id, session.identity.email);
        Ok(session)
    }

    pub async fn sign_out(&self, user_id: u64) -> Option<Session> {
        let removed = self.sessions.write().await.remove(&user_id);
        if let Some(session) = &removed {
            info!(
                "Discord user {} signed out ({}, session of {} minutes)",
                user_id,
                session.identity.email,
                (Utc::now() - session.signed_in_at).num_minutes()
            );
        }
        removed
    }

    pub async fn session(&self, user_id: u64) -> Option<Session> {
        self.sessions.read().await.get(&user_id).cloned()
    }

    pub async fn set_language(&self, user_id: u64, language: Language) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&user_id)?;
        session.language.set(language);
        Some(session.clone())
    }

    /// Language for messages to this user, signed in or not.
    pub async fn language_for(&self, user_id: u64) -> Language {
        self.session(user_id)
            .await
            .map(|s| s.language.language())
            .unwrap_or(self.default_language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_db() -> Database {
        let db = Database::in_memory().await.unwrap();
        let seed = AdminSeed {
            email: "Admin@Example.com".to_string(),
            password: "correct horse".to_string(),
        };
        seed_admin(&db, &seed).await.unwrap();
        db
    }

    #[test]
    fn hashes_verify_only_the_right_password() {
        let hash = hash_password("s3cret").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret", &hash).unwrap());
        assert!(!verify_password("S3cret", &hash).unwrap());
    }

    #[tokio::test]
    async fn sign_in_checks_credentials() {
        let db = seeded_db().await;
        let identity = db.sign_in("admin@example.com", "correct horse").await.unwrap();
        assert_eq!(identity.email, "admin@example.com");

        assert!(matches!(
            db.sign_in("admin@example.com", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            db.sign_in("nobody@example.com", "correct horse").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn session_lifecycle() {
        let db = seeded_db().await;
        let sessions = SessionStore::new(Language::Pt);

        assert!(sessions.sign_in(&db, 7, "admin@example.com", "nope").await.is_err());
        assert!(sessions.session(7).await.is_none());

        let session = sessions.sign_in(&db, 7, "admin@example.com", "correct horse").await.unwrap();
        assert_eq!(session.language.language(), Language::Pt);

        sessions.set_language(7, Language::En).await.unwrap();
        assert_eq!(sessions.language_for(7).await, Language::En);
        assert_eq!(sessions.language_for(8).await, Language::Pt);

        assert!(sessions.sign_out(7).await.is_some());
        assert!(sessions.session(7).await.is_none());
        assert!(sessions.set_language(7, Language::Es).await.is_none());
    }
}
