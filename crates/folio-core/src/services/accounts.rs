//! Accounts: registration, login and profile lookup.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::User;
use crate::error::DomainError;
use crate::ports::{AuthError, PasswordService, TokenService, UserRepository};

pub const USERNAME_MIN_CHARS: usize = 3;
pub const PASSWORD_MIN_CHARS: usize = 6;

/// Registration input as submitted.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    /// Normalize the fields, or report every rule they break.
    fn validate(self) -> Result<Self, DomainError> {
        let username = self.username.trim().to_string();
        let email = self.email.trim().to_lowercase();

        let mut errors = Vec::new();
        if username.chars().count() < USERNAME_MIN_CHARS {
            errors.push(format!(
                "Username must be at least {USERNAME_MIN_CHARS} characters long"
            ));
        }
        if !looks_like_email(&email) {
            errors.push("Please provide a valid email".to_string());
        }
        if self.password.chars().count() < PASSWORD_MIN_CHARS {
            errors.push(format!(
                "Password must be at least {PASSWORD_MIN_CHARS} characters long"
            ));
        }

        if !errors.is_empty() {
            return Err(DomainError::InvalidFields(errors));
        }
        Ok(Self {
            username,
            email,
            password: self.password,
        })
    }
}

/// An issued access token and the account it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub expires_in: u64,
    pub user: User,
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    pub async fn register(&self, registration: Registration) -> Result<User, DomainError> {
        let registration = registration.validate()?;

        if self
            .users
            .find_by_email(&registration.email)
            .await?
            .is_some()
        {
            return Err(DomainError::Duplicate("Email already exists.".to_string()));
        }
        if self
            .users
            .find_by_username(&registration.username)
            .await?
            .is_some()
        {
            return Err(DomainError::Duplicate("Username already exists.".to_string()));
        }

        let hash = self.passwords.hash(&registration.password)?;
        let user = self
            .users
            .create(User::new(registration.username, registration.email, hash))
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, DomainError> {
        let email = email.trim().to_lowercase();
        let Some(user) = self.users.find_by_email(&email).await? else {
            return Err(AuthError::InvalidCredentials.into());
        };
        if !self.passwords.verify(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self
            .tokens
            .generate_token(user.id, &user.username, user.is_admin)?;

        Ok(Session {
            token,
            expires_in: u64::try_from(self.tokens.expiration_seconds()).unwrap_or(0),
            user,
        })
    }

    pub async fn profile(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))
    }
}

/// One `@` with something on both sides and a dot in the domain.
fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(username: &str, email: &str, password: &str) -> Registration {
        Registration {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_registration_is_normalized() {
        let valid = registration("  alice ", " Alice@Example.COM ", "secret")
            .validate()
            .unwrap();

        assert_eq!(valid.username, "alice");
        assert_eq!(valid.email, "alice@example.com");
    }

    #[test]
    fn test_all_violations_reported_together() {
        let err = registration(" a ", "nope", "123").validate().unwrap_err();

        match err {
            DomainError::InvalidFields(errors) => assert_eq!(errors.len(), 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_email_shape() {
        assert!(looks_like_email("a@b.io"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.io"));
        assert!(!looks_like_email("a@@b.io"));
        assert!(!looks_like_email("a b@c.io"));
    }
}
