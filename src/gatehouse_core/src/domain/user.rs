use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::email::Email;
use crate::domain::password::PasswordHash;
use crate::domain::phone_number::PhoneNumber;
use crate::domain::provider::{Credential, OAuthProvider, Provider, ProviderId};

#[derive(Debug, Error, PartialEq)]
pub enum UserError {
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),
    #[error("Phone number must be in E.164 format")]
    InvalidPhoneNumber,
    #[error("Name must not be empty")]
    InvalidName,
    #[error("Unknown provider '{0}'")]
    UnknownProvider(String),
    #[error("Provider id must not be empty")]
    InvalidProviderId,
    #[error("Invalid user id")]
    InvalidUserId,
}

/// Unique identifier of a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Result<Self, UserError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| UserError::InvalidUserId)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name of a user. Trimmed, non-empty, bounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    const MAX_LENGTH: usize = 256;

    pub fn parse(value: impl Into<String>) -> Result<Self, UserError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.len() > Self::MAX_LENGTH {
            return Err(UserError::InvalidName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A user account.
///
/// Constructed only through [`User::with_password`] or
/// [`User::with_federated_identity`], so the credential invariant holds for
/// every live record.
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    email: Option<Email>,
    name: PersonName,
    credential: Credential,
    phone_number: Option<PhoneNumber>,
    phone_verified: bool,
    created_at: DateTime<Utc>,
}

impl User {
    /// New email/password account.
    pub fn with_password(email: Email, name: PersonName, password_hash: PasswordHash) -> Self {
        Self {
            id: UserId::new(),
            email: Some(email),
            name,
            credential: Credential::Password(password_hash),
            phone_number: None,
            phone_verified: false,
            created_at: Utc::now(),
        }
    }

    /// New account backed by an external OAuth identity.
    pub fn with_federated_identity(
        provider: OAuthProvider,
        provider_id: ProviderId,
        email: Email,
        name: PersonName,
    ) -> Self {
        Self {
            id: UserId::new(),
            email: Some(email),
            name,
            credential: Credential::Federated {
                provider,
                provider_id,
            },
            phone_number: None,
            phone_verified: false,
            created_at: Utc::now(),
        }
    }

    /// Rebuild a record from storage. The caller is responsible for having
    /// persisted a record that satisfies the credential invariant.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: UserId,
        email: Option<Email>,
        name: PersonName,
        credential: Credential,
        phone_number: Option<PhoneNumber>,
        phone_verified: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            name,
            credential,
            phone_number,
            phone_verified,
            created_at,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    pub fn name(&self) -> &PersonName {
        &self.name
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn provider(&self) -> Provider {
        self.credential.provider()
    }

    pub fn phone_number(&self) -> Option<&PhoneNumber> {
        self.phone_number.as_ref()
    }

    pub fn phone_verified(&self) -> bool {
        self.phone_verified
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Attach a confirmed phone number.
    pub fn set_phone_verified(&mut self, phone_number: PhoneNumber) {
        self.phone_number = Some(phone_number);
        self.phone_verified = true;
    }
}

#[cfg(test)]
mod tests {
    use secrecy::Secret;

    use super::*;

    fn email(s: &str) -> Email {
        Email::try_from(Secret::new(s.to_owned())).unwrap()
    }

    #[test]
    fn password_account_carries_email_provider_tag() {
        let user = User::with_password(
            email("a@x.com"),
            PersonName::parse("A").unwrap(),
            PasswordHash::new(Secret::new("$argon2id$stub".to_owned())),
        );
        assert_eq!(user.provider(), Provider::Email);
        assert!(!user.phone_verified());
    }

    #[test]
    fn federated_account_carries_provider_tag() {
        let user = User::with_federated_identity(
            OAuthProvider::Google,
            ProviderId::parse("g-123").unwrap(),
            email("a@x.com"),
            PersonName::parse("A").unwrap(),
        );
        assert_eq!(user.provider(), Provider::Google);
    }

    #[test]
    fn phone_verification_sets_number_and_flag() {
        let mut user = User::with_password(
            email("a@x.com"),
            PersonName::parse("A").unwrap(),
            PasswordHash::new(Secret::new("$argon2id$stub".to_owned())),
        );
        let phone = PhoneNumber::try_from(Secret::new("+15551234567".to_owned())).unwrap();
        user.set_phone_verified(phone.clone());
        assert!(user.phone_verified());
        assert_eq!(user.phone_number(), Some(&phone));
    }
}
