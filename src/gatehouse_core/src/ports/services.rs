use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    password::{Password, PasswordHash},
    phone_number::PhoneNumber,
    user::UserId,
};

#[derive(Debug, Error)]
#[error("Password hashing failed: {0}")]
pub struct PasswordHasherError(pub String);

/// Port trait for the one-way password transform.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: Password) -> Result<PasswordHash, PasswordHasherError>;

    /// Check a candidate against a stored digest. The comparison must not
    /// leak timing information about how close the candidate was.
    async fn verify(
        &self,
        candidate: &Password,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError>;
}

#[async_trait]
impl<T: PasswordHasher + ?Sized> PasswordHasher for std::sync::Arc<T> {
    async fn hash(&self, password: Password) -> Result<PasswordHash, PasswordHasherError> {
        (**self).hash(password).await
    }

    async fn verify(
        &self,
        candidate: &Password,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        (**self).verify(candidate, hash).await
    }
}

/// Signed, time-bounded proof of a prior successful authentication.
#[derive(Debug, Clone)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session has expired")]
    Expired,
    #[error("Invalid session token")]
    Invalid,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for SessionError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Expired, Self::Expired)
                | (Self::Invalid, Self::Invalid)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Port trait for minting and checking session tokens.
///
/// Stateless: validity is decided by signature and expiry alone, so
/// `validate` is side-effect-free and safe to call from any number of
/// requests in parallel.
pub trait SessionIssuer: Send + Sync {
    fn issue(&self, user_id: &UserId) -> Result<SessionToken, SessionError>;
    fn validate(&self, token: &str) -> Result<UserId, SessionError>;
}

impl<T: SessionIssuer + ?Sized> SessionIssuer for std::sync::Arc<T> {
    fn issue(&self, user_id: &UserId) -> Result<SessionToken, SessionError> {
        (**self).issue(user_id)
    }

    fn validate(&self, token: &str) -> Result<UserId, SessionError> {
        (**self).validate(token)
    }
}

/// Port trait for SMS delivery. Twilio, SNS and friends all fit behind
/// this one contract.
#[async_trait]
pub trait SmsClient: Send + Sync {
    async fn send_sms(&self, recipient: &PhoneNumber, body: &str) -> Result<(), String>;
}

#[async_trait]
impl<T: SmsClient + ?Sized> SmsClient for std::sync::Arc<T> {
    async fn send_sms(&self, recipient: &PhoneNumber, body: &str) -> Result<(), String> {
        (**self).send_sms(recipient, body).await
    }
}

/// Carrier classification of a phone number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    Mobile,
    Landline,
    Voip,
    Unknown,
}

/// Port trait for line-type lookup, used to keep VoIP numbers out of
/// phone verification.
#[async_trait]
pub trait LineTypeLookup: Send + Sync {
    async fn classify(&self, phone_number: &PhoneNumber) -> Result<LineType, String>;
}

#[async_trait]
impl<T: LineTypeLookup + ?Sized> LineTypeLookup for std::sync::Arc<T> {
    async fn classify(&self, phone_number: &PhoneNumber) -> Result<LineType, String> {
        (**self).classify(phone_number).await
    }
}
