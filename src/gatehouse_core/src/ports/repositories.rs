use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{
    email::Email,
    phone_number::PhoneNumber,
    provider::{OAuthProvider, ProviderId},
    user::{User, UserId},
    verification::{PendingVerification, VerificationCode},
};

// UserStore port trait and errors
#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("User not found")]
    UserNotFound,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for UserStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::UserAlreadyExists, Self::UserAlreadyExists)
                | (Self::UserNotFound, Self::UserNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Owner of user records. Uniqueness of `email` and of
/// `(provider, provider_id)` is the store's responsibility and must be
/// enforced atomically with the insert, so two concurrent `add_user` calls
/// for the same identity resolve into one success and one
/// `UserAlreadyExists`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn add_user(&self, user: User) -> Result<(), UserStoreError>;
    async fn get_user(&self, id: &UserId) -> Result<User, UserStoreError>;
    async fn find_by_email(&self, email: &Email) -> Result<User, UserStoreError>;
    async fn find_by_provider_identity(
        &self,
        provider: OAuthProvider,
        provider_id: &ProviderId,
    ) -> Result<User, UserStoreError>;
    async fn mark_phone_verified(
        &self,
        id: &UserId,
        phone_number: PhoneNumber,
    ) -> Result<(), UserStoreError>;
}

// Allows backend selection at startup: `Arc<dyn UserStore>` is itself a
// store, so callers generic over `UserStore + Clone` accept it.
#[async_trait]
impl<T: UserStore + ?Sized> UserStore for std::sync::Arc<T> {
    async fn add_user(&self, user: User) -> Result<(), UserStoreError> {
        (**self).add_user(user).await
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserStoreError> {
        (**self).get_user(id).await
    }

    async fn find_by_email(&self, email: &Email) -> Result<User, UserStoreError> {
        (**self).find_by_email(email).await
    }

    async fn find_by_provider_identity(
        &self,
        provider: OAuthProvider,
        provider_id: &ProviderId,
    ) -> Result<User, UserStoreError> {
        (**self).find_by_provider_identity(provider, provider_id).await
    }

    async fn mark_phone_verified(
        &self,
        id: &UserId,
        phone_number: PhoneNumber,
    ) -> Result<(), UserStoreError> {
        (**self).mark_phone_verified(id, phone_number).await
    }
}

// VerificationCodeStore port trait and errors
#[derive(Debug, Error)]
pub enum VerificationCodeStoreError {
    #[error("No pending code for this phone number")]
    CodeNotFound,
    #[error("Verification code has expired")]
    CodeExpired,
    #[error("Incorrect verification code")]
    CodeMismatch,
    #[error("No verification attempts remaining")]
    AttemptsExhausted,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for VerificationCodeStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::CodeNotFound, Self::CodeNotFound)
                | (Self::CodeExpired, Self::CodeExpired)
                | (Self::CodeMismatch, Self::CodeMismatch)
                | (Self::AttemptsExhausted, Self::AttemptsExhausted)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Owner of in-flight phone verifications, keyed by phone number.
#[async_trait]
pub trait VerificationCodeStore: Send + Sync {
    /// Store a pending verification, replacing any prior one for the same
    /// number. The replacement must be atomic per phone number: at no point
    /// are two codes simultaneously confirmable.
    async fn store_code(
        &self,
        pending: PendingVerification,
    ) -> Result<(), VerificationCodeStoreError>;

    /// Run the confirmation state machine for `phone_number` atomically.
    ///
    /// Success and expiry consume the record; exhaustion keeps it so the
    /// caller keeps seeing `AttemptsExhausted`; a mismatch deducts one
    /// attempt. Returns the user the verification was issued for.
    async fn confirm_code(
        &self,
        phone_number: &PhoneNumber,
        submitted: &VerificationCode,
        now: DateTime<Utc>,
    ) -> Result<UserId, VerificationCodeStoreError>;
}

#[async_trait]
impl<T: VerificationCodeStore + ?Sized> VerificationCodeStore for std::sync::Arc<T> {
    async fn store_code(
        &self,
        pending: PendingVerification,
    ) -> Result<(), VerificationCodeStoreError> {
        (**self).store_code(pending).await
    }

    async fn confirm_code(
        &self,
        phone_number: &PhoneNumber,
        submitted: &VerificationCode,
        now: DateTime<Utc>,
    ) -> Result<UserId, VerificationCodeStoreError> {
        (**self).confirm_code(phone_number, submitted, now).await
    }
}
