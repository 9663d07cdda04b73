pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    email::Email,
    password::{Password, PasswordHash},
    phone_number::PhoneNumber,
    provider::{Credential, OAuthProvider, Provider, ProviderId},
    user::{PersonName, User, UserError, UserId},
    verification::{CodeConfirmation, PendingVerification, VerificationCode, VerificationCodeError},
};

pub use ports::{
    repositories::{
        UserStore, UserStoreError, VerificationCodeStore, VerificationCodeStoreError,
    },
    services::{
        LineType, LineTypeLookup, PasswordHasher, PasswordHasherError, SessionError,
        SessionIssuer, SessionToken, SmsClient,
    },
};
