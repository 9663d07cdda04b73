use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gatehouse_application::{
    ConfirmPhoneCodeError, LinkProviderError, LoginError, RequestPhoneCodeError, SignupError,
};
use gatehouse_core::{
    PasswordHasherError, SessionError, UserError, UserStoreError, VerificationCodeError,
    VerificationCodeStoreError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum AuthApiError {
    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Session has expired")]
    SessionExpired,

    #[error("Invalid session token")]
    SessionInvalid,

    #[error("No pending code for this phone number")]
    CodeNotFound,

    #[error("Verification code has expired")]
    CodeExpired,

    #[error("Incorrect verification code")]
    CodeMismatch,

    #[error("No verification attempts remaining")]
    AttemptsExhausted,

    #[error("VoIP numbers cannot be used for phone verification")]
    VoipRejected,

    #[error("Failed to deliver verification code")]
    DeliveryFailed(String),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match &self {
            AuthApiError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),

            AuthApiError::UserAlreadyExists => (StatusCode::CONFLICT, self.to_string()),

            AuthApiError::InvalidCredentials
            | AuthApiError::SessionExpired
            | AuthApiError::SessionInvalid
            | AuthApiError::CodeExpired
            | AuthApiError::CodeMismatch
            | AuthApiError::AttemptsExhausted => (StatusCode::UNAUTHORIZED, self.to_string()),

            AuthApiError::CodeNotFound => (StatusCode::NOT_FOUND, self.to_string()),

            AuthApiError::VoipRejected => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),

            // The delivery error detail stays in the logs, not the response.
            AuthApiError::DeliveryFailed(detail) => {
                tracing::warn!("SMS delivery failed: {detail}");
                (StatusCode::BAD_GATEWAY, "Failed to deliver verification code".to_owned())
            }

            AuthApiError::UnexpectedError(detail) => {
                tracing::error!("unexpected error: {detail}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Unexpected error".to_owned())
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status_code, body).into_response()
    }
}

impl From<UserError> for AuthApiError {
    fn from(error: UserError) -> Self {
        AuthApiError::InvalidInput(error.to_string())
    }
}

impl From<VerificationCodeError> for AuthApiError {
    fn from(error: VerificationCodeError) -> Self {
        AuthApiError::InvalidInput(error.to_string())
    }
}

impl From<UserStoreError> for AuthApiError {
    fn from(error: UserStoreError) -> Self {
        match error {
            UserStoreError::UserAlreadyExists => AuthApiError::UserAlreadyExists,
            // A missing user behind a valid session or confirmed code is a
            // consistency problem, not a client error.
            UserStoreError::UserNotFound => {
                AuthApiError::UnexpectedError("user record missing".to_owned())
            }
            UserStoreError::UnexpectedError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<SessionError> for AuthApiError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::Expired => AuthApiError::SessionExpired,
            SessionError::Invalid => AuthApiError::SessionInvalid,
            SessionError::UnexpectedError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<PasswordHasherError> for AuthApiError {
    fn from(error: PasswordHasherError) -> Self {
        AuthApiError::UnexpectedError(error.to_string())
    }
}

impl From<VerificationCodeStoreError> for AuthApiError {
    fn from(error: VerificationCodeStoreError) -> Self {
        match error {
            VerificationCodeStoreError::CodeNotFound => AuthApiError::CodeNotFound,
            VerificationCodeStoreError::CodeExpired => AuthApiError::CodeExpired,
            VerificationCodeStoreError::CodeMismatch => AuthApiError::CodeMismatch,
            VerificationCodeStoreError::AttemptsExhausted => AuthApiError::AttemptsExhausted,
            VerificationCodeStoreError::UnexpectedError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<SignupError> for AuthApiError {
    fn from(error: SignupError) -> Self {
        match error {
            SignupError::UserStoreError(e) => e.into(),
            SignupError::HashingError(e) => e.into(),
        }
    }
}

impl From<LoginError> for AuthApiError {
    fn from(error: LoginError) -> Self {
        match error {
            LoginError::InvalidCredentials => AuthApiError::InvalidCredentials,
            LoginError::HashingError(e) => e.into(),
            LoginError::SessionError(e) => e.into(),
            LoginError::UserStoreError(e) => e.into(),
        }
    }
}

impl From<LinkProviderError> for AuthApiError {
    fn from(error: LinkProviderError) -> Self {
        match error {
            LinkProviderError::UserStoreError(e) => e.into(),
            LinkProviderError::SessionError(e) => e.into(),
        }
    }
}

impl From<RequestPhoneCodeError> for AuthApiError {
    fn from(error: RequestPhoneCodeError) -> Self {
        match error {
            RequestPhoneCodeError::VoipRejected => AuthApiError::VoipRejected,
            RequestPhoneCodeError::LookupFailed(e) => AuthApiError::UnexpectedError(e),
            RequestPhoneCodeError::DeliveryFailed(e) => AuthApiError::DeliveryFailed(e),
            RequestPhoneCodeError::CodeStoreError(e) => e.into(),
        }
    }
}

impl From<ConfirmPhoneCodeError> for AuthApiError {
    fn from(error: ConfirmPhoneCodeError) -> Self {
        match error {
            ConfirmPhoneCodeError::CodeNotFound => AuthApiError::CodeNotFound,
            ConfirmPhoneCodeError::CodeExpired => AuthApiError::CodeExpired,
            ConfirmPhoneCodeError::CodeMismatch => AuthApiError::CodeMismatch,
            ConfirmPhoneCodeError::AttemptsExhausted => AuthApiError::AttemptsExhausted,
            ConfirmPhoneCodeError::CodeStoreError(e) => e.into(),
            ConfirmPhoneCodeError::UserStoreError(e) => e.into(),
        }
    }
}
