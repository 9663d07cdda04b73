use axum::{Json, extract::State, response::IntoResponse};
use gatehouse_application::LoginUseCase;
use gatehouse_core::{Email, Password, PasswordHasher, SessionIssuer, UserStore};
use secrecy::Secret;
use serde::Deserialize;

use crate::http::routes::error::AuthApiError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Secret<String>,
    pub password: Secret<String>,
}

#[tracing::instrument(name = "Login", skip_all)]
pub async fn login<U, H, S>(
    State((user_store, password_hasher, session_issuer)): State<(U, H, S)>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + Clone,
    H: PasswordHasher + Clone,
    S: SessionIssuer + Clone,
{
    // Malformed credentials are rejected the same way as wrong ones, so the
    // response shape never reveals whether an email is registered.
    let (email, password) = match (
        Email::try_from(request.email),
        Password::try_from(request.password),
    ) {
        (Ok(email), Ok(password)) => (email, password),
        _ => return Err(AuthApiError::InvalidCredentials),
    };

    let use_case = LoginUseCase::new(user_store, password_hasher, session_issuer);
    let response = use_case.execute(email, password).await?;

    Ok(Json(serde_json::json!({
        "token": response.token.as_str(),
        "user_id": response.user_id.to_string(),
    })))
}
