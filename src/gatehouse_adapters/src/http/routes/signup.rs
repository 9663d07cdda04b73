use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use gatehouse_application::SignupUseCase;
use gatehouse_core::{Email, Password, PasswordHasher, PersonName, UserStore};
use secrecy::Secret;
use serde::Deserialize;

use crate::http::routes::error::AuthApiError;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: Secret<String>,
    pub name: String,
    pub password: Secret<String>,
}

#[tracing::instrument(name = "Signup", skip_all)]
pub async fn signup<U, H>(
    State((user_store, password_hasher)): State<(U, H)>,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + Clone,
    H: PasswordHasher + Clone,
{
    let email = Email::try_from(request.email)?;
    let name = PersonName::parse(request.name)?;
    let password = Password::try_from(request.password)?;

    let use_case = SignupUseCase::new(user_store, password_hasher);
    let user_id = use_case.execute(email, name, password).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": user_id.to_string() })),
    ))
}
