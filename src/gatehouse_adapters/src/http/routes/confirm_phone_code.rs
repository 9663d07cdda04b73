use axum::{Json, extract::State, response::IntoResponse};
use gatehouse_application::{ConfirmPhoneCodeUseCase, PhoneVerificationPolicy};
use gatehouse_core::{PhoneNumber, UserStore, VerificationCode, VerificationCodeStore};
use secrecy::Secret;
use serde::Deserialize;

use crate::http::routes::error::AuthApiError;

#[derive(Debug, Deserialize)]
pub struct ConfirmPhoneCodeRequest {
    pub phone_number: Secret<String>,
    pub code: String,
}

#[tracing::instrument(name = "Confirm phone code", skip_all)]
pub async fn confirm_phone_code<V, U>(
    State((code_store, user_store, policy)): State<(V, U, PhoneVerificationPolicy)>,
    Json(request): Json<ConfirmPhoneCodeRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    V: VerificationCodeStore + Clone,
    U: UserStore + Clone,
{
    let phone_number = PhoneNumber::try_from(request.phone_number)?;
    let code = VerificationCode::parse(request.code, policy.code_length)?;

    let use_case = ConfirmPhoneCodeUseCase::new(code_store, user_store);
    let user_id = use_case.execute(phone_number, code).await?;

    Ok(Json(serde_json::json!({
        "user_id": user_id.to_string(),
        "phone_verified": true,
    })))
}
