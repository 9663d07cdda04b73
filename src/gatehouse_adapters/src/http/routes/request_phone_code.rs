use axum::{Json, extract::State, response::IntoResponse};
use gatehouse_application::{PhoneVerificationPolicy, RequestPhoneCodeUseCase};
use gatehouse_core::{
    LineTypeLookup, PhoneNumber, SessionIssuer, SmsClient, VerificationCodeStore,
};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::http::routes::error::AuthApiError;

#[derive(Debug, Deserialize)]
pub struct RequestPhoneCodeRequest {
    pub token: Secret<String>,
    pub phone_number: Secret<String>,
}

/// Issue and dispatch a one-time code for the caller's phone number.
/// Requires a valid session: codes are always requested on behalf of an
/// authenticated user.
#[tracing::instrument(name = "Request phone code", skip_all)]
pub async fn request_phone_code<V, M, L, S>(
    State((code_store, sms_client, line_type_lookup, session_issuer, policy)): State<(
        V,
        M,
        L,
        S,
        PhoneVerificationPolicy,
    )>,
    Json(request): Json<RequestPhoneCodeRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    V: VerificationCodeStore + Clone,
    M: SmsClient + Clone,
    L: LineTypeLookup + Clone,
    S: SessionIssuer + Clone,
{
    let user_id = session_issuer.validate(request.token.expose_secret())?;
    let phone_number = PhoneNumber::try_from(request.phone_number)?;

    let use_case = RequestPhoneCodeUseCase::new(code_store, sms_client, line_type_lookup, policy);
    use_case.execute(user_id, phone_number).await?;

    Ok(Json(serde_json::json!({ "status": "sent" })))
}
