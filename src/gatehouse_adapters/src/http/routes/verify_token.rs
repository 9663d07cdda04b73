use axum::{Json, extract::State, response::IntoResponse};
use gatehouse_core::SessionIssuer;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::http::routes::error::AuthApiError;

#[derive(Debug, Deserialize)]
pub struct VerifyTokenRequest {
    pub token: Secret<String>,
}

/// Check a session token. Every failure is an error response; there is no
/// anonymous fallback identity.
#[tracing::instrument(name = "Verify token", skip_all)]
pub async fn verify_token<S>(
    State(session_issuer): State<S>,
    Json(request): Json<VerifyTokenRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    S: SessionIssuer + Clone,
{
    let user_id = session_issuer.validate(request.token.expose_secret())?;

    Ok(Json(serde_json::json!({ "user_id": user_id.to_string() })))
}
