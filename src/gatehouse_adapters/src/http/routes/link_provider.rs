use axum::{Json, extract::State, response::IntoResponse};
use gatehouse_application::LinkProviderUseCase;
use gatehouse_core::{Email, OAuthProvider, PersonName, ProviderId, SessionIssuer, UserStore};
use secrecy::Secret;
use serde::Deserialize;

use crate::http::routes::error::AuthApiError;

#[derive(Debug, Deserialize)]
pub struct LinkProviderRequest {
    pub provider: String,
    pub provider_id: String,
    pub email: Secret<String>,
    pub name: String,
}

#[tracing::instrument(name = "Link provider identity", skip_all)]
pub async fn link_provider<U, S>(
    State((user_store, session_issuer)): State<(U, S)>,
    Json(request): Json<LinkProviderRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + Clone,
    S: SessionIssuer + Clone,
{
    let provider: OAuthProvider = request.provider.parse()?;
    let provider_id = ProviderId::parse(request.provider_id)?;
    let email = Email::try_from(request.email)?;
    let name = PersonName::parse(request.name)?;

    let use_case = LinkProviderUseCase::new(user_store, session_issuer);
    let linked = use_case.execute(provider, provider_id, email, name).await?;

    Ok(Json(serde_json::json!({
        "token": linked.token.as_str(),
        "user_id": linked.user_id.to_string(),
        "created": linked.created,
    })))
}
