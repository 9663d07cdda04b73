use gatehouse_core::{LineType, LineTypeLookup, PhoneNumber};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

pub const TWILIO_LOOKUP_BASE_URL: &str = "https://lookups.twilio.com";

/// Line-type classification via the Twilio Lookup v2 API.
pub struct TwilioLookupClient {
    http_client: Client,
    base_url: String,
    account_sid: String,
    auth_token: Secret<String>,
}

impl TwilioLookupClient {
    pub fn new(
        http_client: Client,
        base_url: String,
        account_sid: String,
        auth_token: Secret<String>,
    ) -> Self {
        Self {
            http_client,
            base_url,
            account_sid,
            auth_token,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    line_type_intelligence: Option<LineTypeIntelligence>,
}

#[derive(Debug, Deserialize)]
struct LineTypeIntelligence {
    #[serde(rename = "type")]
    line_type: Option<String>,
}

#[async_trait::async_trait]
impl LineTypeLookup for TwilioLookupClient {
    #[tracing::instrument(name = "Classifying line type via Twilio", skip_all)]
    async fn classify(&self, phone_number: &PhoneNumber) -> Result<LineType, String> {
        let url = format!(
            "{}/v2/PhoneNumbers/{}?Fields=line_type_intelligence",
            self.base_url.trim_end_matches('/'),
            phone_number.as_ref().expose_secret()
        );

        let response = self
            .http_client
            .get(url)
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .send()
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?;

        let body: LookupResponse = response.json().await.map_err(|e| e.to_string())?;

        let line_type = body
            .line_type_intelligence
            .and_then(|intel| intel.line_type)
            .map(|t| match t.as_str() {
                "mobile" => LineType::Mobile,
                "landline" => LineType::Landline,
                // Twilio reports several VoIP flavours; all are excluded.
                "nonFixedVoip" | "fixedVoip" | "voip" => LineType::Voip,
                _ => LineType::Unknown,
            })
            .unwrap_or(LineType::Unknown);

        Ok(line_type)
    }
}

#[cfg(test)]
mod tests {
    use secrecy::Secret;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn phone() -> PhoneNumber {
        PhoneNumber::try_from(Secret::new("+15551234567".to_owned())).unwrap()
    }

    fn client(base_url: String) -> TwilioLookupClient {
        TwilioLookupClient::new(
            Client::new(),
            base_url,
            "AC_test".to_owned(),
            Secret::new("auth-token".to_owned()),
        )
    }

    async fn classify_with_body(body: serde_json::Value) -> LineType {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/PhoneNumbers/+15551234567"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        client(server.uri()).classify(&phone()).await.unwrap()
    }

    #[tokio::test]
    async fn classifies_voip_numbers() {
        let line_type = classify_with_body(serde_json::json!({
            "line_type_intelligence": { "type": "nonFixedVoip" }
        }))
        .await;
        assert_eq!(line_type, LineType::Voip);
    }

    #[tokio::test]
    async fn classifies_mobile_numbers() {
        let line_type = classify_with_body(serde_json::json!({
            "line_type_intelligence": { "type": "mobile" }
        }))
        .await;
        assert_eq!(line_type, LineType::Mobile);
    }

    #[tokio::test]
    async fn missing_intelligence_is_unknown() {
        let line_type = classify_with_body(serde_json::json!({})).await;
        assert_eq!(line_type, LineType::Unknown);
    }

    #[tokio::test]
    async fn api_errors_surface_as_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = client(server.uri()).classify(&phone()).await;
        assert!(result.is_err());
    }
}
