use std::collections::HashMap;

use gatehouse_core::{PhoneNumber, SmsClient};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

pub const TWILIO_API_BASE_URL: &str = "https://api.twilio.com";

/// SMS delivery via the Twilio Messages API.
///
/// The base URL is injectable so tests can point the client at a local
/// mock server.
pub struct TwilioSmsClient {
    http_client: Client,
    base_url: String,
    account_sid: String,
    auth_token: Secret<String>,
    from_number: String,
}

impl TwilioSmsClient {
    pub fn new(
        http_client: Client,
        base_url: String,
        account_sid: String,
        auth_token: Secret<String>,
        from_number: String,
    ) -> Self {
        Self {
            http_client,
            base_url,
            account_sid,
            auth_token,
            from_number,
        }
    }
}

#[async_trait::async_trait]
impl SmsClient for TwilioSmsClient {
    #[tracing::instrument(name = "Sending SMS via Twilio", skip_all)]
    async fn send_sms(&self, recipient: &PhoneNumber, body: &str) -> Result<(), String> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url.trim_end_matches('/'),
            self.account_sid
        );

        let mut form: HashMap<&str, &str> = HashMap::new();
        form.insert("To", recipient.as_ref().expose_secret());
        form.insert("From", &self.from_number);
        form.insert("Body", body);

        let response = self
            .http_client
            .post(url)
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .form(&form)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        response.error_for_status().map_err(|e| e.to_string())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use secrecy::Secret;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn phone() -> PhoneNumber {
        PhoneNumber::try_from(Secret::new("+15551234567".to_owned())).unwrap()
    }

    fn client(base_url: String) -> TwilioSmsClient {
        TwilioSmsClient::new(
            Client::new(),
            base_url,
            "AC_test".to_owned(),
            Secret::new("auth-token".to_owned()),
            "+15550000000".to_owned(),
        )
    }

    #[tokio::test]
    async fn posts_the_message_to_the_account_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2010-04-01/Accounts/AC_test/Messages.json"))
            .and(body_string_contains("Body=Your+verification+code"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let result = client(server.uri())
            .send_sms(&phone(), "Your verification code is 123456")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn carrier_errors_surface_as_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = client(server.uri()).send_sms(&phone(), "hi").await;
        assert!(result.is_err());
    }
}
