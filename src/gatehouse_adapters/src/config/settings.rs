use chrono::Duration;
use config::{Config, ConfigError, Environment, File};
use gatehouse_application::PhoneVerificationPolicy;
use secrecy::Secret;
use serde::Deserialize;

use crate::config::constants::env;
use crate::lookup::twilio_lookup_client::TWILIO_LOOKUP_BASE_URL;
use crate::sessions::JwtConfig;
use crate::sms::twilio_sms_client::TWILIO_API_BASE_URL;

/// Process-wide configuration, built once at startup and passed by
/// reference into each component's constructor.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub auth: AuthSettings,
    pub user_store: UserStoreBackend,
    pub postgres: Option<PostgresSettings>,
    pub sms: SmsSettings,
    pub phone_verification: PhoneVerificationSettings,
    #[serde(default)]
    pub oauth: OAuthSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS. Empty means no cross-origin access.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt: JwtSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    pub secret: Secret<String>,
    pub ttl_seconds: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStoreBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresSettings {
    pub url: Secret<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsBackend {
    Mock,
    Twilio,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmsSettings {
    pub backend: SmsBackend,
    pub twilio: Option<TwilioSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TwilioSettings {
    pub account_sid: String,
    pub auth_token: Secret<String>,
    pub from_number: String,
    #[serde(default = "default_twilio_base_url")]
    pub base_url: String,
    #[serde(default = "default_twilio_lookup_base_url")]
    pub lookup_base_url: String,
}

fn default_twilio_base_url() -> String {
    TWILIO_API_BASE_URL.to_owned()
}

fn default_twilio_lookup_base_url() -> String {
    TWILIO_LOOKUP_BASE_URL.to_owned()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhoneVerificationSettings {
    pub code_length: usize,
    pub ttl_seconds: i64,
    pub max_attempts: u32,
    pub reject_voip: bool,
}

impl PhoneVerificationSettings {
    pub fn policy(&self) -> PhoneVerificationPolicy {
        PhoneVerificationPolicy {
            code_length: self.code_length,
            code_ttl: Duration::seconds(self.ttl_seconds),
            max_attempts: self.max_attempts,
            reject_voip: self.reject_voip,
        }
    }
}

/// OAuth client identifiers per platform, handed to clients during the
/// provider handshake. Not used for any server-side check.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OAuthSettings {
    pub google_client_id: Option<String>,
    pub apple_client_id: Option<String>,
}

impl Settings {
    /// Load configuration from `config/default.json` (optional), then
    /// `GATEHOUSE__`-prefixed environment variables, then a handful of
    /// conventionally named variables that take precedence.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut builder = Config::builder()
            .set_default("application.host", "0.0.0.0")?
            .set_default("application.port", 3000)?
            .set_default("auth.jwt.ttl_seconds", 900)?
            .set_default("user_store", "memory")?
            .set_default("sms.backend", "mock")?
            .set_default("phone_verification.code_length", 6)?
            .set_default("phone_verification.ttl_seconds", 600)?
            .set_default("phone_verification.max_attempts", 5)?
            .set_default("phone_verification.reject_voip", false)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(Environment::with_prefix("GATEHOUSE").separator("__"));

        for (var, key) in [
            (env::JWT_SECRET_ENV_VAR, "auth.jwt.secret"),
            (env::DATABASE_URL_ENV_VAR, "postgres.url"),
            (env::TWILIO_ACCOUNT_SID_ENV_VAR, "sms.twilio.account_sid"),
            (env::TWILIO_AUTH_TOKEN_ENV_VAR, "sms.twilio.auth_token"),
            (env::TWILIO_FROM_NUMBER_ENV_VAR, "sms.twilio.from_number"),
            (env::GOOGLE_CLIENT_ID_ENV_VAR, "oauth.google_client_id"),
            (env::APPLE_CLIENT_ID_ENV_VAR, "oauth.apple_client_id"),
        ] {
            if let Ok(value) = std::env::var(var) {
                builder = builder.set_override(key, value)?;
            }
        }

        builder.build()?.try_deserialize()
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.auth.jwt.secret.clone(),
            token_ttl_in_seconds: self.auth.jwt.ttl_seconds,
        }
    }
}
