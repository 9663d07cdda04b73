use std::sync::Arc;

use color_eyre::eyre::{Result, eyre};
use gatehouse_adapters::{
    Argon2PasswordHasher, HashMapUserStore, HashMapVerificationCodeStore, JwtSessionIssuer,
    MockLineTypeLookup, MockSmsClient, PostgresUserStore, Settings, SmsBackend, TwilioLookupClient,
    TwilioSmsClient, UserStoreBackend,
};
use gatehouse_core::{LineTypeLookup, SmsClient, UserStore};
use gatehouse_service::{AllowedOrigins, AuthService};
use reqwest::Client as HttpClient;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let settings = Settings::load()?;

    let user_store: Arc<dyn UserStore> = match settings.user_store {
        UserStoreBackend::Memory => Arc::new(HashMapUserStore::new()),
        UserStoreBackend::Postgres => {
            let postgres = settings
                .postgres
                .as_ref()
                .ok_or_else(|| eyre!("postgres backend selected but no postgres.url configured"))?;

            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(postgres.url.expose_secret())
                .await?;
            sqlx::migrate!().run(&pool).await?;

            Arc::new(PostgresUserStore::new(pool))
        }
    };

    let http_client = HttpClient::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;

    let (sms_client, line_type_lookup): (Arc<dyn SmsClient>, Arc<dyn LineTypeLookup>) =
        match settings.sms.backend {
            SmsBackend::Mock => (
                Arc::new(MockSmsClient::new()),
                Arc::new(MockLineTypeLookup::new()),
            ),
            SmsBackend::Twilio => {
                let twilio = settings
                    .sms
                    .twilio
                    .as_ref()
                    .ok_or_else(|| eyre!("twilio backend selected but no sms.twilio configured"))?;

                let sms = TwilioSmsClient::new(
                    http_client.clone(),
                    twilio.base_url.clone(),
                    twilio.account_sid.clone(),
                    twilio.auth_token.clone(),
                    twilio.from_number.clone(),
                );
                let lookup = TwilioLookupClient::new(
                    http_client,
                    twilio.lookup_base_url.clone(),
                    twilio.account_sid.clone(),
                    twilio.auth_token.clone(),
                );
                (Arc::new(sms), Arc::new(lookup))
            }
        };

    let service = AuthService::new(
        user_store,
        Argon2PasswordHasher::new(),
        HashMapVerificationCodeStore::new(),
        sms_client,
        line_type_lookup,
        JwtSessionIssuer::new(settings.jwt_config()),
        settings.phone_verification.policy(),
    );

    let service = if settings.application.allowed_origins.is_empty() {
        service
    } else {
        let origins = settings
            .application
            .allowed_origins
            .iter()
            .map(|origin| origin.parse())
            .collect::<Result<Vec<_>, _>>()?;
        service.with_allowed_origins(AllowedOrigins::new(origins))
    };

    let listener = tokio::net::TcpListener::bind(settings.application.address()).await?;
    service.run(listener).await?;

    Ok(())
}

fn init_tracing() -> Result<()> {
    let fmt_layer = fmt::layer().compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}
