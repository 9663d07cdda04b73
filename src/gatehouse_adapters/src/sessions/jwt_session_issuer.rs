use chrono::Utc;
use gatehouse_core::{SessionError, SessionIssuer, SessionToken, UserId};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: Secret<String>,
    pub token_ttl_in_seconds: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: usize,
    exp: usize,
}

/// Stateless session issuer backed by HS256 JWTs.
///
/// Validity is decided entirely by the signature and the `exp` claim; there
/// is no token store, so a failed validation always means re-authentication.
#[derive(Clone)]
pub struct JwtSessionIssuer {
    config: JwtConfig,
}

impl JwtSessionIssuer {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    fn secret_bytes(&self) -> &[u8] {
        self.config.secret.expose_secret().as_bytes()
    }
}

impl SessionIssuer for JwtSessionIssuer {
    #[tracing::instrument(name = "Issuing session token", skip_all)]
    fn issue(&self, user_id: &UserId) -> Result<SessionToken, SessionError> {
        let now = Utc::now();
        let delta = chrono::Duration::try_seconds(self.config.token_ttl_in_seconds).ok_or(
            SessionError::UnexpectedError("Token TTL out of range".to_owned()),
        )?;
        let expires_at = now
            .checked_add_signed(delta)
            .ok_or(SessionError::UnexpectedError(
                "Token expiry out of range".to_owned(),
            ))?;

        let to_usize = |ts: i64| -> Result<usize, SessionError> {
            ts.try_into()
                .map_err(|_| SessionError::UnexpectedError("Timestamp before epoch".to_owned()))
        };

        let claims = Claims {
            sub: user_id.to_string(),
            iat: to_usize(now.timestamp())?,
            exp: to_usize(expires_at.timestamp())?,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret_bytes()),
        )
        .map(SessionToken::new)
        .map_err(|e| SessionError::UnexpectedError(e.to_string()))
    }

    #[tracing::instrument(name = "Validating session token", skip_all)]
    fn validate(&self, token: &str) -> Result<UserId, SessionError> {
        // No leeway: a token is invalid the second its expiry passes.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => SessionError::Expired,
            _ => SessionError::Invalid,
        })?;

        UserId::parse(&claims.sub).map_err(|_| SessionError::Invalid)
    }
}
