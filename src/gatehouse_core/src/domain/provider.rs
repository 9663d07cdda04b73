use std::fmt;
use std::str::FromStr;

use crate::domain::password::PasswordHash;
use crate::domain::user::UserError;

/// External OAuth identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OAuthProvider {
    Google,
    Apple,
}

impl FromStr for OAuthProvider {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(Self::Google),
            "apple" => Ok(Self::Apple),
            other => Err(UserError::UnknownProvider(other.to_owned())),
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Google => f.write_str("google"),
            Self::Apple => f.write_str("apple"),
        }
    }
}

/// Provider-assigned unique identifier for a linked external account.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProviderId(String);

impl ProviderId {
    pub fn parse(value: impl Into<String>) -> Result<Self, UserError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(UserError::InvalidProviderId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Authentication method tag for a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Email,
    Google,
    Apple,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => f.write_str("email"),
            Self::Google => f.write_str("google"),
            Self::Apple => f.write_str("apple"),
        }
    }
}

/// How a user proves their identity.
///
/// The tagged variant makes the record invariant unrepresentable by
/// construction: a password hash exists exactly for email accounts,
/// a provider id exactly for federated ones.
#[derive(Debug, Clone)]
pub enum Credential {
    Password(PasswordHash),
    Federated {
        provider: OAuthProvider,
        provider_id: ProviderId,
    },
}

impl Credential {
    pub fn provider(&self) -> Provider {
        match self {
            Self::Password(_) => Provider::Email,
            Self::Federated {
                provider: OAuthProvider::Google,
                ..
            } => Provider::Google,
            Self::Federated {
                provider: OAuthProvider::Apple,
                ..
            } => Provider::Apple,
        }
    }
}
