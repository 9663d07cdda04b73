use secrecy::{ExposeSecret, Secret};

use crate::domain::user::UserError;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Plaintext password as received from a client. Only ever handed to a
/// password hasher, never stored.
#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl TryFrom<Secret<String>> for Password {
    type Error = UserError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        if value.expose_secret().len() < MIN_PASSWORD_LENGTH {
            return Err(UserError::PasswordTooShort(MIN_PASSWORD_LENGTH));
        }
        Ok(Self(value))
    }
}

impl AsRef<Secret<String>> for Password {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

/// Salted one-way digest of a password in PHC string format.
///
/// Opaque to the domain: only the password hasher can produce or
/// check one.
#[derive(Debug, Clone)]
pub struct PasswordHash(Secret<String>);

impl PasswordHash {
    pub fn new(phc_string: Secret<String>) -> Self {
        Self(phc_string)
    }
}

impl AsRef<Secret<String>> for PasswordHash {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
