use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, Secret};

use crate::domain::user::UserError;

// E.164: leading +, country code 1-9, 8 to 15 digits total.
static E164: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[1-9]\d{7,14}$").expect("E.164 regex must compile"));

/// Validated E.164 phone number, e.g. `+15551234567`.
#[derive(Debug, Clone)]
pub struct PhoneNumber(Secret<String>);

impl TryFrom<Secret<String>> for PhoneNumber {
    type Error = UserError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        if E164.is_match(value.expose_secret()) {
            Ok(Self(value))
        } else {
            Err(UserError::InvalidPhoneNumber)
        }
    }
}

impl AsRef<Secret<String>> for PhoneNumber {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Eq for PhoneNumber {}

impl Hash for PhoneNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.expose_secret().hash(state);
    }
}
