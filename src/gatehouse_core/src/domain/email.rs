use std::hash::{Hash, Hasher};

use secrecy::{ExposeSecret, Secret};

use crate::domain::user::UserError;

/// Validated email address.
///
/// Wrapped in [`Secret`] so the address never ends up in logs or
/// debug output by accident.
#[derive(Debug, Clone)]
pub struct Email(Secret<String>);

impl Email {
    fn is_valid(candidate: &str) -> bool {
        let Some((local, domain)) = candidate.split_once('@') else {
            return false;
        };
        !local.is_empty() && !domain.is_empty() && !domain.contains('@') && domain.contains('.')
    }
}

impl TryFrom<Secret<String>> for Email {
    type Error = UserError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        if Self::is_valid(value.expose_secret()) {
            Ok(Self(value))
        } else {
            Err(UserError::InvalidEmail)
        }
    }
}

impl AsRef<Secret<String>> for Email {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl PartialEq for Email {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Eq for Email {}

impl Hash for Email {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.expose_secret().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<Email, UserError> {
        Email::try_from(Secret::new(s.to_owned()))
    }

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(parse("a@x.com").is_ok());
        assert!(parse("first.last@sub.example.org").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "no-at-sign", "@x.com", "a@", "a@b@c.com", "a@nodot"] {
            assert!(parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn equality_ignores_wrapper() {
        assert_eq!(parse("a@x.com").unwrap(), parse("a@x.com").unwrap());
        assert_ne!(parse("a@x.com").unwrap(), parse("b@x.com").unwrap());
    }
}
