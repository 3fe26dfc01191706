//! Email address value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

const MAX_EMAIL_LENGTH: usize = 320;

/// A syntactically plausible, lower-cased email address.
///
/// Only the shape is checked (`local@domain.tld`, no whitespace); deliverability
/// is not our concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let normalized = value.trim().to_ascii_lowercase();

        if normalized.is_empty() {
            return Err(DomainError::validation("Email cannot be empty"));
        }
        if normalized.len() > MAX_EMAIL_LENGTH {
            return Err(DomainError::validation(format!(
                "Email cannot exceed {MAX_EMAIL_LENGTH} characters"
            )));
        }
        if normalized.chars().any(char::is_whitespace) {
            return Err(DomainError::validation("Email cannot contain whitespace"));
        }

        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(DomainError::validation("Email must contain '@'"));
        };
        let domain_ok = !domain.contains('@')
            && domain
                .split_once('.')
                .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
            && !domain.ends_with('.');
        if local.is_empty() || !domain_ok {
            return Err(DomainError::validation(format!(
                "Invalid email address: {normalized}"
            )));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> String {
        email.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized() {
        let email = Email::new("  Hero@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "hero@example.com");
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for bad in ["", "hero", "@example.com", "hero@", "hero@example", "a b@c.d", "a@b@c.d", "hero@example."] {
            assert!(Email::new(bad).is_err(), "{bad:?} should be rejected");
        }
    }
}
