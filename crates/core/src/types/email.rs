//! Validated email address.
//!
//! Validation is deliberately shallow: one `@` with non-empty text on both
//! sides and an overall length cap. The backend is the authority on whether
//! an address is deliverable; this type only stops obviously malformed
//! input before a network round trip.

use core::fmt;

use serde::{Deserialize, Serialize};

/// RFC 5321 length cap.
const MAX_LENGTH: usize = 254;

/// Why a string was rejected as an email address.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most {MAX_LENGTH} characters")]
    TooLong,
    #[error("email must look like user@domain")]
    Malformed,
}

/// An email address that passed shape validation.
///
/// Deserialization goes through [`Email::parse`], so a malformed address in
/// a wire payload fails at the serde boundary rather than deeper in.
///
/// ```
/// use vendora_core::Email;
///
/// let email = Email::parse("ada@example.com").unwrap();
/// assert_eq!(email.domain(), "example.com");
/// assert!(Email::parse("not-an-email").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and wrap an address.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError`] when the input is empty, longer than 254
    /// characters, or not of the form `local@domain` with both parts
    /// non-empty.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        if input.is_empty() {
            return Err(EmailError::Empty);
        }
        if input.len() > MAX_LENGTH {
            return Err(EmailError::TooLong);
        }
        match input.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(input.to_owned()))
            }
            _ => Err(EmailError::Malformed),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything after the `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_ordinary_addresses() {
        for input in [
            "ada@example.com",
            "ada.lovelace+carts@example.co.uk",
            "a@b",
        ] {
            assert!(Email::parse(input).is_ok(), "rejected {input}");
        }
    }

    #[test]
    fn test_rejects_malformed_shapes() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
        assert_eq!(Email::parse("no-at-sign"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("@example.com"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("ada@"), Err(EmailError::Malformed));
    }

    #[test]
    fn test_rejects_overlong_addresses() {
        let input = format!("{}@example.com", "a".repeat(300));
        assert_eq!(Email::parse(&input), Err(EmailError::TooLong));
    }

    #[test]
    fn test_deserialization_validates() {
        let ok: Result<Email, _> = serde_json::from_str("\"ada@example.com\"");
        assert_eq!(ok.unwrap().as_str(), "ada@example.com");

        let bad: Result<Email, _> = serde_json::from_str("\"nope\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let email = Email::parse("ada@example.com").unwrap();
        assert_eq!(
            serde_json::to_string(&email).unwrap(),
            "\"ada@example.com\""
        );
    }

    #[test]
    fn test_domain_accessor() {
        let email = Email::parse("ada@shop.example.com").unwrap();
        assert_eq!(email.domain(), "shop.example.com");
    }
}
