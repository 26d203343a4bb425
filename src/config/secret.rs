//! Secure credential handling using the secrecy crate
//!
//! The vendor access token grants full API access, so it never appears in
//! Debug output or logs. Memory is zeroed when the secret is dropped.
//!
//! # Example
//!
//! ```rust
//! use rollcall::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let token = secret_string("dp-access-token".to_string());
//! assert_eq!(token.expose_secret().as_ref(), "dp-access-token");
//! // Debug output is redacted
//! assert!(!format!("{token:?}").contains("dp-access-token"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Newtype wrapper for String that implements the traits `Secret` requires
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Only reachable through expose_secret; Secret<SecretValue> has no Display
impl std::fmt::Display for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl SecretValue {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// A string that is zeroed on drop and redacted in Debug output
pub type SecretString = Secret<SecretValue>;

/// Helper to wrap a String in a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("sensitive-token".to_string());
        let debug_output = format!("{secret:?}");

        assert!(!debug_output.contains("sensitive-token"));
        assert!(debug_output.contains("REDACTED") || debug_output.contains("Secret"));
    }

    #[test]
    fn test_secret_roundtrip() {
        let secret = secret_string("abc123".to_string());
        assert_eq!(secret.expose_secret().as_ref(), "abc123");
        assert!(!secret.expose_secret().is_empty());
    }

    #[test]
    fn test_exposed_value_formats_as_inner_string() {
        let secret = secret_string("abc123".to_string());
        assert_eq!(format!("OAuth {}", secret.expose_secret()), "OAuth abc123");
    }

    #[test]
    fn test_secret_deserializes_from_toml() {
        #[derive(Deserialize)]
        struct Section {
            token: SecretString,
        }

        let section: Section = toml::from_str("token = \"abc\"").unwrap();
        assert_eq!(section.token.expose_secret().as_ref(), "abc");
    }
}
