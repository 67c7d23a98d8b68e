//! Redaction wrapper for key material
//!
//! The `--mnemonic` flag carries either a raw private key or a seed phrase.
//! Wrapping it in `Sensitive` keeps it out of `Debug` output of the parsed
//! CLI config and out of any log field it is accidentally attached to.

use serde::{Deserialize, Deserializer};
use std::fmt;

/// Value that renders as `***REDACTED***` in `Debug` and `Display`
///
/// ```
/// use depositx_core_types::Sensitive;
///
/// let phrase = Sensitive::new("abandon abandon ... about".to_string());
/// assert_eq!(format!("{phrase:?}"), "***REDACTED***");
/// assert!(phrase.expose().starts_with("abandon"));
/// ```
#[derive(Clone, Default)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the secret; only the ledger connector should call this
    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***REDACTED***")
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***REDACTED***")
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

// Loaded from config sources; never serialized back out.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Sensitive<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mnemonic_is_redacted() {
        let m = Sensitive::new("test test test junk".to_string());
        assert_eq!(format!("{m:?}"), "***REDACTED***");
        assert_eq!(format!("{m}"), "***REDACTED***");
    }

    #[test]
    fn test_option_of_sensitive_stays_redacted() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct Conn {
            rpc: String,
            mnemonic: Option<Sensitive<String>>,
        }

        let conn = Conn {
            rpc: "sim://local".to_string(),
            mnemonic: Some("0xdeadbeef".to_string().into()),
        };
        let rendered = format!("{conn:?}");
        assert!(rendered.contains("sim://local"));
        assert!(!rendered.contains("deadbeef"));
    }

    #[test]
    fn test_deserializes_transparently() {
        let m: Sensitive<String> = serde_json::from_str("\"seed words\"").unwrap();
        assert_eq!(m.expose(), "seed words");
    }
}
