//! Secret string type for master credentials.
//!
//! Keeps passwords out of `Debug`/`Display` output and compares them without
//! short-circuiting on the first differing byte.

use serde::Deserialize;
use std::fmt;
use subtle::ConstantTimeEq;

/// A password or combined `user:pass` value that never prints itself.
///
/// `Debug` and `Display` show `[REDACTED]`; the value is reachable only
/// through [`SecretString::expose_secret`] or compared through
/// [`SecretString::matches`].
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Explicitly expose the secret value.
    #[inline]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Compare against a presented value in time independent of where the
    /// first mismatch occurs.
    pub fn matches(&self, presented: &str) -> bool {
        bool::from(self.0.as_bytes().ct_eq(presented.as_bytes()))
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // Best-effort only: earlier copies may still exist elsewhere in memory.
        self.0.clear();
        self.0.shrink_to_fit();
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretString::new)
    }
}
