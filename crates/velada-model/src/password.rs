// SPDX-License-Identifier: Apache-2.0

use crate::fields::PlainPassword;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// PHC strings produced by the argon2 family all start with this tag;
/// anything else in the password column is treated as a legacy
/// cleartext value.
pub const PHC_ARGON2_PREFIX: &str = "$argon2";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordError(pub String);

impl Display for PasswordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for PasswordError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum PasswordScheme {
    Argon2id,
    PlaintextLegacy,
}

impl Default for PasswordScheme {
    fn default() -> Self {
        Self::Argon2id
    }
}

/// Password value exactly as it sits in the store: an Argon2id PHC
/// string for records written by this crate, or cleartext carried over
/// from older data.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
#[non_exhaustive]
pub struct StoredPassword(String);

impl StoredPassword {
    pub fn for_scheme(plain: &PlainPassword, scheme: PasswordScheme) -> Result<Self, PasswordError> {
        match scheme {
            PasswordScheme::Argon2id => {
                let salt = SaltString::generate(&mut OsRng);
                let hash = Argon2::default()
                    .hash_password(plain.as_str().as_bytes(), &salt)
                    .map_err(|err| PasswordError(format!("password hashing failed: {err}")))?;
                Ok(Self(hash.to_string()))
            }
            PasswordScheme::PlaintextLegacy => Ok(Self(plain.as_str().to_string())),
        }
    }

    /// Wraps a value read back from storage without reinterpreting it.
    #[must_use]
    pub fn from_stored(raw: String) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn scheme(&self) -> PasswordScheme {
        if self.0.starts_with(PHC_ARGON2_PREFIX) {
            PasswordScheme::Argon2id
        } else {
            PasswordScheme::PlaintextLegacy
        }
    }

    /// Constant behavior across schemes: hashed values verify through
    /// argon2, legacy values compare byte-for-byte.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match self.scheme() {
            PasswordScheme::Argon2id => PasswordHash::new(&self.0)
                .map(|parsed| {
                    Argon2::default()
                        .verify_password(candidate.as_bytes(), &parsed)
                        .is_ok()
                })
                .unwrap_or(false),
            PasswordScheme::PlaintextLegacy => self.0 == candidate,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for StoredPassword {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.scheme() {
            PasswordScheme::Argon2id => f.write_str("StoredPassword(argon2id)"),
            PasswordScheme::PlaintextLegacy => f.write_str("StoredPassword(legacy)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(raw: &str) -> PlainPassword {
        PlainPassword::parse(raw).expect("test password")
    }

    #[test]
    fn argon2_hash_roundtrips_and_rejects_wrong_candidate() {
        let stored =
            StoredPassword::for_scheme(&plain("abc123"), PasswordScheme::Argon2id).expect("hash");
        assert_eq!(stored.scheme(), PasswordScheme::Argon2id);
        assert!(stored.as_str().starts_with(PHC_ARGON2_PREFIX));
        assert!(stored.matches("abc123"));
        assert!(!stored.matches("abc124"));
        assert!(!stored.matches(""));
    }

    #[test]
    fn legacy_cleartext_compares_exactly() {
        let stored = StoredPassword::from_stored("abc123".to_string());
        assert_eq!(stored.scheme(), PasswordScheme::PlaintextLegacy);
        assert!(stored.matches("abc123"));
        assert!(!stored.matches("ABC123"));
    }

    #[test]
    fn same_password_hashes_to_distinct_strings() {
        let one =
            StoredPassword::for_scheme(&plain("abc123"), PasswordScheme::Argon2id).expect("hash");
        let two =
            StoredPassword::for_scheme(&plain("abc123"), PasswordScheme::Argon2id).expect("hash");
        assert_ne!(one.as_str(), two.as_str());
    }

    #[test]
    fn debug_never_reveals_the_value() {
        let stored = StoredPassword::from_stored("abc123".to_string());
        assert_eq!(format!("{stored:?}"), "StoredPassword(legacy)");
    }
}
