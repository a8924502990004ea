use base64::{Engine, engine::general_purpose::STANDARD};
use constant_time_eq::constant_time_eq;
use sha2::{Digest, Sha512};
use std::fmt;

/// Stored form of a credential: base64 of its SHA-512.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wraps a digest previously produced by [`PasswordHasher::digest`] and
    /// read back from storage.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

/// One-way transform applied to every credential before it is stored or
/// compared.
///
/// The digest is unsalted: identical passwords produce identical digests
/// across accounts. Login relies on plain digest equality, so switching to a
/// salted scheme needs a stored-format migration first.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    pub fn digest(&self, cleartext: &str) -> PasswordDigest {
        let hash = Sha512::digest(cleartext.as_bytes());
        PasswordDigest(STANDARD.encode(hash))
    }

    /// Constant-time check of `cleartext` against a stored digest.
    pub fn matches(&self, cleartext: &str, stored: &PasswordDigest) -> bool {
        let candidate = self.digest(cleartext);
        let candidate = candidate.as_str().as_bytes();
        let stored = stored.as_str().as_bytes();

        constant_time_eq(candidate, stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PASSWORD_DIGEST: &str = "hzNDoZShWoQPmw9HmK1RvVeE8PtMJpDHR4ru5+QVnwL0NdqVBUmb7x7rUDahYMBSfTS3zzJg7WE7DIJBexaWWQ==";

    #[test]
    fn digest_matches_known_vector() {
        let digest = PasswordHasher::new().digest("TestPassword");
        assert_eq!(digest.as_str(), TEST_PASSWORD_DIGEST);
    }

    #[test]
    fn digest_is_deterministic_and_fixed_length() {
        let hasher = PasswordHasher::new();
        let a = hasher.digest("12345678");
        let b = hasher.digest("12345678");
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 88);
        assert_eq!(hasher.digest("").as_str().len(), 88);
        assert_ne!(a, hasher.digest("12345679"));
    }

    #[test]
    fn matches_compares_against_stored_digest() {
        let hasher = PasswordHasher::new();
        let stored = PasswordDigest::from_stored(TEST_PASSWORD_DIGEST);

        assert!(hasher.matches("TestPassword", &stored));
        assert!(!hasher.matches("Test", &stored));
        assert!(!hasher.matches("TestPassword", &PasswordDigest::from_stored("short")));
    }

    #[test]
    fn debug_output_hides_digest() {
        let digest = PasswordHasher::new().digest("TestPassword");
        assert_eq!(format!("{digest:?}"), "PasswordDigest(..)");
    }
}
