//! One-way credential digests.
//!
//! Digests are deterministic so the store can match `(email, digest)` pairs
//! during authentication. The raw credential never leaves this module.

use std::fmt;

use sha2::{Digest, Sha256};

/// Hex-encoded digest of a user's credential.
///
/// `Debug` output is redacted so the digest never reaches logs.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a digest previously produced by [`PasswordHasher`] and read back
    /// from the store.
    pub fn from_stored(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// Borrow the hex digest for persistence.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// SHA-256 credential hasher shared by account creation and authentication.
///
/// # Examples
/// ```
/// use users_api::domain::PasswordHasher;
///
/// let hasher = PasswordHasher;
/// assert_eq!(hasher.hash("pw"), hasher.hash("pw"));
/// assert_eq!(hasher.hash("pw").as_str().len(), 64);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Digest a raw credential.
    pub fn hash(self, raw: &str) -> PasswordHash {
        let digest = Sha256::digest(raw.as_bytes());
        PasswordHash(hex::encode(digest))
    }
}
