//! # Content Digest
//!
//! `ContentDigest` links journal records into a hash chain. Each record's
//! digest covers its own canonical payload and the previous record's
//! digest, so truncation or in-place edits are detectable on open.
//!
//! ## Security Invariant
//!
//! `sha256_digest()` accepts only `&CanonicalBytes`. No code path can hash
//! bytes that skipped JCS canonicalization.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;
use crate::error::LedgerError;

/// A 32-byte SHA-256 digest, serialized as 64 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// The all-zero digest. Used as `prev` of the first chained record.
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Access the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse 64 hex characters.
    pub fn from_hex(s: &str) -> Result<Self, LedgerError> {
        if s.len() != 64 || !s.is_ascii() {
            return Err(LedgerError::InvalidInput(format!(
                "digest must be 64 hex characters, got {:?}",
                s
            )));
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk)
                .map_err(|_| LedgerError::InvalidInput(format!("digest is not ASCII: {s:?}")))?;
            bytes[i] = u8::from_str_radix(pair, 16)
                .map_err(|_| LedgerError::InvalidInput(format!("invalid hex in digest: {s:?}")))?;
        }
        Ok(Self(bytes))
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

impl TryFrom<String> for ContentDigest {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<ContentDigest> for String {
    fn from(value: ContentDigest) -> Self {
        value.to_hex()
    }
}

/// Compute a SHA-256 digest from canonical bytes.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest(bytes)
}
