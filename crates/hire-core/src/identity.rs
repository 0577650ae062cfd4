//! # Identity Newtypes
//!
//! Addresses identify external actors (job seekers, employers, the
//! administrator, the verifier). Integer ids identify ledger entities and
//! are assigned monotonically starting at 1.
//!
//! Keeping each id namespace in its own type means a `JobId` can never be
//! looked up in the application arena by accident.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::LedgerError;

/// A 20-byte actor address, rendered as `0x`-prefixed lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    /// The all-zero address. Never a valid recipient or verifier.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Wrap raw address bytes.
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Derive a stable address from a human label (first 20 bytes of
    /// `sha256(label)`). Used for demo actors and fixtures.
    pub fn derive(label: &str) -> Self {
        let hash = Sha256::digest(label.as_bytes());
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash[..20]);
        Self(bytes)
    }

    /// Access the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Whether this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("0x")?;
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for Address {
    type Err = LedgerError;

    /// Parse a `0x`-prefixed, 40-hex-digit address (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| LedgerError::InvalidInput(format!("address must start with 0x: {s:?}")))?;
        if hex.len() != 40 {
            return Err(LedgerError::InvalidInput(format!(
                "address must have 40 hex digits, got {}: {s:?}",
                hex.len()
            )));
        }
        let mut bytes = [0u8; 20];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk)
                .map_err(|_| LedgerError::InvalidInput(format!("address is not ASCII: {s:?}")))?;
            bytes[i] = u8::from_str_radix(pair, 16)
                .map_err(|_| LedgerError::InvalidInput(format!("invalid hex in address: {s:?}")))?;
        }
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_string()
    }
}

macro_rules! sequential_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// The first id handed out by a fresh ledger.
            pub const FIRST: $name = $name(1);

            /// The raw integer value.
            pub fn get(&self) -> u64 {
                self.0
            }

            /// The id that follows this one.
            pub fn next(&self) -> $name {
                $name(self.0 + 1)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

sequential_id!(
    /// Identifier of a job posting.
    JobId,
    "job"
);

sequential_id!(
    /// Identifier of a job application.
    ApplicationId,
    "application"
);

sequential_id!(
    /// Identifier of a soulbound certificate token.
    TokenId,
    "token"
);
