//! # User Roles and Capabilities
//!
//! A user registers as a `JobSeeker`, an `Employer`, or `Both`. Permission
//! checks never branch on the role directly; they ask the role for its
//! [`Capabilities`] and test a single bit. Adding a role means extending
//! one exhaustive `match` in [`UserRole::capabilities`].

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::LedgerError;

/// Registration role of a user.
///
/// The numeric codes (0, 1, 2) match the role codes external clients send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum UserRole {
    /// May apply for jobs.
    JobSeeker = 0,
    /// May post and manage jobs.
    Employer = 1,
    /// May do both.
    Both = 2,
}

impl UserRole {
    /// All roles in code order.
    pub fn all() -> &'static [UserRole] {
        &[Self::JobSeeker, Self::Employer, Self::Both]
    }

    /// The capability set granted by this role.
    pub fn capabilities(&self) -> Capabilities {
        match self {
            Self::JobSeeker => Capabilities::CAN_APPLY,
            Self::Employer => Capabilities::CAN_POST,
            Self::Both => Capabilities::CAN_APPLY.union(Capabilities::CAN_POST),
        }
    }

    /// Numeric role code.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Role from its numeric code.
    pub fn from_code(code: u8) -> Result<Self, LedgerError> {
        match code {
            0 => Ok(Self::JobSeeker),
            1 => Ok(Self::Employer),
            2 => Ok(Self::Both),
            other => Err(LedgerError::InvalidInput(format!("unknown role code: {other}"))),
        }
    }

    /// snake_case identifier, identical to the serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JobSeeker => "job_seeker",
            Self::Employer => "employer",
            Self::Both => "both",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "job_seeker" => Ok(Self::JobSeeker),
            "employer" => Ok(Self::Employer),
            "both" => Ok(Self::Both),
            other => Err(LedgerError::InvalidInput(format!("unknown role: {other:?}"))),
        }
    }
}

/// Bitset of permissions derived from a [`UserRole`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities(u8);

impl Capabilities {
    /// No permissions.
    pub const NONE: Capabilities = Capabilities(0);
    /// May submit applications.
    pub const CAN_APPLY: Capabilities = Capabilities(0b01);
    /// May post and manage jobs.
    pub const CAN_POST: Capabilities = Capabilities(0b10);

    /// Whether every bit of `other` is present.
    pub const fn contains(&self, other: Capabilities) -> bool {
        self.0 & other.0 == other.0
    }

    /// Bitwise union.
    pub const fn union(self, other: Capabilities) -> Capabilities {
        Capabilities(self.0 | other.0)
    }
}
