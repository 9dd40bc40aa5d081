//! Dot-separated identifiers of the pre-release and build fields
//!
//! According to semver.org: https://semver.org/#spec-item-9 and
//! https://semver.org/#spec-item-10

use crate::error::{Result, VertagError};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Whether every byte of `s` is in `[0-9A-Za-z-]`.
fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// A single pre-release identifier
///
/// An all-digit identifier is always classified as numeric.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PreReleaseId {
    /// Identifier consisting only of digits (e.g., "1" in "alpha.1")
    Numeric(u64),
    /// Identifier with letters or hyphens (e.g., "alpha", "rc", "x-1")
    Alphanumeric(String),
}

impl PreReleaseId {
    /// Parse a pre-release identifier, rejecting numeric identifiers with leading zeros
    pub fn parse(s: &str) -> Result<Self> {
        Self::parse_with(s, true)
    }

    /// Parse a pre-release identifier, accepting leading zeros ("01" -> 1)
    pub fn parse_tolerant(s: &str) -> Result<Self> {
        Self::parse_with(s, false)
    }

    fn parse_with(s: &str, strict: bool) -> Result<Self> {
        if !is_identifier(s) {
            return Err(VertagError::syntax(format!(
                "invalid pre-release identifier: '{}'",
                s
            )));
        }

        if !is_numeric(s) {
            return Ok(PreReleaseId::Alphanumeric(s.to_string()));
        }

        if strict && s.len() > 1 && s.starts_with('0') {
            return Err(VertagError::syntax(format!(
                "numeric pre-release identifier must not have leading zeros: '{}'",
                s
            )));
        }

        s.parse::<u64>().map(PreReleaseId::Numeric).map_err(|_| {
            VertagError::syntax(format!("numeric pre-release identifier too large: '{}'", s))
        })
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, PreReleaseId::Numeric(_))
    }
}

impl FromStr for PreReleaseId {
    type Err = VertagError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<u64> for PreReleaseId {
    fn from(n: u64) -> Self {
        PreReleaseId::Numeric(n)
    }
}

impl fmt::Display for PreReleaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreReleaseId::Numeric(n) => write!(f, "{}", n),
            PreReleaseId::Alphanumeric(s) => write!(f, "{}", s),
        }
    }
}

impl Ord for PreReleaseId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (PreReleaseId::Numeric(a), PreReleaseId::Numeric(b)) => a.cmp(b),
            // Numeric identifiers always have lower precedence than non-numeric ones
            (PreReleaseId::Numeric(_), PreReleaseId::Alphanumeric(_)) => Ordering::Less,
            (PreReleaseId::Alphanumeric(_), PreReleaseId::Numeric(_)) => Ordering::Greater,
            (PreReleaseId::Alphanumeric(a), PreReleaseId::Alphanumeric(b)) => {
                a.as_bytes().cmp(b.as_bytes())
            }
        }
    }
}

impl PartialOrd for PreReleaseId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A single build metadata identifier
///
/// Opaque: leading zeros are allowed and there is no numeric classification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildId(String);

impl BuildId {
    pub fn parse(s: &str) -> Result<Self> {
        if !is_identifier(s) {
            return Err(VertagError::syntax(format!(
                "invalid build identifier: '{}'",
                s
            )));
        }
        Ok(BuildId(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for BuildId {
    type Err = VertagError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
