//! Framework version floor declared by device factories.
//!
//! Each factory names the oldest framework release it is compatible with
//! (e.g. `"1.7.5"`). The registry compares that floor against the running
//! host version before dispatching a build; an older host rejects the device
//! with a distinct error kind instead of constructing it.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A `major.minor.patch` framework version.
///
/// Ordering is lexicographic over the three components, so
/// `1.7.5 < 1.10.0 < 2.0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameworkVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl FrameworkVersion {
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self { major, minor, patch }
    }

    /// Whether a host running `self` satisfies a factory's declared `floor`.
    pub fn satisfies(&self, floor: &FrameworkVersion) -> bool {
        self >= floor
    }
}

impl fmt::Display for FrameworkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// A version string that is not `major.minor.patch`.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid framework version '{input}': expected major.minor.patch")]
pub struct VersionParseError {
    pub input: String,
}

impl FromStr for FrameworkVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || VersionParseError { input: s.to_string() };
        let mut parts = s.split('.');
        let major = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;
        let minor = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;
        let patch = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(Self { major, minor, patch })
    }
}
