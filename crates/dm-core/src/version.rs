//! Schema version triple.
//!
//! A [`Version`] orders lexicographically by `(major, minor, update)`. The
//! default value `0.0.0` means "no version recorded".

use crate::error::{CoreError, CoreResult};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Immutable schema version.
///
/// Field order matters: the derived `Ord` compares `major`, then `minor`,
/// then `update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    major: u32,
    minor: u32,
    update: u32,
}

impl Version {
    /// Create a version from its three components.
    pub const fn new(major: u32, minor: u32, update: u32) -> Self {
        Self {
            major,
            minor,
            update,
        }
    }

    /// Major component.
    pub const fn major(&self) -> u32 {
        self.major
    }

    /// Minor component.
    pub const fn minor(&self) -> u32 {
        self.minor
    }

    /// Update component.
    pub const fn update(&self) -> u32 {
        self.update
    }

    /// `true` for `0.0.0`, the value stored by a freshly bootstrapped database.
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }

    /// Parse `"M"`, `"M.m"` or `"M.m.u"`; missing components default to 0.
    pub fn parse(input: &str) -> CoreResult<Self> {
        let invalid = |reason: &str| CoreError::InvalidVersion {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid("version must not be empty"));
        }

        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.len() > 3 {
            return Err(invalid("expected at most three components"));
        }

        let mut components = [0u32; 3];
        for (slot, part) in components.iter_mut().zip(&parts) {
            *slot = part
                .parse::<u32>()
                .map_err(|e| invalid(&format!("component '{part}' is not a number: {e}")))?;
        }

        Ok(Self::new(components[0], components[1], components[2]))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.update)
    }
}

impl FromStr for Version {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<(u32, u32, u32)> for Version {
    fn from((major, minor, update): (u32, u32, u32)) -> Self {
        Self::new(major, minor, update)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(VersionVisitor)
    }
}

/// Accepts `"1.2.0"` strings and bare integers (`version: 3` in YAML means `3.0.0`).
struct VersionVisitor;

impl<'de> Visitor<'de> for VersionVisitor {
    type Value = Version;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a version string like \"1.2.0\" or a major version number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Version, E> {
        Version::parse(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Version, E> {
        let major = u32::try_from(v).map_err(E::custom)?;
        Ok(Version::new(major, 0, 0))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Version, E> {
        let major = u32::try_from(v).map_err(E::custom)?;
        Ok(Version::new(major, 0, 0))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Version, E> {
        Err(E::custom(format!(
            "version {v} was read as a number; quote it (e.g. \"{v}.0\")"
        )))
    }
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
