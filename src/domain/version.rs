use crate::error::{ReleaseError, Result};
use std::fmt;

/// Ordinal triple of a release
///
/// Field order matters: the derived `Ord` compares `(major, minor, patch)`
/// numerically, which is the only ordering tags are ever sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a bare `M.m.p` triple (e.g., "1.2.3" -> Version(1,2,3))
    ///
    /// Pre-release and build metadata are rejected; release tags carry
    /// only the ordinals.
    pub fn parse(text: &str) -> Result<Self> {
        let parsed = semver::Version::parse(text).map_err(|e| {
            ReleaseError::invalid_arguments("ver", format!("'{}' is not M.m.p: {}", text, e))
        })?;

        if !parsed.pre.is_empty() || !parsed.build.is_empty() {
            return Err(ReleaseError::invalid_arguments(
                "ver",
                format!("'{}' carries pre-release or build metadata", text),
            ));
        }

        let ordinal = |value: u64, name: &str| {
            u32::try_from(value).map_err(|_| {
                ReleaseError::invalid_arguments("ver", format!("{} version {} is too large", name, value))
            })
        };

        Ok(Version {
            major: ordinal(parsed.major, "major")?,
            minor: ordinal(parsed.minor, "minor")?,
            patch: ordinal(parsed.patch, "patch")?,
        })
    }

    /// Bump version according to bump type
    ///
    /// Returns `None` when the bumped ordinal would overflow.
    pub fn bump(&self, bump_type: VersionBump) -> Option<Self> {
        let bumped = match bump_type {
            VersionBump::Major => Version::new(self.major.checked_add(1)?, 0, 0),
            VersionBump::Minor => Version::new(self.major, self.minor.checked_add(1)?, 0),
            VersionBump::Patch => {
                Version::new(self.major, self.minor, self.patch.checked_add(1)?)
            }
        };
        Some(bumped)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Which ordinal an incremental release advances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}
