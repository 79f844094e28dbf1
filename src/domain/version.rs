use crate::error::{Result, TaggerError};
use std::fmt;
use std::str::FromStr;

/// Semantic version representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemanticVersion {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
        }
    }

    /// Parse a bare `MAJOR.MINOR.PATCH` string.
    ///
    /// Anything else is rejected: prefixes such as `v`, pre-release suffixes,
    /// signs, whitespace, or a component count other than three.
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Err(TaggerError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z",
                s
            )));
        }

        let component = |label: &str, part: &str| -> Result<u64> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(TaggerError::version(format!(
                    "Invalid {} version: '{}'",
                    label, part
                )));
            }
            part.parse::<u64>().map_err(|_| {
                TaggerError::version(format!("Invalid {} version: '{}'", label, part))
            })
        };

        Ok(SemanticVersion {
            major: component("major", parts[0])?,
            minor: component("minor", parts[1])?,
            patch: component("patch", parts[2])?,
        })
    }

    /// Parse the version out of a tag name that starts with `prefix`
    /// (e.g. prefix `"backend/v"`, tag `"backend/v1.2.3"`).
    pub fn from_tag(tag: &str, prefix: &str) -> Result<Self> {
        let rest = tag.strip_prefix(prefix).ok_or_else(|| {
            TaggerError::version(format!("Tag '{}' does not start with '{}'", tag, prefix))
        })?;
        Self::parse(rest)
    }

    /// Bump version according to policy.
    ///
    /// Returns `None` when the bumped component would overflow `u64`.
    pub fn checked_bump(&self, policy: ReleaseBumpPolicy) -> Option<Self> {
        match policy {
            ReleaseBumpPolicy::Major => Some(SemanticVersion::new(self.major.checked_add(1)?, 0, 0)),
            ReleaseBumpPolicy::Minor => {
                Some(SemanticVersion::new(self.major, self.minor.checked_add(1)?, 0))
            }
            ReleaseBumpPolicy::Patch => Some(SemanticVersion::new(
                self.major,
                self.minor,
                self.patch.checked_add(1)?,
            )),
        }
    }
}

impl FromStr for SemanticVersion {
    type Err = TaggerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// How a release version increments when a new tag is cut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseBumpPolicy {
    Major,
    Minor,
    #[default]
    Patch,
}

impl FromStr for ReleaseBumpPolicy {
    type Err = TaggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "major" => Ok(ReleaseBumpPolicy::Major),
            "minor" => Ok(ReleaseBumpPolicy::Minor),
            "patch" => Ok(ReleaseBumpPolicy::Patch),
            other => Err(TaggerError::version(format!(
                "Unknown bump type '{}': expected major, minor or patch",
                other
            ))),
        }
    }
}

impl fmt::Display for ReleaseBumpPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseBumpPolicy::Major => write!(f, "major"),
            ReleaseBumpPolicy::Minor => write!(f, "minor"),
            ReleaseBumpPolicy::Patch => write!(f, "patch"),
        }
    }
}
