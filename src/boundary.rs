use std::fmt;

/// Recoverable decisions taken while resolving versions.
///
/// None of these stop a pipeline run; each is logged so operators can see
/// why a given version was chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackWarning {
    /// No `<service>/v*` tag exists, falling back to global `v*` tags
    NoServiceTags { service: String },
    /// No release tags at all, version derived from commit count
    NoTagsFound {
        commit_count: usize,
        chosen: String,
    },
    /// Commit history could not be counted
    CommitCountUnavailable { branch: String, reason: String },
    /// Tag matches the release glob but cannot be parsed as a version
    UnparsableTag { tag: String, reason: String },
    /// Version string handed to a bump could not be parsed
    UnparsableVersion { version: String, chosen: String },
    /// Bumping would overflow a version component
    BumpOverflow { version: String, policy: String },
    /// `RELEASE_BUMP_TYPE` holds something other than major/minor/patch
    InvalidBumpType { value: String },
    /// `RELEASE_VERSION_OVERRIDE` is not a bare semantic version
    InvalidVersionOverride { value: String },
}

impl fmt::Display for FallbackWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackWarning::NoServiceTags { service } => write!(
                f,
                "No '{}/v*' tags found; falling back to global 'v*' tags",
                service
            ),
            FallbackWarning::NoTagsFound {
                commit_count,
                chosen,
            } => write!(
                f,
                "No previous tags found ({} commits on default branch); starting at {}",
                commit_count, chosen
            ),
            FallbackWarning::CommitCountUnavailable { branch, reason } => write!(
                f,
                "Cannot count commits on '{}': {}; assuming a fresh repository",
                branch, reason
            ),
            FallbackWarning::UnparsableTag { tag, reason } => {
                write!(f, "Cannot parse tag '{}': {}", tag, reason)
            }
            FallbackWarning::UnparsableVersion { version, chosen } => write!(
                f,
                "Cannot parse version '{}'; using {} instead",
                version, chosen
            ),
            FallbackWarning::BumpOverflow { version, policy } => write!(
                f,
                "Cannot apply {} bump to {}: component overflow; keeping {}",
                policy, version, version
            ),
            FallbackWarning::InvalidBumpType { value } => write!(
                f,
                "Unknown RELEASE_BUMP_TYPE '{}'; using patch",
                value
            ),
            FallbackWarning::InvalidVersionOverride { value } => write!(
                f,
                "Ignoring RELEASE_VERSION_OVERRIDE '{}': expected MAJOR.MINOR.PATCH",
                value
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_tags_found_names_the_choice() {
        let warning = FallbackWarning::NoTagsFound {
            commit_count: 3,
            chosen: "0.0.1".to_string(),
        };
        let msg = warning.to_string();
        assert!(msg.contains("No previous tags found"));
        assert!(msg.contains("0.0.1"));
        assert!(msg.contains("3 commits"));
    }

    #[test]
    fn test_unparsable_tag_display() {
        let warning = FallbackWarning::UnparsableTag {
            tag: "backend/vnext".to_string(),
            reason: "Invalid format".to_string(),
        };
        let msg = warning.to_string();
        assert!(msg.contains("backend/vnext"));
        assert!(msg.contains("Invalid format"));
    }

    #[test]
    fn test_invalid_bump_type_display() {
        let warning = FallbackWarning::InvalidBumpType {
            value: "huge".to_string(),
        };
        assert!(warning.to_string().contains("huge"));
        assert!(warning.to_string().contains("patch"));
    }

    #[test]
    fn test_bump_overflow_display() {
        let warning = FallbackWarning::BumpOverflow {
            version: "18446744073709551615.0.0".to_string(),
            policy: "major".to_string(),
        };
        let msg = warning.to_string();
        assert!(msg.contains("major"));
        assert!(msg.contains("keeping 18446744073709551615.0.0"));
    }
}
