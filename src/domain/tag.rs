use regex::Regex;

/// Only bare `MAJOR.MINOR.PATCH` versions become permanent tags.
/// ASCII digits only, matching `SemanticVersion::parse`.
const RELEASE_VERSION_PATTERN: &str = r"^[0-9]+\.[0-9]+\.[0-9]+$";

/// Name of the permanent release tag for a service version: `{service}/v{version}`
pub fn next_tag_name(service: &str, version: &str) -> String {
    format!("{}/v{}", service, version)
}

/// Glob matching every release tag of `service`
pub fn service_tag_pattern(service: &str) -> String {
    format!("{}/v*", service)
}

/// Glob matching repository-wide release tags
pub const GLOBAL_TAG_PATTERN: &str = "v*";

/// Check that `version` may be used for a permanent tag.
///
/// Release-candidate and build suffixes (`1.3.0-rc.12`) are rejected.
pub fn is_release_version(version: &str) -> bool {
    Regex::new(RELEASE_VERSION_PATTERN)
        .map(|re| re.is_match(version))
        .unwrap_or(false)
}

/// Literal part of a tag glob before the first wildcard (`"backend/v*"` -> `"backend/v"`)
pub fn pattern_prefix(pattern: &str) -> &str {
    match pattern.find(['*', '?', '[']) {
        Some(idx) => &pattern[..idx],
        None => pattern,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_tag_name() {
        assert_eq!(next_tag_name("backend", "1.2.3"), "backend/v1.2.3");
        assert_eq!(next_tag_name("frontend", "0.1.0"), "frontend/v0.1.0");
    }

    #[test]
    fn test_service_tag_pattern() {
        assert_eq!(service_tag_pattern("backend"), "backend/v*");
    }

    #[test]
    fn test_release_version_accepts_bare_semver() {
        assert!(is_release_version("1.2.3"));
        assert!(is_release_version("0.0.1"));
        assert!(is_release_version("10.200.3000"));
    }

    #[test]
    fn test_release_version_rejects_suffixes() {
        assert!(!is_release_version("1.3.0-rc.12"));
        assert!(!is_release_version("v1.2.3"));
        assert!(!is_release_version("1.2"));
        assert!(!is_release_version("1.2.3.4"));
        assert!(!is_release_version("1.2.3\n"));
        assert!(!is_release_version(""));
        assert!(!is_release_version("\u{661}.\u{662}.\u{663}"));
        assert!(!is_release_version("１.２.３"));
    }

    #[test]
    fn test_pattern_prefix() {
        assert_eq!(pattern_prefix("backend/v*"), "backend/v");
        assert_eq!(pattern_prefix("v*"), "v");
        assert_eq!(pattern_prefix("exact"), "exact");
    }
}
