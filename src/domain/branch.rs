//! Branch name classification.
//!
//! A branch name is matched against an ordered rule table; the first rule
//! whose predicate accepts the name builds the classification. Order matters:
//! `feature/<service>/...` has to be tried before the generic `feature/...`
//! rule, and release prefixes before either.

use crate::domain::version::SemanticVersion;
use std::fmt;
use tracing::warn;

/// What kind of build a branch name stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchClassification {
    Production,
    Develop,
    ReleaseCandidate {
        version: String,
    },
    Feature {
        target_version: String,
        name: String,
    },
    Patch {
        target_version: String,
        name: String,
    },
    PullRequest {
        number: String,
    },
    Other {
        sanitized_name: String,
    },
}

impl BranchClassification {
    /// Short label used in logs and summaries
    pub fn kind(&self) -> &'static str {
        match self {
            BranchClassification::Production => "production",
            BranchClassification::Develop => "develop",
            BranchClassification::ReleaseCandidate { .. } => "release-candidate",
            BranchClassification::Feature { .. } => "feature",
            BranchClassification::Patch { .. } => "patch",
            BranchClassification::PullRequest { .. } => "pull-request",
            BranchClassification::Other { .. } => "other",
        }
    }

    pub fn is_pull_request(&self) -> bool {
        matches!(self, BranchClassification::PullRequest { .. })
    }
}

impl fmt::Display for BranchClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchClassification::Production | BranchClassification::Develop => {
                write!(f, "{}", self.kind())
            }
            BranchClassification::ReleaseCandidate { version } => {
                write!(f, "release-candidate ({})", version)
            }
            BranchClassification::Feature {
                target_version,
                name,
            }
            | BranchClassification::Patch {
                target_version,
                name,
            } => write!(f, "{} '{}' targeting {}", self.kind(), name, target_version),
            BranchClassification::PullRequest { number } => write!(f, "pull-request #{}", number),
            BranchClassification::Other { sanitized_name } => {
                write!(f, "other ({})", sanitized_name)
            }
        }
    }
}

/// Inputs every rule may consult besides the branch name
struct RuleContext<'a> {
    service: &'a str,
    latest: &'a SemanticVersion,
}

/// One entry of the classification table
struct BranchRule {
    matches: fn(&str, &RuleContext<'_>) -> bool,
    build: fn(&str, &RuleContext<'_>) -> BranchClassification,
}

const RULES: &[BranchRule] = &[
    BranchRule {
        matches: |branch, _| matches!(branch, "main" | "master"),
        build: |_, _| BranchClassification::Production,
    },
    BranchRule {
        matches: |branch, _| matches!(branch, "develop" | "development"),
        build: |_, _| BranchClassification::Develop,
    },
    BranchRule {
        matches: |branch, ctx| release_suffix(branch, ctx.service).is_some(),
        build: |branch, ctx| {
            let version = release_suffix(branch, ctx.service).unwrap_or_default();
            if SemanticVersion::parse(version).is_err() {
                warn!(
                    branch,
                    suffix = version,
                    "release branch suffix is not MAJOR.MINOR.PATCH; image tag may be rejected"
                );
            }
            BranchClassification::ReleaseCandidate {
                version: version.to_string(),
            }
        },
    },
    BranchRule {
        matches: |branch, ctx| has_service_prefix(branch, "feature", ctx.service),
        build: |branch, ctx| {
            let (target_version, name) = target_and_name(branch, ctx.latest, "feature");
            BranchClassification::Feature {
                target_version,
                name,
            }
        },
    },
    BranchRule {
        matches: |branch, ctx| has_service_prefix(branch, "patch", ctx.service),
        build: |branch, ctx| {
            let (target_version, name) = target_and_name(branch, ctx.latest, "patch");
            BranchClassification::Patch {
                target_version,
                name,
            }
        },
    },
    BranchRule {
        matches: |branch, _| branch.starts_with("PR-"),
        build: |branch, _| BranchClassification::PullRequest {
            number: branch.trim_start_matches("PR-").to_string(),
        },
    },
    BranchRule {
        matches: |branch, _| branch.starts_with("feature/"),
        build: |branch, ctx| BranchClassification::Feature {
            target_version: ctx.latest.to_string(),
            name: sanitize_name(branch.strip_prefix("feature/").unwrap_or(branch)),
        },
    },
];

/// Classify a branch name for `service`.
///
/// Total over all inputs: anything no rule accepts becomes
/// [`BranchClassification::Other`] with a sanitized name.
pub fn classify_branch(
    branch: &str,
    service: &str,
    latest: &SemanticVersion,
) -> BranchClassification {
    let ctx = RuleContext { service, latest };

    RULES
        .iter()
        .find(|rule| (rule.matches)(branch, &ctx))
        .map(|rule| (rule.build)(branch, &ctx))
        .unwrap_or_else(|| BranchClassification::Other {
            sanitized_name: sanitize_name(branch),
        })
}

/// Replace every non-alphanumeric character with `-` and lower-case the rest.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

/// Text after `<service>/release/` or `release/`
fn release_suffix<'a>(branch: &'a str, service: &str) -> Option<&'a str> {
    branch
        .strip_prefix(service)
        .and_then(|rest| rest.strip_prefix("/release/"))
        .or_else(|| branch.strip_prefix("release/"))
}

/// `<kind>/<service>/...`
fn has_service_prefix(branch: &str, kind: &str, service: &str) -> bool {
    branch
        .strip_prefix(kind)
        .and_then(|rest| rest.strip_prefix('/'))
        .and_then(|rest| rest.strip_prefix(service))
        .is_some_and(|rest| rest.starts_with('/'))
}

/// `kind/<service>/<target>/<name>`: segment 2 is the target version,
/// segment 3 the name; missing or empty segments take the defaults.
fn target_and_name(branch: &str, latest: &SemanticVersion, default_name: &str) -> (String, String) {
    let segments: Vec<&str> = branch.split('/').collect();

    let target = segments
        .get(2)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| latest.to_string());

    let name = segments
        .get(3)
        .filter(|s| !s.is_empty())
        .map(|s| sanitize_name(s))
        .unwrap_or_else(|| default_name.to_string());

    (target, name)
}
