use crate::domain::branch::BranchClassification;
use crate::domain::version::SemanticVersion;

/// Compose the container image tag for a build.
///
/// Pure string composition: the same inputs always give the same tag.
pub fn generate_image_tag(
    classification: &BranchClassification,
    latest: &SemanticVersion,
    build_number: &str,
    commit_sha: &str,
) -> String {
    match classification {
        BranchClassification::Production => latest.to_string(),
        BranchClassification::Develop => {
            format!("{}-dev.{}.{}", latest, build_number, commit_sha)
        }
        BranchClassification::ReleaseCandidate { version } => {
            format!("{}-rc.{}", version, build_number)
        }
        BranchClassification::Feature {
            target_version,
            name,
        }
        | BranchClassification::Patch {
            target_version,
            name,
        } => format!("{}-{}.{}.{}", target_version, name, build_number, commit_sha),
        BranchClassification::PullRequest { number } => {
            format!("{}-pr-{}.{}.{}", latest, number, build_number, commit_sha)
        }
        BranchClassification::Other { sanitized_name } => format!(
            "{}-{}.{}.{}",
            latest, sanitized_name, build_number, commit_sha
        ),
    }
}

/// Extra tags published next to the primary image tag.
///
/// Pull requests get `latest-pr-{n}` instead of `latest`/`stable` so they
/// never overwrite the tags deployments follow.
pub fn artifact_aliases(
    classification: &BranchClassification,
    build_number: &str,
    commit_sha: &str,
) -> Vec<String> {
    let mut aliases = match classification {
        BranchClassification::PullRequest { number } => vec![format!("latest-pr-{}", number)],
        _ => vec!["latest".to_string(), "stable".to_string()],
    };
    aliases.push(format!("commit-{}", commit_sha));
    aliases.push(format!("build-{}", build_number));
    aliases
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latest() -> SemanticVersion {
        SemanticVersion::new(1, 2, 3)
    }

    fn tag(classification: BranchClassification) -> String {
        generate_image_tag(&classification, &latest(), "45", "abc1234")
    }

    #[test]
    fn test_production_tag_is_latest() {
        assert_eq!(tag(BranchClassification::Production), "1.2.3");
    }

    #[test]
    fn test_develop_tag() {
        assert_eq!(tag(BranchClassification::Develop), "1.2.3-dev.45.abc1234");
    }

    #[test]
    fn test_release_candidate_tag() {
        let c = BranchClassification::ReleaseCandidate {
            version: "1.3.0".to_string(),
        };
        assert_eq!(generate_image_tag(&c, &latest(), "12", "abc1234"), "1.3.0-rc.12");
    }

    #[test]
    fn test_feature_and_patch_tags() {
        let feature = BranchClassification::Feature {
            target_version: "1.2.0".to_string(),
            name: "auth".to_string(),
        };
        assert_eq!(tag(feature), "1.2.0-auth.45.abc1234");

        let patch = BranchClassification::Patch {
            target_version: "1.2.4".to_string(),
            name: "patch".to_string(),
        };
        assert_eq!(tag(patch), "1.2.4-patch.45.abc1234");
    }

    #[test]
    fn test_pull_request_tag() {
        let c = BranchClassification::PullRequest {
            number: "42".to_string(),
        };
        assert_eq!(tag(c), "1.2.3-pr-42.45.abc1234");
    }

    #[test]
    fn test_other_tag() {
        let c = BranchClassification::Other {
            sanitized_name: "hotfix-x".to_string(),
        };
        assert_eq!(tag(c), "1.2.3-hotfix-x.45.abc1234");
    }

    #[test]
    fn test_tag_is_deterministic() {
        let c = BranchClassification::Develop;
        let first = generate_image_tag(&c, &latest(), "7", "deadbee");
        for _ in 0..5 {
            assert_eq!(generate_image_tag(&c, &latest(), "7", "deadbee"), first);
        }
    }

    #[test]
    fn test_aliases_for_regular_build() {
        let aliases = artifact_aliases(&BranchClassification::Production, "45", "abc1234");
        assert_eq!(
            aliases,
            vec!["latest", "stable", "commit-abc1234", "build-45"]
        );
    }

    #[test]
    fn test_aliases_for_pull_request() {
        let c = BranchClassification::PullRequest {
            number: "42".to_string(),
        };
        let aliases = artifact_aliases(&c, "45", "abc1234");
        assert_eq!(aliases, vec!["latest-pr-42", "commit-abc1234", "build-45"]);
        assert!(!aliases.contains(&"latest".to_string()));
    }
}
