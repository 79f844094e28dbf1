//! Version resolution rules
//!
//! [VersionResolver] answers the release questions of a pipeline run for one
//! service: what was released last, what the image tag of this build is,
//! whether the artifact is published and whether a permanent tag is cut.
//! Everything except [VersionResolver::get_latest_tag] and
//! [VersionResolver::create_tag] is pure.

use crate::boundary::FallbackWarning;
use crate::config::ReleaseConfig;
use crate::domain::tag::{
    is_release_version, next_tag_name, pattern_prefix, service_tag_pattern, GLOBAL_TAG_PATTERN,
};
use crate::domain::{
    classify_branch, generate_image_tag, BranchClassification, ReleaseBumpPolicy, SemanticVersion,
};
use crate::error::{Result, TagError};
use crate::git::TagStore;
use tracing::{debug, info, warn};

/// Version a first release starts at when the default branch has history
pub const ESTABLISHED_FIRST_VERSION: SemanticVersion = SemanticVersion {
    major: 0,
    minor: 1,
    patch: 0,
};

/// Version a first release starts at in a near-empty repository
pub const FRESH_FIRST_VERSION: SemanticVersion = SemanticVersion {
    major: 0,
    minor: 0,
    patch: 1,
};

/// Result of a successful [VersionResolver::create_tag]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    Created(String),
    AlreadyExists(String),
}

impl TagOutcome {
    pub fn name(&self) -> &str {
        match self {
            TagOutcome::Created(name) | TagOutcome::AlreadyExists(name) => name,
        }
    }
}

/// Release inputs a pipeline may pass in from its environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseInputs {
    /// `RELEASE_VERSION_OVERRIDE`: exact version to release
    pub version_override: Option<String>,
    /// `RELEASE_BUMP_TYPE`: `major`, `minor` or `patch`
    pub bump: Option<String>,
}

impl ReleaseInputs {
    pub const VERSION_OVERRIDE_VAR: &'static str = "RELEASE_VERSION_OVERRIDE";
    pub const BUMP_TYPE_VAR: &'static str = "RELEASE_BUMP_TYPE";

    /// Read both inputs from the process environment; blank values count as unset.
    pub fn from_env() -> Self {
        let read = |key: &str| {
            std::env::var(key)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        ReleaseInputs {
            version_override: read(Self::VERSION_OVERRIDE_VAR),
            bump: read(Self::BUMP_TYPE_VAR),
        }
    }
}

/// Release decisions for a single service
pub struct VersionResolver<'a, S: TagStore> {
    service: String,
    store: &'a S,
    release: ReleaseConfig,
}

impl<'a, S: TagStore> VersionResolver<'a, S> {
    pub fn new(service: impl Into<String>, store: &'a S, release: ReleaseConfig) -> Self {
        VersionResolver {
            service: service.into(),
            store,
            release,
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Latest released version of the service.
    ///
    /// Looks at `<service>/v*` tags, then global `v*` tags, then falls back to
    /// a commit-count heuristic so a first release is never blocked by the
    /// absence of tags.
    pub fn get_latest_tag(&self) -> Result<SemanticVersion> {
        let service_pattern = service_tag_pattern(&self.service);
        if let Some(version) = self.first_parseable(&service_pattern)? {
            debug!(service = %self.service, %version, "latest service tag");
            return Ok(version);
        }

        warn!(
            "{}",
            FallbackWarning::NoServiceTags {
                service: self.service.clone()
            }
        );

        if let Some(version) = self.first_parseable(GLOBAL_TAG_PATTERN)? {
            info!(%version, "using latest global tag");
            return Ok(version);
        }

        let branch = &self.release.default_branch;
        let commit_count = match self.store.count_commits(branch) {
            Ok(count) => count,
            Err(e) => {
                warn!(
                    "{}",
                    FallbackWarning::CommitCountUnavailable {
                        branch: branch.clone(),
                        reason: e.to_string(),
                    }
                );
                0
            }
        };

        let chosen = if commit_count > self.release.first_release_commit_threshold {
            ESTABLISHED_FIRST_VERSION
        } else {
            FRESH_FIRST_VERSION
        };

        info!(
            "{}",
            FallbackWarning::NoTagsFound {
                commit_count,
                chosen: chosen.to_string(),
            }
        );
        Ok(chosen)
    }

    fn first_parseable(&self, pattern: &str) -> Result<Option<SemanticVersion>> {
        let prefix = pattern_prefix(pattern);

        for tag in self.store.list_tags(pattern)? {
            match SemanticVersion::from_tag(&tag, prefix) {
                Ok(version) => return Ok(Some(version)),
                Err(e) => warn!(
                    "{}",
                    FallbackWarning::UnparsableTag {
                        tag: tag.clone(),
                        reason: e.to_string(),
                    }
                ),
            }
        }

        Ok(None)
    }

    /// Classify `branch` for this service
    pub fn classify_branch(&self, branch: &str, latest: &SemanticVersion) -> BranchClassification {
        let classification = classify_branch(branch, &self.service, latest);
        debug!(branch, kind = classification.kind(), "classified branch");
        classification
    }

    /// Image tag for a build of this service
    pub fn generate_image_tag(
        &self,
        classification: &BranchClassification,
        latest: &SemanticVersion,
        build_number: &str,
        commit_sha: &str,
    ) -> String {
        generate_image_tag(classification, latest, build_number, commit_sha)
    }

    /// Version a production release should carry, given the pipeline's
    /// release inputs.
    ///
    /// A valid override wins outright. Otherwise an explicit bump type bumps
    /// `latest`. With neither, `latest` is released as is.
    pub fn resolve_release_version(
        &self,
        latest: &SemanticVersion,
        inputs: &ReleaseInputs,
    ) -> SemanticVersion {
        if let Some(value) = &inputs.version_override {
            match SemanticVersion::parse(value) {
                Ok(version) => {
                    info!(%version, "using release version override");
                    return version;
                }
                Err(_) => warn!(
                    "{}",
                    FallbackWarning::InvalidVersionOverride {
                        value: value.clone()
                    }
                ),
            }
        }

        match &inputs.bump {
            Some(value) => {
                let policy = parse_bump_policy(value);
                let next = bump_version(latest, policy);
                info!(from = %latest, to = %next, %policy, "bumped release version");
                next
            }
            None => *latest,
        }
    }

    /// Create and push `"<service>/v<version>"`.
    ///
    /// Only bare `MAJOR.MINOR.PATCH` versions are accepted. An existing tag is
    /// left alone and reported as [TagOutcome::AlreadyExists].
    pub fn create_tag(&self, version: &str) -> std::result::Result<TagOutcome, TagError> {
        if !is_release_version(version) {
            return Err(TagError::invalid_format(version));
        }

        let name = next_tag_name(&self.service, version);

        let exists = self
            .store
            .tag_exists(&name)
            .map_err(|e| TagError::store_failure(&name, e))?;
        if exists {
            info!(tag = %name, "tag already exists, nothing to do");
            return Ok(TagOutcome::AlreadyExists(name));
        }

        let message = format!("Release {} {}", self.service, version);
        self.store
            .create_tag(&name, &message)
            .map_err(|e| TagError::store_failure(&name, e))?;
        self.store
            .push_tag(&name)
            .map_err(|e| TagError::store_failure(&name, e))?;

        info!(tag = %name, "created release tag");
        Ok(TagOutcome::Created(name))
    }
}

/// Bump `current` by `policy`; a bump past `u64::MAX` keeps `current`.
pub fn bump_version(current: &SemanticVersion, policy: ReleaseBumpPolicy) -> SemanticVersion {
    current.checked_bump(policy).unwrap_or_else(|| {
        warn!(
            "{}",
            FallbackWarning::BumpOverflow {
                version: current.to_string(),
                policy: policy.to_string(),
            }
        );
        *current
    })
}

/// Bump a version given as text; an unparseable `current` yields 0.1.0.
pub fn bump_version_str(current: &str, policy: ReleaseBumpPolicy) -> SemanticVersion {
    match SemanticVersion::parse(current) {
        Ok(version) => bump_version(&version, policy),
        Err(_) => {
            warn!(
                "{}",
                FallbackWarning::UnparsableVersion {
                    version: current.to_string(),
                    chosen: ESTABLISHED_FIRST_VERSION.to_string(),
                }
            );
            ESTABLISHED_FIRST_VERSION
        }
    }
}

/// Parse a bump type, falling back to patch with a warning
pub fn parse_bump_policy(value: &str) -> ReleaseBumpPolicy {
    value.parse().unwrap_or_else(|_| {
        warn!(
            "{}",
            FallbackWarning::InvalidBumpType {
                value: value.to_string()
            }
        );
        ReleaseBumpPolicy::default()
    })
}

/// Only production and release-candidate builds mint permanent tags
pub fn should_create_tag(classification: &BranchClassification) -> bool {
    matches!(
        classification,
        BranchClassification::Production | BranchClassification::ReleaseCandidate { .. }
    )
}

/// Pull requests never publish; everything else publishes when the branch
/// matches the service's build triggers.
pub fn should_push_artifact<F>(
    classification: &BranchClassification,
    branch: &str,
    is_build_trigger: F,
) -> bool
where
    F: Fn(&str) -> bool,
{
    !classification.is_pull_request() && is_build_trigger(branch)
}
