//! Pipeline workflow orchestration
//!
//! Runs one CI invocation for one service against any tag store and artifact
//! publisher. CLI parsing stays in main.rs; this module only sequences the
//! resolver and its collaborators.

use tracing::{info, instrument};

use crate::config::Config;
use crate::domain::{artifact_aliases, BranchClassification, BuildContext};
use crate::error::{Result, TagError, TaggerError};
use crate::git::TagStore;
use crate::publish::ArtifactPublisher;
use crate::resolver::{
    should_create_tag, should_push_artifact, ReleaseInputs, TagOutcome, VersionResolver,
};

/// Arguments for the pipeline workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineArgs {
    pub service: String,
    pub context: BuildContext,
    pub release_inputs: ReleaseInputs,
    /// Decide everything, build and publish nothing
    pub dry_run: bool,
}

/// What happened to the permanent release tag
#[derive(Debug, Clone, PartialEq)]
pub enum TagDecision {
    /// The branch never mints permanent tags
    NotApplicable,
    Created(String),
    AlreadyExisted(String),
    /// Tag creation was due but skipped
    Skipped { reason: String },
}

/// Result of a pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    pub service: String,
    pub branch: String,
    pub classification: BranchClassification,
    pub image_tag: String,
    pub aliases: Vec<String>,
    /// Whether the branch qualifies for publishing
    pub should_push: bool,
    /// Whether images were actually pushed (false on dry runs)
    pub pushed: bool,
    pub tag: TagDecision,
}

/// Main pipeline workflow
///
/// 1. Resolve the latest released version
/// 2. Classify the branch (applying release inputs on production)
/// 3. Compose the image tag and aliases
/// 4. Build, then push image and aliases when the branch qualifies
/// 5. Cut the permanent release tag when the branch calls for one
///
/// Store and publish failures abort the run. A version that cannot be a
/// permanent tag (release candidates) is recorded as a skip.
#[instrument(skip_all, fields(service = %args.service, branch = %args.context.branch_name))]
pub fn run_pipeline<S, P>(
    args: &PipelineArgs,
    config: &Config,
    store: &S,
    publisher: &P,
) -> Result<PipelineOutcome>
where
    S: TagStore,
    P: ArtifactPublisher,
{
    let service_config = config.service(&args.service)?;
    let triggers = service_config.build_triggers()?;
    let resolver = VersionResolver::new(&args.service, store, config.release.clone());
    let ctx = &args.context;

    let latest = match ctx.latest_tag {
        Some(version) => version,
        None => resolver.get_latest_tag()?,
    };

    let classification = resolver.classify_branch(&ctx.branch_name, &latest);

    let base_version = if classification == BranchClassification::Production {
        resolver.resolve_release_version(&latest, &args.release_inputs)
    } else {
        latest
    };

    let image_tag = resolver.generate_image_tag(
        &classification,
        &base_version,
        &ctx.build_number,
        &ctx.commit_sha,
    );
    let aliases = artifact_aliases(&classification, &ctx.build_number, &ctx.commit_sha);
    let should_push =
        should_push_artifact(&classification, &ctx.branch_name, |b| triggers.matches(b));

    info!(%image_tag, kind = classification.kind(), should_push, "resolved build");

    let mut pushed = false;
    if !args.dry_run {
        publisher.build(&image_tag)?;
        if should_push {
            publisher.push(&image_tag)?;
            for alias in &aliases {
                publisher.tag_alias(&image_tag, alias)?;
                publisher.push(alias)?;
            }
            pushed = true;
        }
    }

    let tag = if !should_create_tag(&classification) {
        TagDecision::NotApplicable
    } else if args.dry_run {
        TagDecision::Skipped {
            reason: "dry run".to_string(),
        }
    } else {
        match resolver.create_tag(&image_tag) {
            Ok(TagOutcome::Created(name)) => TagDecision::Created(name),
            Ok(TagOutcome::AlreadyExists(name)) => TagDecision::AlreadyExisted(name),
            Err(TagError::InvalidFormat { version }) => {
                info!(%version, "not a release version, no permanent tag created");
                TagDecision::Skipped {
                    reason: format!("'{}' is not a bare MAJOR.MINOR.PATCH version", version),
                }
            }
            Err(e @ TagError::StoreFailure { .. }) => return Err(TaggerError::from(e)),
        }
    };

    Ok(PipelineOutcome {
        service: args.service.clone(),
        branch: ctx.branch_name.clone(),
        classification,
        image_tag,
        aliases,
        should_push,
        pushed,
        tag,
    })
}
