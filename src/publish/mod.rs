//! Container artifact publishing
//!
//! [ArtifactPublisher] is the seam between release decisions and the
//! container tooling:
//!
//! - [docker::DockerPublisher] runs the `docker` CLI
//! - [mock::RecordingPublisher] records calls in memory for tests and dry runs

pub mod docker;
pub mod mock;

pub use docker::DockerPublisher;
pub use mock::{PublishCall, RecordingPublisher};

use crate::error::Result;

/// Builds and pushes container images identified by tag
pub trait ArtifactPublisher: Send + Sync {
    /// Build the image and tag it as `tag`
    fn build(&self, tag: &str) -> Result<()>;

    /// Push the image tagged `tag` to the registry
    fn push(&self, tag: &str) -> Result<()>;

    /// Point `alias` at the image already tagged `source_tag`
    fn tag_alias(&self, source_tag: &str, alias: &str) -> Result<()>;
}
