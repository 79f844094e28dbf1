//! Domain logic - pure release rules independent of git and registries

pub mod branch;
pub mod context;
pub mod image_tag;
pub mod tag;
pub mod version;

pub use branch::{classify_branch, sanitize_name, BranchClassification};
pub use context::{short_sha, BuildContext};
pub use image_tag::{artifact_aliases, generate_image_tag};
pub use tag::{is_release_version, next_tag_name};
pub use version::{ReleaseBumpPolicy, SemanticVersion};
