//! Tag store abstraction layer
//!
//! The resolver never talks to version control directly. It goes through the
//! [TagStore] trait, which has two implementations:
//!
//! - [repository::Git2TagStore]: a real implementation using the `git2` crate
//! - [mock::MockTagStore]: an in-memory implementation for tests and dry runs
//!
//! # Usage
//!
//! ```rust
//! # use ci_tagger::git::TagStore;
//! # fn example<S: TagStore>(store: &S) -> Result<(), Box<dyn std::error::Error>> {
//! let tags = store.list_tags("backend/v*")?;
//! if let Some(latest) = tags.first() {
//!     println!("latest backend release: {}", latest);
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockTagStore;
pub use repository::Git2TagStore;

use crate::domain::tag::pattern_prefix;
use crate::domain::SemanticVersion;
use crate::error::Result;
use std::cmp::Ordering;

/// Source-control tag operations the resolver depends on
///
/// ## Thread Safety
///
/// Implementors must be `Send + Sync`.
///
/// ## Atomicity
///
/// `create_tag` callers check [TagStore::tag_exists] first. Two runs racing on
/// the same name can both see it missing; implementations that need strict
/// create-if-absent semantics have to provide it themselves.
pub trait TagStore: Send + Sync {
    /// List tag names matching a glob (e.g. `"backend/v*"`)
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Matching names, highest version first
    /// * `Err` - If the underlying store cannot be read
    fn list_tags(&self, pattern: &str) -> Result<Vec<String>>;

    /// Whether a tag with exactly this name exists
    fn tag_exists(&self, name: &str) -> Result<bool>;

    /// Create a tag on the current commit
    ///
    /// # Arguments
    /// * `name` - Tag name (e.g. `"backend/v1.2.3"`)
    /// * `message` - Annotation message
    fn create_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Publish an existing tag to the shared remote
    fn push_tag(&self, name: &str) -> Result<()>;

    /// Number of commits reachable from a branch head
    fn count_commits(&self, branch: &str) -> Result<usize>;
}

/// Sort tag names matching `pattern` by descending version.
///
/// The version is read from the text after the pattern's literal prefix with
/// the same strict parser the resolver uses. Names that do not parse sort
/// after every parseable name, in reverse lexical order.
pub fn sort_tags_descending(pattern: &str, tags: &mut [String]) {
    let prefix = pattern_prefix(pattern);
    let key = |tag: &str| SemanticVersion::from_tag(tag, prefix).ok();

    tags.sort_by(|a, b| match (key(a), key(b)) {
        (Some(va), Some(vb)) => vb.cmp(&va).then_with(|| b.cmp(a)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.cmp(a),
    });
}

/// Minimal glob match supporting a single trailing `*`, the only form the
/// resolver uses. Other patterns are compared literally.
pub fn glob_matches(pattern: &str, name: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) if !prefix.contains(['*', '?', '[']) => name.starts_with(prefix),
        _ => pattern == name,
    }
}
