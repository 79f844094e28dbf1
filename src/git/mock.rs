use crate::error::{Result, TaggerError};
use crate::git::{glob_matches, sort_tags_descending, TagStore};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;

/// In-memory tag store for tests and dry runs
#[derive(Default)]
pub struct MockTagStore {
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    tags: BTreeMap<String, String>,
    pushed: BTreeSet<String>,
    commit_counts: HashMap<String, usize>,
    create_calls: usize,
    fail_create: bool,
    fail_push: bool,
}

impl MockTagStore {
    /// Create a new empty mock store
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add an existing tag
    pub fn with_tag(self, name: impl Into<String>) -> Self {
        self.lock()
            .tags
            .insert(name.into(), "existing tag".to_string());
        self
    }

    /// Builder: set the commit count reported for a branch
    pub fn with_commits(self, branch: impl Into<String>, count: usize) -> Self {
        self.lock().commit_counts.insert(branch.into(), count);
        self
    }

    /// Builder: make every `create_tag` call fail
    pub fn failing_create(self) -> Self {
        self.lock().fail_create = true;
        self
    }

    /// Builder: make every `push_tag` call fail
    pub fn failing_push(self) -> Self {
        self.lock().fail_push = true;
        self
    }

    /// Names of tags that were pushed
    pub fn pushed_tags(&self) -> Vec<String> {
        self.lock().pushed.iter().cloned().collect()
    }

    /// How many times `create_tag` actually created a tag
    pub fn create_calls(&self) -> usize {
        self.lock().create_calls
    }

    /// Annotation message stored for a tag
    pub fn message(&self, name: &str) -> Option<String> {
        self.lock().tags.get(name).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A poisoned lock only means another test thread panicked mid-update.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TagStore for MockTagStore {
    fn list_tags(&self, pattern: &str) -> Result<Vec<String>> {
        let mut tags: Vec<String> = self
            .lock()
            .tags
            .keys()
            .filter(|name| glob_matches(pattern, name))
            .cloned()
            .collect();
        sort_tags_descending(pattern, &mut tags);
        Ok(tags)
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.lock().tags.contains_key(name))
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        let mut state = self.lock();
        if state.fail_create {
            return Err(TaggerError::store(format!("Cannot create tag '{}'", name)));
        }
        if state.tags.contains_key(name) {
            return Err(TaggerError::store(format!("Tag '{}' already exists", name)));
        }
        state.tags.insert(name.to_string(), message.to_string());
        state.create_calls += 1;
        Ok(())
    }

    fn push_tag(&self, name: &str) -> Result<()> {
        let mut state = self.lock();
        if state.fail_push {
            return Err(TaggerError::store(format!("Push rejected for '{}'", name)));
        }
        if !state.tags.contains_key(name) {
            return Err(TaggerError::store(format!("No local tag '{}'", name)));
        }
        state.pushed.insert(name.to_string());
        Ok(())
    }

    fn count_commits(&self, branch: &str) -> Result<usize> {
        self.lock()
            .commit_counts
            .get(branch)
            .copied()
            .ok_or_else(|| TaggerError::branch(format!("Branch not found: {}", branch)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_store_list_sorted_and_filtered() {
        let store = MockTagStore::new()
            .with_tag("backend/v1.0.0")
            .with_tag("backend/v1.2.0")
            .with_tag("frontend/v9.0.0");

        let tags = store.list_tags("backend/v*").unwrap();
        assert_eq!(tags, vec!["backend/v1.2.0", "backend/v1.0.0"]);
    }

    #[test]
    fn test_mock_store_create_and_push() {
        let store = MockTagStore::new();
        store.create_tag("backend/v1.0.0", "Release 1.0.0").unwrap();
        store.push_tag("backend/v1.0.0").unwrap();

        assert!(store.tag_exists("backend/v1.0.0").unwrap());
        assert_eq!(store.pushed_tags(), vec!["backend/v1.0.0"]);
        assert_eq!(store.message("backend/v1.0.0").as_deref(), Some("Release 1.0.0"));
        assert_eq!(store.create_calls(), 1);
    }

    #[test]
    fn test_mock_store_duplicate_create_fails() {
        let store = MockTagStore::new().with_tag("v1.0.0");
        assert!(store.create_tag("v1.0.0", "again").is_err());
    }

    #[test]
    fn test_mock_store_commit_counts() {
        let store = MockTagStore::new().with_commits("main", 12);
        assert_eq!(store.count_commits("main").unwrap(), 12);
        assert!(store.count_commits("master").is_err());
    }

    #[test]
    fn test_mock_store_failures() {
        let store = MockTagStore::new().failing_create();
        assert!(store.create_tag("x", "m").is_err());

        let store = MockTagStore::new().failing_push();
        store.create_tag("x", "m").unwrap();
        assert!(store.push_tag("x").is_err());
    }
}
