use crate::domain::version::SemanticVersion;

/// Length commit hashes are shortened to in image tags
pub const SHORT_SHA_LEN: usize = 7;

/// Trigger inputs for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    pub branch_name: String,
    pub latest_tag: Option<SemanticVersion>,
    pub build_number: String,
    pub commit_sha: String,
}

impl BuildContext {
    /// Build a context; `commit_sha` is cut to its first seven characters.
    pub fn new(
        branch_name: impl Into<String>,
        build_number: impl Into<String>,
        commit_sha: &str,
    ) -> Self {
        BuildContext {
            branch_name: branch_name.into(),
            latest_tag: None,
            build_number: build_number.into(),
            commit_sha: short_sha(commit_sha),
        }
    }

    pub fn with_latest_tag(mut self, latest: SemanticVersion) -> Self {
        self.latest_tag = Some(latest);
        self
    }
}

/// First seven characters of a commit hash (shorter input is kept as is)
pub fn short_sha(sha: &str) -> String {
    sha.trim().chars().take(SHORT_SHA_LEN).collect()
}
