use crate::error::{Result, TaggerError};
use crate::git::{sort_tags_descending, TagStore};
use git2::{BranchType, Cred, CredentialType, ErrorCode, Repository as Git2Repo};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, instrument};

/// Tag store backed by a local git repository via `git2`
///
/// Tags are created on `HEAD` as annotated tags and pushed to a single
/// configured remote.
pub struct Git2TagStore {
    repo: Mutex<Git2Repo>,
    remote: String,
}

impl Git2TagStore {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P, remote: impl Into<String>) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        Ok(Self::from_git2(repo, remote))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo, remote: impl Into<String>) -> Self {
        Git2TagStore {
            repo: Mutex::new(repo),
            remote: remote.into(),
        }
    }

    fn repo(&self) -> Result<std::sync::MutexGuard<'_, Git2Repo>> {
        self.repo
            .lock()
            .map_err(|_| TaggerError::store("git repository lock poisoned"))
    }
}

impl TagStore for Git2TagStore {
    #[instrument(skip(self))]
    fn list_tags(&self, pattern: &str) -> Result<Vec<String>> {
        let repo = self.repo()?;
        let names = repo.tag_names(Some(pattern))?;

        let mut tags: Vec<String> = names.iter().flatten().map(|s| s.to_string()).collect();
        sort_tags_descending(pattern, &mut tags);

        debug!(count = tags.len(), "listed tags");
        Ok(tags)
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        let repo = self.repo()?;
        let result = match repo.find_reference(&format!("refs/tags/{}", name)) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) if e.code() == ErrorCode::InvalidSpec => Err(TaggerError::store(format!(
                "Invalid tag name '{}': {}",
                name, e
            ))),
            Err(e) => Err(TaggerError::store(format!(
                "Cannot look up tag '{}': {}",
                name, e
            ))),
        };
        result
    }

    #[instrument(skip(self, message))]
    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        let repo = self.repo()?;

        let head = repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map_err(|e| TaggerError::store(format!("Cannot resolve HEAD: {}", e)))?;

        let tagger = repo
            .signature()
            .map_err(|e| TaggerError::store(format!("No tagger identity configured: {}", e)))?;

        repo.tag(name, head.as_object(), &tagger, message, false)
            .map_err(|e| TaggerError::store(format!("Cannot create tag '{}': {}", name, e)))?;

        debug!(commit = %head.id(), "created annotated tag");
        Ok(())
    }

    #[instrument(skip(self), fields(remote = %self.remote))]
    fn push_tag(&self, name: &str) -> Result<()> {
        let repo = self.repo()?;

        let mut remote = repo.find_remote(&self.remote).map_err(|e| {
            TaggerError::store(format!("Cannot find remote '{}': {}", self.remote, e))
        })?;

        // Server-side rejections arrive here rather than as a push() error
        let mut rejection: Option<String> = None;
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            let username = username_from_url.unwrap_or("git");

            if allowed_types.contains(CredentialType::SSH_KEY) {
                for key_path in ssh_key_candidates() {
                    if key_path.exists() {
                        if let Ok(cred) = Cred::ssh_key(username, None, &key_path, None) {
                            return Ok(cred);
                        }
                    }
                }

                if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }
            }

            Cred::default()
        });

        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                rejection = Some(format!("{}: {}", refname, status));
            }
            Ok(())
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let refspec = format!("refs/tags/{}:refs/tags/{}", name, name);
        let pushed = remote.push(&[refspec.as_str()], Some(&mut push_options));
        drop(push_options);

        match pushed {
            Err(e) if e.class() == git2::ErrorClass::Net => Err(TaggerError::store(format!(
                "Network error during push of '{}': {}",
                name, e
            ))),
            Err(e) => Err(TaggerError::store(format!(
                "Failed to push tag '{}': {}",
                name, e
            ))),
            Ok(()) => match rejection {
                Some(reason) => Err(TaggerError::store(format!(
                    "Remote rejected tag '{}': {}",
                    name, reason
                ))),
                None => {
                    debug!("pushed tag");
                    Ok(())
                }
            },
        }
    }

    #[instrument(skip(self))]
    fn count_commits(&self, branch: &str) -> Result<usize> {
        let repo = self.repo()?;

        let head = repo
            .find_branch(branch, BranchType::Local)
            .or_else(|_| repo.find_branch(&format!("{}/{}", self.remote, branch), BranchType::Remote))
            .map_err(|e| TaggerError::branch(format!("Cannot find branch '{}': {}", branch, e)))?
            .into_reference()
            .peel_to_commit()?;

        let mut revwalk = repo.revwalk()?;
        revwalk.push(head.id())?;

        let mut count = 0;
        for oid in revwalk {
            oid?;
            count += 1;
        }

        debug!(count, "counted commits");
        Ok(count)
    }
}

fn ssh_key_candidates() -> Vec<PathBuf> {
    let Some(home) = dirs::home_dir() else {
        return Vec::new();
    };
    ["id_ed25519", "id_rsa", "id_ecdsa"]
        .iter()
        .map(|key| home.join(".ssh").join(key))
        .collect()
}
