use crate::domain::{TagPattern, Version};
use crate::error::{ReleaseError, Result};
use git2::{
    Cred, CredentialType, ErrorCode, FetchOptions, Oid, PushOptions, RemoteCallbacks,
    Repository as Git2Repo, Signature, Sort,
};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

const FALLBACK_TAGGER_NAME: &str = "pr-release";
const FALLBACK_TAGGER_EMAIL: &str = "pr-release@users.noreply.github.com";

/// Wrapper around git2::Repository implementing [super::HistoryStore]
pub struct Git2Repository {
    repo: Git2Repo,
    token: Option<String>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo, token: None })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo, token: None }
    }

    /// Use an access token for HTTPS remotes
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// URL of a configured remote
    pub fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        let remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| ReleaseError::remote(format!("Cannot find remote: {}", e)))?;
        Ok(remote.url().map(str::to_string))
    }

    fn tagger(&self) -> Result<Signature<'static>> {
        match self.repo.signature() {
            Ok(sig) => Ok(sig.to_owned()),
            Err(_) => Ok(Signature::now(FALLBACK_TAGGER_NAME, FALLBACK_TAGGER_EMAIL)?),
        }
    }

    fn callbacks(&self) -> RemoteCallbacks<'_> {
        let mut callbacks = RemoteCallbacks::new();
        let token = self.token.clone();
        callbacks.credentials(move |_url, username_from_url, allowed_types| {
            if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
                if let Some(token) = token.as_deref() {
                    return Cred::userpass_plaintext("x-access-token", token);
                }
            }

            if allowed_types.contains(CredentialType::SSH_KEY) {
                if let Ok(cred) = Cred::ssh_key_from_agent(username_from_url.unwrap_or("git")) {
                    return Ok(cred);
                }
            }

            Cred::default()
        });
        callbacks
    }
}

impl super::HistoryStore for Git2Repository {
    fn resolve_commit(&self, rev: &str) -> Result<Oid> {
        let object = self.repo.revparse_single(rev)?;
        let commit = object
            .peel_to_commit()
            .map_err(|e| ReleaseError::tag(format!("'{}' is not a commit: {}", rev, e)))?;
        Ok(commit.id())
    }

    fn latest_reachable_tag(&self, tip: Oid, pattern: &TagPattern) -> Result<Option<String>> {
        let mut candidates: HashMap<Oid, Vec<(Version, String)>> = HashMap::new();

        let names = self.repo.tag_names(Some(&pattern.describe_glob()))?;
        for name in names.iter().flatten() {
            let version = match pattern.parse_version(name) {
                Ok(version) => version,
                Err(_) => {
                    debug!(tag = name, "not a release tag, skipping");
                    continue;
                }
            };
            let commit = match self
                .repo
                .find_reference(&format!("refs/tags/{}", name))
                .and_then(|reference| reference.peel_to_commit())
            {
                Ok(commit) => commit.id(),
                Err(e) => {
                    debug!(tag = name, error = %e, "tag does not point at a commit, skipping");
                    continue;
                }
            };
            candidates
                .entry(commit)
                .or_default()
                .push((version, name.to_string()));
        }

        let mut commit = self.repo.find_commit(tip)?;
        loop {
            if let Some(tags) = candidates.remove(&commit.id()) {
                let nearest = tags.into_iter().max().map(|(_, name)| name);
                debug!(tag = ?nearest, "nearest release tag");
                return Ok(nearest);
            }
            commit = match commit.parent(0) {
                Ok(parent) => parent,
                Err(_) => return Ok(None),
            };
        }
    }

    fn first_parent_commits(&self, exclusive_from: Option<Oid>, tip: Oid) -> Result<Vec<Oid>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
        revwalk.simplify_first_parent()?;
        revwalk.push(tip)?;

        if let Some(from) = exclusive_from {
            revwalk.hide(from)?;
        }

        revwalk.map(|oid| oid.map_err(ReleaseError::from)).collect()
    }

    fn root_commit(&self, tip: Oid) -> Result<Oid> {
        let mut commit = self.repo.find_commit(tip)?;
        while let Ok(parent) = commit.parent(0) {
            commit = parent;
        }
        Ok(commit.id())
    }

    fn find_tag(&self, name: &str) -> Result<Option<Oid>> {
        let reference_name = format!("refs/tags/{}", name);

        match self.repo.find_reference(&reference_name) {
            Ok(reference) => {
                let commit = reference.peel_to_commit().map_err(|e| {
                    ReleaseError::tag(format!("Cannot peel tag '{}': {}", name, e))
                })?;
                Ok(Some(commit.id()))
            }
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(ReleaseError::tag(format!(
                "Cannot find tag '{}': {}",
                name, e
            ))),
        }
    }

    fn create_tag(&self, name: &str, commit: Oid, message: &str) -> Result<()> {
        let object = self
            .repo
            .find_object(commit, None)
            .map_err(|e| ReleaseError::tag(format!("Cannot find object: {}", e)))?;
        let tagger = self.tagger()?;

        match self.repo.tag(name, &object, &tagger, message, false) {
            Ok(_) => Ok(()),
            Err(e) if e.code() == ErrorCode::Exists => {
                Err(ReleaseError::TagExists(name.to_string()))
            }
            Err(e) => Err(ReleaseError::tag(format!("Cannot create tag: {}", e))),
        }
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.repo
            .tag_delete(name)
            .map_err(|e| ReleaseError::tag(format!("Cannot delete tag '{}': {}", name, e)))
    }

    fn push_tag(&self, remote: &str, name: &str) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| ReleaseError::remote(format!("Cannot find remote: {}", e)))?;

        let mut callbacks = self.callbacks();
        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "remote rejected {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let refspec = format!("refs/tags/{}:refs/tags/{}", name, name);
        remote
            .push(&[refspec.as_str()], Some(&mut push_options))
            .map_err(|e| ReleaseError::remote(format!("Push of tag '{}' failed: {}", name, e)))?;

        Ok(())
    }

    fn fetch_tags(&self, remote: &str) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| ReleaseError::remote(format!("Cannot find remote: {}", e)))?;

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(self.callbacks());

        remote
            .fetch(&["+refs/tags/*:refs/tags/*"], Some(&mut fetch_options), None)
            .map_err(|e| ReleaseError::remote(format!("Fetch failed: {}", e)))?;

        Ok(())
    }
}
