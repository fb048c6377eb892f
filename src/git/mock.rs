use crate::domain::TagPattern;
use crate::error::{ReleaseError, Result};
use crate::git::HistoryStore;
use git2::Oid;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// Deterministic commit id for tests: twenty copies of `n`
pub fn mock_oid(n: u8) -> Oid {
    Oid::from_bytes(&[n; 20]).unwrap_or_else(|_| Oid::zero())
}

/// In-memory linear history for testing without a repository
///
/// Commits are stored oldest first and form a single first-parent chain.
#[derive(Default)]
pub struct MockHistory {
    commits: Vec<Oid>,
    tags: RefCell<HashMap<String, Oid>>,
    created: RefCell<Vec<String>>,
    pushed: RefCell<Vec<(String, String)>>,
    fetches: RefCell<usize>,
    fetch_error: Option<String>,
    push_error: RefCell<Option<String>>,
    raced_tags: HashSet<String>,
}

impl MockHistory {
    /// Create an empty mock history
    pub fn new() -> Self {
        Self::default()
    }

    /// History of `count` commits: `mock_oid(1)` (root) .. `mock_oid(count)` (HEAD)
    pub fn linear(count: u8) -> Self {
        MockHistory {
            commits: (1..=count).map(mock_oid).collect(),
            ..Self::default()
        }
    }

    /// Append a commit on top of the current head
    pub fn add_commit(&mut self, oid: Oid) {
        self.commits.push(oid);
    }

    /// Add a tag pointing to a commit
    pub fn add_tag(&mut self, name: impl Into<String>, oid: Oid) {
        self.tags.get_mut().insert(name.into(), oid);
    }

    /// Make `fetch_tags` fail with the given reason
    pub fn fail_fetch(&mut self, reason: impl Into<String>) {
        self.fetch_error = Some(reason.into());
    }

    /// Make the next `push_tag` fail with the given reason
    pub fn fail_push(&mut self, reason: impl Into<String>) {
        *self.push_error.get_mut() = Some(reason.into());
    }

    /// Simulate another writer creating `name` between our check and create
    pub fn race_tag(&mut self, name: impl Into<String>) {
        self.raced_tags.insert(name.into());
    }

    pub fn head(&self) -> Option<Oid> {
        self.commits.last().copied()
    }

    /// Tags created through `create_tag`, in order
    pub fn created_tags(&self) -> Vec<String> {
        self.created.borrow().clone()
    }

    /// `(remote, tag)` pairs pushed through `push_tag`, in order
    pub fn pushed_tags(&self) -> Vec<(String, String)> {
        self.pushed.borrow().clone()
    }

    pub fn tag_count(&self) -> usize {
        self.tags.borrow().len()
    }

    pub fn fetch_count(&self) -> usize {
        *self.fetches.borrow()
    }

    fn position(&self, oid: Oid) -> Result<usize> {
        self.commits
            .iter()
            .position(|c| *c == oid)
            .ok_or_else(|| ReleaseError::tag(format!("Unknown commit {}", oid)))
    }
}

/// Minimal `*`-only glob, enough for tag globs like "v*.*.*"
fn glob_matches(glob: &str, text: &str) -> bool {
    match glob.split_once('*') {
        None => glob == text,
        Some((prefix, rest)) => {
            let Some(remaining) = text.strip_prefix(prefix) else {
                return false;
            };
            (0..=remaining.len())
                .filter(|i| remaining.is_char_boundary(*i))
                .any(|i| glob_matches(rest, &remaining[i..]))
        }
    }
}

impl HistoryStore for MockHistory {
    fn resolve_commit(&self, rev: &str) -> Result<Oid> {
        if rev == "HEAD" {
            return self
                .head()
                .ok_or_else(|| ReleaseError::tag("HEAD has no commits"));
        }
        let oid = Oid::from_str(rev)?;
        self.position(oid).map(|_| oid)
    }

    fn latest_reachable_tag(&self, tip: Oid, pattern: &TagPattern) -> Result<Option<String>> {
        let end = self.position(tip)?;
        let glob = pattern.describe_glob();
        let tags = self.tags.borrow();

        for commit in self.commits[..=end].iter().rev() {
            let nearest = tags
                .iter()
                .filter(|(name, oid)| *oid == commit && glob_matches(&glob, name))
                .filter_map(|(name, _)| {
                    let version = pattern.parse_version(name).ok()?;
                    Some((version, name.to_string()))
                })
                .max()
                .map(|(_, name)| name);
            if nearest.is_some() {
                return Ok(nearest);
            }
        }
        Ok(None)
    }

    fn first_parent_commits(&self, exclusive_from: Option<Oid>, tip: Oid) -> Result<Vec<Oid>> {
        let end = self.position(tip)?;
        let start = match exclusive_from {
            Some(from) => self.position(from)? + 1,
            None => 0,
        };
        if start > end {
            return Ok(Vec::new());
        }
        Ok(self.commits[start..=end].to_vec())
    }

    fn root_commit(&self, tip: Oid) -> Result<Oid> {
        self.position(tip)?;
        self.commits
            .first()
            .copied()
            .ok_or_else(|| ReleaseError::tag("History has no commits"))
    }

    fn find_tag(&self, name: &str) -> Result<Option<Oid>> {
        Ok(self.tags.borrow().get(name).copied())
    }

    fn create_tag(&self, name: &str, commit: Oid, _message: &str) -> Result<()> {
        if self.raced_tags.contains(name) || self.tags.borrow().contains_key(name) {
            return Err(ReleaseError::TagExists(name.to_string()));
        }
        self.position(commit)?;
        self.tags.borrow_mut().insert(name.to_string(), commit);
        self.created.borrow_mut().push(name.to_string());
        Ok(())
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        match self.tags.borrow_mut().remove(name) {
            Some(_) => Ok(()),
            None => Err(ReleaseError::tag(format!("Tag '{}' not found", name))),
        }
    }

    fn push_tag(&self, remote: &str, name: &str) -> Result<()> {
        if let Some(reason) = self.push_error.borrow_mut().take() {
            return Err(ReleaseError::remote(reason));
        }
        self.pushed
            .borrow_mut()
            .push((remote.to_string(), name.to_string()));
        Ok(())
    }

    fn fetch_tags(&self, _remote: &str) -> Result<()> {
        *self.fetches.borrow_mut() += 1;
        match &self.fetch_error {
            Some(reason) => Err(ReleaseError::remote(reason.clone())),
            None => Ok(()),
        }
    }
}
