// src/github/types.rs
// =============================================================================
// Data types exchanged with the GitHub REST API.
//
// - RepositoryRef: one entry of the "list repositories" response
// - RepoPage: one page of that listing, plus whether another page follows
// - WorkItem: the repository + branch pair a worker fetches the file from
// - FileContent / FetchOutcome: the answer of the "get contents" endpoint
//
// Only the fields we actually read are declared; serde ignores the rest of
// GitHub's (very large) JSON objects.
// =============================================================================

use serde::Deserialize;
use std::fmt;

// A repository as returned by GET /users/{owner}/repos
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryRef {
    pub name: String,
    /// Missing (null) for a few odd repositories, e.g. ones that were never pushed to
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub fork: bool,
}

// One page of the repository listing
#[derive(Debug, Clone, Default)]
pub struct RepoPage {
    pub repos: Vec<RepositoryRef>,
    /// True when the Link header advertises a rel="next" page
    pub has_next: bool,
}

// The unit of work handed to the worker pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub repo: String,
    pub branch: String,
}

impl WorkItem {
    // Builds the work item for a repository, or None when the repository
    // must not be scanned:
    //   - forks are excluded
    //   - a repository without a name or default branch has nothing to read
    pub fn from_repository(repo: &RepositoryRef) -> Option<Self> {
        if repo.fork {
            return None;
        }

        let branch = repo.default_branch.as_deref()?.trim();
        let name = repo.name.trim();
        if name.is_empty() || branch.is_empty() {
            return None;
        }

        Some(WorkItem {
            repo: name.to_string(),
            branch: branch.to_string(),
        })
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.repo, self.branch)
    }
}

// The payload of a file as the contents API ships it
//
// `content` is still transport-encoded; see decode::decode_payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileContent {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: String,
}

// Result of asking for one file on one branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The file exists at that path on that branch
    Found(FileContent),
    /// HTTP 404: the file (or the branch) does not exist. Expected, not an error.
    NotFound,
}
