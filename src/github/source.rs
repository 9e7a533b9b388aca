// src/github/source.rs
// =============================================================================
// The two things the pipeline needs from GitHub, expressed as traits.
//
// GitHubClient implements both against the real REST API; the tests
// implement them with in-memory fakes (see src/testing.rs), which lets us
// check concurrency limits and failure handling without a network.
// =============================================================================

use async_trait::async_trait;

use super::error::GitHubError;
use super::types::{FetchOutcome, RepoPage};

// Lists the repositories of an account, one page at a time
#[async_trait]
pub trait RepoSource: Send + Sync {
    /// `page` starts at 1, like GitHub's own `page` query parameter
    async fn list_page(&self, owner: &str, page: u32) -> Result<RepoPage, GitHubError>;
}

// Reads a single file from a repository at a given branch
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> Result<FetchOutcome, GitHubError>;
}
