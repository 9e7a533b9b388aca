// src/pipeline/enumerate.rs
// =============================================================================
// This module lists an account's repositories and feeds the worker pool.
//
// Two steps:
// 1. list_repositories: ask GitHub for one page (or every page) of repos
// 2. feed: turn each non-fork repo into a WorkItem and send it to the pool,
//    then drop the sender so the workers know no more work is coming
//
// Rust concepts:
// - Bounded channels: send().await waits while the pool is saturated,
//   which is our backpressure
// - Ownership: `feed` takes the Sender by value, so returning drops it
// =============================================================================

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::github::{GitHubError, RepoSource, RepositoryRef, WorkItem};

// How much of the listing to read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageLimit {
    /// Only the first page (up to 100 most recently updated repositories)
    #[default]
    First,
    /// Follow pagination until GitHub reports no further page
    All,
}

// What the producer did with the listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub submitted: usize,
    pub forks_skipped: usize,
    /// Repositories without a usable name or default branch
    pub unusable_skipped: usize,
    /// True when feeding stopped early because the run was cancelled
    pub cancelled: bool,
}

// Reads the repository listing of `owner`
//
// Any error is returned as-is: a failed listing means we cannot know what
// the account contains, so the caller aborts the run.
pub async fn list_repositories<S>(
    source: &S,
    owner: &str,
    limit: PageLimit,
) -> Result<Vec<RepositoryRef>, GitHubError>
where
    S: RepoSource + ?Sized,
{
    let mut repos = Vec::new();
    let mut page = 1;

    loop {
        let batch = source.list_page(owner, page).await?;
        debug!(page, count = batch.repos.len(), has_next = batch.has_next, "listed repositories");
        repos.extend(batch.repos);

        if limit == PageLimit::First || !batch.has_next {
            break;
        }
        page += 1;
    }

    Ok(repos)
}

// Sends one WorkItem per scannable repository into `items`
//
// Stops early if `cancel` fires or the pool hangs up. Either way the
// sender is dropped on return, closing the channel.
pub async fn feed(
    repos: Vec<RepositoryRef>,
    items: mpsc::Sender<WorkItem>,
    cancel: &CancellationToken,
) -> FeedStats {
    let mut stats = FeedStats::default();

    for repo in repos {
        if repo.fork {
            debug!(repo = %repo.name, "skipping fork");
            stats.forks_skipped += 1;
            continue;
        }

        let Some(item) = WorkItem::from_repository(&repo) else {
            debug!(repo = %repo.name, "skipping repository without a default branch");
            stats.unusable_skipped += 1;
            continue;
        };

        let sent = tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            result = items.send(item) => result.is_ok(),
        };
        if !sent {
            stats.cancelled = true;
            break;
        }
        stats.submitted += 1;
    }

    stats
}
