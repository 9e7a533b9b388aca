// src/pipeline/mod.rs
// =============================================================================
// The fetch-and-filter pipeline, wired together.
//
//   list repos ──> [work channel] ──> N workers ──> [line channel] ──> stdout
//   (producer)                      fetch + decode               (writer task)
//
// Submodules:
// - enumerate: repository listing and the producer side of the work channel
// - pool: the fixed-size worker pool
// - handler: what a worker does with one repository
// - output: the single writer that owns stdout
// - error: PipelineError
//
// The producer and the pool run at the same time; memory stays bounded by
// the two channel capacities no matter how many repositories the account has.
// =============================================================================

mod enumerate;
mod error;
mod handler;
mod output;
mod pool;

pub use enumerate::PageLimit;
pub use error::PipelineError;

use std::sync::Arc;
use tokio::io::AsyncWrite;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::RunOptions;
use crate::github::{ContentSource, RepoSource, WorkItem};
use enumerate::{feed, list_repositories, FeedStats};
use handler::{FileHandler, Tally, TallySnapshot};
use output::spawn_writer;
use pool::{PoolStats, WorkerPool};

// How many lines may queue up per worker before workers wait on the writer
const LINES_PER_WORKER: usize = 64;

// Numbers describing a finished run, logged by main
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub listed: usize,
    pub feed: FeedStats,
    pub pool: PoolStats,
    pub files: TallySnapshot,
    pub lines_written: usize,
}

// Runs the whole pipeline and writes the merged lines to `out`
//
// Returns the summary and the writer (tests read the buffer back; main
// just drops stdout).
//
// Errors:
// - listing failure: nothing is fetched
// - unexpected fetch failure: remaining work is cancelled
// - output failure (e.g. a closed pipe)
pub async fn run<G, W>(
    options: &RunOptions,
    github: Arc<G>,
    out: W,
) -> Result<(RunSummary, W), PipelineError>
where
    G: RepoSource + ContentSource + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let concurrency = options.concurrency.max(1);
    let cancel = CancellationToken::new();
    let tally = Arc::new(Tally::default());

    let (sink, writer) = spawn_writer(out, concurrency * LINES_PER_WORKER);
    // Capacity == concurrency: the producer waits once every worker is busy
    // and `concurrency` more items are queued
    let (items_tx, items_rx) = mpsc::channel(concurrency);

    let handler = FileHandler::new(
        Arc::clone(&github),
        &options.owner,
        &options.file_path,
        sink,
        Arc::clone(&tally),
    );
    let pool = WorkerPool::spawn(
        concurrency,
        items_rx,
        move |item: WorkItem| {
            let handler = handler.clone();
            async move { handler.handle(item).await }
        },
        cancel.clone(),
    );

    let producer = async {
        let listing = list_repositories(&*github, &options.owner, options.pages).await;
        let repos = match listing {
            Ok(repos) => repos,
            Err(source) => {
                cancel.cancel();
                return Err(PipelineError::List {
                    owner: options.owner.clone(),
                    source,
                });
            }
        };
        let listed = repos.len();
        info!(owner = %options.owner, repositories = listed, "listed repositories");
        let stats = feed(repos, items_tx, &cancel).await;
        Ok((listed, stats))
    };

    let (produced, pooled) = futures::future::join(producer, pool.wait()).await;
    // Every OutputSink clone lived inside the pool, so the writer now sees
    // a closed channel and can finish
    let written = writer.finish().await;

    let (listed, feed_stats) = produced?;
    let (pool_stats, (out, lines_written)) = match (pooled, written) {
        // The writer's own error says why the output closed
        (Err(PipelineError::OutputClosed), Err(e)) => return Err(e),
        (Err(e), _) | (Ok(_), Err(e)) => return Err(e),
        (Ok(pool_stats), Ok(written)) => (pool_stats, written),
    };

    let summary = RunSummary {
        listed,
        feed: feed_stats,
        pool: pool_stats,
        files: tally.snapshot(),
        lines_written,
    };
    Ok((summary, out))
}
