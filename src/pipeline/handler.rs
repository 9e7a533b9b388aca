// src/pipeline/handler.rs
// =============================================================================
// What a worker does with one WorkItem:
//
//   fetch the file  ->  decode it  ->  send each meaningful line to the sink
//
// Outcomes:
// - file missing (404): nothing is emitted, not an error
// - payload cannot be decoded: a warning is logged, nothing is emitted
// - any other fetch failure: returned as PipelineError::Fetch, which
//   makes the pool cancel the whole run
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use super::error::PipelineError;
use super::output::OutputSink;
use crate::decode::{decode_payload, meaningful_lines};
use crate::github::{ContentSource, FetchOutcome, WorkItem};

// Per-run counters, shared by every clone of the handler
#[derive(Debug, Default)]
pub struct Tally {
    found: AtomicUsize,
    not_found: AtomicUsize,
    undecodable: AtomicUsize,
}

// A plain copy of the counters once the run is over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TallySnapshot {
    pub found: usize,
    pub not_found: usize,
    pub undecodable: usize,
}

impl Tally {
    pub fn snapshot(&self) -> TallySnapshot {
        TallySnapshot {
            found: self.found.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            undecodable: self.undecodable.load(Ordering::Relaxed),
        }
    }
}

// Everything a worker needs to process an item; cheap to clone
pub struct FileHandler<C: ?Sized> {
    source: Arc<C>,
    owner: Arc<str>,
    path: Arc<str>,
    sink: OutputSink,
    tally: Arc<Tally>,
}

// Written by hand: #[derive(Clone)] would wrongly require C: Clone
impl<C: ?Sized> Clone for FileHandler<C> {
    fn clone(&self) -> Self {
        FileHandler {
            source: Arc::clone(&self.source),
            owner: Arc::clone(&self.owner),
            path: Arc::clone(&self.path),
            sink: self.sink.clone(),
            tally: Arc::clone(&self.tally),
        }
    }
}

impl<C> FileHandler<C>
where
    C: ContentSource + ?Sized,
{
    pub fn new(source: Arc<C>, owner: &str, path: &str, sink: OutputSink, tally: Arc<Tally>) -> Self {
        FileHandler {
            source,
            owner: Arc::from(owner),
            path: Arc::from(path),
            sink,
            tally,
        }
    }

    pub async fn handle(&self, item: WorkItem) -> Result<(), PipelineError> {
        let outcome = self
            .source
            .fetch(&self.owner, &item.repo, &item.branch, &self.path)
            .await
            .map_err(|source| PipelineError::Fetch {
                repo: item.repo.clone(),
                source,
            })?;

        let file = match outcome {
            FetchOutcome::Found(file) => file,
            FetchOutcome::NotFound => {
                debug!(%item, path = %self.path, "file not found");
                self.tally.not_found.fetch_add(1, Ordering::Relaxed);
                return Ok(());
            }
        };
        self.tally.found.fetch_add(1, Ordering::Relaxed);

        let text = match decode_payload(&file) {
            Ok(text) => text,
            Err(e) => {
                warn!(%item, error = %e, "skipping file that could not be decoded");
                self.tally.undecodable.fetch_add(1, Ordering::Relaxed);
                return Ok(());
            }
        };

        let mut emitted = 0;
        for line in meaningful_lines(&text) {
            self.sink.emit(line.to_string()).await?;
            emitted += 1;
        }
        debug!(%item, lines = emitted, "file processed");

        Ok(())
    }
}
