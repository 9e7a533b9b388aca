// src/pipeline/pool.rs
// =============================================================================
// A fixed-size pool of workers sharing one input channel.
//
// How it works:
// 1. The producer sends items into a bounded mpsc channel
// 2. `concurrency` tokio tasks share the receiving end behind a Mutex
// 3. Each worker takes one item, runs the handler on it, and goes back
//    for the next one
// 4. When the channel is closed and drained every worker exits, and
//    `wait` returns
//
// Failure handling:
// - A handler returning Err cancels the shared CancellationToken
// - The other workers notice, drop whatever they were doing and exit
// - `wait` hands the first error back to the caller, who decides what to do
//
// Why not stream::buffer_unordered?
// - It needs the whole input as a stream up front
// - A channel lets the producer and the workers run at the same time
// =============================================================================

use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::debug;

// What one worker did before it exited
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Items the handler finished successfully
    pub handled: usize,
    /// Items dropped mid-flight because the run was cancelled
    pub abandoned: usize,
}

// Totals over every worker of the pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub workers: usize,
    pub handled: usize,
    pub abandoned: usize,
}

pub struct WorkerPool<E> {
    workers: JoinSet<Result<WorkerStats, E>>,
    cancel: CancellationToken,
}

impl<E> WorkerPool<E>
where
    E: From<JoinError> + Send + 'static,
{
    // Starts `concurrency` workers reading from `items`
    //
    // Parameters:
    //   concurrency: number of workers (at least 1)
    //   items: receiving end of the work channel; closing the sender ends the run
    //   handler: async function called once per item
    //   cancel: cancelled by the pool on the first error; callers may cancel it too
    pub fn spawn<T, H, Fut>(
        concurrency: usize,
        items: mpsc::Receiver<T>,
        handler: H,
        cancel: CancellationToken,
    ) -> Self
    where
        T: Send + 'static,
        H: Fn(T) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
    {
        let queue = Arc::new(Mutex::new(items));
        let mut workers = JoinSet::new();

        for id in 0..concurrency.max(1) {
            workers.spawn(worker_loop(
                id,
                Arc::clone(&queue),
                handler.clone(),
                cancel.clone(),
            ));
        }

        WorkerPool { workers, cancel }
    }

    // Waits for every worker to exit
    //
    // Returns the first error a handler reported, or the summed stats.
    // A panicking worker cancels the rest, like a handler error would.
    pub async fn wait(mut self) -> Result<PoolStats, E> {
        let mut stats = PoolStats::default();
        let mut first_error: Option<E> = None;

        while let Some(joined) = self.workers.join_next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(join_error) => {
                    self.cancel.cancel();
                    Err(E::from(join_error))
                }
            };

            match outcome {
                Ok(worker) => {
                    stats.workers += 1;
                    stats.handled += worker.handled;
                    stats.abandoned += worker.abandoned;
                }
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(stats),
        }
    }
}

// Takes the next item, or None once the channel is closed and empty
//
// Holding the lock while waiting in recv() is what makes delivery
// at-most-once: only one worker at a time can be receiving.
async fn next_item<T>(queue: &Mutex<mpsc::Receiver<T>>) -> Option<T> {
    queue.lock().await.recv().await
}

async fn worker_loop<T, H, Fut, E>(
    id: usize,
    queue: Arc<Mutex<mpsc::Receiver<T>>>,
    handler: H,
    cancel: CancellationToken,
) -> Result<WorkerStats, E>
where
    H: Fn(T) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    let mut stats = WorkerStats::default();

    loop {
        // Idle: wait for work (or for the run to be cancelled)
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            item = next_item(&queue) => item,
        };
        let Some(item) = next else { break };

        // Busy: run the handler unless the run gets cancelled first
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            outcome = handler(item) => Some(outcome),
        };

        match outcome {
            Some(Ok(())) => stats.handled += 1,
            Some(Err(e)) => {
                debug!(worker = id, "handler failed, cancelling the run");
                cancel.cancel();
                return Err(e);
            }
            None => {
                stats.abandoned += 1;
                break;
            }
        }
    }

    debug!(
        worker = id,
        handled = stats.handled,
        abandoned = stats.abandoned,
        "worker finished"
    );
    Ok(stats)
}
