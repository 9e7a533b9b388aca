// src/pipeline/output.rs
// =============================================================================
// The output sink: many workers produce lines, one task writes them.
//
// Workers never touch stdout. They send each line as one String over a
// channel; a single writer task owns the output and writes whole lines, so
// two lines can never be interleaved character by character.
//
// The writer flushes whenever the channel runs dry, which keeps the output
// line-buffered for a reader like `| less` without flushing on every line
// during a burst.
// =============================================================================

use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::error::PipelineError;

// The sending half, cloned into every worker
#[derive(Debug, Clone)]
pub struct OutputSink {
    lines: mpsc::Sender<String>,
}

impl OutputSink {
    // Queues one line (without its trailing newline) for writing
    pub async fn emit(&self, line: String) -> Result<(), PipelineError> {
        self.lines
            .send(line)
            .await
            .map_err(|_| PipelineError::OutputClosed)
    }
}

// Handle on the writer task
pub struct OutputWriter<W> {
    task: JoinHandle<io::Result<(W, usize)>>,
}

impl<W> OutputWriter<W> {
    // Waits until every queued line is written and flushed
    //
    // Only returns once all OutputSink clones are dropped, because that is
    // what closes the channel. Gives the writer back along with the number
    // of lines written.
    pub async fn finish(self) -> Result<(W, usize), PipelineError> {
        self.task.await?.map_err(PipelineError::Output)
    }
}

// Starts the writer task
//
// `capacity` bounds how many lines may wait in the channel before the
// workers have to wait for the writer.
pub fn spawn_writer<W>(writer: W, capacity: usize) -> (OutputSink, OutputWriter<W>)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let task = tokio::spawn(write_lines(rx, writer));
    (OutputSink { lines: tx }, OutputWriter { task })
}

async fn write_lines<W>(mut lines: mpsc::Receiver<String>, writer: W) -> io::Result<(W, usize)>
where
    W: AsyncWrite + Unpin,
{
    let mut out = BufWriter::new(writer);
    let mut written = 0;

    while let Some(line) = lines.recv().await {
        write_line(&mut out, &line).await?;
        written += 1;

        // Drain whatever else is already queued, then flush once
        while let Ok(line) = lines.try_recv() {
            write_line(&mut out, &line).await?;
            written += 1;
        }
        out.flush().await?;
    }

    out.flush().await?;
    Ok((out.into_inner(), written))
}

async fn write_line<W: AsyncWrite + Unpin>(out: &mut BufWriter<W>, line: &str) -> io::Result<()> {
    out.write_all(line.as_bytes()).await?;
    out.write_all(b"\n").await
}
