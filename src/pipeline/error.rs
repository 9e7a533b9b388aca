// src/pipeline/error.rs
// =============================================================================
// Errors that abort a run.
//
// Decode problems and missing files never show up here: they are handled
// where they happen (a warning, or nothing at all) and the run continues.
// =============================================================================

use thiserror::Error;

use crate::github::GitHubError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("listing repositories of {owner} failed")]
    List {
        owner: String,
        #[source]
        source: GitHubError,
    },

    #[error("fetching the file from repository {repo} failed")]
    Fetch {
        repo: String,
        #[source]
        source: GitHubError,
    },

    /// The writer task is gone, so lines have nowhere to go
    #[error("output closed before all lines were written")]
    OutputClosed,

    #[error("writing output failed")]
    Output(#[source] std::io::Error),

    #[error("a background task panicked or was aborted")]
    Task(#[from] tokio::task::JoinError),
}

impl PipelineError {
    // The GitHub error behind a listing or fetch failure, if any
    pub fn github_error(&self) -> Option<&GitHubError> {
        match self {
            PipelineError::List { source, .. } | PipelineError::Fetch { source, .. } => Some(source),
            _ => None,
        }
    }
}
