// src/github/mod.rs
// =============================================================================
// This module handles everything that talks to GitHub.
//
// Submodules:
// - client: reqwest-based client for the REST API
// - source: the RepoSource / ContentSource traits the pipeline depends on
// - types: repository, work item and file payload types
// - error: GitHubError
//
// Rust concepts:
// - Modules: Organizing related functionality
// - Public API: What other parts of the app can use
// =============================================================================

mod client;
mod error;
mod source;
mod types;

pub use client::GitHubClient;
pub use error::GitHubError;
pub use source::{ContentSource, RepoSource};
pub use types::{FetchOutcome, FileContent, RepoPage, RepositoryRef, WorkItem};
