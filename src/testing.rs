// src/testing.rs
// =============================================================================
// In-memory stand-in for GitHub, used by the unit tests.
//
// FakeGitHub implements RepoSource and ContentSource from a little script
// built with chained calls:
//
//   FakeGitHub::new()
//       .repo("a", "main", false).file("a", "target\n")
//       .next_page()
//       .repo("b", "main", true)
//
// It also records which repositories were fetched and how many fetches
// were running at once.
// =============================================================================

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::github::{
    ContentSource, FetchOutcome, FileContent, GitHubError, RepoPage, RepoSource, RepositoryRef,
};

enum FakeFile {
    Present(FileContent),
    Failing(u16),
}

pub struct FakeGitHub {
    pages: Vec<Vec<RepositoryRef>>,
    files: HashMap<String, FakeFile>,
    listing_error: Option<u16>,
    latency: Duration,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    fetched: Mutex<Vec<(String, String)>>,
}

impl FakeGitHub {
    pub fn new() -> Self {
        FakeGitHub {
            pages: vec![Vec::new()],
            files: HashMap::new(),
            listing_error: None,
            latency: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            fetched: Mutex::new(Vec::new()),
        }
    }

    // Adds a repository to the current listing page
    pub fn repo(mut self, name: &str, branch: &str, fork: bool) -> Self {
        if let Some(page) = self.pages.last_mut() {
            page.push(RepositoryRef {
                name: name.to_string(),
                default_branch: Some(branch.to_string()),
                fork,
            });
        }
        self
    }

    // Starts a new listing page
    pub fn next_page(mut self) -> Self {
        self.pages.push(Vec::new());
        self
    }

    // Serves `text` as the requested file of `repo`, encoded like GitHub does
    pub fn file(self, repo: &str, text: &str) -> Self {
        let content = FileContent {
            content: github_base64(text.as_bytes()),
            encoding: "base64".to_string(),
        };
        self.raw_file(repo, content)
    }

    pub fn raw_file(mut self, repo: &str, content: FileContent) -> Self {
        self.files.insert(repo.to_string(), FakeFile::Present(content));
        self
    }

    // Fetching the file of `repo` fails with HTTP `status`
    pub fn failing_fetch(mut self, repo: &str, status: u16) -> Self {
        self.files.insert(repo.to_string(), FakeFile::Failing(status));
        self
    }

    pub fn failing_listing(mut self, status: u16) -> Self {
        self.listing_error = Some(status);
        self
    }

    // Every fetch sleeps this long, so concurrent fetches overlap
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    // Repository names in the order their fetch started
    pub fn fetched(&self) -> Vec<String> {
        self.fetched_refs().into_iter().map(|(repo, _)| repo).collect()
    }

    pub fn fetched_refs(&self) -> Vec<(String, String)> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

// GitHub wraps base64 payloads at 60 characters
fn github_base64(bytes: &[u8]) -> String {
    let encoded = STANDARD.encode(bytes);
    let mut wrapped = String::new();
    for chunk in encoded.as_bytes().chunks(60) {
        wrapped.push_str(std::str::from_utf8(chunk).unwrap());
        wrapped.push('\n');
    }
    wrapped
}

fn status_error(url: String, status: u16) -> GitHubError {
    GitHubError::Status {
        url,
        status,
        message: "fake failure".to_string(),
    }
}

#[async_trait]
impl RepoSource for FakeGitHub {
    async fn list_page(&self, owner: &str, page: u32) -> Result<RepoPage, GitHubError> {
        if let Some(status) = self.listing_error {
            return Err(status_error(format!("fake://users/{}/repos", owner), status));
        }

        let index = page.saturating_sub(1) as usize;
        Ok(RepoPage {
            repos: self.pages.get(index).cloned().unwrap_or_default(),
            has_next: index + 1 < self.pages.len(),
        })
    }
}

#[async_trait]
impl ContentSource for FakeGitHub {
    async fn fetch(
        &self,
        _owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> Result<FetchOutcome, GitHubError> {
        self.fetched
            .lock()
            .unwrap()
            .push((repo.to_string(), branch.to_string()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.files.get(repo) {
            Some(FakeFile::Present(content)) => Ok(FetchOutcome::Found(content.clone())),
            Some(FakeFile::Failing(status)) => Err(status_error(
                format!("fake://repos/{}/contents/{}", repo, path),
                *status,
            )),
            None => Ok(FetchOutcome::NotFound),
        }
    }
}

#[test]
fn test_github_base64_wraps_and_decodes() {
    let text = "x".repeat(100);
    let wrapped = github_base64(text.as_bytes());
    assert!(wrapped.lines().all(|l| l.len() <= 60));
    assert!(wrapped.lines().count() > 1);

    let file = FileContent {
        content: wrapped,
        encoding: "base64".to_string(),
    };
    assert_eq!(crate::decode::decode_payload(&file).unwrap(), text);
}
