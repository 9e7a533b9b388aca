// src/github/client.rs
// =============================================================================
// This module talks to the GitHub REST API.
//
// Endpoints used:
// - GET /users/{owner}/repos?type=public&sort=updated&per_page=100&page=N
//   (works for users and organizations alike)
// - GET /repos/{owner}/{repo}/contents/{path}?ref={branch}
//
// Why the API and not raw.githubusercontent.com?
// - We need the repository listing anyway, which only the API offers
// - Authenticated API calls get a much higher rate limit
// - The contents API tells "file missing" (404) apart from everything else
//
// Rust concepts:
// - async functions: For network I/O
// - Result + ?: every failure becomes a GitHubError the caller can inspect
// - Traits: GitHubClient implements RepoSource and ContentSource
// =============================================================================

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::error::{api_message, GitHubError};
use super::source::{ContentSource, RepoSource};
use super::types::{FetchOutcome, FileContent, RepoPage, RepositoryRef};

// GitHub's maximum page size for the repository listing
pub const PER_PAGE: u32 = 100;

// Pins the response format so a future API version cannot change it under us
const API_VERSION: &str = "2022-11-28";

// A thin, cheaply clonable wrapper around a configured reqwest client
//
// reqwest::Client already pools connections internally, so one instance
// is shared by every worker.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_base: Url,
}

impl GitHubClient {
    // Creates a client that authenticates every request with `token`
    //
    // Parameters:
    //   token: personal access token (sent as "Authorization: Bearer ...")
    //   api_base: https://api.github.com, or https://ghe.example.com/api/v3
    //   timeout: per-request timeout, so a hung call cannot hang a worker forever
    pub fn new(token: &str, api_base: Url, timeout: Duration) -> Result<Self, GitHubError> {
        if api_base.cannot_be_a_base() {
            return Err(GitHubError::InvalidBaseUrl(api_base.to_string()));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| GitHubError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));
        // GitHub rejects requests without a User-Agent
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("repo-lines/", env!("CARGO_PKG_VERSION"))),
        );

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(GitHubError::Client)?;

        Ok(GitHubClient { http, api_base })
    }

    // Appends path segments to the API base URL
    //
    // Each segment is percent-encoded on its own, so a file path like
    // "config/app settings.yml" must be passed as separate segments.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url, GitHubError> {
        build_endpoint(&self.api_base, segments)
    }

    // Sends a GET request, turning transport failures into GitHubError
    async fn get(&self, url: &Url) -> Result<Response, GitHubError> {
        debug!(%url, "GET");
        self.http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| GitHubError::Transport {
                url: url.to_string(),
                source,
            })
    }

    async fn body_text(url: &Url, response: Response) -> Result<String, GitHubError> {
        response
            .text()
            .await
            .map_err(|source| GitHubError::Transport {
                url: url.to_string(),
                source,
            })
    }

    // Converts a non-success response into GitHubError::Status
    async fn status_error(url: &Url, response: Response) -> GitHubError {
        let status = response.status().as_u16();
        // The body is only used for the message; a failure to read it is not worth reporting
        let body = response.text().await.unwrap_or_default();
        GitHubError::Status {
            url: url.to_string(),
            status,
            message: api_message(&body),
        }
    }
}

#[async_trait]
impl RepoSource for GitHubClient {
    async fn list_page(&self, owner: &str, page: u32) -> Result<RepoPage, GitHubError> {
        let mut url = self.endpoint(["users", owner, "repos"])?;
        url.query_pairs_mut()
            .append_pair("type", "public")
            .append_pair("sort", "updated")
            .append_pair("per_page", &PER_PAGE.to_string())
            .append_pair("page", &page.to_string());

        let response = self.get(&url).await?;
        if !response.status().is_success() {
            return Err(Self::status_error(&url, response).await);
        }

        let has_next = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(has_next_link)
            .unwrap_or(false);

        let body = Self::body_text(&url, response).await?;
        let repos: Vec<RepositoryRef> =
            serde_json::from_str(&body).map_err(|source| GitHubError::Body {
                url: url.to_string(),
                source,
            })?;

        Ok(RepoPage { repos, has_next })
    }
}

#[async_trait]
impl ContentSource for GitHubClient {
    async fn fetch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> Result<FetchOutcome, GitHubError> {
        let segments = ["repos", owner, repo, "contents"]
            .into_iter()
            .chain(path.split('/').filter(|s| !s.is_empty()));
        let mut url = self.endpoint(segments)?;
        url.query_pairs_mut().append_pair("ref", branch);

        let response = self.get(&url).await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(FetchOutcome::NotFound);
        }
        if !status.is_success() {
            return Err(Self::status_error(&url, response).await);
        }

        let body = Self::body_text(&url, response).await?;
        parse_contents(&url, repo, path, &body).map(FetchOutcome::Found)
    }
}

// Shape of a single entry of the contents API
#[derive(Deserialize)]
struct ContentEntry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(flatten)]
    file: FileContent,
}

// Parses a contents API body
//
// A file comes back as a JSON object with "type": "file".
// A directory comes back as a JSON array of entries.
fn parse_contents(url: &Url, repo: &str, path: &str, body: &str) -> Result<FileContent, GitHubError> {
    let body_error = |source| GitHubError::Body {
        url: url.to_string(),
        source,
    };

    let value: serde_json::Value = serde_json::from_str(body).map_err(body_error)?;
    if value.is_array() {
        return Err(GitHubError::NotAFile {
            repo: repo.to_string(),
            path: path.to_string(),
            kind: "directory".to_string(),
        });
    }

    let entry: ContentEntry = serde_json::from_value(value).map_err(body_error)?;
    if entry.kind != "file" {
        return Err(GitHubError::NotAFile {
            repo: repo.to_string(),
            path: path.to_string(),
            kind: entry.kind,
        });
    }

    Ok(entry.file)
}

fn build_endpoint<'a>(
    base: &Url,
    segments: impl IntoIterator<Item = &'a str>,
) -> Result<Url, GitHubError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| GitHubError::InvalidBaseUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

// Checks a Link header for a next page
//
// Example header:
//   <https://api.github.com/user/1/repos?page=2>; rel="next", <...?page=5>; rel="last"
fn has_next_link(header: &str) -> bool {
    header.split(',').any(|part| {
        part.split(';')
            .skip(1)
            .any(|param| param.trim() == r#"rel="next""#)
    })
}
