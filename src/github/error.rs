// src/github/error.rs
// =============================================================================
// Errors produced while talking to GitHub.
//
// Every variant here is fatal for a run: results are meant to cover the whole
// account, so a silently incomplete answer is worse than no answer.
// The one expected failure (file not found) is NOT an error, it is
// FetchOutcome::NotFound.
// =============================================================================

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitHubError {
    /// The reqwest client itself could not be built
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The token contains characters that cannot go into an HTTP header
    #[error("access token is not a valid header value")]
    InvalidToken,

    /// The API base URL cannot have path segments appended (e.g. "mailto:x")
    #[error("API URL {0} cannot be used as a base URL")]
    InvalidBaseUrl(String),

    /// Network failure, timeout, TLS error, ...
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// GitHub answered, but not with success (401, 403, 429, 5xx, ...)
    #[error("GitHub API returned HTTP {status} for {url}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    /// The body was not the JSON shape we expected
    #[error("unexpected response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The requested path exists but is a directory, submodule or symlink
    #[error("{path} in repository {repo} is a {kind}, not a file")]
    NotAFile {
        repo: String,
        path: String,
        kind: String,
    },
}

impl GitHubError {
    // HTTP status code, when GitHub sent one
    pub fn status(&self) -> Option<u16> {
        match self {
            GitHubError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// GitHub error bodies look like {"message": "Bad credentials", "documentation_url": "..."}
#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

// Pulls the human-readable message out of an error body, falling back to
// the raw (trimmed) body when it is not GitHub's usual JSON
pub(crate) fn api_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) => {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "(empty response body)".to_string()
            } else {
                trimmed.chars().take(200).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_message_from_json() {
        let body = r#"{"message":"Bad credentials","documentation_url":"https://docs.github.com/rest"}"#;
        assert_eq!(api_message(body), "Bad credentials");
    }

    #[test]
    fn test_api_message_from_plain_body() {
        assert_eq!(api_message("  upstream timeout \n"), "upstream timeout");
        assert_eq!(api_message(""), "(empty response body)");
    }

    #[test]
    fn test_status_accessor() {
        let err = GitHubError::Status {
            url: "https://api.github.com/users/x/repos".to_string(),
            status: 403,
            message: "API rate limit exceeded".to_string(),
        };
        assert_eq!(err.status(), Some(403));
        assert!(err.to_string().contains("HTTP 403"));
        assert_eq!(GitHubError::InvalidToken.status(), None);
    }
}
