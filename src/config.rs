// src/config.rs
// =============================================================================
// Turns the parsed command line into a validated Config.
//
// clap already rejects the obvious mistakes (missing --name, --procs 0, ...).
// What is left is checked here, before any network activity:
// - the access token must be present (flag or GITHUB_ACCESS_TOKEN)
// - the API URL must parse and be usable as a base URL
// - the file path must not be empty once leading slashes are removed
// =============================================================================

use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::cli::Cli;
use crate::pipeline::PageLimit;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GitHub access token is empty. Please provide -t flag or set GITHUB_ACCESS_TOKEN env variable")]
    MissingToken,

    #[error("invalid API URL {url:?}: {source}")]
    InvalidApiUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("API URL {0:?} cannot be used as a base URL")]
    ApiUrlNotBase(String),

    #[error("file path {0:?} does not name a file")]
    EmptyFilePath(String),
}

// How to reach GitHub
#[derive(Debug, Clone)]
pub struct GitHubSettings {
    pub token: String,
    pub api_base: Url,
    pub timeout: Duration,
}

// What to scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// User or organization name
    pub owner: String,
    /// Repository-relative path of the file to read, without a leading "/"
    pub file_path: String,
    /// Number of workers
    pub concurrency: usize,
    pub pages: PageLimit,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub github: GitHubSettings,
    pub run: RunOptions,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let token = cli
            .token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let api_base = Url::parse(&cli.api_url).map_err(|source| ConfigError::InvalidApiUrl {
            url: cli.api_url.clone(),
            source,
        })?;
        if api_base.cannot_be_a_base() {
            return Err(ConfigError::ApiUrlNotBase(cli.api_url));
        }

        let file_path = cli.file.trim().trim_start_matches('/').to_string();
        if file_path.is_empty() || file_path.ends_with('/') {
            return Err(ConfigError::EmptyFilePath(cli.file));
        }

        let pages = if cli.all_pages {
            PageLimit::All
        } else {
            PageLimit::First
        };

        Ok(Config {
            github: GitHubSettings {
                token,
                api_base,
                timeout: Duration::from_secs(cli.timeout),
            },
            run: RunOptions {
                owner: cli.name.trim().to_string(),
                file_path,
                concurrency: cli.procs as usize,
                pages,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["repo-lines"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_valid_config() {
        let config = Config::from_cli(cli(&[
            "-n",
            "acme",
            "-t",
            "secret",
            "-p",
            "4",
            "--api-url",
            "https://api.github.com",
        ])).unwrap();
        assert_eq!(config.run.owner, "acme");
        assert_eq!(config.run.file_path, ".gitignore");
        assert_eq!(config.run.concurrency, 4);
        assert_eq!(config.run.pages, PageLimit::First);
        assert_eq!(config.github.token, "secret");
        assert_eq!(config.github.api_base.as_str(), "https://api.github.com/");
        assert_eq!(config.github.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_missing_token() {
        let mut parsed = cli(&["-n", "acme", "-t", "x"]);
        parsed.token = None;
        assert!(matches!(Config::from_cli(parsed), Err(ConfigError::MissingToken)));

        let blank = cli(&["-n", "acme", "-t", "   "]);
        assert!(matches!(Config::from_cli(blank), Err(ConfigError::MissingToken)));
    }

    #[test]
    fn test_leading_slash_is_dropped() {
        let config = Config::from_cli(cli(&["-n", "acme", "-t", "x", "-f", "/.dockerignore"])).unwrap();
        assert_eq!(config.run.file_path, ".dockerignore");
    }

    #[test]
    fn test_directory_like_path_is_rejected() {
        let result = Config::from_cli(cli(&["-n", "acme", "-t", "x", "-f", "/"]));
        assert!(matches!(result, Err(ConfigError::EmptyFilePath(_))));

        let result = Config::from_cli(cli(&["-n", "acme", "-t", "x", "-f", "docs/"]));
        assert!(matches!(result, Err(ConfigError::EmptyFilePath(_))));
    }

    #[test]
    fn test_bad_api_url() {
        let result = Config::from_cli(cli(&["-n", "acme", "-t", "x", "--api-url", "not a url"]));
        assert!(matches!(result, Err(ConfigError::InvalidApiUrl { .. })));

        let result = Config::from_cli(cli(&["-n", "acme", "-t", "x", "--api-url", "mailto:a@b.c"]));
        assert!(matches!(result, Err(ConfigError::ApiUrlNotBase(_))));
    }

    #[test]
    fn test_all_pages_flag() {
        let config = Config::from_cli(cli(&["-n", "acme", "-t", "x", "--all-pages"])).unwrap();
        assert_eq!(config.run.pages, PageLimit::All);
    }
}
