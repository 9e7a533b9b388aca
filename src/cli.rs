// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Validation that clap can do on its own lives here (required flags,
// non-empty strings, numeric ranges). Anything needing more context
// (token fallback, URL checks) is done in config.rs.
// =============================================================================

use clap::builder::NonEmptyStringValueParser;
use clap::Parser;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "repo-lines",
    version,
    about = "Print the lines of one file (default .gitignore) merged across every repository of a GitHub account",
    long_about = "repo-lines lists the public, non-fork repositories of a GitHub user or organization, \
                  reads one file from the default branch of each, and prints every non-blank, \
                  non-comment line to stdout. Lines from different repositories may interleave."
)]
pub struct Cli {
    /// GitHub user or organization name
    #[arg(short = 'n', long, value_parser = NonEmptyStringValueParser::new())]
    pub name: String,

    /// Repository-relative path of the file to read
    #[arg(short = 'f', long, default_value = ".gitignore", value_parser = NonEmptyStringValueParser::new())]
    pub file: String,

    /// GitHub access token
    ///
    /// Falls back to the GITHUB_ACCESS_TOKEN environment variable
    #[arg(short = 't', long, env = "GITHUB_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Number of repositories fetched concurrently
    #[arg(short = 'p', long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub procs: u32,

    /// Read every page of the repository listing instead of only the first 100 repositories
    #[arg(long)]
    pub all_pages: bool,

    /// Base URL of the GitHub REST API (for GitHub Enterprise: https://HOST/api/v3)
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Log debug details to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Option<String> for the token?
//    - The flag is optional; clap fills it from the environment if it can
//    - None means "neither was given", which config.rs turns into an error
//
// 2. What does value_parser!(u32).range(1..) do?
//    - Parses the argument as u32 and rejects anything below 1
//    - clap prints the usage and exits with code 2 on bad input
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["repo-lines", "--name", "acme"]).unwrap();
        assert_eq!(cli.name, "acme");
        assert_eq!(cli.file, ".gitignore");
        assert_eq!(cli.procs, 10);
        assert_eq!(cli.timeout, 30);
        assert!(!cli.all_pages);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "repo-lines", "-n", "acme", "-f", ".dockerignore", "-t", "tok", "-p", "3", "-v",
        ])
        .unwrap();
        assert_eq!(cli.file, ".dockerignore");
        assert_eq!(cli.token.as_deref(), Some("tok"));
        assert_eq!(cli.procs, 3);
        assert!(cli.verbose);
    }

    #[test]
    fn test_name_is_required() {
        assert!(Cli::try_parse_from(["repo-lines"]).is_err());
        assert!(Cli::try_parse_from(["repo-lines", "-n", ""]).is_err());
    }

    #[test]
    fn test_empty_file_is_rejected() {
        assert!(Cli::try_parse_from(["repo-lines", "-n", "acme", "-f", ""]).is_err());
    }

    #[test]
    fn test_procs_must_be_positive() {
        assert!(Cli::try_parse_from(["repo-lines", "-n", "acme", "-p", "0"]).is_err());
        assert!(Cli::try_parse_from(["repo-lines", "-n", "acme", "-p", "-2"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
