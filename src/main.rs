// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Validate them into a Config (token, API URL, file path)
// 3. Run the pipeline: list repos -> fetch the file from each -> print lines
// 4. Exit with proper code (0 = success, 1 = run failed, 2 = bad configuration)
//
// stdout only ever receives the merged lines; everything else (progress,
// warnings, errors) goes to stderr.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - validated configuration
mod decode; // src/decode/ - base64 payloads and line filtering
mod github; // src/github/ - GitHub REST API client
mod logging; // src/logging.rs - tracing setup
mod pipeline; // src/pipeline/ - producer, worker pool and output writer

#[cfg(test)]
mod testing; // src/testing.rs - fake GitHub for tests

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::{debug, error, info};

use cli::Cli;
use config::Config;
use github::GitHubClient;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole error chain on one line
            error!("{:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every repository was processed
//   Ok(2) = configuration error, nothing was fetched
//   Err   = the run was aborted (listing failed, a fetch failed, output closed)
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match Config::from_cli(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, Cli::command().render_usage());
            return Ok(2);
        }
    };

    let client = GitHubClient::new(
        &config.github.token,
        config.github.api_base.clone(),
        config.github.timeout,
    )
    .context("failed to set up the GitHub client")?;

    info!(
        owner = %config.run.owner,
        file = %config.run.file_path,
        procs = config.run.concurrency,
        "scanning repositories"
    );

    let result = pipeline::run(&config.run, Arc::new(client), tokio::io::stdout()).await;
    let (summary, _stdout) = match result {
        Ok(done) => done,
        Err(e) => {
            if let Some(status @ (401 | 403)) = e.github_error().and_then(|g| g.status()) {
                error!(status, "GitHub refused the request; check the access token and rate limit");
            }
            return Err(e).context(format!("scanning {} failed", config.run.owner));
        }
    };

    info!(
        listed = summary.listed,
        forks_skipped = summary.feed.forks_skipped,
        files_found = summary.files.found,
        not_found = summary.files.not_found,
        undecodable = summary.files.undecodable,
        lines = summary.lines_written,
        "done"
    );
    debug!(
        submitted = summary.feed.submitted,
        unusable_skipped = summary.feed.unusable_skipped,
        feed_cancelled = summary.feed.cancelled,
        workers = summary.pool.workers,
        handled = summary.pool.handled,
        abandoned = summary.pool.abandoned,
        "run details"
    );

    Ok(0)
}
