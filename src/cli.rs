// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Subcommands:
// - render: Render every tag in a template file
// - tag: Render a single tag invocation (handy in shell scripts)
// - tags: List the tags we know about
//
// The GitHub hosts are global flags, and can also come from environment
// variables so a CI job can point them at a mirror or GitHub Enterprise.
// =============================================================================

use crate::github::{
    ClientConfig, DEFAULT_API_URL, DEFAULT_RAW_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_WEB_URL,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "release-tags",
    version,
    about = "Render GitHub-backed template tags for static sites",
    long_about = "release-tags replaces {% contributors %}, {% version %}, {% asset_url %} and \
                  {% file_version %} tags in a template with live data from the GitHub API."
)]
pub struct Cli {
    #[command(flatten)]
    pub hosts: HostArgs,

    /// Log every request (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where requests go
#[derive(Args, Debug)]
pub struct HostArgs {
    /// Base URL of the GitHub REST API
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Base URL of the raw file host
    #[arg(long, env = "GITHUB_RAW_URL", default_value = DEFAULT_RAW_URL, global = true)]
    pub raw_url: String,

    /// Base URL used to build release download links
    #[arg(long, env = "GITHUB_WEB_URL", default_value = DEFAULT_WEB_URL, global = true)]
    pub web_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout: u64,
}

impl HostArgs {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_url: self.api_url.clone(),
            raw_url: self.raw_url.clone(),
            web_url: self.web_url.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render every tag in a template file
    ///
    /// Example: release-tags render docs/index.html -o _site/index.html
    Render {
        /// Template to render
        input: PathBuf,

        /// Where to write the result (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a single tag
    ///
    /// Example: release-tags tag asset_url rust-lang/rust rust.tar.gz
    Tag {
        /// Tag name (contributors, version, asset_url, file_version)
        name: String,

        /// Tag arguments, as they would appear after the name in markup
        arguments: Vec<String>,
    },

    /// List the registered tags
    Tags,
}
