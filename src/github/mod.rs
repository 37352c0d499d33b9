// src/github/mod.rs
// =============================================================================
// This module handles everything we fetch from GitHub.
//
// Currently implements:
// - Contributors and releases from the REST API (api.github.com)
// - Version strings from raw files (raw.githubusercontent.com)
// - Release asset download URLs derived from the current release
//
// Submodules:
// - client: The HTTP client and the queries built on it
// - types: Data returned by those queries
// =============================================================================

mod client;
mod types;

pub use client::{
    ClientConfig, GitHubClient, DEFAULT_API_URL, DEFAULT_RAW_URL, DEFAULT_TIMEOUT_SECS,
    DEFAULT_WEB_URL,
};
pub use types::{Contributor, RepoRef};
