// src/error.rs
// =============================================================================
// Error type shared by the GitHub client and the template tags.
//
// Every variant carries the identifiers of whatever failed (the URL that was
// requested, the repo with no releases, the tag with a missing argument) so a
// broken site build names the offending tag invocation.
//
// The application layer (main.rs) wraps these in anyhow with extra context.
// =============================================================================

use thiserror::Error;

/// Result alias used throughout the github and tags modules
pub type TagResult<T> = Result<T, TagError>;

#[derive(Debug, Error)]
pub enum TagError {
    /// Connection, TLS, timeout or body-read failure
    #[error("network error while fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx status, or a JSON document of the wrong shape
    #[error("unexpected response from {url}: {reason}")]
    Protocol { url: String, reason: String },

    /// Body was not valid JSON
    #[error("could not parse response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The repository has no releases
    #[error("repository {repo} has no releases")]
    NotFound { repo: String },

    /// A required tag argument is missing
    #[error("tag '{tag}' is missing its {position} argument (got \"{arguments}\")")]
    Argument {
        tag: &'static str,
        position: &'static str,
        arguments: String,
    },

    /// The markup names a tag that was never registered
    #[error("unknown tag '{name}'")]
    UnknownTag { name: String },
}
