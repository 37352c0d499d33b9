// src/github/types.rs
// =============================================================================
// Data types returned by the GitHub API queries.
//
// All of these are request-scoped: parsed from one response, rendered, and
// dropped. Nothing here is cached between renders.
// =============================================================================

use serde::{Deserialize, Deserializer};
use std::fmt;

/// An `owner/name` repository reference, taken verbatim from tag arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef(String);

impl RepoRef {
    pub fn new(reference: impl Into<String>) -> Self {
        RepoRef(reference.into())
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One element of `GET /repos/{repo}/contributors`
///
/// GitHub sends many more fields; serde ignores the ones we don't name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Contributor {
    pub login: String,
    pub html_url: String,
    pub avatar_url: String,
}

/// One element of `GET /repos/{repo}/releases`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    /// Release title; GitHub sends `null` for untitled releases, which we
    /// render as an empty string
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
