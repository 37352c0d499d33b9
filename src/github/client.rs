// src/github/client.rs
// =============================================================================
// This module talks to GitHub: the REST API for contributors and releases,
// and the raw-file host for version strings embedded in source files.
//
// Strategy:
// - One GET per query, single attempt, no cache, no retry
// - Check the status code before looking at the body
// - Parse JSON into serde_json::Value first, so GitHub's error object
//   ({"message": "..."}) is told apart from the array we asked for
// - Derived queries (current release, version, asset URL) build on the
//   list queries instead of hitting other endpoints
//
// Rust concepts:
// - async functions: For network I/O
// - Generics with serde: One helper parses both list endpoints
// - OnceLock: Compile a regex once and reuse it
// =============================================================================

use crate::error::{TagError, TagResult};
use crate::github::types::{Contributor, Release, RepoRef};
use regex::Regex;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_RAW_URL: &str = "https://raw.githubusercontent.com";
pub const DEFAULT_WEB_URL: &str = "https://github.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Where the client sends its requests
///
/// Passed explicitly to `GitHubClient::new` so tests can point every host
/// at a mock server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST API (contributors, releases)
    pub api_url: String,
    /// Base URL of the raw-file host (file versions)
    pub raw_url: String,
    /// Base URL used to build release download links (never fetched)
    pub web_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_url: DEFAULT_API_URL.to_string(),
            raw_url: DEFAULT_RAW_URL.to_string(),
            web_url: DEFAULT_WEB_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// GitHub client shared by every tag during a render
///
/// Holds no per-request state; each query is independent and re-fetches.
pub struct GitHubClient {
    http: Client,
    api_url: String,
    raw_url: String,
    web_url: String,
}

impl GitHubClient {
    pub fn new(config: ClientConfig) -> TagResult<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|source| TagError::Network {
                url: config.api_url.clone(),
                source,
            })?;

        // Trailing slashes would give us "//repos/..." paths
        Ok(GitHubClient {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            raw_url: config.raw_url.trim_end_matches('/').to_string(),
            web_url: config.web_url.trim_end_matches('/').to_string(),
        })
    }

    /// Lists contributors in the order the API returns them (first page only)
    pub async fn list_contributors(&self, repo: &RepoRef) -> TagResult<Vec<Contributor>> {
        let url = format!("{}/repos/{}/contributors", self.api_url, repo);
        self.get_json_array(&url).await
    }

    /// Lists releases, newest first as delivered by the API
    pub async fn list_releases(&self, repo: &RepoRef) -> TagResult<Vec<Release>> {
        let url = format!("{}/repos/{}/releases", self.api_url, repo);
        self.get_json_array(&url).await
    }

    /// The first release in the list
    pub async fn current_release(&self, repo: &RepoRef) -> TagResult<Release> {
        self.list_releases(repo)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TagError::NotFound {
                repo: repo.to_string(),
            })
    }

    pub async fn current_version(&self, repo: &RepoRef) -> TagResult<String> {
        Ok(self.current_release(repo).await?.name)
    }

    /// Download link for an asset of the current release
    ///
    /// The asset itself is never checked for existence.
    pub async fn current_release_asset_url(
        &self,
        repo: &RepoRef,
        file: &str,
    ) -> TagResult<String> {
        let version = self.current_version(repo).await?;
        Ok(format!(
            "{}/{}/releases/download/{}/{}",
            self.web_url, repo, version, file
        ))
    }

    /// Version string from the first line of a raw file
    ///
    /// Returns an empty string when the first line has no `x.y.z` in it.
    pub async fn file_version(&self, repo: &RepoRef, path: &str) -> TagResult<String> {
        let url = format!("{}/{}/{}", self.raw_url, repo, path);
        let body = self.get_text(&url, false).await?;
        Ok(extract_version(&body))
    }

    // Fetches an API endpoint that is documented to return a JSON array
    async fn get_json_array<T: DeserializeOwned>(&self, url: &str) -> TagResult<Vec<T>> {
        let body = self.get_text(url, true).await?;

        // Parse into a generic JSON value first; a body that isn't JSON at all
        // (an HTML error page, for example) is a parse error
        let value: Value = serde_json::from_str(&body).map_err(|source| TagError::Parse {
            url: url.to_string(),
            source,
        })?;

        // GitHub reports errors and rate limits as an object, not an array
        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(TagError::Protocol {
                    url: url.to_string(),
                    reason: describe_non_array(&other),
                })
            }
        };

        // Convert each element; collect() stops at the first one that fails
        items
            .into_iter()
            .map(|item| {
                serde_json::from_value(item).map_err(|e| TagError::Protocol {
                    url: url.to_string(),
                    reason: format!("unexpected array element: {}", e),
                })
            })
            .collect()
    }

    // Sends one GET and returns the body of a 2xx response
    async fn get_text(&self, url: &str, api: bool) -> TagResult<String> {
        debug!(%url, "GET");

        // Only API calls ask for the GitHub JSON media type;
        // the raw host serves plain text
        let mut request = self.http.get(url);
        if api {
            request = request.header(header::ACCEPT, "application/vnd.github+json");
        }

        // Both send() and text() fail with reqwest::Error, mapped the same way
        let network_error = |source| TagError::Network {
            url: url.to_string(),
            source,
        };

        let response = request.send().await.map_err(network_error)?;
        let status = response.status();
        debug!(%url, status = status.as_u16(), "response");

        // Read the body even on failure: GitHub puts the reason in it
        let body = response.text().await.map_err(network_error)?;

        if !status.is_success() {
            return Err(TagError::Protocol {
                url: url.to_string(),
                reason: describe_status(status, &body),
            });
        }

        Ok(body)
    }
}

/// First `x.y.z` match on the first line of `body`, or an empty string
fn extract_version(body: &str) -> String {
    static VERSION: OnceLock<Regex> = OnceLock::new();
    // Compiled on first use and reused for every file after that
    let version = VERSION.get_or_init(|| Regex::new(r"[0-9]+\.[0-9]+\.[0-9]+").unwrap());

    // Only the first line counts; an empty body has no first line
    let first_line = body.lines().next().unwrap_or("");
    version
        .find(first_line)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

// GitHub error bodies look like {"message": "Not Found", "documentation_url": ...}
fn github_message(value: &Value) -> Option<&str> {
    value.get("message").and_then(Value::as_str)
}

fn describe_status(status: StatusCode, body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| github_message(&value).map(str::to_string));

    match message {
        Some(message) => format!("HTTP {}: {}", status, message),
        None => format!("HTTP {}", status),
    }
}

fn describe_non_array(value: &Value) -> String {
    let kind = match value {
        Value::Object(_) => "an object",
        Value::String(_) => "a string",
        Value::Number(_) => "a number",
        Value::Bool(_) => "a boolean",
        Value::Null => "null",
        Value::Array(_) => "an array",
    };

    match github_message(value) {
        Some(message) => format!("expected a JSON array, got {}: {}", kind, message),
        None => format!("expected a JSON array, got {}", kind),
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why parse into serde_json::Value before our own types?
//    - GitHub answers an error with an object like {"message": "..."}
//    - Deserializing that straight into Vec<Contributor> gives a confusing
//      "invalid type: map, expected a sequence" error
//    - Looking at the Value first lets us report GitHub's own message
//
// 2. What does collect() do with an iterator of Results?
//    - Iterator<Item = Result<T, E>> can collect into Result<Vec<T>, E>
//    - It stops at the first Err and returns it
//
// 3. Why a closure for network_error?
//    - It captures `url` by reference, so it is Copy
//    - That lets us pass it to map_err twice without cloning anything
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GitHubClient {
        GitHubClient::new(ClientConfig {
            api_url: server.uri(),
            raw_url: server.uri(),
            ..ClientConfig::default()
        })
        .unwrap()
    }

    async fn mount_releases(server: &MockServer, body: Value) {
        Mock::given(method("GET"))
            .and(path("/repos/org/repo/releases"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[test]
    fn test_extract_version_from_first_line() {
        assert_eq!(extract_version("1.2.3 release notes\nmore text"), "1.2.3");
    }

    #[test]
    fn test_extract_version_no_match_is_empty() {
        assert_eq!(extract_version("no version here\n4.5.6"), "");
    }

    #[test]
    fn test_extract_version_inside_source_line() {
        assert_eq!(extract_version("VERSION = '10.20.30.40'\n"), "10.20.30");
    }

    #[test]
    fn test_extract_version_empty_body() {
        assert_eq!(extract_version(""), "");
    }

    #[tokio::test]
    async fn test_list_contributors_preserves_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/org/repo/contributors"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "login": "zed",
                    "html_url": "https://github.com/zed",
                    "avatar_url": "https://img/z.png"
                },
                {
                    "login": "alice",
                    "html_url": "https://github.com/alice",
                    "avatar_url": "https://img/a.png"
                },
                {
                    "login": "bob",
                    "html_url": "https://github.com/bob",
                    "avatar_url": "https://img/b.png"
                }
            ])))
            .mount(&server)
            .await;

        let contributors = client_for(&server)
            .list_contributors(&RepoRef::new("org/repo"))
            .await
            .unwrap();

        let logins: Vec<_> = contributors.iter().map(|c| c.login.as_str()).collect();
        assert_eq!(logins, vec!["zed", "alice", "bob"]);
        assert_eq!(contributors[1].html_url, "https://github.com/alice");
        assert_eq!(contributors[1].avatar_url, "https://img/a.png");
    }

    #[tokio::test]
    async fn test_list_contributors_error_object_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/org/repo/contributors"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "API rate limit exceeded",
                "documentation_url": "https://docs.github.com"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_contributors(&RepoRef::new("org/repo"))
            .await
            .unwrap_err();

        match err {
            TagError::Protocol { reason, .. } => assert!(reason.contains("rate limit")),
            other => panic!("expected protocol error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/org/repo/contributors"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_contributors(&RepoRef::new("org/repo"))
            .await
            .unwrap_err();

        assert!(matches!(err, TagError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_non_success_status_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/org/missing/releases"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_releases(&RepoRef::new("org/missing"))
            .await
            .unwrap_err();

        match err {
            TagError::Protocol { url, reason } => {
                assert!(url.ends_with("/repos/org/missing/releases"));
                assert!(reason.contains("404"));
                assert!(reason.contains("Not Found"));
            }
            other => panic!("expected protocol error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_api_requests_ask_for_github_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/org/repo/releases"))
            .and(header("accept", "application/vnd.github+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"name": "v9"}])))
            .mount(&server)
            .await;

        // Without the header the mock doesn't match and wiremock answers 404
        let version = client_for(&server)
            .current_version(&RepoRef::new("org/repo"))
            .await
            .unwrap();

        assert_eq!(version, "v9");
    }

    #[tokio::test]
    async fn test_element_missing_fields_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/org/repo/contributors"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"login": "alice"}])))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_contributors(&RepoRef::new("org/repo"))
            .await
            .unwrap_err();

        assert!(matches!(err, TagError::Protocol { .. }));
    }

    #[tokio::test]
    async fn test_current_release_is_first_release() {
        let server = MockServer::start().await;
        mount_releases(&server, json!([{"name": "v2.0.0"}, {"name": "v1.0.0"}])).await;

        let client = client_for(&server);
        let repo = RepoRef::new("org/repo");

        let releases = client.list_releases(&repo).await.unwrap();
        let current = client.current_release(&repo).await.unwrap();
        let version = client.current_version(&repo).await.unwrap();

        assert_eq!(current, releases[0]);
        assert_eq!(version, current.name);
        assert_eq!(version, "v2.0.0");
    }

    #[tokio::test]
    async fn test_current_release_empty_list_is_not_found() {
        let server = MockServer::start().await;
        mount_releases(&server, json!([])).await;

        let err = client_for(&server)
            .current_release(&RepoRef::new("org/repo"))
            .await
            .unwrap_err();

        match err {
            TagError::NotFound { repo } => assert_eq!(repo, "org/repo"),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_current_release_asset_url() {
        let server = MockServer::start().await;
        mount_releases(&server, json!([{"name": "1.4.0"}])).await;

        let url = client_for(&server)
            .current_release_asset_url(&RepoRef::new("org/repo"), "tool-linux.tar.gz")
            .await
            .unwrap();

        assert_eq!(
            url,
            "https://github.com/org/repo/releases/download/1.4.0/tool-linux.tar.gz"
        );
    }

    #[tokio::test]
    async fn test_file_version_reads_raw_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/org/repo/master/lib/tool/version.rb"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("1.2.3 release notes\nmore text"),
            )
            .mount(&server)
            .await;

        let version = client_for(&server)
            .file_version(&RepoRef::new("org/repo"), "master/lib/tool/version.rb")
            .await
            .unwrap();

        assert_eq!(version, "1.2.3");
    }

    #[tokio::test]
    async fn test_file_version_without_match_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/org/repo/VERSION"))
            .respond_with(ResponseTemplate::new(200).set_body_string("no version here\n..."))
            .mount(&server)
            .await;

        let version = client_for(&server)
            .file_version(&RepoRef::new("org/repo"), "VERSION")
            .await
            .unwrap();

        assert_eq!(version, "");
    }

    #[tokio::test]
    async fn test_file_version_non_success_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/org/repo/master/VERSION"))
            .respond_with(ResponseTemplate::new(404).set_body_string("404: Not Found"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .file_version(&RepoRef::new("org/repo"), "master/VERSION")
            .await
            .unwrap_err();

        // A missing file must not render as an empty version
        match err {
            TagError::Protocol { url, reason } => {
                assert!(url.ends_with("/org/repo/master/VERSION"));
                assert!(reason.contains("404"));
            }
            other => panic!("expected protocol error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Nothing listens on port 1
        let client = GitHubClient::new(ClientConfig {
            api_url: "http://127.0.0.1:1".to_string(),
            ..ClientConfig::default()
        })
        .unwrap();

        let err = client
            .list_releases(&RepoRef::new("org/repo"))
            .await
            .unwrap_err();

        assert!(matches!(err, TagError::Network { .. }));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = GitHubClient::new(ClientConfig {
            api_url: "https://api.example.com/".to_string(),
            ..ClientConfig::default()
        })
        .unwrap();
        assert_eq!(client.api_url, "https://api.example.com");
    }
}
