// src/tags/release.rs
// =============================================================================
// Tags about the current (newest) release of a repository:
//
//   {% version org/repo %}
//     -> v1.4.0
//   {% asset_url org/repo tool.tar.gz %}
//     -> https://github.com/org/repo/releases/download/v1.4.0/tool.tar.gz
//
// Both print the raw string with no markup around it.
// =============================================================================

use super::args::Arguments;
use super::{ParseTag, RenderContext, Tag};
use crate::error::TagResult;
use crate::github::RepoRef;
use async_trait::async_trait;

/// Name of the current release
#[derive(Debug)]
pub struct VersionTag {
    repo: RepoRef,
}

#[async_trait]
impl Tag for VersionTag {
    async fn render(&self, ctx: &RenderContext<'_>) -> TagResult<String> {
        ctx.client.current_version(&self.repo).await
    }
}

impl ParseTag for VersionTag {
    const NAME: &'static str = "version";

    fn parse(arguments: &str) -> TagResult<Self> {
        let args = Arguments::split(Self::NAME, arguments);
        Ok(VersionTag { repo: args.repo()? })
    }
}

/// Download URL of a file attached to the current release
#[derive(Debug)]
pub struct AssetUrlTag {
    repo: RepoRef,
    file: String,
}

#[async_trait]
impl Tag for AssetUrlTag {
    async fn render(&self, ctx: &RenderContext<'_>) -> TagResult<String> {
        ctx.client
            .current_release_asset_url(&self.repo, &self.file)
            .await
    }
}

impl ParseTag for AssetUrlTag {
    const NAME: &'static str = "asset_url";

    fn parse(arguments: &str) -> TagResult<Self> {
        let args = Arguments::split(Self::NAME, arguments);
        Ok(AssetUrlTag {
            repo: args.repo()?,
            file: args.required(1, "file name")?.to_string(),
        })
    }
}
