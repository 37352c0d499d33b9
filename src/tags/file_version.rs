// src/tags/file_version.rs
// =============================================================================
// {% file_version org/repo master/lib/tool/version.rb %}
//
// Prints the first x.y.z found on the first line of a raw file. The path is
// passed to the raw host as-is, so it starts with the branch name.
// Prints nothing (not an error) when there is no match.
// =============================================================================

use super::args::Arguments;
use super::{ParseTag, RenderContext, Tag};
use crate::error::TagResult;
use crate::github::RepoRef;
use async_trait::async_trait;

#[derive(Debug)]
pub struct FileVersionTag {
    repo: RepoRef,
    path: String,
}

#[async_trait]
impl Tag for FileVersionTag {
    async fn render(&self, ctx: &RenderContext<'_>) -> TagResult<String> {
        ctx.client.file_version(&self.repo, &self.path).await
    }
}

impl ParseTag for FileVersionTag {
    const NAME: &'static str = "file_version";

    fn parse(arguments: &str) -> TagResult<Self> {
        let args = Arguments::split(Self::NAME, arguments);
        Ok(FileVersionTag {
            repo: args.repo()?,
            path: args.required(1, "file path")?.to_string(),
        })
    }
}
