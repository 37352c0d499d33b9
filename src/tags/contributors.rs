// src/tags/contributors.rs
// =============================================================================
// {% contributors org/repo %}
//
// Renders one block per contributor, in the order GitHub lists them:
//
//   <div class="contributor">
//     <a href="https://github.com/alice">
//       <img src="https://avatars.githubusercontent.com/...">
//       <span class="name">alice</span>
//     </a>
//   </div>
//
// maud escapes every interpolated value, so a login or URL can't break
// out of its attribute.
// =============================================================================

use super::args::Arguments;
use super::{ParseTag, RenderContext, Tag};
use crate::error::TagResult;
use crate::github::{Contributor, RepoRef};
use async_trait::async_trait;
use maud::{html, Markup};

#[derive(Debug)]
pub struct ContributorsTag {
    repo: RepoRef,
}

#[async_trait]
impl Tag for ContributorsTag {
    async fn render(&self, ctx: &RenderContext<'_>) -> TagResult<String> {
        let contributors = ctx.client.list_contributors(&self.repo).await?;

        Ok(contributors
            .iter()
            .map(|contributor| contributor_card(contributor).into_string())
            .collect())
    }
}

impl ParseTag for ContributorsTag {
    const NAME: &'static str = "contributors";

    fn parse(arguments: &str) -> TagResult<Self> {
        let args = Arguments::split(Self::NAME, arguments);
        Ok(ContributorsTag { repo: args.repo()? })
    }
}

fn contributor_card(contributor: &Contributor) -> Markup {
    html! {
        div class="contributor" {
            a href=(contributor.html_url) {
                img src=(contributor.avatar_url);
                span class="name" { (contributor.login) }
            }
        }
    }
}
