// src/tags/mod.rs
// =============================================================================
// Template tags backed by the GitHub client.
//
// A tag goes through two phases:
// 1. Parse: when the markup is found, the tag is built from its argument
//    text. Missing arguments fail here, before any network call.
// 2. Render: the tag asks the GitHub client for data and returns a string
//    that replaces the markup in the page.
//
// Tags are looked up by name in a TagRegistry. One registry is built on
// first use and never changes afterwards.
//
// Submodules:
// - args: Whitespace splitting of tag arguments
// - contributors: {% contributors org/repo %}
// - release: {% version org/repo %} and {% asset_url org/repo file %}
// - file_version: {% file_version org/repo path/to/file %}
// =============================================================================

mod args;
mod contributors;
mod file_version;
mod release;

pub use contributors::ContributorsTag;
pub use file_version::FileVersionTag;
pub use release::{AssetUrlTag, VersionTag};

use crate::error::{TagError, TagResult};
use crate::github::GitHubClient;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// What a tag can reach while rendering
pub struct RenderContext<'a> {
    pub client: &'a GitHubClient,
}

/// A parsed tag, ready to render
#[async_trait]
pub trait Tag: fmt::Debug + Send + Sync {
    async fn render(&self, ctx: &RenderContext<'_>) -> TagResult<String>;
}

/// Tags that can be built from their markup
pub trait ParseTag: Tag + Sized + 'static {
    /// Name used in markup: `{% NAME ... %}`
    const NAME: &'static str;

    fn parse(arguments: &str) -> TagResult<Self>;
}

type Constructor = fn(&str) -> TagResult<Box<dyn Tag>>;

fn construct<T: ParseTag>(arguments: &str) -> TagResult<Box<dyn Tag>> {
    Ok(Box::new(T::parse(arguments)?))
}

/// Maps tag names to their constructors
pub struct TagRegistry {
    constructors: BTreeMap<&'static str, Constructor>,
}

impl TagRegistry {
    pub fn empty() -> Self {
        TagRegistry {
            constructors: BTreeMap::new(),
        }
    }

    /// A registry with every GitHub tag in it
    pub fn with_github_tags() -> Self {
        let mut registry = TagRegistry::empty();
        registry.register::<ContributorsTag>();
        registry.register::<VersionTag>();
        registry.register::<AssetUrlTag>();
        registry.register::<FileVersionTag>();
        registry
    }

    /// The process-wide registry, built on first call
    pub fn global() -> &'static TagRegistry {
        static REGISTRY: OnceLock<TagRegistry> = OnceLock::new();
        REGISTRY.get_or_init(TagRegistry::with_github_tags)
    }

    pub fn register<T: ParseTag>(&mut self) {
        self.constructors.insert(T::NAME, construct::<T>);
    }

    /// Builds the tag called `name` from its argument text
    pub fn parse(&self, name: &str, arguments: &str) -> TagResult<Box<dyn Tag>> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| TagError::UnknownTag {
                name: name.to_string(),
            })?;
        constructor(arguments)
    }

    /// Registered tag names, sorted
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.constructors.keys().copied()
    }
}
