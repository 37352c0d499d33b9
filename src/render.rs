// src/render.rs
// =============================================================================
// This module plays the part of the site generator: it finds tag markup in a
// template and replaces each one with what the tag renders.
//
// How it works:
// 1. Scan the source for {% name arguments %} markup
// 2. Build every tag from the registry right away, so a malformed tag fails
//    before we make any network request
// 3. Render the tags one after another and stitch the text back together
//
// Text outside the markup is copied through unchanged.
//
// Rust concepts:
// - Enums with data: A template is a list of text or tag segments
// - anyhow::Context: Attach the offending markup to any error
// =============================================================================

use crate::tags::{RenderContext, Tag, TagRegistry};
use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info};

enum Segment {
    Text(String),
    Tag { markup: String, tag: Box<dyn Tag> },
}

/// A template whose tags have already been parsed
pub struct Template {
    segments: Vec<Segment>,
}

fn tag_markup() -> &'static Regex {
    static MARKUP: OnceLock<Regex> = OnceLock::new();
    // Matches {% name arguments %}: group 1 is the name, group 2 the rest
    MARKUP.get_or_init(|| Regex::new(r"(?s)\{%\s*(\w+)(.*?)%\}").unwrap())
}

impl Template {
    /// Splits `source` into text and tags, building each tag from `registry`
    pub fn parse(source: &str, registry: &TagRegistry) -> Result<Self> {
        let mut segments = Vec::new();
        // Byte offset just past the previous tag
        let mut last = 0;

        for captures in tag_markup().captures_iter(source) {
            // Group 0 is the whole {% ... %} markup
            let Some(whole) = captures.get(0) else {
                continue;
            };
            let name = &captures[1];
            let arguments = &captures[2];

            // Keep the text between the previous tag and this one
            if whole.start() > last {
                segments.push(Segment::Text(source[last..whole.start()].to_string()));
            }

            // Build the tag now, so bad arguments fail before any request
            let tag = registry
                .parse(name, arguments)
                .with_context(|| format!("invalid tag `{}`", whole.as_str()))?;

            segments.push(Segment::Tag {
                markup: whole.as_str().to_string(),
                tag,
            });
            last = whole.end();
        }

        // Whatever follows the last tag
        if last < source.len() {
            segments.push(Segment::Text(source[last..].to_string()));
        }

        Ok(Template { segments })
    }

    /// Number of tags in the template
    pub fn tag_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| matches!(segment, Segment::Tag { .. }))
            .count()
    }

    /// Renders every tag in order; the first failure aborts the whole render
    pub async fn render(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let mut output = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Text(text) => output.push_str(text),
                Segment::Tag { markup, tag } => {
                    debug!(%markup, "rendering tag");
                    let rendered = tag
                        .render(ctx)
                        .await
                        .with_context(|| format!("failed to render `{}`", markup))?;
                    output.push_str(&rendered);
                }
            }
        }

        Ok(output)
    }
}

/// A single tag given on the command line, e.g. `asset_url org/repo tool.zip`
pub struct Invocation {
    markup: String,
    tag: Box<dyn Tag>,
}

impl Invocation {
    /// Joins `arguments` the way they would appear in markup and builds the tag
    pub fn parse(name: &str, arguments: &[String], registry: &TagRegistry) -> Result<Self> {
        let arguments = arguments.join(" ");
        // Rebuild the markup so errors read like they came from a template
        let markup = format!("{{% {} {} %}}", name, arguments);

        let tag = registry
            .parse(name, &arguments)
            .with_context(|| format!("invalid tag `{}`", markup))?;

        Ok(Invocation { markup, tag })
    }

    pub async fn render(&self, ctx: &RenderContext<'_>) -> Result<String> {
        self.tag
            .render(ctx)
            .await
            .with_context(|| format!("failed to render `{}`", self.markup))
    }
}

/// Reads, parses and renders one template file
pub async fn render_file(
    path: &Path,
    registry: &TagRegistry,
    ctx: &RenderContext<'_>,
) -> Result<String> {
    let source = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("could not read template {}", path.display()))?;

    let template = Template::parse(&source, registry)
        .with_context(|| format!("in template {}", path.display()))?;

    let output = template
        .render(ctx)
        .await
        .with_context(|| format!("in template {}", path.display()))?;

    info!(
        template = %path.display(),
        tags = template.tag_count(),
        "rendered template"
    );

    Ok(output)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Box<dyn Tag>?
//    - Each tag is a different struct (ContributorsTag, VersionTag, ...)
//    - A Vec can only hold one type, so we store them behind a trait object
//    - The vtable picks the right render() at runtime
//
// 2. What is `let Some(x) = ... else { ... };`?
//    - "let-else": bind x if the pattern matches, otherwise run the else
//      block, which must leave the current scope (continue, return, ...)
//
// 3. Why with_context() twice?
//    - Each layer adds a line to the error chain
//    - {:#} prints them all: "in template x: failed to render `...`: ..."
//    - downcast_ref::<TagError>() still finds the original error underneath
// -----------------------------------------------------------------------------
