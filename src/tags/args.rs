// src/tags/args.rs
// =============================================================================
// Splits the text after a tag name into positional arguments.
//
//   {% asset_url org/repo tool.tar.gz %}
//                ^^^^^^^^^^^^^^^^^^^^ this part, split on runs of whitespace
//
// Tokens are kept verbatim: a file path like "lib/tool/version.rb" is one
// token. Extra tokens are ignored.
// =============================================================================

use crate::error::{TagError, TagResult};
use crate::github::RepoRef;

pub struct Arguments<'a> {
    tag: &'static str,
    raw: &'a str,
    tokens: Vec<&'a str>,
}

impl<'a> Arguments<'a> {
    pub fn split(tag: &'static str, raw: &'a str) -> Self {
        Arguments {
            tag,
            raw,
            tokens: raw.split_whitespace().collect(),
        }
    }

    /// The token at `index`, or an argument error naming `position`
    pub fn required(&self, index: usize, position: &'static str) -> TagResult<&'a str> {
        self.tokens
            .get(index)
            .copied()
            .ok_or_else(|| TagError::Argument {
                tag: self.tag,
                position,
                arguments: self.raw.trim().to_string(),
            })
    }

    /// The first token, which is always the repository
    pub fn repo(&self) -> TagResult<RepoRef> {
        self.required(0, "repository").map(RepoRef::new)
    }
}
