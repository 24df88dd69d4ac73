//! The weak reference from an issue body to its gist.
//!
//! The link is plain text inside the body, so it may be missing or mangled.
//! Absence is a normal outcome, never an error.

use regex::Regex;
use std::sync::OnceLock;

pub const GIST_HOST: &str = "gist.github.com";

/// A gist located in an issue body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GistRef {
    pub url: String,
    pub id: String,
}

fn gist_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let pattern = format!(
            r"https://{}/[A-Za-z0-9_-]+/[a-f0-9]+",
            regex::escape(GIST_HOST)
        );
        Regex::new(&pattern).expect("gist url pattern is valid")
    })
}

/// First gist URL in `body`, with the id taken from its last path segment.
pub fn gist_reference(body: &str) -> Option<GistRef> {
    let url = gist_url_pattern().find(body)?.as_str();
    let id = url.rsplit('/').next().filter(|s| !s.is_empty())?;
    Some(GistRef {
        url: url.to_string(),
        id: id.to_string(),
    })
}
