//! Directive tag scanning.
//!
//! Finds `{% sqlalchemy ... %}` occurrences in markdown text.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{%\s*sqlalchemy(?:\s+([^%]+?))?\s*%\}").unwrap());

/// One directive occurrence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagMatch {
    /// Byte range of the whole tag, delimiters included.
    pub span: Range<usize>,
    /// Raw parameter text between the keyword and the closing delimiter.
    pub params: Option<String>,
}

impl TagMatch {
    /// Raw parameter text, if any.
    #[must_use]
    pub fn params(&self) -> Option<&str> {
        self.params.as_deref()
    }
}

/// Find all directive tags in `text`, left to right.
#[must_use]
pub fn scan(text: &str) -> Vec<TagMatch> {
    TAG_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(TagMatch {
                span: whole.range(),
                params: caps.get(1).map(|m| m.as_str().to_owned()),
            })
        })
        .collect()
}
