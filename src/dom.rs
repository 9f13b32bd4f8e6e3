//! CSS-selector lookups over parsed HTML documents.
//!
//! The "find first matching node" capability comes in two tiers so call
//! sites can pick their failure handling: `find_first` returns an `Option`
//! for skip-and-continue sites, `require_first` turns absence into an error
//! for sites where the page layout is assumed stable.

use scraper::{ElementRef, Selector};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomError {
    #[error("Invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    #[error("No node matching '{selector}' in {context}")]
    NotFound { selector: String, context: String },
}

/// Compile a CSS selector.
pub fn selector(css: &str) -> Result<Selector, DomError> {
    Selector::parse(css).map_err(|e| DomError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// First descendant of `node` matching `css`, if any.
pub fn find_first<'a>(node: ElementRef<'a>, css: &str) -> Result<Option<ElementRef<'a>>, DomError> {
    let sel = selector(css)?;
    Ok(node.select(&sel).next())
}

/// First descendant of `node` matching `css`; absence is a structural failure.
///
/// `context` names the page region for the error message.
pub fn require_first<'a>(
    node: ElementRef<'a>,
    css: &str,
    context: &str,
) -> Result<ElementRef<'a>, DomError> {
    find_first(node, css)?.ok_or_else(|| DomError::NotFound {
        selector: css.to_string(),
        context: context.to_string(),
    })
}

/// All text under `node`, with whitespace runs (including newlines)
/// collapsed to single spaces and the ends trimmed.
pub fn text_of(node: ElementRef<'_>) -> String {
    collapse_ws(&node.text().collect::<String>())
}

/// Next sibling of `node` that is an element, skipping text nodes.
pub fn next_element_sibling<'a>(node: ElementRef<'a>) -> Option<ElementRef<'a>> {
    node.next_siblings().find_map(ElementRef::wrap)
}

pub fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
