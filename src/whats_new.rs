//! `whats-new` mode: per-version "What's new in Python" article summaries.
//!
//! Walks the table of contents at `/3/whatsnew/` and fetches every linked
//! article for its title and editor/author credit. A single article failing
//! to fetch is logged and skipped; the index itself failing is fatal.

use crate::dom::{self, DomError};
use crate::session::{FetchError, Session};
use crate::table::ResultTable;
use scraper::Html;
use thiserror::Error;
use tracing::warn;
use url::Url;

const WHATS_NEW_URL: &str = "https://docs.python.org/3/whatsnew/";

#[derive(Error, Debug)]
pub enum WhatsNewError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("Invalid article URL {url}: {source}")]
    Url { url: String, source: url::ParseError },
}

pub fn run(session: &Session) -> Result<ResultTable, WhatsNewError> {
    let base = Url::parse(WHATS_NEW_URL).map_err(|source| WhatsNewError::Url {
        url: WHATS_NEW_URL.to_string(),
        source,
    })?;

    let body = session.get_text(WHATS_NEW_URL)?;
    let doc = Html::parse_document(&body);
    let hrefs = article_links(&doc)?;

    let mut table = ResultTable::new(["Link", "Title", "Editor, Author"]);
    for href in hrefs {
        let link = base.join(&href).map_err(|source| WhatsNewError::Url {
            url: href.clone(),
            source,
        })?;

        let body = match session.get_text(link.as_str()) {
            Ok(body) => body,
            Err(err) => {
                warn!(url = %link, %err, "skipping article: fetch failed");
                continue;
            }
        };

        let (title, credit) = parse_article(&Html::parse_document(&body))?;
        table.push(vec![link.to_string(), title, credit]);
    }
    Ok(table)
}

/// Relative links of the per-version articles, in page order.
fn article_links(doc: &Html) -> Result<Vec<String>, DomError> {
    let root = doc.root_element();
    let section = dom::require_first(root, "section#what-s-new-in-python", "whatsnew index")?;
    let wrapper = dom::require_first(section, "div.toctree-wrapper", "whatsnew index")?;

    let items = dom::selector("li.toctree-l1")?;
    let mut links = Vec::new();
    for item in wrapper.select(&items) {
        let a = dom::require_first(item, "a", "toctree entry")?;
        if let Some(href) = a.value().attr("href") {
            links.push(href.to_string());
        }
    }
    Ok(links)
}

/// Title and first definition-list credit text of one article. Line breaks
/// inside the credit block collapse to spaces.
fn parse_article(doc: &Html) -> Result<(String, String), DomError> {
    let root = doc.root_element();
    let h1 = dom::require_first(root, "h1", "whatsnew article")?;
    let dl = dom::require_first(root, "dl", "whatsnew article")?;

    let title = dom::text_of(h1).trim_end_matches('¶').trim().to_string();
    let credit = dom::text_of(dl);
    Ok((title, credit))
}
