//! `latest-versions` mode: documented Python versions and their statuses,
//! taken from the version list in the docs front page sidebar.

use crate::dom::{self, DomError};
use crate::session::{FetchError, Session};
use crate::table::ResultTable;
use regex::Regex;
use scraper::Html;
use thiserror::Error;

const MAIN_DOC_URL: &str = "https://docs.python.org/3/";

/// The sidebar holds several lists; the one we want ends with this link.
const VERSION_LIST_MARKER: &str = "All versions";

/// Matches link texts like `Python 3.11 (in development)`.
const VERSION_PATTERN: &str = r"Python (?P<version>\d\.\d+) \((?P<status>.*)\)";

#[derive(Error, Debug)]
pub enum LatestVersionsError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("No sidebar list containing 'All versions' found; page layout changed?")]
    VersionListNotFound,

    #[error("Invalid version pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub fn run(session: &Session) -> Result<ResultTable, LatestVersionsError> {
    let body = session.get_text(MAIN_DOC_URL)?;
    let doc = Html::parse_document(&body);

    let mut table = ResultTable::new(["Link", "Version", "Status"]);
    for (link, version, status) in parse_versions(&doc)? {
        table.push(vec![link, version, status]);
    }
    Ok(table)
}

/// `(link, version, status)` per entry of the sidebar version list.
fn parse_versions(doc: &Html) -> Result<Vec<(String, String, String)>, LatestVersionsError> {
    let root = doc.root_element();
    let sidebar = dom::require_first(root, "div.sphinxsidebarwrapper", "docs front page")?;

    let lists = dom::selector("ul")?;
    let version_list = sidebar
        .select(&lists)
        .find(|ul| dom::text_of(*ul).contains(VERSION_LIST_MARKER))
        .ok_or(LatestVersionsError::VersionListNotFound)?;

    let pattern = Regex::new(VERSION_PATTERN)?;
    let links = dom::selector("a")?;
    let mut rows = Vec::new();
    for a in version_list.select(&links) {
        // An anchor without an href is not a version link
        let Some(href) = a.value().attr("href") else {
            continue;
        };
        let text = dom::text_of(a);
        let (version, status) = split_version_status(&pattern, &text);
        rows.push((href.to_string(), version, status));
    }
    Ok(rows)
}

/// Split a link text into version and status; texts not matching the
/// `Python <major.minor> (<status>)` shape become the version verbatim with
/// an empty status.
fn split_version_status(pattern: &Regex, text: &str) -> (String, String) {
    match pattern.captures(text) {
        Some(caps) => (caps["version"].to_string(), caps["status"].to_string()),
        None => (text.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRONT_PAGE: &str = r#"
        <html><body>
          <div class="sphinxsidebarwrapper">
            <ul><li><a href="/tutorial/">Tutorial</a></li></ul>
            <ul>
              <li><a href="https://docs.python.org/3.12/">Python 3.12 (in development)</a></li>
              <li><a href="https://docs.python.org/3.11/">Python 3.11 (stable)</a></li>
              <li><a href="https://www.python.org/doc/versions/">All versions</a></li>
            </ul>
          </div>
        </body></html>
    "#;

    fn version_pattern() -> Regex {
        Regex::new(VERSION_PATTERN).unwrap()
    }

    #[test]
    fn test_split_with_parenthetical() {
        let (version, status) =
            split_version_status(&version_pattern(), "Python 3.11 (in development)");
        assert_eq!(version, "3.11");
        assert_eq!(status, "in development");
    }

    #[test]
    fn test_split_without_parenthetical() {
        let (version, status) = split_version_status(&version_pattern(), "3.7");
        assert_eq!(version, "3.7");
        assert_eq!(status, "");
    }

    #[test]
    fn test_parse_versions_picks_marked_list() {
        let doc = Html::parse_document(FRONT_PAGE);
        let rows = parse_versions(&doc).unwrap();

        // The tutorial list is skipped even though it comes first
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            (
                "https://docs.python.org/3.12/".to_string(),
                "3.12".to_string(),
                "in development".to_string()
            )
        );
        assert_eq!(
            rows[2],
            (
                "https://www.python.org/doc/versions/".to_string(),
                "All versions".to_string(),
                String::new()
            )
        );
    }

    #[test]
    fn test_anchor_without_href_is_skipped() {
        let page = r#"
            <html><body>
              <div class="sphinxsidebarwrapper">
                <ul>
                  <li><a name="versions">Python 3.10 (security-fixes)</a></li>
                  <li><a href="https://docs.python.org/3.11/">Python 3.11 (stable)</a></li>
                  <li><a href="https://www.python.org/doc/versions/">All versions</a></li>
                </ul>
              </div>
            </body></html>
        "#;
        let doc = Html::parse_document(page);
        let rows = parse_versions(&doc).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].1, "3.11");
    }

    #[test]
    fn test_missing_marker_is_fatal() {
        let page = r#"
            <html><body>
              <div class="sphinxsidebarwrapper">
                <ul><li><a href="/tutorial/">Tutorial</a></li></ul>
              </div>
            </body></html>
        "#;
        let doc = Html::parse_document(page);
        assert!(matches!(
            parse_versions(&doc),
            Err(LatestVersionsError::VersionListNotFound)
        ));
    }

    #[test]
    fn test_missing_sidebar_is_fatal() {
        let doc = Html::parse_document("<html><body></body></html>");
        assert!(matches!(
            parse_versions(&doc),
            Err(LatestVersionsError::Dom(DomError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_run_from_cached_front_page() {
        let tmp = tempfile::tempdir().unwrap();
        let session = crate::session::Session::with_cache_dir(tmp.path().to_path_buf());
        session.seed(MAIN_DOC_URL, FRONT_PAGE);

        let table = run(&session).unwrap();
        assert_eq!(table.header(), &["Link", "Version", "Status"]);
        assert_eq!(table.rows().len(), 3);
        assert_eq!(table.rows()[1][1], "3.11");
        assert_eq!(table.rows()[1][2], "stable");
    }
}
