//! `download` mode: fetches the PDF (A4) zip archive of the docs into
//! `downloads/`, named after the final path segment of the archive URL.

use crate::dom::{self, DomError};
use crate::paths::{self, PathError};
use crate::session::{FetchError, Session};
use regex::Regex;
use scraper::Html;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;
use url::Url;

const DOWNLOAD_PAGE_URL: &str = "https://docs.python.org/3/download.html";

/// The archive variant to save: PDF, A4 page size, zipped.
const ARCHIVE_SUFFIX_PATTERN: &str = r".+pdf-a4\.zip$";

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("Invalid archive pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("No link matching the pdf-a4 zip archive on the downloads page")]
    ArchiveNotFound,

    #[error("Invalid archive URL {url}: {source}")]
    Url { url: String, source: url::ParseError },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub fn run(session: &Session) -> Result<(), DownloadError> {
    let body = session.get_text(DOWNLOAD_PAGE_URL)?;
    let doc = Html::parse_document(&body);
    let href = find_archive_href(&doc)?;

    let base = Url::parse(DOWNLOAD_PAGE_URL).map_err(|source| DownloadError::Url {
        url: DOWNLOAD_PAGE_URL.to_string(),
        source,
    })?;
    let archive_url = base.join(&href).map_err(|source| DownloadError::Url {
        url: href.clone(),
        source,
    })?;

    let dir = paths::downloads_dir();
    paths::ensure_dir(&dir)?;
    let path = dir.join(archive_filename(&archive_url));

    let mut file = std::fs::File::create(&path).map_err(|source| DownloadError::Write {
        path: path.clone(),
        source,
    })?;
    let bytes = session.download_to(archive_url.as_str(), &mut file)?;

    info!(path = %path.display(), bytes, "archive downloaded and saved");
    Ok(())
}

/// href of the first pdf-a4 zip link in the downloads table.
fn find_archive_href(doc: &Html) -> Result<String, DownloadError> {
    let root = doc.root_element();
    let main = dom::require_first(root, r#"div[role="main"]"#, "downloads page")?;
    let table = dom::require_first(main, "table.docutils", "downloads page")?;

    let pattern = Regex::new(ARCHIVE_SUFFIX_PATTERN)?;
    let links = dom::selector("a")?;
    table
        .select(&links)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| pattern.is_match(href))
        .map(str::to_string)
        .ok_or(DownloadError::ArchiveNotFound)
}

/// Final path segment of the archive URL.
fn archive_filename(url: &Url) -> String {
    url.path().rsplit('/').next().unwrap_or_default().to_string()
}
