//! HTTP session with a file-backed response cache.
//!
//! Cached responses live at `~/.cache/docscrape/<md5-of-url>.json` (or under
//! `XDG_CACHE_HOME` when set), one JSON entry per URL holding the URL, the
//! fetch timestamp and the response body. A warm cache makes repeat runs
//! byte-identical and network-free; `--clear-cache` removes the directory.
//!
//! One GET is in flight at a time; there are no retries. A non-2xx status or
//! a transport failure surfaces as a `FetchError` and the call site decides
//! between skip-and-continue and abort.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Failed to read response body from {url}: {reason}")]
    Body { url: String, reason: String },

    #[error("Cannot determine cache directory. HOME environment variable not set.")]
    NoCacheDir,

    #[error("Failed to write cache entry {path}: {source}")]
    CacheWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to clear cache {path}: {source}")]
    CacheClear {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One cached GET response.
#[derive(Debug, Serialize, Deserialize)]
struct CachedResponse {
    url: String,
    fetched_at: String,
    body: String,
}

/// A cache-backed HTTP session. All page fetches go through [`get_text`];
/// bulk downloads stream past the cache via [`download_to`].
///
/// [`get_text`]: Session::get_text
/// [`download_to`]: Session::download_to
pub struct Session {
    cache_dir: PathBuf,
}

impl Session {
    /// Session caching under the XDG cache directory.
    pub fn new() -> Result<Self, FetchError> {
        let cache_base = std::env::var("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .map(|h| h.join(".cache"))
                    .unwrap_or_default()
            });

        if cache_base.as_os_str().is_empty() {
            return Err(FetchError::NoCacheDir);
        }

        Ok(Self {
            cache_dir: cache_base.join("docscrape"),
        })
    }

    /// Session caching under an explicit directory.
    #[allow(dead_code)]
    pub fn with_cache_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Remove the whole cache directory, if present.
    pub fn clear_cache(&self) -> Result<(), FetchError> {
        if self.cache_dir.exists() {
            std::fs::remove_dir_all(&self.cache_dir).map_err(|source| FetchError::CacheClear {
                path: self.cache_dir.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// GET a text resource through the cache.
    pub fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let entry = self.entry_path(url);
        if let Ok(content) = std::fs::read_to_string(&entry)
            && let Ok(cached) = serde_json::from_str::<CachedResponse>(&content)
        {
            debug!(url, "cache hit");
            return Ok(cached.body);
        }

        debug!(url, "cache miss, fetching");
        let body = http_get_text(url)?;
        self.store(url, &entry, &body)?;
        Ok(body)
    }

    /// GET a binary resource and stream the body into `writer`, bypassing
    /// the cache. Returns the number of bytes written.
    pub fn download_to(&self, url: &str, writer: &mut impl Write) -> Result<u64, FetchError> {
        let response = ureq::get(url).call().map_err(|e| FetchError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let mut reader = response.into_body().into_reader();
        std::io::copy(&mut reader, writer).map_err(|e| FetchError::Body {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        self.cache_dir.join(format!("{:x}.json", md5::compute(url)))
    }

    fn store(&self, url: &str, entry: &PathBuf, body: &str) -> Result<(), FetchError> {
        std::fs::create_dir_all(&self.cache_dir).map_err(|source| FetchError::CacheWrite {
            path: self.cache_dir.clone(),
            source,
        })?;

        let cached = CachedResponse {
            url: url.to_string(),
            fetched_at: Utc::now().to_rfc3339(),
            body: body.to_string(),
        };
        // CachedResponse has no non-serializable fields, so this cannot fail
        let json = serde_json::to_string(&cached).unwrap_or_default();
        std::fs::write(entry, json).map_err(|source| FetchError::CacheWrite {
            path: entry.clone(),
            source,
        })
    }
}

#[cfg(test)]
impl Session {
    /// Insert a response into the cache without touching the network.
    pub(crate) fn seed(&self, url: &str, body: &str) {
        self.store(url, &self.entry_path(url), body).unwrap();
    }
}

fn http_get_text(url: &str) -> Result<String, FetchError> {
    let response = ureq::get(url).call().map_err(|e| FetchError::Fetch {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    response
        .into_body()
        .read_to_string()
        .map_err(|e| FetchError::Body {
            url: url.to_string(),
            reason: e.to_string(),
        })
}
