//! `pep` mode: PEP status reconciliation.
//!
//! The PEP index lists every proposal under a category table whose legend
//! maps single-letter codes to full status names. Each PEP also declares its
//! status on its own detail page. This module builds the legend from the
//! index, checks every listed PEP's declared status against the category it
//! appears under, counts per-status totals and reports mismatches.

use crate::dom::{self, DomError};
use crate::session::{FetchError, Session};
use crate::table::ResultTable;
use scraper::Html;
use thiserror::Error;
use tracing::warn;
use url::Url;

const PEP_INDEX_URL: &str = "https://peps.python.org/";

/// Sentinel text of the legend entry for PEPs without a status letter.
const NO_LETTER: &str = "<No letter>";

#[derive(Error, Debug)]
pub enum PepError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("Invalid PEP URL {url}: {source}")]
    Url { url: String, source: url::ParseError },

    #[error("Status code '{code}' is missing from the index legend")]
    UnknownCode { code: String },

    #[error("Legend entry '{entry}' has no status name")]
    LegendEntry { entry: String },

    #[error("PEP row link has no href attribute")]
    MissingHref,

    #[error("No 'Status' entry on the PEP detail page")]
    DeclaredStatusNotFound,
}

/// Mapping from a single-letter status code (empty string for the
/// "no letter" sentinel) to the full status names it may represent.
/// Insertion-ordered; the first name for a code is its canonical name.
#[derive(Debug, Default)]
pub struct StatusLegend {
    entries: Vec<(String, Vec<String>)>,
}

impl StatusLegend {
    /// Record that `code` may stand for `name`. A code appearing in several
    /// legend entries accumulates all its names (e.g. `A` for both Active
    /// and Accepted).
    pub fn add(&mut self, code: &str, name: &str) {
        match self.entries.iter_mut().find(|(c, _)| c == code) {
            Some((_, names)) => names.push(name.to_string()),
            None => self
                .entries
                .push((code.to_string(), vec![name.to_string()])),
        }
    }

    /// Full status names acceptable for `code`, if the code is known.
    pub fn acceptable(&self, code: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, names)| names.as_slice())
    }
}

/// One row of the index table: status code plus detail-page URL.
#[derive(Debug, Clone)]
pub struct PepRow {
    pub code: String,
    pub url: String,
}

/// A PEP whose declared status is not acceptable for its index category.
#[derive(Debug, PartialEq, Eq)]
pub struct Mismatch {
    pub url: String,
    pub declared: String,
    pub acceptable: Vec<String>,
}

/// Insertion-ordered status name → count map plus a running row total.
#[derive(Debug, Default)]
pub struct StatusTally {
    counts: Vec<(String, u64)>,
    total: u64,
}

impl StatusTally {
    /// Make sure `status` has a bucket, starting it at zero.
    fn ensure(&mut self, status: &str) {
        if !self.counts.iter().any(|(name, _)| name == status) {
            self.counts.push((status.to_string(), 0));
        }
    }

    fn increment(&mut self, status: &str) {
        self.ensure(status);
        if let Some((_, count)) = self.counts.iter_mut().find(|(name, _)| name == status) {
            *count += 1;
        }
    }

    #[allow(dead_code)]
    pub fn count(&self, status: &str) -> Option<u64> {
        self.counts
            .iter()
            .find(|(name, _)| name == status)
            .map(|(_, count)| *count)
    }

    #[allow(dead_code)]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Flatten into the renderer's interchange shape: `Status,Count` header,
    /// one row per bucket in insertion order, and a final `Total` row.
    pub fn into_table(self) -> ResultTable {
        let mut table = ResultTable::new(["Status", "Count"]);
        for (status, count) in self.counts {
            table.push(vec![status, count.to_string()]);
        }
        table.push(vec!["Total".to_string(), self.total.to_string()]);
        table
    }
}

/// Check every row's declared status against the legend.
///
/// Pure with respect to the network: `detail_status` maps a detail-page URL
/// to the status declared there. For each row the canonical bucket for the
/// row's code is created (at zero) if missing and the running total is
/// incremented. An acceptable declared status increments the canonical
/// bucket; anything else is recorded as a [`Mismatch`] and counted under
/// the declared status itself, leaving the expected bucket untouched.
///
/// A code absent from the legend and any lookup failure abort the
/// reconciliation.
pub fn reconcile<F>(
    legend: &StatusLegend,
    rows: &[PepRow],
    mut detail_status: F,
) -> Result<(StatusTally, Vec<Mismatch>), PepError>
where
    F: FnMut(&str) -> Result<String, PepError>,
{
    let mut tally = StatusTally::default();
    let mut mismatches = Vec::new();

    for row in rows {
        let acceptable = legend
            .acceptable(&row.code)
            .ok_or_else(|| PepError::UnknownCode {
                code: row.code.clone(),
            })?;
        let Some(canonical) = acceptable.first().cloned() else {
            return Err(PepError::UnknownCode {
                code: row.code.clone(),
            });
        };
        tally.ensure(&canonical);

        let declared = detail_status(&row.url)?;
        tally.total += 1;

        if acceptable.iter().any(|name| *name == declared) {
            tally.increment(&canonical);
        } else {
            mismatches.push(Mismatch {
                url: row.url.clone(),
                declared: declared.clone(),
                acceptable: acceptable.to_vec(),
            });
            tally.increment(&declared);
        }
    }

    Ok((tally, mismatches))
}

pub fn run(session: &Session) -> Result<ResultTable, PepError> {
    let base = Url::parse(PEP_INDEX_URL).map_err(|source| PepError::Url {
        url: PEP_INDEX_URL.to_string(),
        source,
    })?;

    let body = session.get_text(PEP_INDEX_URL)?;
    let doc = Html::parse_document(&body);
    let legend = parse_legend(&doc)?;
    let rows = parse_rows(&doc, &base)?;

    let (tally, mismatches) = reconcile(&legend, &rows, |url| {
        let body = session.get_text(url)?;
        declared_status(&Html::parse_document(&body))
    })?;

    for mismatch in &mismatches {
        warn!(
            url = %mismatch.url,
            declared = %mismatch.declared,
            acceptable = ?mismatch.acceptable,
            "PEP status mismatch"
        );
    }

    Ok(tally.into_table())
}

/// Build the [`StatusLegend`] from the `#pep-status-key` section.
///
/// Per list item: the code is the `abbr` element's text (the "no letter"
/// sentinel becomes the empty string) and the full status name is the first
/// `:`-delimited segment of the `abbr`'s `title` attribute.
fn parse_legend(doc: &Html) -> Result<StatusLegend, PepError> {
    let root = doc.root_element();
    let section = dom::require_first(root, "section#pep-status-key", "PEP index")?;

    let items = dom::selector("li")?;
    let mut legend = StatusLegend::default();
    for item in section.select(&items) {
        let abbr = dom::require_first(item, "abbr", "status key entry")?;

        let code_text = dom::text_of(abbr);
        let code = if code_text == NO_LETTER { "" } else { &code_text };

        let title = abbr
            .value()
            .attr("title")
            .ok_or_else(|| PepError::LegendEntry {
                entry: dom::text_of(item),
            })?;
        let name = title.split(':').next().unwrap_or(title).trim();
        if name.is_empty() {
            return Err(PepError::LegendEntry {
                entry: dom::text_of(item),
            });
        }

        legend.add(code, name);
    }
    Ok(legend)
}

/// Collect one [`PepRow`] per data row of the categorized index tables.
///
/// The leading character of the `abbr` text is the PEP type indicator and
/// is stripped; the remainder (possibly empty) is the status code. Sections
/// without a table (e.g. the intro) are skipped.
fn parse_rows(doc: &Html, base: &Url) -> Result<Vec<PepRow>, PepError> {
    let root = doc.root_element();
    let index = dom::require_first(root, "section#index-by-category", "PEP index")?;

    let sections = dom::selector("section")?;
    let trs = dom::selector("tr")?;
    let mut rows = Vec::new();
    for section in index.select(&sections) {
        let Some(table) = dom::find_first(section, "table")? else {
            continue;
        };
        let tbody = dom::require_first(table, "tbody", "category table")?;

        for tr in tbody.select(&trs) {
            let abbr = dom::require_first(tr, "abbr", "PEP row")?;
            let code: String = dom::text_of(abbr).chars().skip(1).collect();

            let a = dom::require_first(tr, "a", "PEP row")?;
            let href = a.value().attr("href").ok_or(PepError::MissingHref)?;
            let url = base.join(href).map_err(|source| PepError::Url {
                url: href.to_string(),
                source,
            })?;

            rows.push(PepRow {
                code,
                url: url.to_string(),
            });
        }
    }
    Ok(rows)
}

/// The status a PEP declares on its own page: in the first definition list,
/// the value following the `Status` term. The term may carry a trailing
/// colon (rendered via a `span.colon` child), so it is stripped before
/// comparing.
fn declared_status(doc: &Html) -> Result<String, PepError> {
    let root = doc.root_element();
    let dl = dom::require_first(root, "dl", "PEP detail page")?;

    let dts = dom::selector("dt")?;
    for dt in dl.select(&dts) {
        if dom::text_of(dt).trim_end_matches(':') == "Status" {
            let dd = dom::next_element_sibling(dt).ok_or(PepError::DeclaredStatusNotFound)?;
            return Ok(dom::text_of(dd));
        }
    }
    Err(PepError::DeclaredStatusNotFound)
}
