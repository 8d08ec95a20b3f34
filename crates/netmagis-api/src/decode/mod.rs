// HTML decoding
//
// Two extraction modes, picked by the page that produced the body:
// the `/search` results table (`table`) and the `/mod` edit form (`form`).
// Scraping stays in this module; operations only see typed values.

mod form;
mod table;

use scraper::{Html, Selector};
use tracing::trace;

use crate::error::Error;
use crate::model::{HostForm, HostRecord};

pub use table::{normalize_label, record_from_cells, record_to_cells};

/// Table cells holding the label/value pairs of a search result.
const RESULT_CELL: &str = "td.tab-text10";

/// CSS selectors, parsed once per client.
#[derive(Debug, Clone)]
pub struct Decoder {
    cell: Selector,
    input: Selector,
    select: Selector,
    option: Selector,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            cell: selector(RESULT_CELL),
            input: selector("input"),
            select: selector("select"),
            option: selector("option"),
        }
    }

    /// Decode a `/search` results page into a host record.
    ///
    /// `queried` is the name or address the search was for; it decides
    /// `is_alias` and supplies the domain when the page shows a bare label.
    pub fn host_record(&self, body: &str, queried: &str) -> Result<HostRecord, Error> {
        let cells = self.result_cells(body)?;
        trace!(cells = cells.len(), "decoding search results table");
        Ok(record_from_cells(&cells, queried))
    }

    /// Trimmed text of every result cell, in document order.
    pub fn result_cells(&self, body: &str) -> Result<Vec<String>, Error> {
        let doc = parse_document(body)?;
        Ok(doc
            .select(&self.cell)
            .map(|td| td.text().collect::<String>().trim().to_owned())
            .collect())
    }

    /// Decode a `/mod` edit page into its pre-filled field values.
    pub fn host_form(&self, body: &str) -> Result<HostForm, Error> {
        let doc = parse_document(body)?;
        Ok(form::scrape(self, &doc))
    }
}

/// Parse a body as an HTML document.
///
/// The HTML5 parser recovers from any malformed markup, so a body is only
/// refused when it holds no markup at all.
pub fn parse_document(body: &str) -> Result<Html, Error> {
    if !body.contains('<') {
        return Err(Error::Parse {
            message: "response contains no HTML markup".into(),
        });
    }
    let doc = Html::parse_document(body);
    if !doc.errors.is_empty() {
        trace!(errors = doc.errors.len(), "HTML parser recovered from markup errors");
    }
    Ok(doc)
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static CSS selector must parse")
}
