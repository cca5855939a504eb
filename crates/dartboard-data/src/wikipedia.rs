//! S&P 500 constituent list scraped from Wikipedia.
//!
//! The "List of S&P 500 companies" article carries a table with id
//! `constituents` whose first three columns are the ticker symbol, the
//! security name and the GICS sector. Only those columns are read.

use crate::error::{DataError, Result};
use dartboard_core::{Constituent, ConstituentProvider, GicsSector};
use std::time::Duration;
use tracing::{debug, info};

/// Article listing the current S&P 500 members.
pub const SP500_URL: &str = "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies";

/// Wikipedia asks automated clients to identify themselves.
const USER_AGENT: &str = "dartboard/0.1 (+https://github.com/factordynamics/dartboard)";

/// `id` attribute of the constituents table.
const TABLE_ID: &str = "constituents";

/// Constituent provider backed by the Wikipedia article.
#[derive(Debug, Clone)]
pub struct WikipediaConstituents {
    client: reqwest::Client,
    url: String,
}

impl WikipediaConstituents {
    /// Provider reading from [`SP500_URL`].
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_url(SP500_URL)
    }

    /// Provider reading from another page with the same table layout.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn with_url(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Page the list is read from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download the page and parse the constituents table.
    ///
    /// # Errors
    ///
    /// Any network error, non-success status, missing table or malformed
    /// row fails the whole call.
    pub async fn fetch(&self) -> Result<Vec<Constituent>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(DataError::Network)?;

        if !response.status().is_success() {
            return Err(DataError::Http(format!(
                "Failed to fetch {}: HTTP {}",
                self.url,
                response.status()
            )));
        }

        let html = response.text().await.map_err(DataError::Network)?;
        let constituents = parse_constituents_table(&html)?;
        info!(count = constituents.len(), url = %self.url, "loaded constituents");
        Ok(constituents)
    }
}

impl ConstituentProvider for WikipediaConstituents {
    type Error = DataError;

    async fn constituents(&self) -> Result<Vec<Constituent>> {
        self.fetch().await
    }
}

/// Extract constituents from the `constituents` table of an HTML page.
///
/// Header rows (no `<td>` cells) are skipped. Unrecognised sector labels
/// leave the sector unset.
///
/// # Errors
///
/// Returns [`DataError::Constituents`] if the table is missing, holds no
/// data rows, or has a row without a symbol.
pub fn parse_constituents_table(html: &str) -> Result<Vec<Constituent>> {
    let table = find_table(html, TABLE_ID)
        .ok_or_else(|| DataError::Constituents(format!("No table with id \"{TABLE_ID}\"")))?;

    let mut constituents = Vec::new();
    for (index, row) in table.split("<tr").skip(1).enumerate() {
        let cells = cells(row);
        if cells.is_empty() {
            continue;
        }

        let symbol = cells[0].trim();
        if symbol.is_empty() {
            return Err(DataError::Constituents(format!("Row {index} has no symbol")));
        }

        let mut constituent = Constituent::new(symbol);
        if let Some(name) = cells.get(1).map(|n| n.trim()).filter(|n| !n.is_empty()) {
            constituent = constituent.with_name(name);
        }
        if let Some(label) = cells.get(2) {
            match GicsSector::from_name(label) {
                Some(sector) => constituent = constituent.with_sector(sector),
                None => debug!(symbol, label = label.as_str(), "unrecognised sector"),
            }
        }
        constituents.push(constituent);
    }

    if constituents.is_empty() {
        return Err(DataError::Constituents("Constituents table has no rows".to_string()));
    }
    Ok(constituents)
}

/// Slice of `html` from the table carrying `id` to its closing tag.
fn find_table<'a>(html: &'a str, id: &str) -> Option<&'a str> {
    let marker = [format!("id=\"{id}\""), format!("id='{id}'"), format!("id={id}")]
        .into_iter()
        .find_map(|m| html.find(&m))?;
    let start = html[..marker].rfind("<table")?;
    let end = html[marker..]
        .find("</table>")
        .map_or(html.len(), |offset| marker + offset);
    Some(&html[start..end])
}

/// Text content of each `<td>` in a row fragment.
fn cells(row: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut rest = row;
    while let Some(open) = rest.find("<td") {
        let after_open = &rest[open..];
        let Some(tag_end) = after_open.find('>') else {
            break;
        };
        let content = &after_open[tag_end + 1..];
        let close = content.find("</td>").unwrap_or(content.len());
        cells.push(decode_entities(&strip_tags(&content[..close])));
        rest = &content[close..];
    }
    cells
}

fn strip_tags(fragment: &str) -> String {
    let mut text = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for c in fragment.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&nbsp;", " ")
        .replace("&#160;", " ")
}
