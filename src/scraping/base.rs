use std::time::Duration;

use reqwest::blocking::Client;
use scraper::{ElementRef, Selector};
use tracing::debug;

use super::PageFetcher;
use crate::error::{Error, Result};

pub fn clean_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// All descendant text, line breaks preserved.
pub fn raw_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

pub fn nth<'a>(
    element: &ElementRef<'a>,
    selector: &Selector,
    index: usize,
) -> Option<ElementRef<'a>> {
    element.select(selector).nth(index)
}

/// Trimmed, `\n`-separated pieces of a text region, rejecting regions that are too short.
pub fn segments(text: &str, expected: usize, what: &str) -> Result<Vec<String>> {
    let pieces = text
        .trim()
        .split('\n')
        .map(|piece| piece.trim().to_string())
        .collect::<Vec<_>>();
    if pieces.len() < expected {
        return Err(Error::structure(format!(
            "{what} has {} line(s), expected at least {expected}: {:?}",
            pieces.len(),
            clean_text(text)
        )));
    }
    Ok(pieces)
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .user_agent("FabEventFeed/0.1")
            .build()
            .map_err(|err| Error::Config(format!("http client: {err}")))?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str, params: &[(&str, String)]) -> Result<String> {
        let transport = |err: reqwest::Error| Error::Transport {
            url: url.to_string(),
            message: err.to_string(),
        };

        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .map_err(transport)?;
        debug!(url = %response.url(), status = %response.status(), "fetched page");
        let response = response.error_for_status().map_err(transport)?;
        response.text().map_err(transport)
    }
}
