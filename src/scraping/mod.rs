pub mod base;
pub mod event_finder_html;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::models::EventRecord;
use crate::normalize::DateTimeNormalizer;
use event_finder_html::{ListingPage, RawEventBlock};

/// Source of raw page markup.
pub trait PageFetcher {
    fn fetch(&self, url: &str, params: &[(&str, String)]) -> Result<String>;
}

/// The event finder search, minus the page number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingQuery {
    pub url: String,
    pub format: String,
    pub event_type: String,
    pub distance: String,
    pub query: String,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            url: "https://fabtcg.com/ja/events/".to_string(),
            format: String::new(),
            event_type: String::new(),
            distance: "50".to_string(),
            query: "日本、東京都品川区上大崎２丁目１６ 目黒駅".to_string(),
        }
    }
}

impl ListingQuery {
    pub fn params(&self, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("format", self.format.clone()),
            ("type", self.event_type.clone()),
            ("distance", self.distance.clone()),
            ("query", self.query.clone()),
            ("sort", "date".to_string()),
            ("mode", "event".to_string()),
            ("page", page.to_string()),
        ]
    }
}

/// Walks every result page in order and builds one record per listing entry.
/// The first failure aborts the crawl.
pub fn crawl(
    fetcher: &dyn PageFetcher,
    query: &ListingQuery,
    normalizer: &DateTimeNormalizer,
    reference_year: i32,
) -> Result<Vec<EventRecord>> {
    let first = ListingPage::parse(&fetcher.fetch(&query.url, &query.params(1))?);
    let total_pages = first.page_count(&query.url)?;
    info!(total_pages, url = %query.url, "discovered event finder pages");

    let mut records = Vec::new();
    collect_page(&first, 1, normalizer, reference_year, &mut records)?;
    for page_number in 2..=total_pages {
        let page = ListingPage::parse(&fetcher.fetch(&query.url, &query.params(page_number))?);
        collect_page(&page, page_number, normalizer, reference_year, &mut records)?;
    }

    Ok(records)
}

fn collect_page(
    page: &ListingPage,
    page_number: u32,
    normalizer: &DateTimeNormalizer,
    reference_year: i32,
    records: &mut Vec<EventRecord>,
) -> Result<()> {
    let before = records.len();
    for block in page.blocks(page_number) {
        let record = build_record(&block?, normalizer, reference_year)?;
        debug!(
            title = record.title(),
            start = %record.start_datetime().to_rfc3339(),
            location = record.location(),
            format = record.format(),
            "built event record"
        );
        records.push(record);
    }
    info!(page = page_number, events = records.len() - before, "scraped page");
    Ok(())
}

pub fn build_record(
    block: &RawEventBlock,
    normalizer: &DateTimeNormalizer,
    reference_year: i32,
) -> Result<EventRecord> {
    let title = block.title_fields()?;
    let when = block.date_format_fields()?;
    let start = normalizer.normalize(&when.raw_datetime, reference_year)?;
    Ok(EventRecord::build(
        &title.event_type,
        &title.venue_name,
        start,
        &block.location,
        &when.format,
    ))
}
