pub mod calendar;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod scraping;
mod utils;

use std::path::PathBuf;

use chrono::{Datelike, Local, Utc};
use tracing::info;

use calendar::CalendarProjector;
use config::AppConfig;
use error::Result;
use normalize::DateTimeNormalizer;
use scraping::base::HttpFetcher;

/// Crawls the event finder and writes the calendar file, returning its path.
pub fn run(config: &AppConfig) -> Result<PathBuf> {
    let fetcher = HttpFetcher::new()?;
    let normalizer = DateTimeNormalizer::new(config.timezone()?);
    // The listing never prints a year.
    let reference_year = Local::now().year();

    let records = scraping::crawl(&fetcher, &config.listing, &normalizer, reference_year)?;
    info!(events = records.len(), reference_year, "crawl finished");

    let projector = CalendarProjector::new(&config.calendar_name, Utc::now());
    calendar::write_calendar(&config.output_path, &projector.to_ical(&records))?;
    Ok(config.output_path.clone())
}
