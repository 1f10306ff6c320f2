//! Projects event records into an iCalendar (RFC 5545) feed.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use icalendar::{Calendar, Component, Event, EventLike};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::Result;
use crate::models::EventRecord;

pub struct CalendarProjector {
    name: String,
    generated_at: DateTime<Utc>,
}

impl CalendarProjector {
    /// `generated_at` becomes every entry's DTSTAMP so the same records always
    /// serialize to the same bytes.
    pub fn new(name: &str, generated_at: DateTime<Utc>) -> Self {
        Self {
            name: name.to_string(),
            generated_at,
        }
    }

    pub fn project(&self, records: &[EventRecord]) -> Calendar {
        let mut calendar = Calendar::new();
        calendar.name(&self.name);

        for record in records {
            // DTSTART goes out in UTC so no VTIMEZONE is needed.
            // No DTEND: entries are point events.
            let event = Event::new()
                .uid(&stable_uid(record))
                .timestamp(self.generated_at)
                .summary(&summary(record))
                .starts(record.start_datetime().with_timezone(&Utc))
                .location(record.location())
                .description(record.details())
                .done();
            calendar.push(event);
        }

        calendar.done()
    }

    pub fn to_ical(&self, records: &[EventRecord]) -> Vec<u8> {
        self.project(records).to_string().into_bytes()
    }
}

/// "【Classic Constructed】Armory@Yodobashi Store"
pub fn summary(record: &EventRecord) -> String {
    format!("【{}】{}", record.format(), record.title())
}

fn stable_uid(record: &EventRecord) -> String {
    let mut hasher = Sha256::new();
    hasher.update(record.start_datetime().to_rfc3339().as_bytes());
    hasher.update(b"|");
    hasher.update(record.title().as_bytes());
    hasher.update(b"|");
    hasher.update(record.location().as_bytes());
    hasher.update(b"|");
    hasher.update(record.format().as_bytes());
    format!("{:x}@fab-event-feed", hasher.finalize())
}

pub fn write_calendar(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "wrote calendar");
    Ok(())
}
