use chrono::DateTime;
use chrono_tz::Tz;

/// One listing entry from the event finder, fully normalized.
#[derive(Clone, Debug, PartialEq)]
pub struct EventRecord {
    title: String, // always "{event_type}@{venue}"
    event_type: String,
    start_datetime: DateTime<Tz>,
    location: String,
    format: String,
    details: String,
}

impl EventRecord {
    pub fn build(
        event_type: &str,
        venue_name: &str,
        start_datetime: DateTime<Tz>,
        location: &str,
        format: &str,
    ) -> Self {
        Self {
            title: format!("{event_type}@{venue_name}"),
            event_type: event_type.to_string(),
            start_datetime,
            location: location.to_string(),
            format: format.to_string(),
            details: String::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn start_datetime(&self) -> &DateTime<Tz> {
        &self.start_datetime
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn details(&self) -> &str {
        &self.details
    }
}
