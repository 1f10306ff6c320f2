//! Turns the event finder's "Sun 21st Sep, 3:30 PM" text into zoned timestamps.
//!
//! The listing omits the year, so a reference year is supplied by the caller
//! and spliced in before parsing.

use std::borrow::Cow;

use chrono::format::{self, Parsed, StrftimeItems};
use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Weekday};
use chrono_tz::Tz;
use regex::Regex;

use crate::error::{Error, Result};

/// A strftime pattern for the part of the text after the weekday.
#[derive(Debug, Clone, Copy)]
pub struct AcceptedFormat {
    pub pattern: &'static str,
    pub has_minutes: bool,
}

/// Order matters: the site drops ":00" on whole hours, so the bare-hour shape is tried first.
pub const DEFAULT_FORMATS: [AcceptedFormat; 2] = [
    AcceptedFormat {
        pattern: "%d %b %Y, %I %p",
        has_minutes: false,
    },
    AcceptedFormat {
        pattern: "%d %b %Y, %I:%M %p",
        has_minutes: true,
    },
];

pub struct DateTimeNormalizer {
    ordinal: Regex,
    timezone: Tz,
    formats: Vec<AcceptedFormat>,
}

impl DateTimeNormalizer {
    pub fn new(timezone: Tz) -> Self {
        Self::with_formats(timezone, DEFAULT_FORMATS.to_vec())
    }

    pub fn with_formats(timezone: Tz, formats: Vec<AcceptedFormat>) -> Self {
        Self {
            ordinal: Regex::new(r"(?i)(\d{1,2})(st|nd|rd|th)").expect("valid ordinal regex"),
            timezone,
            formats,
        }
    }

    /// "21st" -> "21". Text without ordinals is returned untouched.
    pub fn strip_ordinals<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.ordinal.replace_all(text, "$1")
    }

    /// "Sun 21 Sep, 3:30 PM" + 2024 -> "Sun 21 Sep 2024, 3:30 PM".
    pub fn insert_year(&self, text: &str, year: i32) -> Result<String> {
        let (date_part, time_part) = text.split_once(',').ok_or_else(|| Error::DateParse {
            text: text.to_string(),
            tried: "no comma between date and time".to_string(),
        })?;
        Ok(format!("{} {year},{time_part}", date_part.trim_end()))
    }

    pub fn normalize(&self, raw: &str, reference_year: i32) -> Result<DateTime<Tz>> {
        let stripped = self.strip_ordinals(raw);
        let with_year = self.insert_year(stripped.trim(), reference_year)?;
        let naive = self.parse_naive(&with_year)?;
        self.localize(naive).ok_or_else(|| Error::DateParse {
            text: with_year.clone(),
            tried: format!("no local time {naive} in {}", self.timezone.name()),
        })
    }

    fn parse_naive(&self, text: &str) -> Result<NaiveDateTime> {
        let failure = || Error::DateParse {
            text: text.to_string(),
            tried: self
                .formats
                .iter()
                .map(|f| format!("%a {}", f.pattern))
                .collect::<Vec<_>>()
                .join(" | "),
        };

        // The weekday has to look like one, but the listing's weekday is not
        // checked against the inferred year.
        let (weekday, rest) = text.trim().split_once(' ').ok_or_else(failure)?;
        weekday.parse::<Weekday>().map_err(|_| failure())?;

        self.formats
            .iter()
            .find_map(|accepted| parse_with(rest.trim_start(), accepted))
            .ok_or_else(failure)
    }

    fn localize(&self, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
        match self.timezone.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Some(dt),
            // a fixed-offset zone never yields these
            LocalResult::Ambiguous(..) | LocalResult::None => None,
        }
    }
}

fn parse_with(text: &str, accepted: &AcceptedFormat) -> Option<NaiveDateTime> {
    let mut parsed = Parsed::new();
    format::parse(&mut parsed, text, StrftimeItems::new(accepted.pattern)).ok()?;
    if !accepted.has_minutes {
        parsed.set_minute(0).ok()?;
    }
    parsed.to_naive_datetime_with_offset(0).ok()
}
