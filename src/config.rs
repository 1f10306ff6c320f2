use std::{fs, path::Path, path::PathBuf};

use chrono::{Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::scraping::ListingQuery;
use crate::utils;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub listing: ListingQuery,
    pub timezone: String,
    pub output_path: PathBuf,
    pub calendar_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listing: ListingQuery::default(),
            timezone: "Asia/Tokyo".to_string(),
            output_path: PathBuf::from("fab-events.ics"),
            calendar_name: "FaB Events".to_string(),
        }
    }
}

impl AppConfig {
    /// Reads `config.json` from the data directory, falling back to defaults when it is absent.
    pub fn load() -> Result<Self> {
        read_config(&utils::config_path())
    }

    /// Event times are always UTC+9, so only zones pinned there all year are accepted.
    pub fn timezone(&self) -> Result<Tz> {
        let tz = self
            .timezone
            .parse::<Tz>()
            .map_err(|err| Error::Config(format!("timezone {:?}: {err}", self.timezone)))?;
        if !is_fixed_utc_plus_nine(tz) {
            return Err(Error::Config(format!(
                "timezone {:?} is not fixed at UTC+09:00",
                self.timezone
            )));
        }
        Ok(tz)
    }
}

// January and July catch any daylight-saving shift in either hemisphere.
fn is_fixed_utc_plus_nine(tz: Tz) -> bool {
    [1, 7].into_iter().all(|month| {
        Utc.with_ymd_and_hms(2025, month, 1, 0, 0, 0)
            .single()
            .map(|at| tz.offset_from_utc_datetime(&at.naive_utc()).fix().local_minus_utc())
            == Some(9 * 3600)
    })
}

fn read_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(AppConfig::default());
    }
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|err| Error::Config(format!("{}: {err}", path.display())))
}
