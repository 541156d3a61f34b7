use chrono::FixedOffset;
use std::env;
use std::sync::Arc;
use tera::Tera;

use crate::controller::Session;
use crate::error::{DashboardError, Result};
use crate::fetcher::HttpCovidApi;
use crate::locale::{DateFormatter, DateLocale};

/// Application configuration from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP server to.
    pub bind_address: String,
    /// Base URL of the COVID-19 API, without trailing slash.
    pub api_base: String,
    /// Locale used for every displayed date.
    pub date_locale: DateLocale,
    /// Time zone for displayed dates, in minutes east of UTC.
    pub utc_offset_minutes: i32,
    /// Cron expression for re-fetching the summary. Unset disables refresh.
    pub refresh_cron: Option<String>,
}

impl Config {
    /// Creates Config from environment variables with defaults.
    pub fn from_env() -> Result<Self> {
        let date_locale = match env::var("DATE_LOCALE") {
            Ok(v) => v.parse()?,
            Err(_) => DateLocale::default(),
        };
        let utc_offset_minutes = match env::var("UTC_OFFSET_MINUTES") {
            Ok(v) => v.parse().map_err(|_| {
                DashboardError::InvalidConfig(format!("UTC_OFFSET_MINUTES '{}' is not an integer", v))
            })?,
            Err(_) => 0,
        };
        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8201".into()),
            api_base: env::var("COVID_API_BASE")
                .unwrap_or_else(|_| "https://api.covid19api.com".into()),
            date_locale,
            utc_offset_minutes,
            refresh_cron: env::var("REFRESH_CRON").ok().filter(|s| !s.trim().is_empty()),
        })
    }

    pub fn date_formatter(&self) -> Result<DateFormatter> {
        let offset = FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            DashboardError::InvalidConfig(format!(
                "UTC_OFFSET_MINUTES {} is out of range",
                self.utc_offset_minutes
            ))
        })?;
        Ok(DateFormatter::new(self.date_locale, offset))
    }
}

/// Loads every template matching `glob`.
pub fn load_templates(glob: &str) -> Result<Tera> {
    Ok(Tera::new(glob)?)
}

/// Shared application state passed to all request handlers.
pub struct AppState<A = HttpCovidApi> {
    /// Template engine for rendering HTML pages.
    pub tera: Tera,
    pub session: Arc<Session<A>>,
}

impl<A> AppState<A> {
    pub fn new(tera: Tera, session: Arc<Session<A>>) -> Self {
        Self { tera, session }
    }
}
