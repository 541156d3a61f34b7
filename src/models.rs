//! Data models for the COVID-19 API responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Response of `GET {base}/summary`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalSummary {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(default)]
    pub countries: Vec<CountrySummary>,
    #[serde(default)]
    pub global: GlobalTotals,
    /// Report timestamp.
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub message: String,
}

/// Worldwide aggregate as reported by the API.
///
/// The dashboard does not display it; world totals are summed from the
/// per-country entries instead.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct GlobalTotals {
    pub new_confirmed: i64,
    pub new_deaths: i64,
    pub new_recovered: i64,
    pub total_confirmed: i64,
    pub total_deaths: i64,
    pub total_recovered: i64,
}

/// One country's latest counts inside a [`GlobalSummary`].
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct CountrySummary {
    pub country: String,
    pub country_code: String,
    /// URL-safe identifier, used as API path segment and rank-list entry id.
    pub slug: String,
    pub new_confirmed: i64,
    pub new_deaths: i64,
    pub new_recovered: i64,
    pub total_confirmed: i64,
    pub total_deaths: i64,
    pub total_recovered: i64,
    pub date: Option<DateTime<Utc>>,
    pub premium: serde_json::Value,
}

/// Per-country sums computed from [`GlobalSummary::countries`].
#[derive(Debug, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountryTotals {
    pub confirmed: i64,
    pub deaths: i64,
    pub recovered: i64,
}

impl GlobalSummary {
    /// Sums the cumulative counts across every country entry.
    pub fn country_totals(&self) -> CountryTotals {
        self.countries
            .iter()
            .fold(CountryTotals::default(), |acc, c| CountryTotals {
                confirmed: acc.confirmed + c.total_confirmed,
                deaths: acc.deaths + c.total_deaths,
                recovered: acc.recovered + c.total_recovered,
            })
    }
}

/// Status category selecting which historical series to request.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StatusCategory {
    Confirmed,
    Recovered,
    Deaths,
}

impl StatusCategory {
    /// Path segment used by the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCategory::Confirmed => "confirmed",
            StatusCategory::Recovered => "recovered",
            StatusCategory::Deaths => "deaths",
        }
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One element of `GET {base}/country/{slug}/status/{status}`.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct CountryHistoryPoint {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub city_code: String,
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub lon: String,
    pub cases: i64,
    pub status: StatusCategory,
    pub date: DateTime<Utc>,
}
