//! x402scan statistics: response types, tRPC envelope parsing, rate
//! conversion and display formatting.
//!
//! The HTTP client ([`StatsClient`]) is only built with the `live` feature;
//! everything else is pure and available to every target.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seconds in one day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Card payments made by people per day, worldwide
pub const HUMAN_PAYMENTS_PER_DAY: f64 = 2_500_000_000.0;

/// [`HUMAN_PAYMENTS_PER_DAY`] as a per-second rate
pub const HUMAN_PAYMENTS_PER_SECOND: f64 = HUMAN_PAYMENTS_PER_DAY / SECONDS_PER_DAY;

/// Default tRPC endpoint of the statistics API
pub const DEFAULT_BASE_URL: &str = "https://www.x402scan.com/api/trpc";

/// Error type for statistics requests
#[derive(Debug, Error)]
pub enum StatsError {
    /// The server answered with a non-success status
    #[error("x402scan API error: {0}")]
    Status(u16),
    /// The JSON body did not have the expected structure
    #[error("Unexpected API response shape from x402scan {0}")]
    UnexpectedShape(&'static str),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid base URL '{0}'")]
    InvalidUrl(String),
    #[cfg(feature = "live")]
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Aggregate x402 payment statistics for a trailing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    pub total_transactions: f64,
    /// Raw USDC units (6 decimals)
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub unique_buyers: f64,
    #[serde(default)]
    pub unique_sellers: f64,
    #[serde(default)]
    pub latest_block_timestamp: String,
    /// Length of the window the totals cover, in days
    #[serde(skip, default = "one_day")]
    pub timeframe_days: u32,
}

fn one_day() -> u32 {
    1
}

impl OverallStats {
    /// Tag the totals with the window they were queried for.
    pub fn with_timeframe(mut self, days: u32) -> Self {
        self.timeframe_days = days;
        self
    }

    /// Transactions per second averaged over the window
    pub fn per_second(&self) -> f64 {
        to_per_second(self.total_transactions / f64::from(self.timeframe_days.max(1)))
    }

    pub fn latest_block_time(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.latest_block_timestamp)
    }
}

/// Facilitator summary shown with each list entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilitatorInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, rename = "docsUrl")]
    pub docs_url: String,
    #[serde(default)]
    pub color: String,
}

/// One facilitator and its volume for the window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facilitator {
    pub facilitator_id: String,
    pub tx_count: f64,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub latest_block_timestamp: String,
    #[serde(default)]
    pub unique_buyers: f64,
    #[serde(default)]
    pub unique_sellers: f64,
    #[serde(default)]
    pub chains: Vec<String>,
    pub facilitator: FacilitatorInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilitatorsResponse {
    pub items: Vec<Facilitator>,
    #[serde(default)]
    pub total_count: f64,
}

/// Convert a daily count to a per-second rate.
pub fn to_per_second(daily: f64) -> f64 {
    daily / SECONDS_PER_DAY
}

/// Short label for a window of `days`: `24h` for one day, else `7d` etc.
pub fn timeframe_label(days: u32) -> String {
    if days <= 1 {
        "24h".to_string()
    } else {
        format!("{}d", days)
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s).ok().map(|t| t.with_timezone(&Utc))
}

/// Unwrap the tRPC envelope `result.data.json`.
fn envelope(body: &serde_json::Value) -> Option<&serde_json::Value> {
    body.pointer("/result/data/json").filter(|v| v.is_object())
}

/// Parse the body of a `public.stats.overall` response.
pub fn parse_overall(body: &serde_json::Value) -> Result<OverallStats, StatsError> {
    let result = envelope(body).ok_or(StatsError::UnexpectedShape("stats"))?;
    if !result.get("total_transactions").is_some_and(serde_json::Value::is_number) {
        return Err(StatsError::UnexpectedShape("stats"));
    }
    Ok(serde_json::from_value(result.clone())?)
}

/// Parse the body of a `public.facilitators.list` response.
pub fn parse_facilitators(body: &serde_json::Value) -> Result<FacilitatorsResponse, StatsError> {
    let result = envelope(body).ok_or(StatsError::UnexpectedShape("facilitators"))?;
    if !result.get("items").is_some_and(serde_json::Value::is_array) {
        return Err(StatsError::UnexpectedShape("facilitators"));
    }
    Ok(serde_json::from_value(result.clone())?)
}

/// tRPC `input` parameter for the overall stats query
pub fn overall_input(timeframe: u32) -> serde_json::Value {
    serde_json::json!({ "json": { "timeframe": timeframe } })
}

/// tRPC `input` parameter for the facilitator list query
pub fn facilitators_input(timeframe: u32, page_size: u32) -> serde_json::Value {
    serde_json::json!({
        "json": {
            "pagination": { "page_size": page_size },
            "sorting": { "id": "tx_count", "desc": true },
            "timeframe": timeframe,
        }
    })
}

// ============================================================================
// Formatting
// ============================================================================

/// Insert `,` between groups of three digits.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Compact count: `1.2B`, `3.4M`, `12,345`, `42`, `0.25`.
pub fn format_number(n: f64) -> String {
    if n >= 1_000_000_000.0 {
        format!("{:.1}B", n / 1_000_000_000.0)
    } else if n >= 1_000_000.0 {
        format!("{:.1}M", n / 1_000_000.0)
    } else if n >= 1_000.0 {
        group_thousands(n.round() as u64)
    } else if n >= 1.0 {
        format!("{}", n.round() as u64)
    } else {
        format!("{:.2}", n)
    }
}

/// Floored count with thousands separators, as shown by live counters.
pub fn format_count(n: f64) -> String {
    if n.is_finite() && n > 0.0 {
        group_thousands(n.floor() as u64)
    } else {
        "0".to_string()
    }
}

/// Dollar amount from raw USDC units (6 decimals).
pub fn format_usdc(raw: f64) -> String {
    let dollars = raw / 1_000_000.0;
    if dollars >= 1_000_000.0 {
        format!("${:.2}M", dollars / 1_000_000.0)
    } else if dollars >= 1_000.0 {
        format!("${:.1}K", dollars / 1_000.0)
    } else {
        format!("${:.2}", dollars)
    }
}

/// Per-second rate for display. `round` drops the decimal at one and above.
pub fn format_per_second(n: f64, round: bool) -> String {
    if n >= 10_000.0 {
        format!("~{}", format_number(n))
    } else if n >= 1.0 {
        if round {
            format!("{}", n.round() as u64)
        } else {
            format!("{:.1}", n)
        }
    } else {
        format!("{:.2}", n)
    }
}

// ============================================================================
// HTTP client
// ============================================================================

#[cfg(feature = "live")]
pub use client::StatsClient;

#[cfg(feature = "live")]
mod client {
    use super::*;
    use reqwest::Url;
    use std::time::Duration;
    use tracing::debug;

    /// HTTP client for the x402scan tRPC API.
    #[derive(Debug, Clone)]
    pub struct StatsClient {
        client: reqwest::Client,
        base_url: String,
        timeframe: u32,
    }

    impl StatsClient {
        pub fn new(base_url: impl Into<String>, timeframe: u32, timeout: Duration) -> Result<Self, StatsError> {
            let client = reqwest::Client::builder().timeout(timeout).build()?;
            let base_url = base_url.into().trim_end_matches('/').to_string();
            Url::parse(&base_url).map_err(|_| StatsError::InvalidUrl(base_url.clone()))?;
            Ok(Self { client, base_url, timeframe })
        }

        pub fn base_url(&self) -> &str {
            &self.base_url
        }

        pub fn timeframe(&self) -> u32 {
            self.timeframe
        }

        fn procedure_url(&self, procedure: &str, input: &serde_json::Value) -> Result<Url, StatsError> {
            let endpoint = format!("{}/{}", self.base_url, procedure);
            Url::parse_with_params(&endpoint, &[("input", input.to_string())])
                .map_err(|_| StatsError::InvalidUrl(endpoint))
        }

        /// URL of the overall stats query
        pub fn overall_url(&self) -> Result<Url, StatsError> {
            self.procedure_url("public.stats.overall", &overall_input(self.timeframe))
        }

        pub fn facilitators_url(&self, page_size: u32) -> Result<Url, StatsError> {
            self.procedure_url("public.facilitators.list", &facilitators_input(self.timeframe, page_size))
        }

        async fn get_json(&self, url: Url) -> Result<serde_json::Value, StatsError> {
            debug!(%url, "fetching stats");
            let response = self.client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(StatsError::Status(status.as_u16()));
            }
            Ok(response.json().await?)
        }

        /// Fetch aggregate stats for the configured window.
        pub async fn overall(&self) -> Result<OverallStats, StatsError> {
            let body = self.get_json(self.overall_url()?).await?;
            Ok(parse_overall(&body)?.with_timeframe(self.timeframe))
        }

        /// Fetch the busiest facilitators for the configured window.
        pub async fn facilitators(&self, page_size: u32) -> Result<FacilitatorsResponse, StatsError> {
            let body = self.get_json(self.facilitators_url(page_size)?).await?;
            parse_facilitators(&body)
        }
    }
}
