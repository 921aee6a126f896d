//! Application state derived from the statistics feed
//!
//! [`Dashboard`] holds what the page shows next to the two lanes: both
//! per-second rates, the totals for the queried window and the
//! loading/error state.
//! [`LiveCounters`] integrate the rates over frame time to count payments
//! since the view opened.

use chrono::{DateTime, Utc};

use crate::stats::{
    format_count, format_number, format_per_second, format_usdc, timeframe_label, OverallStats,
    HUMAN_PAYMENTS_PER_SECOND,
};

/// Message shown while the feed is failing
pub const FETCH_ERROR: &str = "Failed to fetch live data. Retrying...";

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub human_per_second: f64,
    pub robot_per_second: f64,
    pub total_transactions: f64,
    /// Raw USDC units
    pub total_volume: f64,
    pub unique_buyers: f64,
    pub unique_sellers: f64,
    /// Window the totals cover, in days
    pub timeframe_days: u32,
    pub last_updated: Option<DateTime<Utc>>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            human_per_second: HUMAN_PAYMENTS_PER_SECOND,
            robot_per_second: 0.0,
            total_transactions: 0.0,
            total_volume: 0.0,
            unique_buyers: 0.0,
            unique_sellers: 0.0,
            timeframe_days: 1,
            last_updated: None,
            is_loading: true,
            error: None,
        }
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful fetch.
    pub fn apply_stats(&mut self, stats: &OverallStats, now: DateTime<Utc>) {
        self.total_transactions = stats.total_transactions;
        self.total_volume = stats.total_amount;
        self.unique_buyers = stats.unique_buyers;
        self.unique_sellers = stats.unique_sellers;
        self.timeframe_days = stats.timeframe_days;
        self.robot_per_second = stats.per_second();
        self.last_updated = Some(now);
        self.is_loading = false;
        self.error = None;
    }

    /// Record a failed fetch. Rates and totals keep their last values.
    pub fn apply_failure(&mut self) {
        self.error = Some(FETCH_ERROR.to_string());
        self.is_loading = false;
    }

    /// Human payments per agentic payment, rounded
    pub fn ratio(&self) -> Option<f64> {
        (self.robot_per_second > 0.0).then(|| (self.human_per_second / self.robot_per_second).round())
    }

    /// Ratio as displayed; `None` while still loading with no data.
    pub fn ratio_text(&self) -> Option<String> {
        match self.ratio() {
            Some(ratio) => Some(format_count(ratio)),
            None if !self.is_loading => Some("N/A (no x402 data yet)".to_string()),
            None => None,
        }
    }

    /// Plain-text status, one line per item.
    pub fn summary_lines(&self) -> Vec<String> {
        let window = format!("({}):", timeframe_label(self.timeframe_days));
        let mut lines = vec![
            format!("Human payments:    {} payments/sec", format_per_second(self.human_per_second, true)),
            format!("Agentic payments:  {} payments/sec", format_per_second(self.robot_per_second, false)),
            format!("x402 txs {:<9} {}", window, format_number(self.total_transactions)),
            format!("Volume {:<11} {}", window, format_usdc(self.total_volume)),
            format!("Buyers:            {}", format_count(self.unique_buyers)),
            format!("Sellers:           {}", format_count(self.unique_sellers)),
        ];
        if let Some(ratio) = self.ratio_text() {
            lines.push(format!("For every 1 agentic payment, there are approximately {} human payments", ratio));
        }
        if let Some(updated) = self.last_updated {
            lines.push(format!("Last updated:      {}", updated.format("%Y-%m-%d %H:%M:%S UTC")));
        }
        if let Some(error) = &self.error {
            lines.push(format!("Error: {}", error));
        }
        lines
    }
}

/// Running payment counts for both lanes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveCounters {
    human: f64,
    robot: f64,
    last_timestamp: Option<f64>,
}

impl LiveCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate `rate × elapsed` since the previous call.
    ///
    /// `timestamp` is in milliseconds; the first call only sets the baseline.
    /// A timestamp earlier than the previous one adds nothing.
    pub fn update(&mut self, timestamp: f64, human_rate: f64, robot_rate: f64) {
        let last = self.last_timestamp.unwrap_or(timestamp);
        let dt = ((timestamp - last) / 1000.0).max(0.0);
        self.last_timestamp = Some(timestamp);

        self.human += human_rate * dt;
        self.robot += robot_rate * dt;
    }

    pub fn human(&self) -> u64 {
        self.human.max(0.0).floor() as u64
    }

    pub fn robot(&self) -> u64 {
        self.robot.max(0.0).floor() as u64
    }

    pub fn human_text(&self) -> String {
        format_count(self.human)
    }

    pub fn robot_text(&self) -> String {
        format_count(self.robot)
    }
}
