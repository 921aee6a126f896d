//! Live rate feed
//!
//! [`RateFeed`] polls a [`StatsSource`] on a fixed interval and publishes the
//! agentic payment rate through a [`SharedRate`] that lanes read each frame.
//! A failed poll leaves the previous rate in place and flags the dashboard.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{watch, Mutex};
use tracing::{info, warn};

use crate::dashboard::Dashboard;
use crate::stats::{OverallStats, StatsClient, StatsError};

/// A rate shared between the poller and the lanes.
#[derive(Debug, Clone)]
pub struct SharedRate(Arc<AtomicU64>);

impl SharedRate {
    pub fn new(rate: f64) -> Self {
        Self(Arc::new(AtomicU64::new(rate.to_bits())))
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, rate: f64) {
        self.0.store(rate.to_bits(), Ordering::Relaxed);
    }
}

/// Anything that can produce overall statistics.
pub trait StatsSource: Send + Sync {
    fn fetch_overall(&self) -> impl Future<Output = Result<OverallStats, StatsError>> + Send;
}

impl StatsSource for StatsClient {
    fn fetch_overall(&self) -> impl Future<Output = Result<OverallStats, StatsError>> + Send {
        self.overall()
    }
}

/// Periodic poller feeding one shared rate and the dashboard.
pub struct RateFeed<S: StatsSource> {
    source: S,
    rate: SharedRate,
    dashboard: Arc<Mutex<Dashboard>>,
    interval: Duration,
}

impl<S: StatsSource> RateFeed<S> {
    pub fn new(source: S, rate: SharedRate, dashboard: Arc<Mutex<Dashboard>>, interval: Duration) -> Self {
        Self { source, rate, dashboard, interval }
    }

    pub fn rate(&self) -> &SharedRate {
        &self.rate
    }

    pub fn dashboard(&self) -> Arc<Mutex<Dashboard>> {
        Arc::clone(&self.dashboard)
    }

    /// Fetch once. Returns whether the rate was updated.
    pub async fn poll_once(&self) -> bool {
        match self.source.fetch_overall().await {
            Ok(stats) => {
                let per_second = stats.per_second();
                self.rate.set(per_second);
                self.dashboard.lock().await.apply_stats(&stats, Utc::now());
                info!(
                    transactions = stats.total_transactions,
                    per_second, "live rate updated"
                );
                true
            }
            Err(err) => {
                warn!(error = %err, rate = self.rate.get(), "failed to fetch x402 data, keeping previous rate");
                self.dashboard.lock().await.apply_failure();
                false
            }
        }
    }

    /// Poll immediately, then every interval, until `shutdown` becomes true
    /// or its sender is dropped.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {
                    self.poll_once().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        info!("rate feed stopped");
    }
}
