//! Commands that talk to the statistics API

use std::future::Future;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{watch, Mutex};
use tracing::{info, warn};

use crate::config::CrosswalkConfig;
use crate::crosswalk::HeadlessLane;
use crate::dashboard::{Dashboard, LiveCounters};
use crate::feed::{RateFeed, SharedRate};
use crate::models::Archetype;
use crate::output::save_png;
use crate::stats::{format_number, format_usdc, StatsClient};

use super::render::headless_lane;
use super::{check_fps, EXIT_ERROR, EXIT_SUCCESS};

fn client(config: &CrosswalkConfig) -> Result<StatsClient, ExitCode> {
    StatsClient::new(
        config.feed.base_url.clone(),
        config.feed.timeframe_days,
        Duration::from_secs(config.feed.request_timeout_secs),
    )
    .map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })
}

fn runtime() -> Result<tokio::runtime::Runtime, ExitCode> {
    tokio::runtime::Builder::new_multi_thread().enable_all().build().map_err(|e| {
        eprintln!("Error: Failed to start async runtime: {}", e);
        ExitCode::from(EXIT_ERROR)
    })
}

/// Execute the stats command
pub fn run_stats(config: &CrosswalkConfig, facilitators: Option<u32>) -> ExitCode {
    let (client, runtime) = match (client(config), runtime()) {
        (Ok(client), Ok(runtime)) => (client, runtime),
        (Err(code), _) | (_, Err(code)) => return code,
    };

    runtime.block_on(async {
        let stats = match client.overall().await {
            Ok(stats) => stats,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        };

        let mut dashboard = Dashboard::new();
        dashboard.apply_stats(&stats, chrono::Utc::now());
        for line in dashboard.summary_lines() {
            println!("{}", line);
        }

        if let Some(page_size) = facilitators {
            match client.facilitators(page_size).await {
                Ok(list) => {
                    println!();
                    println!("Top facilitators:");
                    for (rank, item) in list.items.iter().enumerate() {
                        println!(
                            "  {:>2}. {:<24} {:>10} txs  {}",
                            rank + 1,
                            item.facilitator.name,
                            format_number(item.tx_count),
                            format_usdc(item.total_amount)
                        );
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from(EXIT_ERROR);
                }
            }
        }

        ExitCode::from(EXIT_SUCCESS)
    })
}

/// Drive both lanes at `fps` until `run_for` has elapsed or `stop` resolves.
///
/// `stop` is polled across frames as one future, so it fires even when it
/// becomes ready while a frame is being simulated. Both lanes are stopped on
/// return.
async fn drive_lanes(
    human: &mut HeadlessLane,
    robot: &mut HeadlessLane,
    robot_rate: &SharedRate,
    dashboard: &Mutex<Dashboard>,
    fps: f64,
    run_for: Duration,
    stop: impl Future<Output = ()>,
) -> LiveCounters {
    tokio::pin!(stop);

    let mut human_ticket = human.start();
    let mut robot_ticket = robot.start();
    let mut counters = LiveCounters::new();
    let mut frame_timer = tokio::time::interval(Duration::from_secs_f64(1.0 / fps));
    frame_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let started = Instant::now();
    let mut last_report = 0u64;

    loop {
        tokio::select! {
            _ = frame_timer.tick() => {}
            _ = &mut stop => {
                info!("interrupted");
                break;
            }
        }

        let elapsed = started.elapsed();
        if elapsed >= run_for {
            break;
        }
        let timestamp = elapsed.as_secs_f64() * 1000.0;

        robot.set_rate(robot_rate.get());
        let (human_rate, robot_per_second) = {
            let state = dashboard.lock().await;
            (state.human_per_second, state.robot_per_second)
        };
        counters.update(timestamp, human_rate, robot_per_second);

        match (human.frame(human_ticket, timestamp), robot.frame(robot_ticket, timestamp)) {
            (Some(h), Some(r)) => {
                human_ticket = h;
                robot_ticket = r;
            }
            _ => break,
        }

        let second = elapsed.as_secs();
        if second > last_report {
            last_report = second;
            info!(
                humans = human.walkers().len(),
                robots = robot.walkers().len(),
                robot_rate = robot.rate(),
                human_payments = %counters.human_text(),
                agentic_payments = %counters.robot_text(),
                "tick"
            );
        }
    }

    human.stop();
    robot.stop();
    counters
}

/// Execute the watch command
pub fn run_watch(config: &CrosswalkConfig, duration: f64, fps: f64, snapshot: Option<&Path>) -> ExitCode {
    let fps = match check_fps(fps) {
        Ok(fps) => fps,
        Err(code) => return code,
    };
    let (client, runtime) = match (client(config), runtime()) {
        (Ok(client), Ok(runtime)) => (client, runtime),
        (Err(code), _) | (_, Err(code)) => return code,
    };

    let robot_rate = SharedRate::new(config.initial_rate(Archetype::Robot));
    let dashboard = Arc::new(Mutex::new(Dashboard::new()));
    let feed = RateFeed::new(
        client,
        robot_rate.clone(),
        Arc::clone(&dashboard),
        Duration::from_secs(config.feed.poll_interval_secs),
    );

    let mut human = headless_lane(config, Archetype::Human, None, None);
    let mut robot = headless_lane(config, Archetype::Robot, Some(robot_rate.get()), None);
    let run_for = Duration::from_secs_f64(duration.max(0.0));

    runtime.block_on(async {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let poller = tokio::spawn(async move { feed.run(shutdown_rx).await });

        let interrupted = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "cannot listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        };
        let counters = drive_lanes(&mut human, &mut robot, &robot_rate, &dashboard, fps, run_for, interrupted).await;

        let _ = shutdown_tx.send(true);
        if let Err(e) = poller.await {
            warn!(error = %e, "rate feed task failed");
        }

        for line in dashboard.lock().await.summary_lines() {
            println!("{}", line);
        }
        println!("Human payments since start:   {}", counters.human_text());
        println!("Agentic payments since start: {}", counters.robot_text());
    });

    if let Some(dir) = snapshot {
        for (name, lane) in [("human", &human), ("robot", &robot)] {
            let path = dir.join(format!("{}.png", name));
            if let Err(e) = save_png(lane.surface().image(), &path) {
                eprintln!("Error: Failed to save '{}': {}", path.display(), e);
                return ExitCode::from(EXIT_ERROR);
            }
            println!("Saved: {}", path.display());
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}
