//! Coordinator task
//!
//! Runs the startup protocol once, then drives the coordinator loop. The
//! task sleeps on [`WAKE`] whenever a pass finds nothing pending, and puts
//! the display to sleep once it has been idle for the configured time.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Instant, Timer};

use dualrole_core::config::BoardStraps;
use dualrole_core::coordinator::{Activity, Error};

use crate::channels::WAKE;
use crate::BoardCoordinator;

fn log_error(context: &str, error: Error) {
    match error {
        Error::Pd(e) => error!("{}: PD controller bus error {}", context, e),
        Error::Charger(e) => error!("{}: charger bus error {}", context, e),
    }
}

/// Park until a flag is raised or the display idle timeout expires
async fn idle(coordinator: &mut BoardCoordinator, last_activity: Instant) {
    let sleep_ms = coordinator.config().timing.display_sleep_ms;
    if sleep_ms == 0 || coordinator.context().is_display_asleep() {
        WAKE.wait().await;
        return;
    }

    let deadline = last_activity + Duration::from_millis(u64::from(sleep_ms));
    if let Either::Second(()) = select(WAKE.wait(), Timer::at(deadline)).await {
        if coordinator.sleep_display().await {
            info!("Display idle for {} ms, sleeping", sleep_ms);
        }
    }
}

#[embassy_executor::task]
pub async fn coordinator_task(mut coordinator: BoardCoordinator, straps: BoardStraps) {
    info!("Coordinator task started");

    match coordinator.startup(straps).await {
        Ok(report) => info!(
            "Startup complete: role={}, battery={}",
            report.role.label(),
            report.battery_present()
        ),
        // Keep serving interrupts; the next alert re-reads the port status
        Err(e) => log_error("Startup failed", e),
    }

    let mut last_activity = Instant::now();

    loop {
        // Clear a stale wake before checking the flags, so a flag raised
        // during the pass still wakes the next wait
        WAKE.reset();

        match coordinator.poll().await {
            Ok(Activity::Idle) => idle(&mut coordinator, last_activity).await,
            Ok(activity) => {
                last_activity = Instant::now();
                trace!("Coordinator pass: {}", activity);
            }
            Err(e) => {
                last_activity = Instant::now();
                log_error("Dispatch failed", e);
            }
        }
    }
}
