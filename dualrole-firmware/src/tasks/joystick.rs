//! Joystick input task
//!
//! Three switches to ground: right, left and push. Each press pushes a
//! navigation delta and wakes the coordinator.

use defmt::*;
use embassy_futures::select::{select3, Either3};
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Timer};

use dualrole_core::signal::Nav;

use crate::channels::{SIGNALS, WAKE};

/// Contact bounce window
const DEBOUNCE_MS: u64 = 20;

#[embassy_executor::task]
pub async fn joystick_task(
    mut right: Input<'static>,
    mut left: Input<'static>,
    mut push: Input<'static>,
) {
    info!("Joystick task started");

    loop {
        let nav = match select3(
            right.wait_for_falling_edge(),
            left.wait_for_falling_edge(),
            push.wait_for_falling_edge(),
        )
        .await
        {
            Either3::First(_) => Nav::Right,
            Either3::Second(_) => Nav::Left,
            Either3::Third(_) => Nav::Select,
        };

        debug!("Joystick: {}", nav);
        SIGNALS.cursor.push(nav);
        WAKE.signal(());

        Timer::after(Duration::from_millis(DEBOUNCE_MS)).await;
    }
}
