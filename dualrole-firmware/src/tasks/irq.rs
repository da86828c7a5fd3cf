//! Interrupt line watcher
//!
//! The PD alert and charger interrupt lines are open drain and active low.
//! Each falling edge raises the matching flag and wakes the coordinator.

use defmt::*;
use embassy_rp::gpio::Input;

use crate::channels::{SIGNALS, WAKE};

/// Interrupt line served by an [`irq_task`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum IrqLine {
    PdAlert,
    Charger,
}

impl IrqLine {
    fn raise(self) {
        match self {
            IrqLine::PdAlert => SIGNALS.alert.set(),
            IrqLine::Charger => SIGNALS.charger.set(),
        }
        WAKE.signal(());
    }
}

#[embassy_executor::task(pool_size = 2)]
pub async fn irq_task(mut pin: Input<'static>, line: IrqLine) {
    info!("IRQ task started for {}", line);

    // A line already held low at boot would never produce an edge
    if pin.is_low() {
        debug!("{} asserted at startup", line);
        line.raise();
    }

    loop {
        pin.wait_for_falling_edge().await;
        trace!("{} edge", line);
        line.raise();
    }
}
