//! Role/state coordinator
//!
//! The coordinator is the single consumer of the interrupt flags in
//! [`Signals`]. Each call to [`Coordinator::poll`] commits at most one unit
//! of work:
//!
//! 1. An alert or charger flag is pending: run one dispatch cycle, then
//!    acknowledge exactly the edges observed before it started
//! 2. The cursor is dirty: apply joystick deltas and repaint
//! 3. Nothing pending: report [`Activity::Idle`] so the caller can park
//!
//! Edges raised while a cycle runs stay pending, so the caller keeps polling
//! until it sees `Idle`.

mod context;
mod dispatch;
mod menu_sync;
mod startup;
mod transition;

pub use context::CoordinatorContext;
pub use startup::StartupReport;

use embedded_hal_async::delay::DelayNs;

use crate::config::{BoardStraps, CoordinatorConfig};
use crate::signal::Signals;
use crate::traits::{BusError, ChargerController, MenuDisplay, PdController};

/// Coordinator errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// PD controller transaction failed
    Pd(BusError),
    /// Charger transaction failed
    Charger(BusError),
}

/// Work committed by one [`Coordinator::poll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Activity {
    /// No flag was pending
    Idle,
    /// One alert dispatch cycle ran
    Dispatched,
    /// The menu was updated and repainted
    Repainted,
}

/// Collaborators driven by the coordinator
#[derive(Debug)]
pub struct Board<P, C, D, T> {
    pub pd: P,
    pub charger: C,
    pub display: D,
    pub delay: T,
}

/// Event-driven role/state coordinator
pub struct Coordinator<'a, P, C, D, T> {
    board: Board<P, C, D, T>,
    ctx: CoordinatorContext,
    config: CoordinatorConfig,
    signals: &'a Signals,
}

impl<'a, P, C, D, T> Coordinator<'a, P, C, D, T>
where
    P: PdController,
    C: ChargerController,
    D: MenuDisplay,
    T: DelayNs,
{
    pub fn new(board: Board<P, C, D, T>, config: CoordinatorConfig, signals: &'a Signals) -> Self {
        Self {
            board,
            ctx: CoordinatorContext::new(),
            config,
            signals,
        }
    }

    /// Coordinator-owned state
    pub fn context(&self) -> &CoordinatorContext {
        &self.ctx
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Run the startup protocol
    ///
    /// Must complete before the first [`poll`](Self::poll).
    pub async fn startup(&mut self, straps: BoardStraps) -> Result<StartupReport, Error> {
        startup::run_startup(
            &mut self.board,
            &mut self.ctx,
            &self.config,
            &self.signals.cursor,
            straps,
        )
        .await
    }

    /// Put the display to sleep after an idle period
    ///
    /// Returns `true` if the display went to sleep. The next joystick input
    /// or role transition wakes it.
    pub async fn sleep_display(&mut self) -> bool {
        transition::sleep_display(&mut self.board.display, &mut self.ctx).await
    }

    /// Run one loop iteration
    ///
    /// Alert and charger flags are acknowledged even when the cycle fails.
    pub async fn poll(&mut self) -> Result<Activity, Error> {
        let alert = self.signals.alert.observe();
        let charger = self.signals.charger.observe();

        if alert.is_some() || charger.is_some() {
            let result = dispatch::dispatch_alert(
                &mut self.board,
                &mut self.ctx,
                &self.config,
                &self.signals.cursor,
            )
            .await;

            if let Some(seen) = alert {
                if self.signals.alert.acknowledge(seen) {
                    debug!("Alert raised again during dispatch");
                }
            }
            if let Some(seen) = charger {
                self.signals.charger.acknowledge(seen);
            }

            return result.map(|()| Activity::Dispatched);
        }

        if self.signals.cursor.is_dirty() {
            menu_sync::sync_menu(
                &mut self.board,
                &mut self.ctx,
                &self.config,
                &self.signals.cursor,
            )
            .await?;
            return Ok(Activity::Repainted);
        }

        Ok(Activity::Idle)
    }
}
