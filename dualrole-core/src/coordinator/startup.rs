//! Startup protocol
//!
//! Runs once before the main loop. The PD port status is always probed
//! before the default sink register/command set is applied; a detected
//! partner or battery pack gets the charger bring-up and an initial
//! sink-rail capture first.

use embedded_hal_async::delay::DelayNs;

use super::transition::{apply_sink_set, enter_source, record_reading};
use super::{Board, CoordinatorContext, Error};
use crate::config::{BoardStraps, CoordinatorConfig};
use crate::monitor;
use crate::signal::NavSignal;
use crate::state::snapshot::partner_attached;
use crate::state::{RailSnapshot, RoleState};
use crate::traits::{ChargerController, InputRail, MenuDisplay, PdController};

/// What startup found and which role it left the board in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StartupReport {
    /// Role entered once startup completed
    pub role: RoleState,
    /// Status words read during startup
    pub probe: RailSnapshot,
}

impl StartupReport {
    /// A partner or battery pack was detected by the probe
    pub fn battery_present(&self) -> bool {
        self.probe.partner_attached()
    }
}

pub(crate) async fn run_startup<P, C, D, T>(
    board: &mut Board<P, C, D, T>,
    ctx: &mut CoordinatorContext,
    config: &CoordinatorConfig,
    cursor: &NavSignal,
    straps: BoardStraps,
) -> Result<StartupReport, Error>
where
    P: PdController,
    C: ChargerController,
    D: MenuDisplay,
    T: DelayNs,
{
    info!(
        "Startup: charging {}, initial role {:?}",
        straps.charge_enabled,
        straps.initial_role
    );

    board
        .charger
        .set_charging_enabled(straps.charge_enabled)
        .await
        .map_err(Error::Charger)?;
    board.pd.load_source_offers().await.map_err(Error::Pd)?;
    board.pd.load_sink_offers().await.map_err(Error::Pd)?;

    // Probe before any sink register set
    let port_status = board.pd.port_status().await.map_err(Error::Pd)?;
    let attached = partner_attached(port_status);
    ctx.menu.telemetry.battery_present = attached;

    if attached {
        info!("Battery or partner present, capturing sink rail");
        board
            .charger
            .run_startup_sequence()
            .await
            .map_err(Error::Charger)?;
        board.pd.alert_status().await.map_err(Error::Pd)?;
        let outcome =
            monitor::monitor_sink_rail(&mut board.charger, &mut board.delay, &config.monitor)
                .await
                .map_err(Error::Charger)?;
        record_reading(&mut ctx.menu, outcome);
        board
            .charger
            .select_active_rail(InputRail::Vbus)
            .await
            .map_err(Error::Charger)?;
    }

    apply_sink_set(board).await?;
    ctx.role = RoleState::Sink;
    ctx.initialized = true;
    cursor.request_repaint();

    board
        .charger
        .run_startup_sequence()
        .await
        .map_err(Error::Charger)?;
    let alert = board.pd.alert_status().await.map_err(Error::Pd)?;
    let rail_status = board.charger.rail_status().await.map_err(Error::Charger)?;
    board.charger.clear_interrupts().await.map_err(Error::Charger)?;

    if straps.initial_role == RoleState::Source {
        enter_source(board, ctx, config).await?;
    }

    info!("Startup complete in {:?}", ctx.role);

    Ok(StartupReport {
        role: ctx.role,
        probe: RailSnapshot {
            alert,
            port_status,
            rail_status,
        },
    })
}
