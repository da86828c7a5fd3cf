//! Role entry sequences and display helpers shared by dispatch, startup
//! and menu sync

use embedded_hal_async::delay::DelayNs;

use super::{Board, CoordinatorContext, Error};
use crate::config::CoordinatorConfig;
use crate::menu::{FastSet, MenuContext};
use crate::monitor::MonitorOutcome;
use crate::state::RoleState;
use crate::traits::{ChargerController, InputRail, MenuDisplay, PdController};

/// Enter sink role on user request
///
/// Reverse drive is disabled before the sink register/command set is
/// applied.
pub(crate) async fn enter_sink<P, C, D, T>(
    board: &mut Board<P, C, D, T>,
    ctx: &mut CoordinatorContext,
) -> Result<(), Error>
where
    P: PdController,
    C: ChargerController,
    D: MenuDisplay,
    T: DelayNs,
{
    board.pd.disable_reverse_drive().await.map_err(Error::Pd)?;
    apply_sink_set(board).await?;
    board
        .charger
        .select_active_rail(InputRail::Vbus)
        .await
        .map_err(Error::Charger)?;

    ctx.role = RoleState::Sink;
    ctx.menu.jump_to_fast_set(FastSet::Sink);
    info!("Entered sink role");
    Ok(())
}

/// Enter source role, arming the default source voltage
pub(crate) async fn enter_source<P, C, D, T>(
    board: &mut Board<P, C, D, T>,
    ctx: &mut CoordinatorContext,
    config: &CoordinatorConfig,
) -> Result<(), Error>
where
    P: PdController,
    C: ChargerController,
    D: MenuDisplay,
    T: DelayNs,
{
    board.pd.apply_source_config().await.map_err(Error::Pd)?;
    board
        .pd
        .revert_to_default_voltage(config.default_source_mv)
        .await
        .map_err(Error::Pd)?;

    ctx.role = RoleState::Source;
    ctx.menu.jump_to_fast_set(FastSet::Source);
    info!("Entered source role at {} mV", config.default_source_mv);
    Ok(())
}

/// Renegotiate the contract in the current role
pub(crate) async fn renegotiate<P, C, D, T>(
    board: &mut Board<P, C, D, T>,
    ctx: &mut CoordinatorContext,
) -> Result<(), Error>
where
    P: PdController,
    C: ChargerController,
    D: MenuDisplay,
    T: DelayNs,
{
    match ctx.role {
        RoleState::Sink => board.pd.negotiate_sink_request().await.map_err(Error::Pd),
        RoleState::Source => {
            let millivolts = board.pd.negotiate_source_offer().await.map_err(Error::Pd)?;
            ctx.menu.telemetry.source_mv = Some(millivolts);
            info!("Source contract at {} mV", millivolts);
            Ok(())
        }
    }
}

/// Sink register set followed by the sink command set
pub(crate) async fn apply_sink_set<P, C, D, T>(board: &mut Board<P, C, D, T>) -> Result<(), Error>
where
    P: PdController,
{
    board.pd.apply_sink_config().await.map_err(Error::Pd)?;
    board.pd.negotiate_sink_request().await.map_err(Error::Pd)
}

/// Store a monitoring result for the menu
pub(crate) fn record_reading(menu: &mut MenuContext, outcome: MonitorOutcome) {
    if !outcome.settled {
        warn!(
            "Rail {:?} not settled after {} polls",
            outcome.rail,
            outcome.polls
        );
    }
    menu.telemetry.last_reading = Some((outcome.rail, outcome.reading));
}

/// Wake the display; failures only leave it stale
pub(crate) async fn wake_display<D: MenuDisplay>(display: &mut D, ctx: &mut CoordinatorContext) {
    match display.wake().await {
        Ok(()) => ctx.display_asleep = false,
        Err(e) => warn!("Display wake failed: {:?}", e),
    }
}

/// Put the display to sleep unless it already is
///
/// Returns `true` if the display went to sleep.
pub(crate) async fn sleep_display<D: MenuDisplay>(
    display: &mut D,
    ctx: &mut CoordinatorContext,
) -> bool {
    if ctx.display_asleep {
        return false;
    }
    match display.sleep().await {
        Ok(()) => {
            ctx.display_asleep = true;
            debug!("Display asleep");
            true
        }
        Err(e) => {
            warn!("Display sleep failed: {:?}", e);
            false
        }
    }
}

/// Repaint the display; failures only leave it stale
pub(crate) async fn repaint<D: MenuDisplay>(display: &mut D, role: RoleState, menu: &MenuContext) {
    if let Err(e) = display.repaint(role, menu).await {
        warn!("Display repaint failed: {:?}", e);
    }
}
