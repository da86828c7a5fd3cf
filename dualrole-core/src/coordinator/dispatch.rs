//! Alert dispatch cycle
//!
//! One cycle captures a [`RailSnapshot`], classifies it against the current
//! role and runs the register sequence for each resulting event. Flag
//! acknowledgement happens in the caller so it also covers failed cycles.

use embedded_hal_async::delay::DelayNs;

use super::transition::{apply_sink_set, record_reading, repaint, wake_display};
use super::{Board, CoordinatorContext, Error};
use crate::config::CoordinatorConfig;
use crate::menu::FastSet;
use crate::monitor;
use crate::signal::NavSignal;
use crate::state::snapshot::{partner_attached, INTERRUPT_CLEAR_ALL};
use crate::state::{classify, AlertEvent, RailSnapshot, RoleState};
use crate::traits::{ChargerController, InputRail, MenuDisplay, PdController};

/// Read PD alert and port status, then the charger rail status, and
/// acknowledge the charger latch only once all three are captured
pub(crate) async fn capture_snapshot<P, C, D, T>(
    board: &mut Board<P, C, D, T>,
) -> Result<RailSnapshot, Error>
where
    P: PdController,
    C: ChargerController,
{
    let alert = board.pd.alert_status().await.map_err(Error::Pd)?;
    let port_status = board.pd.port_status().await.map_err(Error::Pd)?;
    let rail_status = board.charger.rail_status().await.map_err(Error::Charger)?;
    board
        .charger
        .acknowledge_interrupt(INTERRUPT_CLEAR_ALL)
        .await
        .map_err(Error::Charger)?;

    trace!(
        "Snapshot: alert={:#x} port={:#x} rail={:#x}",
        alert,
        port_status,
        rail_status
    );

    Ok(RailSnapshot {
        alert,
        port_status,
        rail_status,
    })
}

/// Run one full dispatch cycle
pub(crate) async fn dispatch_alert<P, C, D, T>(
    board: &mut Board<P, C, D, T>,
    ctx: &mut CoordinatorContext,
    config: &CoordinatorConfig,
    cursor: &NavSignal,
) -> Result<(), Error>
where
    P: PdController,
    C: ChargerController,
    D: MenuDisplay,
    T: DelayNs,
{
    let snapshot = capture_snapshot(board).await?;
    let role = ctx.role;
    let events = classify(role, &snapshot);
    debug!("Dispatch in {:?}: {:?}", role, events.as_slice());

    for event in events {
        match (role, event) {
            (RoleState::Sink, AlertEvent::PartnerAttachChanged) => {
                sink_rail_changed(board, ctx, config, InputRail::Vbus).await?;
            }
            (RoleState::Sink, AlertEvent::AuxRailActive) => {
                sink_rail_changed(board, ctx, config, InputRail::Vcc).await?;
            }
            (RoleState::Source, AlertEvent::AuxRailActive) => {
                backfeed_to_sink(board, ctx, config, cursor).await?;
            }
            (RoleState::Source, AlertEvent::PlugInserted) => {
                plug_inserted(board, ctx, config, cursor).await?;
            }
            (_, AlertEvent::NoOp) => {
                board.pd.alert_status().await.map_err(Error::Pd)?;
            }
            (role, event) => {
                // classify never pairs these
                warn!("Ignoring {:?} in {:?}", event, role);
            }
        }
    }

    if role == RoleState::Sink {
        cursor.clear();
    }

    Ok(())
}

/// Sink role: monitor the rail that changed and route the charger to it
async fn sink_rail_changed<P, C, D, T>(
    board: &mut Board<P, C, D, T>,
    ctx: &mut CoordinatorContext,
    config: &CoordinatorConfig,
    rail: InputRail,
) -> Result<(), Error>
where
    P: PdController,
    C: ChargerController,
    D: MenuDisplay,
    T: DelayNs,
{
    let outcome =
        monitor::monitor_until_stable(&mut board.charger, &mut board.delay, rail, &config.monitor)
            .await
            .map_err(Error::Charger)?;
    record_reading(&mut ctx.menu, outcome);

    board
        .charger
        .select_active_rail(rail)
        .await
        .map_err(Error::Charger)?;

    wake_display(&mut board.display, ctx).await;
    repaint(&mut board.display, ctx.role, &ctx.menu).await;
    board.pd.alert_status().await.map_err(Error::Pd)?;
    Ok(())
}

/// Source role with sink-rail activity: something is feeding the board,
/// drop back to sink
async fn backfeed_to_sink<P, C, D, T>(
    board: &mut Board<P, C, D, T>,
    ctx: &mut CoordinatorContext,
    config: &CoordinatorConfig,
    cursor: &NavSignal,
) -> Result<(), Error>
where
    P: PdController,
    C: ChargerController,
    D: MenuDisplay,
    T: DelayNs,
{
    info!("Sink rail active while sourcing, switching to sink");

    board.pd.disable_reverse_drive().await.map_err(Error::Pd)?;
    board.charger.clear_interrupts().await.map_err(Error::Charger)?;
    apply_sink_set(board).await?;

    let outcome = monitor::monitor_auxiliary_rail(
        &mut board.charger,
        &mut board.delay,
        &config.monitor,
    )
    .await
    .map_err(Error::Charger)?;
    record_reading(&mut ctx.menu, outcome);
    board
        .charger
        .select_active_rail(InputRail::Vcc)
        .await
        .map_err(Error::Charger)?;

    wake_display(&mut board.display, ctx).await;
    board.delay.delay_ms(config.timing.backfeed_settle_ms).await;

    let port_status = board.pd.port_status().await.map_err(Error::Pd)?;
    if partner_attached(port_status) {
        debug!("Partner attached after backfeed, selecting VBUS");
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
        wake_display(&mut board.display, ctx).await;
        board.pd.alert_status().await.map_err(Error::Pd)?;
    }

    ctx.role = RoleState::Sink;
    ctx.menu.jump_to_fast_set(FastSet::Sink);
    cursor.clear();
    board.charger.clear_interrupts().await.map_err(Error::Charger)?;

    board.delay.delay_ms(config.timing.backfeed_repaint_ms).await;
    board.pd.alert_status().await.map_err(Error::Pd)?;
    repaint(&mut board.display, ctx.role, &ctx.menu).await;

    info!("Entered sink role");
    Ok(())
}

/// Source role with a plug inserted: negotiate and restore the default
/// VBUS voltage
async fn plug_inserted<P, C, D, T>(
    board: &mut Board<P, C, D, T>,
    ctx: &mut CoordinatorContext,
    config: &CoordinatorConfig,
    cursor: &NavSignal,
) -> Result<(), Error>
where
    P: PdController,
    C: ChargerController,
    D: MenuDisplay,
    T: DelayNs,
{
    let millivolts = board.pd.negotiate_source_offer().await.map_err(Error::Pd)?;
    ctx.menu.telemetry.source_mv = Some(millivolts);
    info!("Plug inserted, source contract at {} mV", millivolts);

    // The partner may only show up once the contract is in place
    let port_status = board.pd.port_status().await.map_err(Error::Pd)?;
    if partner_attached(port_status) {
        let outcome =
            monitor::monitor_source_rail(&mut board.charger, &mut board.delay, &config.monitor)
                .await
                .map_err(Error::Charger)?;
        record_reading(&mut ctx.menu, outcome);
    }

    board
        .pd
        .revert_to_default_voltage(config.default_source_mv)
        .await
        .map_err(Error::Pd)?;

    wake_display(&mut board.display, ctx).await;
    ctx.menu.jump_to_fast_set(FastSet::Source);
    cursor.clear();
    board.pd.alert_status().await.map_err(Error::Pd)?;
    repaint(&mut board.display, ctx.role, &ctx.menu).await;
    // Re-arm the alert line
    board.pd.alert_status().await.map_err(Error::Pd)?;
    Ok(())
}
