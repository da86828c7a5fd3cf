//! Menu/display synchronization

use embedded_hal_async::delay::DelayNs;

use super::transition::{enter_sink, enter_source, renegotiate, repaint, wake_display};
use super::{Board, CoordinatorContext, Error};
use crate::config::CoordinatorConfig;
use crate::menu::{MenuAction, ScrollDirection};
use crate::signal::NavSignal;
use crate::state::RoleState;
use crate::traits::{ChargerController, MenuDisplay, PdController};

/// Apply pending joystick deltas and repaint
///
/// The cursor is taken before any bus work, so input arriving while a
/// selected action runs marks it dirty again.
pub(crate) async fn sync_menu<P, C, D, T>(
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
    let Some(deltas) = cursor.take() else {
        return Ok(());
    };

    // The first input on a sleeping display only wakes it
    if ctx.display_asleep {
        wake_display(&mut board.display, ctx).await;
        repaint(&mut board.display, ctx.role, &ctx.menu).await;
        return Ok(());
    }

    if deltas.forward {
        ctx.menu.scroll(ScrollDirection::Forward);
    }
    if deltas.backward {
        ctx.menu.scroll(ScrollDirection::Backward);
    }

    let action = if deltas.select {
        ctx.menu.select(ctx.role)
    } else {
        None
    };

    let result = match action {
        Some(MenuAction::SwitchRole(RoleState::Sink)) => enter_sink(board, ctx).await,
        Some(MenuAction::SwitchRole(RoleState::Source)) => {
            enter_source(board, ctx, config).await
        }
        Some(MenuAction::Renegotiate) => renegotiate(board, ctx).await,
        None => Ok(()),
    };

    // Repaint even if the action failed part-way
    repaint(&mut board.display, ctx.role, &ctx.menu).await;
    result
}
