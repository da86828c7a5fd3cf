//! Menu display trait

use core::future::Future;

use crate::menu::MenuContext;
use crate::state::RoleState;

/// Errors that can occur while driving the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Transfer to the display failed
    Bus,
    /// Display did not become ready
    NotReady,
}

/// Renderer for the on-board menu
///
/// The renderer only draws. Page navigation lives in [`MenuContext`] and is
/// driven by the coordinator, so the display never feeds back into the role.
pub trait MenuDisplay {
    /// Bring the display out of sleep
    fn wake(&mut self) -> impl Future<Output = Result<(), DisplayError>>;

    /// Blank the display and switch off its backlight
    fn sleep(&mut self) -> impl Future<Output = Result<(), DisplayError>>;

    /// Redraw the screen for the given role and menu state
    fn repaint(
        &mut self,
        role: RoleState,
        menu: &MenuContext,
    ) -> impl Future<Output = Result<(), DisplayError>>;
}
