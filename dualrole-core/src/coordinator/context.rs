//! Coordinator-owned state

use crate::menu::MenuContext;
use crate::state::RoleState;

/// State owned exclusively by the coordinator
///
/// Passed by reference into the startup, dispatch and menu sync steps.
/// Interrupt handlers never see it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinatorContext {
    pub(crate) role: RoleState,
    pub(crate) menu: MenuContext,
    pub(crate) initialized: bool,
    pub(crate) display_asleep: bool,
}

impl CoordinatorContext {
    /// Fresh context: sink role, status page, not initialized
    pub fn new() -> Self {
        Self::default()
    }

    /// Current power role
    pub fn role(&self) -> RoleState {
        self.role
    }

    /// Menu state as last handed to the renderer
    pub fn menu(&self) -> &MenuContext {
        &self.menu
    }

    /// Startup sequence has completed
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Display was put to sleep and has not been woken since
    pub fn is_display_asleep(&self) -> bool {
        self.display_asleep
    }
}
