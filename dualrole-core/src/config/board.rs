//! Board strap configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::state::RoleState;

/// Levels of the configuration straps, read once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardStraps {
    /// Battery charging allowed
    pub charge_enabled: bool,
    /// Role entered once startup completes
    pub initial_role: RoleState,
}

impl Default for BoardStraps {
    fn default() -> Self {
        Self {
            charge_enabled: true,
            initial_role: RoleState::Sink,
        }
    }
}
