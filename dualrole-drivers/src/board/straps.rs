//! Configuration strap inputs
//!
//! Two DIP switches read once at startup: charge enable and the initial
//! power role.

use dualrole_core::config::BoardStraps;
use dualrole_core::state::RoleState;
use embedded_hal::digital::InputPin;

/// GPIO strap reader
///
/// Each strap can be active-high or active-low (switch to ground with a
/// pull-up).
pub struct GpioStraps<P> {
    charge_enable: P,
    source_role: P,
    /// If true, a strap is asserted when its pin reads LOW
    inverted: bool,
}

impl<P: InputPin> GpioStraps<P> {
    /// Create a new strap reader
    ///
    /// # Arguments
    /// - `charge_enable`: asserted = battery charging allowed
    /// - `source_role`: asserted = start in source role
    /// - `inverted`: if true, straps are asserted when the pin is LOW
    pub fn new(charge_enable: P, source_role: P, inverted: bool) -> Self {
        Self {
            charge_enable,
            source_role,
            inverted,
        }
    }

    /// Create a strap reader for switches to ground
    pub fn new_active_low(charge_enable: P, source_role: P) -> Self {
        Self::new(charge_enable, source_role, true)
    }

    fn asserted(pin: &mut P, inverted: bool) -> Result<bool, P::Error> {
        // Normal: high = asserted, inverted: low = asserted
        Ok(pin.is_high()? != inverted)
    }

    /// Sample both straps
    pub fn read(&mut self) -> Result<BoardStraps, P::Error> {
        let charge_enabled = Self::asserted(&mut self.charge_enable, self.inverted)?;
        let source = Self::asserted(&mut self.source_role, self.inverted)?;
        Ok(BoardStraps {
            charge_enabled,
            initial_role: RoleState::from(source),
        })
    }
}
