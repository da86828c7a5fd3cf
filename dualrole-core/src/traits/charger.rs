//! Battery charger trait

use core::future::Future;

use super::bus::BusError;

/// Charger input rail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputRail {
    /// USB-C VBUS (sink-attach rail)
    Vbus,
    /// Auxiliary VCC input
    Vcc,
}

impl InputRail {
    /// Short display label
    pub fn label(self) -> &'static str {
        match self {
            InputRail::Vbus => "VBUS",
            InputRail::Vcc => "VCC",
        }
    }
}

/// One voltage/current measurement of a rail
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RailReading {
    pub millivolts: u16,
    pub milliamps: u16,
}

/// Charger operations used by the coordinator
pub trait ChargerController {
    /// Run the charger bring-up register sequence
    fn run_startup_sequence(&mut self) -> impl Future<Output = Result<(), BusError>>;

    /// Enable or inhibit battery charging
    fn set_charging_enabled(&mut self, enabled: bool)
        -> impl Future<Output = Result<(), BusError>>;

    /// Read the rail interrupt status word
    fn rail_status(&mut self) -> impl Future<Output = Result<u16, BusError>>;

    /// Acknowledge latched rail interrupts
    fn acknowledge_interrupt(&mut self, mask: u16) -> impl Future<Output = Result<(), BusError>>;

    /// Clear every latched interrupt status register
    fn clear_interrupts(&mut self) -> impl Future<Output = Result<(), BusError>>;

    /// Route the charger to take power from `rail`
    fn select_active_rail(&mut self, rail: InputRail) -> impl Future<Output = Result<(), BusError>>;

    /// Measure voltage and current on `rail`
    fn measure(&mut self, rail: InputRail) -> impl Future<Output = Result<RailReading, BusError>>;
}
