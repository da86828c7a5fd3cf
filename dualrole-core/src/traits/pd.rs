//! PD controller trait

use core::future::Future;

use super::bus::BusError;

/// Role-specific operations of the USB-C PD controller
///
/// Each operation is a register sequence on the command bus. Status reads
/// return the raw 16-bit register word; the coordinator only interprets the
/// bits it needs.
pub trait PdController {
    /// Read the alert (event) word
    fn alert_status(&mut self) -> impl Future<Output = Result<u16, BusError>>;

    /// Read the port status word
    fn port_status(&mut self) -> impl Future<Output = Result<u16, BusError>>;

    /// Push the board's full set of source power offers
    fn load_source_offers(&mut self) -> impl Future<Output = Result<(), BusError>>;

    /// Push the board's full set of sink power requests
    fn load_sink_offers(&mut self) -> impl Future<Output = Result<(), BusError>>;

    /// Apply the sink register set
    fn apply_sink_config(&mut self) -> impl Future<Output = Result<(), BusError>>;

    /// Apply the source register set
    fn apply_source_config(&mut self) -> impl Future<Output = Result<(), BusError>>;

    /// Issue the sink command set (request power from the partner)
    fn negotiate_sink_request(&mut self) -> impl Future<Output = Result<(), BusError>>;

    /// Negotiate the source offer with the partner
    ///
    /// Returns the contracted voltage in millivolts.
    fn negotiate_source_offer(&mut self) -> impl Future<Output = Result<u16, BusError>>;

    /// Stop driving power back onto the port
    fn disable_reverse_drive(&mut self) -> impl Future<Output = Result<(), BusError>>;

    /// Drive VBUS back to a fixed voltage
    fn revert_to_default_voltage(
        &mut self,
        millivolts: u16,
    ) -> impl Future<Output = Result<(), BusError>>;
}
