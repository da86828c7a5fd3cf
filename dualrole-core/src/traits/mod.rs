//! Collaborator traits
//!
//! These traits define the interface between the coordinator and the
//! register-level drivers for the PD controller, the charger and the menu
//! display.

pub mod bus;
pub mod charger;
pub mod display;
pub mod pd;

pub use bus::BusError;
pub use charger::{ChargerController, InputRail, RailReading};
pub use display::{DisplayError, MenuDisplay};
pub use pd::PdController;
