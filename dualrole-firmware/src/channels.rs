//! Inter-task communication
//!
//! Interrupt and joystick tasks raise flags in [`SIGNALS`]; the coordinator
//! task is their only consumer. [`WAKE`] lets the coordinator sleep while
//! nothing is pending.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use dualrole_core::signal::Signals;

/// Alert, charger and cursor flags
pub static SIGNALS: Signals = Signals::new();

/// Signal that a flag was raised
pub static WAKE: Signal<CriticalSectionRawMutex, ()> = Signal::new();
