//! Board-agnostic core logic for the dual-role PD accessory firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Interrupt-to-loop signalling (alert, charger and joystick flags)
//! - Role state, register snapshots and alert classification
//! - Collaborator traits (PD controller, charger, menu display)
//! - Rail monitoring on top of charger measurements
//! - Menu model and screen composition
//! - The role/state coordinator (startup, alert dispatch, menu sync)
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

#[macro_use]
mod fmt;

pub mod config;
pub mod coordinator;
pub mod menu;
pub mod monitor;
pub mod signal;
pub mod state;
pub mod traits;

#[cfg(test)]
mod mock;
