//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in dualrole-core for the board's peripherals:
//!
//! - USB-C PD controller (BM92A-class, I2C)
//! - Battery charger (BD99954-class, I2C)
//! - HD44780 character LCD (8-bit parallel)
//! - Configuration straps (GPIO)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod board;
pub mod charger;
pub mod display;
pub mod pd;

mod bus;

#[cfg(test)]
mod mock;
