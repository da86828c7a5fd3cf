//! Board-level inputs

pub mod straps;

pub use straps::GpioStraps;
