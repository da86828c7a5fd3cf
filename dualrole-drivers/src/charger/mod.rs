//! Battery charger drivers

pub mod bd99954;

pub use bd99954::{Bd99954, Bd99954Config};
