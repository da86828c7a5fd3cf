//! USB-C PD controller drivers

pub mod bm92a;
pub mod pdo;

pub use bm92a::{Bm92a, Bm92aConfig};
pub use pdo::FixedPdo;
