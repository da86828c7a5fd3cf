//! Configuration types
//!
//! Board-agnostic coordinator settings. The firmware fills them from the
//! board description compiled in by its build script.

pub mod board;
pub mod types;

pub use board::*;
pub use types::*;
