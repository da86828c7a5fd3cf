//! On-board menu model
//!
//! The menu is a short cycle of pages plus two shortcut pages that role
//! transitions jump to. [`MenuContext`] holds the navigation state and the
//! telemetry the pages show; [`Screen`] turns it into the two text rows of
//! the character display.

mod context;
mod screen;

pub use context::{FastSet, MenuAction, MenuContext, MenuPage, ScrollDirection, Telemetry};
pub use screen::{Screen, COLUMNS, ROWS};
