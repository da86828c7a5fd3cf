//! Role state, register snapshots and alert classification
//!
//! All coordinator decisions are a function of the current role and the
//! snapshot captured at the start of a dispatch cycle.

pub mod events;
pub mod role;
pub mod snapshot;

pub use events::{classify, AlertEvent, Classification};
pub use role::RoleState;
pub use snapshot::RailSnapshot;
