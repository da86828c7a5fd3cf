//! Embassy async tasks
//!
//! Each task runs independently and communicates via the shared flags.

pub mod coordinator;
pub mod irq;
pub mod joystick;

pub use coordinator::coordinator_task;
pub use irq::{irq_task, IrqLine};
pub use joystick::joystick_task;
