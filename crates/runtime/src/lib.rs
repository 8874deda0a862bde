//! Frame Scheduler: input -> locomotion -> vehicle rig -> camera rig -> draw.
//!
//! # Invariants
//! - Stages run in that order, once per tick, on one thread.
//! - The camera reads the vehicle pose produced in the same tick.
//! - Components are owned fields; there is no global state.

pub mod config;
pub mod scheduler;

pub use config::{ConfigError, DriveConfig};
pub use scheduler::{FrameOutput, FrameReport, FrameScheduler};
