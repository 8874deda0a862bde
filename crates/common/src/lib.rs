//! Shared types for the drivescene crates.
//!
//! # Conventions
//! - +Y is up.
//! - A vehicle's local +Z is its forward axis and local +X its right side.

pub mod error;
pub mod types;

pub use error::{InvalidTuning, check_range};
pub use types::{CameraMode, Transform};
