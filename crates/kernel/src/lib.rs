//! Vehicle kernel: smoothed locomotion and the vehicle rig it drives.
//!
//! # Invariants
//! - Speed stays within `[reverse_max, forward_max]`.
//! - Yaw change is proportional to speed; a stationary vehicle cannot pivot.
//! - Wheel spin is cosmetic and never feeds back into locomotion.

pub mod locomotion;
pub mod vehicle;

pub use locomotion::{LocomotionConfig, LocomotionDelta, LocomotionModel};
pub use vehicle::{RigError, VehicleConfig, VehicleRig, Wheel, WheelSlot};
