//! wgpu render backend for drivescene.
//!
//! Draws a floor slab, a grid, and the car as lit instanced boxes. The car
//! model is built once; each frame only the vehicle pose and wheel spins
//! change the instance matrices.
//!
//! # Invariants
//! - Renderer never mutates the vehicle rig.
//! - Projection aspect follows the surface; the view comes from the camera rig.

mod camera;
mod car_model;
mod gpu;
mod shaders;

pub use camera::Projection;
pub use car_model::{BoxPart, CarModel};
pub use gpu::{SurfaceFrame, WgpuRenderer};
