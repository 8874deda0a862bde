//! Rendering adapter: the chase camera rig and a renderer-agnostic frame interface.
//!
//! # Invariants
//! - Renderers read the vehicle rig; they never mutate it.
//! - The camera position glides toward its target and never snaps.
//! - Camera orientation is recomputed every frame from the vehicle position.

mod camera_rig;
mod renderer;

pub use camera_rig::{CameraRig, CameraRigConfig};
pub use renderer::{DebugTextRenderer, RenderView, Renderer, SceneView};
