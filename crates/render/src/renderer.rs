use std::fmt::Write as _;

use drivescene_common::CameraMode;
use drivescene_kernel::VehicleRig;
use glam::{Mat4, Vec3};

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 4.0, -10.0),
            target: Vec3::ZERO,
            fov_degrees: 75.0,
        }
    }
}

impl RenderView {
    /// Right-handed look-at with +Y up.
    ///
    /// Falls back to +Z as the up hint when looking straight along +Y, and to
    /// identity when eye and target coincide.
    pub fn view_matrix(&self) -> Mat4 {
        let dir = self.target - self.eye;
        if dir.length_squared() <= f32::EPSILON {
            return Mat4::IDENTITY;
        }
        let up = if dir.normalize().cross(Vec3::Y).length_squared() < 1e-8 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        Mat4::look_at_rh(self.eye, self.target, up)
    }
}

/// Everything a renderer may read for one frame.
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    pub frame: u64,
    pub vehicle: &'a VehicleRig,
    pub view: RenderView,
    pub camera_mode: CameraMode,
    pub speed: f32,
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and produces output. It never mutates the
/// vehicle; locomotion owns its pose.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, scene: &SceneView<'_>) -> Self::Output;
}

/// Text renderer for headless runs, logging and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &SceneView<'_>) -> String {
        let v = scene.vehicle;
        let p = v.position();
        let view = &scene.view;
        let mut out = String::new();
        let _ = writeln!(out, "=== Frame {} ({} camera) ===", scene.frame, scene.camera_mode);
        let _ = writeln!(
            out,
            "Vehicle: pos=({:.2}, {:.2}, {:.2}) heading={:.3} speed={:.4}",
            p.x,
            p.y,
            p.z,
            v.heading(),
            scene.speed
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.0}",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        );
        for wheel in v.wheels() {
            let _ = writeln!(out, "  {:?} spin={:.3}", wheel.slot, wheel.spin);
        }
        out
    }
}
