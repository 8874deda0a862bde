use drivescene_common::CameraMode;
use drivescene_input::InputTracker;
use drivescene_kernel::{LocomotionModel, VehicleRig};
use drivescene_render::{CameraRig, RenderView, Renderer, SceneView};
use glam::Vec3;
use serde::Serialize;

use crate::config::{ConfigError, DriveConfig};

/// Per-frame summary for logging, HUDs and JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame: u64,
    pub speed: f32,
    pub turn_rate: f32,
    pub heading: f32,
    pub position: Vec3,
    pub camera_eye: Vec3,
    pub camera_target: Vec3,
    pub camera_mode: CameraMode,
}

/// What one tick produced: the report plus whatever the renderer returned.
#[derive(Debug, Clone)]
pub struct FrameOutput<T> {
    pub report: FrameReport,
    pub output: T,
}

/// Owns every per-frame component and runs them in a fixed order.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    input: InputTracker,
    locomotion: LocomotionModel,
    vehicle: VehicleRig,
    camera: CameraRig,
    frame: u64,
    camera_mode: CameraMode,
    view: RenderView,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(
            InputTracker::default(),
            LocomotionModel::default(),
            VehicleRig::default(),
            CameraRig::default(),
        )
    }
}

impl FrameScheduler {
    pub fn new(
        input: InputTracker,
        locomotion: LocomotionModel,
        vehicle: VehicleRig,
        camera: CameraRig,
    ) -> Self {
        let camera_mode = input.camera_mode();
        let view = RenderView {
            eye: camera.position(),
            target: vehicle.position(),
            fov_degrees: camera.config().fov_degrees,
        };
        Self {
            input,
            locomotion,
            vehicle,
            camera,
            frame: 0,
            camera_mode,
            view,
        }
    }

    /// Validate `config` and build every component from it.
    pub fn from_config(config: &DriveConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(
            InputTracker::new(config.key_bindings()),
            LocomotionModel::new(config.locomotion),
            config.build_vehicle()?,
            CameraRig::new(config.camera),
        ))
    }

    /// Advance one frame and draw it.
    pub fn tick<R>(&mut self, renderer: &R) -> FrameOutput<R::Output>
    where
        R: Renderer + ?Sized,
    {
        self.frame += 1;
        let _span = tracing::trace_span!("frame", frame = self.frame).entered();

        let input = self.input.snapshot();
        let delta = self.locomotion.advance(&input);
        self.vehicle.apply_delta(&delta);

        let mode = input.camera_mode();
        if mode != self.camera_mode {
            tracing::debug!(from = %self.camera_mode, to = %mode, "camera mode switched");
            self.camera_mode = mode;
        }
        self.view = self.camera.advance(&self.vehicle.world_transform(), mode);

        let report = self.report();
        tracing::trace!(speed = report.speed, heading = report.heading, "frame advanced");

        let output = renderer.render(&SceneView {
            frame: self.frame,
            vehicle: &self.vehicle,
            view: self.view,
            camera_mode: mode,
            speed: delta.speed,
        });
        FrameOutput { report, output }
    }

    /// Tick until `should_continue` returns false. Returns the frames run.
    ///
    /// The predicate runs after every frame with that frame's report and
    /// render output.
    pub fn run<R, F>(&mut self, renderer: &R, mut should_continue: F) -> u64
    where
        R: Renderer + ?Sized,
        F: FnMut(&FrameReport, &R::Output) -> bool,
    {
        let mut frames = 0;
        loop {
            let FrameOutput { report, output } = self.tick(renderer);
            frames += 1;
            if !should_continue(&report, &output) {
                return frames;
            }
        }
    }

    /// Snapshot of the most recent frame.
    pub fn report(&self) -> FrameReport {
        FrameReport {
            frame: self.frame,
            speed: self.locomotion.speed(),
            turn_rate: self.locomotion.turn_rate(),
            heading: self.vehicle.heading(),
            position: self.vehicle.position(),
            camera_eye: self.view.eye,
            camera_target: self.view.target,
            camera_mode: self.camera_mode,
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Write side for key event handlers.
    pub fn input_mut(&mut self) -> &mut InputTracker {
        &mut self.input
    }

    pub fn input(&self) -> &InputTracker {
        &self.input
    }

    pub fn locomotion(&self) -> &LocomotionModel {
        &self.locomotion
    }

    pub fn vehicle(&self) -> &VehicleRig {
        &self.vehicle
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// View used for the most recent draw.
    pub fn view(&self) -> RenderView {
        self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivescene_input::Control;
    use drivescene_render::DebugTextRenderer;
    use std::cell::RefCell;

    /// Records the scene it was asked to draw.
    #[derive(Default)]
    struct Capture {
        frames: RefCell<Vec<(u64, Vec3, Vec3, f32)>>,
    }

    impl Renderer for Capture {
        type Output = ();

        fn render(&self, scene: &SceneView<'_>) {
            self.frames.borrow_mut().push((
                scene.frame,
                scene.vehicle.position(),
                scene.view.eye,
                scene.speed,
            ));
        }
    }

    #[test]
    fn idle_scheduler_keeps_vehicle_still() {
        let mut s = FrameScheduler::default();
        let capture = Capture::default();
        for _ in 0..10 {
            s.tick(&capture);
        }
        assert_eq!(s.frame(), 10);
        assert_eq!(s.vehicle().position(), Vec3::ZERO);
        assert_eq!(capture.frames.borrow().len(), 10);
    }

    #[test]
    fn first_frame_follow_camera() {
        let mut s = FrameScheduler::default();
        let out = s.tick(&DebugTextRenderer::new());
        assert!(
            out.report
                .camera_eye
                .abs_diff_eq(Vec3::new(0.0, 0.4, -1.0), 1e-6)
        );
        assert!(out.output.contains("Frame 1"));
    }

    #[test]
    fn camera_targets_post_update_pose() {
        let mut s = FrameScheduler::default();
        s.input_mut().set_pressed(Control::Forward, true);
        let out = s.tick(&Capture::default());
        let moved = s.vehicle().position();
        assert!(moved.z > 0.0);
        assert_eq!(out.report.camera_target, moved);
        let expected = s
            .camera()
            .target_for(&s.vehicle().world_transform(), CameraMode::Follow);
        assert_eq!(s.camera().last_target(), expected);
    }

    #[test]
    fn renderer_sees_same_frame_state() {
        let mut s = FrameScheduler::default();
        s.input_mut().key_down("w");
        let capture = Capture::default();
        for _ in 0..3 {
            s.tick(&capture);
        }
        let frames = capture.frames.borrow();
        let (frame, pos, eye, speed) = frames[2];
        assert_eq!(frame, 3);
        assert_eq!(pos, s.vehicle().position());
        assert_eq!(eye, s.camera().position());
        assert_eq!(speed, s.locomotion().speed());
    }

    #[test]
    fn run_honours_predicate() {
        let mut s = FrameScheduler::default();
        s.input_mut().key_down("w");
        let frames = s.run(&Capture::default(), |report, _| report.frame < 50);
        assert_eq!(frames, 50);
        let expected = 0.2 * (1.0 - 0.95_f32.powi(50));
        assert!((s.report().speed - expected).abs() < 1e-4);
    }

    #[test]
    fn run_stops_after_one_frame() {
        let mut s = FrameScheduler::default();
        assert_eq!(s.run(&DebugTextRenderer::new(), |_, _| false), 1);
    }

    #[test]
    fn mode_switch_glides() {
        let mut s = FrameScheduler::default();
        let capture = Capture::default();
        for _ in 0..100 {
            s.tick(&capture);
        }
        let before = s.camera().position();
        s.input_mut().key_down("1");
        s.input_mut().key_down("2");
        let out = s.tick(&capture);
        assert_eq!(out.report.camera_mode, CameraMode::Top);
        let after = s.camera().position();
        let full = s.camera().last_target() - before;
        assert!((after - before).abs_diff_eq(full * 0.1, 1e-4));
    }

    #[test]
    fn turning_at_rest_keeps_heading() {
        let mut s = FrameScheduler::default();
        s.input_mut().key_down("a");
        for _ in 0..30 {
            s.tick(&Capture::default());
        }
        assert_eq!(s.vehicle().heading(), 0.0);
        assert_eq!(s.report().turn_rate, 0.03);
    }

    #[test]
    fn left_turn_while_driving_yaws_positive() {
        let mut s = FrameScheduler::default();
        s.input_mut().key_down("w");
        s.input_mut().key_down("a");
        for _ in 0..30 {
            s.tick(&Capture::default());
        }
        assert!(s.vehicle().heading() > 0.0);
        assert!(s.vehicle().position().x > 0.0);
    }

    #[test]
    fn identical_inputs_are_deterministic() {
        let drive = || {
            let mut s = FrameScheduler::default();
            s.input_mut().key_down("w");
            s.input_mut().key_down("d");
            s.run(&Capture::default(), |r, _| r.frame < 120);
            s.vehicle().state_hash()
        };
        assert_eq!(drive(), drive());
    }

    #[test]
    fn from_config_applies_tuning() {
        let cfg = DriveConfig::from_yaml_str("locomotion:\n  accel_factor: 1.0\n").unwrap();
        let mut s = FrameScheduler::from_config(&cfg).unwrap();
        s.input_mut().key_down("w");
        s.tick(&Capture::default());
        assert_eq!(s.report().speed, 0.2);
    }

    #[test]
    fn report_before_first_frame() {
        let s = FrameScheduler::default();
        let r = s.report();
        assert_eq!(r.frame, 0);
        assert_eq!(r.camera_mode, CameraMode::Follow);
        assert_eq!(r.camera_target, Vec3::ZERO);
    }
}
