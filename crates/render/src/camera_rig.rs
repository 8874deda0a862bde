use drivescene_common::{CameraMode, InvalidTuning, Transform, check_range};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::renderer::RenderView;

/// Camera rig tunables. Offsets are in the vehicle's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraRigConfig {
    /// Fraction of the remaining distance covered each frame.
    pub smoothing: f32,
    pub follow_offset: Vec3,
    pub top_offset: Vec3,
    pub side_offset: Vec3,
    pub fov_degrees: f32,
}

impl Default for CameraRigConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.1,
            follow_offset: Vec3::new(0.0, 4.0, -10.0),
            top_offset: Vec3::new(0.0, 30.0, 0.1),
            side_offset: Vec3::new(12.0, 2.0, 0.0),
            fov_degrees: 75.0,
        }
    }
}

impl CameraRigConfig {
    pub fn offset(&self, mode: CameraMode) -> Vec3 {
        match mode {
            CameraMode::Follow => self.follow_offset,
            CameraMode::Top => self.top_offset,
            CameraMode::Side => self.side_offset,
        }
    }

    pub fn validate(&self) -> Result<(), InvalidTuning> {
        check_range("smoothing", self.smoothing, "in (0, 1]", |v| v > 0.0 && v <= 1.0)?;
        for (field, offset) in [
            ("follow_offset", self.follow_offset),
            ("top_offset", self.top_offset),
            ("side_offset", self.side_offset),
        ] {
            if !offset.is_finite() {
                return Err(InvalidTuning::NonFinite { field });
            }
        }
        check_range("fov_degrees", self.fov_degrees, "in (0, 180)", |v| {
            v > 0.0 && v < 180.0
        })
    }
}

/// Chase camera that glides toward a mode-specific anchor on the vehicle.
///
/// The anchor is the mode's offset pushed through the vehicle's full world
/// transform, so every mode (Top included) turns with the vehicle's heading.
#[derive(Debug, Clone)]
pub struct CameraRig {
    config: CameraRigConfig,
    position: Vec3,
    last_target: Vec3,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(CameraRigConfig::default())
    }
}

impl CameraRig {
    /// A rig whose camera starts at the world origin.
    pub fn new(config: CameraRigConfig) -> Self {
        Self::with_position(config, Vec3::ZERO)
    }

    pub fn with_position(config: CameraRigConfig, position: Vec3) -> Self {
        Self {
            config,
            position,
            last_target: position,
        }
    }

    pub fn config(&self) -> &CameraRigConfig {
        &self.config
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Anchor computed by the most recent [`CameraRig::advance`].
    pub fn last_target(&self) -> Vec3 {
        self.last_target
    }

    /// World-space anchor for `mode` given the vehicle pose.
    pub fn target_for(&self, vehicle: &Transform, mode: CameraMode) -> Vec3 {
        vehicle.transform_point(self.config.offset(mode))
    }

    /// Step the camera one frame and aim it at the vehicle.
    pub fn advance(&mut self, vehicle: &Transform, mode: CameraMode) -> RenderView {
        let target = self.target_for(vehicle, mode);
        self.position = self.position.lerp(target, self.config.smoothing);
        self.last_target = target;
        RenderView {
            eye: self.position,
            target: vehicle.position,
            fov_degrees: self.config.fov_degrees,
        }
    }
}
