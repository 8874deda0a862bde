use drivescene_common::{InvalidTuning, check_range};
use drivescene_input::{Control, InputState};
use serde::{Deserialize, Serialize};

/// Tunables for the locomotion model. Distances are per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocomotionConfig {
    /// Target speed while `forward` is held.
    pub forward_max: f32,
    /// Target speed while `backward` is held. Not positive.
    pub reverse_max: f32,
    /// Smoothing factor toward a non-zero target.
    pub accel_factor: f32,
    /// Smoothing factor toward zero when nothing is held.
    pub coast_factor: f32,
    /// Turn rate magnitude in radians per frame.
    pub turn_max: f32,
    /// Multiplier coupling yaw to speed.
    pub turn_speed_coupling: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            forward_max: 0.2,
            reverse_max: -0.15,
            accel_factor: 0.05,
            coast_factor: 0.03,
            turn_max: 0.03,
            turn_speed_coupling: 10.0,
        }
    }
}

impl LocomotionConfig {
    /// Check the ranges the convergence guarantees depend on.
    pub fn validate(&self) -> Result<(), InvalidTuning> {
        check_range("forward_max", self.forward_max, ">= 0", |v| v >= 0.0)?;
        check_range("reverse_max", self.reverse_max, "<= 0", |v| v <= 0.0)?;
        check_range("accel_factor", self.accel_factor, "in (0, 1]", unit_factor)?;
        check_range("coast_factor", self.coast_factor, "in (0, 1]", unit_factor)?;
        check_range("turn_max", self.turn_max, ">= 0", |v| v >= 0.0)?;
        if !self.turn_speed_coupling.is_finite() {
            return Err(InvalidTuning::NonFinite {
                field: "turn_speed_coupling",
            });
        }
        Ok(())
    }
}

fn unit_factor(v: f32) -> bool {
    v > 0.0 && v <= 1.0
}

/// Per-frame pose change produced by [`LocomotionModel::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocomotionDelta {
    /// Heading change about +Y, radians.
    pub yaw: f32,
    /// Distance along the (post-yaw) heading. Equal to `speed`.
    pub distance: f32,
    /// Smoothed speed this frame, used for wheel spin.
    pub speed: f32,
}

/// Turns held keys into smoothed speed and a discrete turn rate.
#[derive(Debug, Clone, Default)]
pub struct LocomotionModel {
    config: LocomotionConfig,
    speed: f32,
    turn_rate: f32,
}

impl LocomotionModel {
    pub fn new(config: LocomotionConfig) -> Self {
        Self {
            config,
            speed: 0.0,
            turn_rate: 0.0,
        }
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn turn_rate(&self) -> f32 {
        self.turn_rate
    }

    /// Speed the model is currently converging toward.
    pub fn target_speed(&self, input: &InputState) -> f32 {
        if input.is_pressed(Control::Forward) {
            self.config.forward_max
        } else if input.is_pressed(Control::Backward) {
            self.config.reverse_max
        } else {
            0.0
        }
    }

    /// Advance one frame.
    pub fn advance(&mut self, input: &InputState) -> LocomotionDelta {
        let cfg = &self.config;
        let target = self.target_speed(input);
        let factor = if target == 0.0 {
            cfg.coast_factor
        } else {
            cfg.accel_factor
        };
        // `clamp` panics if an unvalidated config has reverse_max > forward_max.
        self.speed = (self.speed + (target - self.speed) * factor)
            .max(cfg.reverse_max)
            .min(cfg.forward_max);

        // Turn rate snaps; only speed is smoothed.
        self.turn_rate = if input.is_pressed(Control::Left) {
            cfg.turn_max
        } else if input.is_pressed(Control::Right) {
            -cfg.turn_max
        } else {
            0.0
        };

        LocomotionDelta {
            yaw: self.turn_rate * self.speed * cfg.turn_speed_coupling,
            distance: self.speed,
            speed: self.speed,
        }
    }
}
