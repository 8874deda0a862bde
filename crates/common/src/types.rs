use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// A unit-scale transform at `position`, rotated `heading` radians about +Y.
    pub fn from_heading(position: Vec3, heading: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_rotation_y(heading),
            scale: Vec3::ONE,
        }
    }

    /// Local-to-world matrix (scale, then rotation, then translation).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Map a point from this transform's local frame into world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * (self.scale * local)
    }

    /// Local +Z expressed in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

/// Camera framing mode. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    /// Behind and above the vehicle.
    #[default]
    Follow,
    /// High overhead.
    Top,
    /// Off the vehicle's right side at moderate height.
    Side,
}

impl CameraMode {
    pub const ALL: [CameraMode; 3] = [CameraMode::Follow, CameraMode::Top, CameraMode::Side];

    /// Cycle Follow -> Top -> Side -> Follow.
    pub fn next(self) -> Self {
        match self {
            Self::Follow => Self::Top,
            Self::Top => Self::Side,
            Self::Side => Self::Follow,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Top => "top",
            Self::Side => "side",
        }
    }
}

impl std::fmt::Display for CameraMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.forward(), Vec3::Z);
    }

    #[test]
    fn quarter_turn_faces_plus_x() {
        let t = Transform::from_heading(Vec3::ZERO, FRAC_PI_2);
        assert!(t.forward().abs_diff_eq(Vec3::X, 1e-6));
    }

    #[test]
    fn transform_point_matches_matrix() {
        let t = Transform::from_heading(Vec3::new(3.0, 0.0, -2.0), 0.7);
        let local = Vec3::new(0.0, 4.0, -10.0);
        let via_matrix = t.matrix().transform_point3(local);
        assert!(t.transform_point(local).abs_diff_eq(via_matrix, 1e-5));
    }

    #[test]
    fn camera_mode_cycles() {
        let mut mode = CameraMode::default();
        assert_eq!(mode, CameraMode::Follow);
        for _ in 0..3 {
            mode = mode.next();
        }
        assert_eq!(mode, CameraMode::Follow);
        assert_eq!(CameraMode::Top.to_string(), "top");
    }
}
