use drivescene_common::Transform;
use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::locomotion::LocomotionDelta;

/// Errors from assembling a rig out of factory-provided handles.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RigError {
    #[error("vehicle rig needs exactly 4 wheels, got {0}")]
    WheelCount(usize),
    #[error("wheel {0:?} mount is not finite")]
    NonFiniteMount(WheelSlot),
}

/// Position of a wheel on the chassis, in rig order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelSlot {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

impl WheelSlot {
    pub const ALL: [WheelSlot; 4] = [
        WheelSlot::FrontLeft,
        WheelSlot::FrontRight,
        WheelSlot::RearLeft,
        WheelSlot::RearRight,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::FrontLeft => 0,
            Self::FrontRight => 1,
            Self::RearLeft => 2,
            Self::RearRight => 3,
        }
    }
}

/// One wheel: a fixed mount on the chassis plus its spin about local X.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wheel {
    pub slot: WheelSlot,
    /// Wheel centre in the vehicle's local frame.
    pub mount: Vec3,
    /// Accumulated spin in radians. Unbounded.
    pub spin: f32,
}

impl Wheel {
    /// Wheel-to-vehicle transform.
    pub fn local_transform(&self) -> Transform {
        Transform {
            position: self.mount,
            rotation: Quat::from_rotation_x(self.spin),
            scale: Vec3::ONE,
        }
    }
}

/// Rig tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VehicleConfig {
    /// Wheel spin radians per unit of speed.
    pub spin_coupling: f32,
    /// Mounts in [`WheelSlot`] order.
    pub wheel_mounts: [Vec3; 4],
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            spin_coupling: 2.5,
            wheel_mounts: [
                Vec3::new(-1.1, 0.5, 1.3),
                Vec3::new(1.1, 0.5, 1.3),
                Vec3::new(-1.1, 0.5, -1.3),
                Vec3::new(1.1, 0.5, -1.3),
            ],
        }
    }
}

/// The drivable vehicle: root pose plus four spinning wheels.
///
/// The root pose is the single source of truth for where the car is. It only
/// changes through [`VehicleRig::apply_delta`].
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleRig {
    position: Vec3,
    heading: f32,
    wheels: [Wheel; 4],
    spin_coupling: f32,
}

impl Default for VehicleRig {
    fn default() -> Self {
        Self::new(&VehicleConfig::default())
    }
}

impl VehicleRig {
    /// A rig at the origin facing +Z.
    pub fn new(config: &VehicleConfig) -> Self {
        let wheels = WheelSlot::ALL.map(|slot| Wheel {
            slot,
            mount: config.wheel_mounts[slot.index()],
            spin: 0.0,
        });
        Self {
            position: Vec3::ZERO,
            heading: 0.0,
            wheels,
            spin_coupling: config.spin_coupling,
        }
    }

    /// Assemble a rig from a root node and wheel mounts handed over by a
    /// geometry factory. Only the yaw of `root.rotation` is kept.
    pub fn from_handles(
        root: Transform,
        mounts: Vec<Vec3>,
        spin_coupling: f32,
    ) -> Result<Self, RigError> {
        let mounts: [Vec3; 4] = mounts
            .try_into()
            .map_err(|m: Vec<Vec3>| RigError::WheelCount(m.len()))?;
        for slot in WheelSlot::ALL {
            if !mounts[slot.index()].is_finite() {
                return Err(RigError::NonFiniteMount(slot));
            }
        }
        let (heading, _, _) = root.rotation.to_euler(EulerRot::YXZ);
        let mut rig = Self::new(&VehicleConfig {
            spin_coupling,
            wheel_mounts: mounts,
        });
        rig.position = root.position;
        rig.heading = heading;
        Ok(rig)
    }

    /// Yaw first, then move along the new heading, then spin the wheels.
    pub fn apply_delta(&mut self, delta: &LocomotionDelta) {
        self.heading += delta.yaw;
        self.position += self.forward() * delta.distance;
        let spin = delta.speed * self.spin_coupling;
        for wheel in &mut self.wheels {
            wheel.spin += spin;
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Heading about +Y in radians. Unwrapped.
    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Unit forward vector in world space.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.heading.sin(), 0.0, self.heading.cos())
    }

    /// Snapshot of the root pose.
    pub fn world_transform(&self) -> Transform {
        Transform::from_heading(self.position, self.heading)
    }

    pub fn wheels(&self) -> &[Wheel; 4] {
        &self.wheels
    }

    pub fn wheel(&self, slot: WheelSlot) -> &Wheel {
        &self.wheels[slot.index()]
    }

    pub fn wheel_world_matrix(&self, slot: WheelSlot) -> Mat4 {
        self.world_transform().matrix() * self.wheel(slot).local_transform().matrix()
    }

    pub fn spin_coupling(&self) -> f32 {
        self.spin_coupling
    }

    /// FNV-1a over the root pose and wheel spins, for comparing runs.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mut mix = |v: f32| {
            for b in v.to_le_bytes() {
                h ^= b as u64;
                h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(self.position.x);
        mix(self.position.y);
        mix(self.position.z);
        mix(self.heading);
        for wheel in &self.wheels {
            mix(wheel.spin);
        }
        h
    }
}
