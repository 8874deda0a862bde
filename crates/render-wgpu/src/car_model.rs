use std::f32::consts::{PI, TAU};

use drivescene_kernel::{VehicleRig, WheelSlot};
use glam::{Mat4, Quat, Vec3};

/// One unit cube placed, rotated and stretched into a car part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxPart {
    pub center: Vec3,
    pub size: Vec3,
    pub rotation: Quat,
    pub color: [f32; 4],
}

impl BoxPart {
    fn new(size: [f32; 3], center: [f32; 3], hex: u32) -> Self {
        Self {
            center: Vec3::from(center),
            size: Vec3::from(size),
            rotation: Quat::IDENTITY,
            color: rgb(hex),
        }
    }

    fn rotated(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.size, self.rotation, self.center)
    }
}

pub(crate) fn rgb(hex: u32) -> [f32; 4] {
    let c = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    [c(16), c(8), c(0), 1.0]
}

const BODY: u32 = 0xaa0000;
const GLASS: u32 = 0x88ccff;
const INTERIOR: u32 = 0x111111;
const HEADLIGHT: u32 = 0xffffaa;
const TAILLIGHT: u32 = 0xff0000;
const TIRE: u32 = 0x151515;
const METAL: u32 = 0x999999;
const TIRE_RADIUS: f32 = 0.5;
const TREAD_DEPTH: f32 = 0.2;
const TREAD_SEGMENTS: usize = 12;
pub(crate) const FLOOR: u32 = 0x444444;
pub(crate) const GRID: u32 = 0x555555;
pub(crate) const SKY: u32 = 0x87ceeb;

/// Static car geometry: body parts in vehicle space, wheel parts in wheel space.
#[derive(Debug, Clone)]
pub struct CarModel {
    body: Vec<BoxPart>,
    wheel: Vec<BoxPart>,
}

impl Default for CarModel {
    fn default() -> Self {
        Self::new()
    }
}

impl CarModel {
    pub fn new() -> Self {
        let mut body = vec![
            BoxPart::new([2.0, 0.6, 4.2], [0.0, 0.6, 0.0], BODY),
            BoxPart::new([1.8, 0.8, 2.2], [0.0, 1.3, -0.2], GLASS),
            BoxPart::new([1.8, 0.05, 2.2], [0.0, 1.7, -0.2], BODY),
            BoxPart::new([0.36, 0.36, 0.04], [-0.4, 1.2, 0.65], INTERIOR)
                .rotated(Quat::from_rotation_x(PI / 2.5)),
        ];
        for x in [-0.4, 0.4] {
            body.push(BoxPart::new([0.7, 0.5, 0.7], [x, 0.8, -0.1], INTERIOR));
        }
        for x in [-0.75, 0.75] {
            body.push(BoxPart::new([0.4, 0.4, 0.4], [x, 0.6, 2.1], HEADLIGHT));
        }
        for x in [-0.7, 0.7] {
            body.push(BoxPart::new([0.5, 0.2, 0.1], [x, 0.6, -2.1], TAILLIGHT));
        }

        // Axle along X: a ring of tread blocks, the rim, then five spokes.
        let chord = 2.0 * TIRE_RADIUS * (PI / TREAD_SEGMENTS as f32).tan();
        let mut wheel: Vec<BoxPart> = (0..TREAD_SEGMENTS)
            .map(|i| {
                let rot = Quat::from_rotation_x(i as f32 * TAU / TREAD_SEGMENTS as f32);
                let center = rot * Vec3::new(0.0, TIRE_RADIUS - TREAD_DEPTH / 2.0, 0.0);
                BoxPart::new([0.4, TREAD_DEPTH, chord], center.into(), TIRE).rotated(rot)
            })
            .collect();
        wheel.push(BoxPart::new([0.38, 0.6, 0.6], [0.0, 0.0, 0.0], METAL));
        for i in 0..5 {
            wheel.push(
                BoxPart::new([0.42, 0.7, 0.05], [0.0, 0.0, 0.0], METAL)
                    .rotated(Quat::from_rotation_x(i as f32 * TAU / 5.0)),
            );
        }

        Self { body, wheel }
    }

    pub fn body_parts(&self) -> &[BoxPart] {
        &self.body
    }

    pub fn wheel_parts(&self) -> &[BoxPart] {
        &self.wheel
    }

    /// Number of boxes drawn per vehicle.
    pub fn part_count(&self) -> usize {
        self.body.len() + self.wheel.len() * WheelSlot::ALL.len()
    }

    /// World matrix and colour for every box of `rig`.
    pub fn instances(&self, rig: &VehicleRig) -> Vec<(Mat4, [f32; 4])> {
        let root = rig.world_transform().matrix();
        let mut out = Vec::with_capacity(self.part_count());
        out.extend(self.body.iter().map(|p| (root * p.matrix(), p.color)));
        for slot in WheelSlot::ALL {
            let wheel = rig.wheel_world_matrix(slot);
            out.extend(self.wheel.iter().map(|p| (wheel * p.matrix(), p.color)));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivescene_kernel::LocomotionDelta;

    #[test]
    fn rgb_unpacks_channels() {
        assert_eq!(rgb(0xff0000), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(rgb(0x0000ff), [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn instance_count_matches_parts() {
        let model = CarModel::new();
        let rig = VehicleRig::default();
        assert_eq!(model.instances(&rig).len(), model.part_count());
        assert_eq!(model.part_count(), 10 + (TREAD_SEGMENTS + 6) * 4);
    }

    #[test]
    fn instances_follow_the_rig() {
        let model = CarModel::new();
        let mut rig = VehicleRig::default();
        let before = model.instances(&rig)[0].0.transform_point3(Vec3::ZERO);
        rig.apply_delta(&LocomotionDelta {
            yaw: 0.0,
            distance: 2.0,
            speed: 2.0,
        });
        let after = model.instances(&rig)[0].0.transform_point3(Vec3::ZERO);
        assert!((after - before).abs_diff_eq(Vec3::new(0.0, 0.0, 2.0), 1e-5));
    }

    #[test]
    fn tread_outline_is_round() {
        let model = CarModel::new();
        for part in &model.wheel_parts()[..TREAD_SEGMENTS] {
            let m = part.matrix();
            let outer = m.transform_point3(Vec3::new(0.0, 0.5, 0.0));
            let r = Vec3::new(0.0, outer.y, outer.z).length();
            assert!((r - TIRE_RADIUS).abs() < 1e-5, "{r}");
            let corner = m.transform_point3(Vec3::new(0.0, 0.5, 0.5));
            let r = Vec3::new(0.0, corner.y, corner.z).length();
            assert!(r < TIRE_RADIUS * 1.05, "{r}");
        }
    }

    #[test]
    fn wheel_spin_turns_spokes_in_place() {
        let model = CarModel::new();
        let mut rig = VehicleRig::default();
        let spoke = model.body_parts().len() + TREAD_SEGMENTS + 1;
        let hub = |r: &VehicleRig| model.instances(r)[spoke].0.transform_point3(Vec3::ZERO);
        let tip = |r: &VehicleRig| model.instances(r)[spoke].0.transform_point3(Vec3::Y * 0.5);
        let (hub0, tip0) = (hub(&rig), tip(&rig));
        rig.apply_delta(&LocomotionDelta {
            yaw: 0.0,
            distance: 0.0,
            speed: 0.4,
        });
        assert!(hub(&rig).abs_diff_eq(hub0, 1e-6));
        assert!(!tip(&rig).abs_diff_eq(tip0, 1e-3));
    }
}
