//! Layout of the five-strengths molecule.
//!
//! Connectedness sits in the centre, the other four on the diagonals, each
//! bonded to the centre. Positions are in the group's local space.

use glam::{EulerRot, Quat, Vec2, Vec3};

pub struct Strength {
    pub name: &'static str,
    pub offset: Vec3,
    pub radius: f32,
    /// Sphere colour as 0xRRGGBB, forwarded to the host once at startup.
    pub color: u32,
}

pub const STRENGTHS: [Strength; 5] = [
    Strength { name: "Connectedness", offset: Vec3::new(0.0, 0.0, 0.0), radius: 0.5, color: 0xFFB088 },
    Strength { name: "Responsibility", offset: Vec3::new(1.2, 1.2, 0.0), radius: 0.4, color: 0xFFA07A },
    Strength { name: "Empathy", offset: Vec3::new(-1.2, 1.2, 0.0), radius: 0.4, color: 0xFFDAB9 },
    Strength { name: "Belief", offset: Vec3::new(1.2, -1.2, 0.0), radius: 0.4, color: 0xFFE4B5 },
    Strength { name: "Intellection", offset: Vec3::new(-1.2, -1.2, 0.0), radius: 0.4, color: 0xFFEFD5 },
];

/// Where the whole molecule sits in the scene.
pub const GROUP_OFFSET: Vec3 = Vec3::new(1.5, 0.0, 0.0);

pub const CENTER: usize = 0;

/// Gold bonds from the centre to every outer strength.
pub fn bonds() -> impl Iterator<Item = (usize, usize)> {
    (1..STRENGTHS.len()).map(|i| (CENTER, i))
}

/// Group rotation as a quaternion. `rotation` is (pitch, yaw).
pub fn orientation(rotation: Vec2) -> Quat {
    Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, 0.0)
}

/// Map a local point into the scene under the group's rotation and scale.
pub fn to_world(local: Vec3, rotation: Vec2, scale: f32) -> Vec3 {
    GROUP_OFFSET + orientation(rotation) * (local * scale)
}

/// Midpoint of a bond in the scene.
pub fn bond_midpoint(from: usize, to: usize, rotation: Vec2, scale: f32) -> Vec3 {
    let mid = (STRENGTHS[from].offset + STRENGTHS[to].offset) * 0.5;
    to_world(mid, rotation, scale)
}
