/*!
Core value types and math aliases shared by the controller stages.

This module contains no algorithms. It defines the data exchanged between:
- the pointer ray builder and the target resolver
- the collision query service (see `scene`)
- the constraint pipeline and motion integrator
- the grab/release state machine
*/

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;

/// Opaque handle to an externally owned scene object.
///
/// The controller never owns the object; it only reads and writes a subset of its
/// state through [`crate::scene::GrabScene`] while the object is held.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

/// Observer pose used to build the interaction ray (a first-person camera).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewpoint {
    pub position: Vec3,
    /// Forward direction. Does not need to be normalized.
    pub forward: Vec3,
}

impl Viewpoint {
    #[inline]
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self { position, forward }
    }
}

/// A half-line in world space. `direction` is always unit length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Point at `distance` meters along the ray.
    #[inline]
    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Nearest-hit result of a ray cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub object: ObjectId,
    /// World-space hit point.
    pub point: Vec3,
    /// World-space surface normal at the hit point.
    pub normal: Vec3,
    /// Distance along the ray (meters).
    pub distance: f32,
}

/// Physical-body flags the controller overrides while an object is held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BodyFlags {
    pub gravity: bool,
    /// Engine-driven (kinematic) rather than simulation-driven.
    pub kinematic: bool,
}

impl BodyFlags {
    /// Flags of a free, simulated body.
    pub const DYNAMIC: Self = Self {
        gravity: true,
        kinematic: false,
    };

    /// Flags applied while an object is held.
    pub const HELD: Self = Self {
        gravity: false,
        kinematic: true,
    };
}

impl Default for BodyFlags {
    fn default() -> Self {
        Self::DYNAMIC
    }
}
