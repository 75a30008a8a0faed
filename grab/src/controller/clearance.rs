use crate::{
    scene::{CollisionQuery, QueryMask},
    settings::DIST_EPS,
    types::Vec3,
};

/// Clearance probe radius: the largest bounding half extent scaled by `multiplier`.
#[inline]
pub fn probe_radius(half_extents: Vec3, multiplier: f32) -> f32 {
    half_extents.abs().max() * multiplier.max(0.0)
}

/// Radius of the sphere standing in for the held object when it is placed against a surface.
#[inline]
pub fn bounding_radius(half_extents: Vec3) -> f32 {
    half_extents.abs().max()
}

/// "Too close" test shared by the constraint passes and host diagnostics.
///
/// A candidate is too close when any collider accepted by `mask` overlaps a sphere of
/// `radius` centered on it. The mask is expected to exclude the held object itself and the
/// reserved categories.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClearanceProbe {
    pub radius: f32,
    pub mask: QueryMask,
}

impl ClearanceProbe {
    #[inline]
    pub fn new(radius: f32, mask: QueryMask) -> Self {
        Self { radius, mask }
    }

    /// A zero radius never reports contact.
    pub fn is_too_close<S: CollisionQuery + ?Sized>(&self, scene: &S, candidate: Vec3) -> bool {
        if self.radius <= DIST_EPS {
            return false;
        }
        !scene
            .overlap_sphere(candidate, self.radius, self.mask)
            .is_empty()
    }
}
