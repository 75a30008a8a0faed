use crate::{
    scene::{CollisionQuery, QueryMask},
    types::{Ray, Vec3},
};

/// Raw target for the held object's center.
///
/// - On a hit within `max_reach`, the hit point pulled back along the ray by `object_radius`,
///   so the object's surface rather than its center meets the hit.
/// - Otherwise the point exactly `max_reach` along the ray.
///
/// `mask` must exclude the viewpoint and the held object's reserved category.
pub fn resolve_target<S: CollisionQuery + ?Sized>(
    scene: &S,
    ray: &Ray,
    max_reach: f32,
    mask: QueryMask,
    object_radius: f32,
) -> Vec3 {
    match scene.raycast(ray, max_reach, mask) {
        Some(hit) if hit.distance <= max_reach => {
            log::trace!("target ray hit {:?} at {:.3}m", hit.object, hit.distance);
            hit.point - ray.direction * object_radius
        }
        _ => ray.at(max_reach),
    }
}
