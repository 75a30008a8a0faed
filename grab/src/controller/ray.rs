use crate::{
    settings::DIST_EPS,
    types::{Ray, Vec3, Viewpoint},
};

/// Direction used when the viewpoint's forward vector is degenerate (-Z, camera forward).
#[inline]
fn fallback_forward() -> Vec3 {
    Vec3::new(0.0, 0.0, -1.0)
}

/// Build the interaction ray from the viewpoint pose.
///
/// The direction is always unit length, even for a zero or non-finite forward vector.
#[inline]
pub fn build_ray(viewpoint: &Viewpoint) -> Ray {
    let forward = viewpoint.forward;
    let len_sq = forward.norm_squared();
    let direction = if len_sq.is_finite() && len_sq > DIST_EPS * DIST_EPS {
        forward / len_sq.sqrt()
    } else {
        fallback_forward()
    };

    Ray {
        origin: viewpoint.position,
        direction,
    }
}
