/*!
Constraint pipeline applied to the raw target of the held object.

Three ordered passes, each a total function of the previous pass's output:

1. Clearance push-out: step the candidate away from the ray's far endpoint until it
   stops overlapping other geometry. Bounded by max reach; a degenerate step falls back
   to `MAX_PUSH_ITERATIONS`.
2. Reach clamp and facing correction: keep the candidate within max reach of the
   viewpoint and never behind it.
3. Anti-tunneling smoothing: average with last tick's position and back off slightly
   along the ray, so a single tick cannot carry the object through thin geometry.

The passes only shape the *target*; the motion integrator decides how far the object
actually travels toward it this tick.
*/

use crate::{
    controller::clearance::ClearanceProbe,
    scene::CollisionQuery,
    settings::{DIST_EPS, FRONT_SNAP_DISTANCE, MAX_PUSH_ITERATIONS, TUNNEL_BACKOFF},
    types::{Ray, Vec3},
};

/// Intermediate positions of one pipeline run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipelineTrace {
    /// Output of the target resolver.
    pub raw: Vec3,
    /// After clearance push-out.
    pub pushed: Vec3,
    /// After reach clamp and facing correction.
    pub clamped: Vec3,
    /// After anti-tunneling smoothing; the integrator's target.
    pub target: Vec3,
}

/// Per-tick pipeline parameters.
pub struct ConstraintPipeline<'a, S: CollisionQuery + ?Sized> {
    pub scene: &'a S,
    pub probe: ClearanceProbe,
    pub ray: Ray,
    pub max_reach: f32,
    pub push_step: f32,
}

impl<'a, S: CollisionQuery + ?Sized> ConstraintPipeline<'a, S> {
    /// Run every pass in order. `previous` is last tick's resolved position.
    pub fn run(&self, raw: Vec3, previous: Vec3) -> PipelineTrace {
        let pushed = self.push_out(raw);
        let clamped = self.clamp_reach(pushed);
        let target = self.smooth_tunneling(previous, clamped);

        log::trace!(
            "pipeline raw={:?} pushed={:?} clamped={:?} target={:?}",
            raw,
            pushed,
            clamped,
            target
        );

        PipelineTrace {
            raw,
            pushed,
            clamped,
            target,
        }
    }

    /// Pass 1: clearance push-out.
    ///
    /// A candidate with clearance is returned unchanged. Otherwise it moves in `push_step`
    /// increments along the direction away from the ray's far endpoint until clear. Once the
    /// accumulated push exceeds max reach it snaps to the far endpoint. The increment count
    /// is enough to cover max reach; a zero step is capped at `MAX_PUSH_ITERATIONS`.
    pub fn push_out(&self, candidate: Vec3) -> Vec3 {
        if !self.probe.is_too_close(self.scene, candidate) {
            return candidate;
        }

        let far_end = self.ray.at(self.max_reach);
        let away = candidate - far_end;
        let dir = {
            let len_sq = away.norm_squared();
            if len_sq > DIST_EPS * DIST_EPS {
                away / len_sq.sqrt()
            } else {
                -self.ray.direction
            }
        };

        let step = self.push_step.max(0.0);
        let mut pos = candidate;
        let mut pushed = 0.0;

        for _ in 0..push_iterations(self.max_reach, step) {
            pos += dir * step;
            pushed += step;

            if pushed > self.max_reach {
                log::debug!("push-out exceeded reach after {pushed:.3}m; snapping to far end");
                return far_end;
            }
            if !self.probe.is_too_close(self.scene, pos) {
                return pos;
            }
        }

        log::debug!("push-out hit the iteration cap; snapping to far end");
        far_end
    }

    /// Pass 2: reach clamp and facing correction.
    #[inline]
    pub fn clamp_reach(&self, candidate: Vec3) -> Vec3 {
        clamp_reach(&self.ray, candidate, self.max_reach)
    }

    /// Pass 3: anti-tunneling smoothing.
    ///
    /// The temporal midpoint of `candidate` and `previous`, nudged back along the ray by
    /// `TUNNEL_BACKOFF`. If that point lacks clearance, the pre-blend candidate is nudged
    /// back instead.
    pub fn smooth_tunneling(&self, previous: Vec3, candidate: Vec3) -> Vec3 {
        let backoff = self.ray.direction * TUNNEL_BACKOFF;
        let blended = (candidate + previous) * 0.5;
        let adjusted = blended - backoff;

        if self.probe.is_too_close(self.scene, adjusted) {
            candidate - backoff
        } else {
            adjusted
        }
    }
}

/// Increments needed for `step`-sized pushes to exceed `max_reach`.
fn push_iterations(max_reach: f32, step: f32) -> u32 {
    if step > DIST_EPS {
        // Float-to-int casts saturate.
        (max_reach.max(0.0) / step).ceil() as u32 + 1
    } else {
        MAX_PUSH_ITERATIONS
    }
}

/// Clamp `candidate` to within `max_reach` of the ray origin and in front of it.
///
/// - Behind the viewpoint (negative dot with the ray direction), or non-finite:
///   snap to `FRONT_SNAP_DISTANCE` along the ray (never farther than `max_reach`).
/// - Farther than `max_reach`: pull back toward the origin onto the reach sphere.
pub fn clamp_reach(ray: &Ray, candidate: Vec3, max_reach: f32) -> Vec3 {
    let max_reach = max_reach.max(0.0);
    let offset = candidate - ray.origin;

    let finite = offset.iter().all(|c| c.is_finite());
    if !finite || offset.dot(&ray.direction) < 0.0 {
        return ray.at(FRONT_SNAP_DISTANCE.min(max_reach));
    }

    let dist = offset.norm();
    if dist > max_reach {
        ray.origin + offset * (max_reach / dist)
    } else {
        candidate
    }
}
