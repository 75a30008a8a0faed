use crate::types::Vec3;

/// Input for moving the held object toward its constrained target.
#[derive(Clone, Copy, Debug)]
pub struct IntegrateParams {
    /// Current world position of the held object (meters).
    pub current: Vec3,
    /// Target from the constraint pipeline (meters).
    pub target: Vec3,
    /// Interpolation speed (1/s).
    pub lerp_speed: f32,
    /// Delta time in seconds.
    pub dt_seconds: f32,
}

/// Result of one integration step.
#[derive(Clone, Copy, Debug)]
pub struct IntegrateResult {
    /// New position of the held object; also next tick's "previous position".
    pub position: Vec3,
    /// Interpolation factor actually applied, in [0, 1].
    pub factor: f32,
    /// Distance left to the target after this step (meters).
    pub remaining: f32,
}

/// Exponential smoothing toward `target`.
///
/// The factor is `lerp_speed * dt`, not normalized by distance, so the object covers the
/// same fraction of the gap each tick regardless of its size. Long ticks saturate at the
/// target instead of passing it.
#[inline]
pub fn integrate(params: IntegrateParams) -> IntegrateResult {
    let IntegrateParams {
        current,
        target,
        lerp_speed,
        dt_seconds,
    } = params;

    let factor = (lerp_speed.max(0.0) * dt_seconds.max(0.0)).clamp(0.0, 1.0);
    let position = current.lerp(&target, factor);

    IntegrateResult {
        position,
        factor,
        remaining: (target - position).norm(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(lerp_speed: f32, dt_seconds: f32) -> IntegrateParams {
        IntegrateParams {
            current: Vec3::zeros(),
            target: Vec3::new(0.0, 0.0, -4.0),
            lerp_speed,
            dt_seconds,
        }
    }

    #[test]
    fn moves_a_fraction_of_the_gap() {
        let r = integrate(params(10.0, 0.02));
        assert!((r.factor - 0.2).abs() < 1.0e-6);
        assert!((r.position - Vec3::new(0.0, 0.0, -0.8)).norm() < 1.0e-5);
        assert!((r.remaining - 3.2).abs() < 1.0e-5);
    }

    #[test]
    fn long_ticks_saturate_at_target() {
        let r = integrate(params(10.0, 1.0));
        assert_eq!(r.factor, 1.0);
        assert_eq!(r.position, Vec3::new(0.0, 0.0, -4.0));
    }

    #[test]
    fn zero_dt_holds_position() {
        let r = integrate(params(10.0, 0.0));
        assert_eq!(r.position, Vec3::zeros());
    }

    #[test]
    fn converges_over_many_ticks() {
        let mut p = params(10.0, 1.0 / 60.0);
        for _ in 0..240 {
            p.current = integrate(p).position;
        }
        assert!((p.current - p.target).norm() < 1.0e-3);
    }
}
