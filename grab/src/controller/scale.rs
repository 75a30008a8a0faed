use crate::{settings::DIST_EPS, types::Vec3};

/// Scale factor from how far the object is now versus at grab time.
///
/// `current / initial`, clamped to `[min_factor, max_factor]`. Degenerate inputs stay in
/// range: a zero initial distance behaves like a tiny one, and NaN ratios fall back to 1.
#[inline]
pub fn scale_factor(
    current_distance: f32,
    initial_distance: f32,
    min_factor: f32,
    max_factor: f32,
) -> f32 {
    let ratio = current_distance.max(0.0) / initial_distance.max(DIST_EPS);
    let ratio = if ratio.is_nan() || current_distance.is_nan() {
        1.0
    } else {
        ratio
    };
    ratio.clamp(min_factor, max_factor)
}

/// New scale: the grab-time scale multiplied uniformly by `factor`, keeping its aspect ratio.
#[inline]
pub fn adjusted_scale(initial_scale: Vec3, factor: f32) -> Vec3 {
    initial_scale * factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn unchanged_distance_keeps_scale() {
        assert_eq!(scale_factor(5.0, 5.0, 0.25, 3.0), 1.0);
    }

    #[test]
    fn doubling_distance_doubles_scale() {
        let f = scale_factor(10.0, 5.0, 0.25, 3.0);
        assert!((f - 2.0).abs() < 1.0e-6);
        let s = adjusted_scale(Vec3::new(1.0, 2.0, 0.5), f);
        assert!((s - Vec3::new(2.0, 4.0, 1.0)).norm() < 1.0e-5);
    }

    #[test]
    fn extremes_are_clamped() {
        assert_eq!(scale_factor(0.0, 5.0, 0.25, 3.0), 0.25);
        assert_eq!(scale_factor(f32::INFINITY, 5.0, 0.25, 3.0), 3.0);
        assert_eq!(scale_factor(1.0, 0.0, 0.25, 3.0), 3.0);
        assert_eq!(scale_factor(0.0, 0.0, 0.25, 3.0), 0.25);
        assert_eq!(scale_factor(f32::NAN, 5.0, 0.25, 3.0), 1.0);
    }

    #[test]
    fn undefined_ratios_fall_back_to_one() {
        assert_eq!(scale_factor(f32::INFINITY, f32::INFINITY, 0.25, 3.0), 1.0);
        assert_eq!(scale_factor(5.0, f32::INFINITY, 0.25, 3.0), 0.25);
        assert_eq!(scale_factor(f32::INFINITY, f32::INFINITY, 1.5, 3.0), 1.5);
    }

    proptest! {
        #[test]
        fn factor_always_within_bounds(
            current in prop_oneof![Just(0.0f32), Just(f32::INFINITY), 0.0f32..1.0e6],
            initial in prop_oneof![Just(0.0f32), 0.0f32..1.0e6],
            min in 0.0f32..1.0,
            span in 0.0f32..10.0,
        ) {
            let max = min + span;
            let f = scale_factor(current, initial, min, max);
            prop_assert!(f >= min && f <= max);
        }
    }
}
