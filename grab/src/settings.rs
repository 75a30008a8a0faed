/*!
Grab controller settings and tolerances.

These constants centralize the parameters used by the target resolver, the
constraint pipeline, the motion integrator and the size adjuster. The tunable
ones are gathered into [`GrabSettings`]; the rest are fixed by the algorithm.

Notes
- Distances are in meters, time in seconds, angles in degrees.
- Favor practical world-space tolerances over machine epsilon.
*/

use crate::error::{GrabError, GrabResult};

/// Maximum reach: length of the interaction ray (meters).
pub const DEFAULT_MAX_REACH: f32 = 10.0;

/// Interpolation speed of the held object toward its target (1/s).
pub const DEFAULT_LERP_SPEED: f32 = 10.0;

/// Probe radius = largest bounding half extent * this multiplier.
/// Zero disables the clearance test.
pub const DEFAULT_PROBE_RADIUS_MULTIPLIER: f32 = 1.0;

/// Distance moved per clearance push-out increment (meters).
pub const DEFAULT_PUSH_STEP: f32 = 0.05;

/// Carried for tuning parity; not read by the pipeline.
pub const DEFAULT_POSITION_UPDATE_THRESHOLD: f32 = 0.01;

/// Carried for tuning parity; not read by the pipeline.
pub const DEFAULT_MAX_POSITION_JUMP: f32 = 1.0;

/// Upper bound of the distance-driven scale factor.
pub const DEFAULT_MAX_SCALE_FACTOR: f32 = 3.0;

/// Lower bound of the distance-driven scale factor.
pub const DEFAULT_MIN_SCALE_FACTOR: f32 = 0.25;

/// Carried for tuning parity; not read by the size adjuster.
pub const DEFAULT_MAX_DISTANCE_TO_SIZE_RATIO: f32 = 2.0;

/// Rotation speed while the secondary action is held (degrees per second).
pub const DEFAULT_ROTATION_SPEED_DEG: f32 = 90.0;

/// Distance in front of the viewpoint a target behind the camera snaps to (meters).
pub const FRONT_SNAP_DISTANCE: f32 = 0.5;

/// Backward nudge along the ray applied by the anti-tunneling pass (meters).
pub const TUNNEL_BACKOFF: f32 = 0.05;

/// Push-out increment cap for a zero (or sub-`DIST_EPS`) `push_step`.
/// Otherwise the increment count follows from `max_reach / push_step`.
pub const MAX_PUSH_ITERATIONS: u32 = 256;

/// Practical small distance for comparisons (meters).
pub const DIST_EPS: f32 = 1.0e-6;

/// What release does to the held object's body flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReleasePolicy {
    /// Always release as gravity-on, non-kinematic.
    #[default]
    ForceDynamic,
    /// Write back the flags observed at grab time.
    RestorePrevious,
}

/// Tunable configuration of a [`crate::GrabController`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrabSettings {
    /// Ray length and maximum hold distance (meters).
    pub max_reach: f32,
    pub lerp_speed: f32,
    pub probe_radius_multiplier: f32,
    pub push_step: f32,
    pub position_update_threshold: f32,
    pub max_position_jump: f32,
    pub max_scale_factor: f32,
    pub min_scale_factor: f32,
    pub max_distance_to_size_ratio: f32,
    pub rotation_speed_deg: f32,
    pub release_policy: ReleasePolicy,
    /// Push the clearance probe sphere to the presentation layer every physics tick.
    pub debug_draw: bool,
}

impl Default for GrabSettings {
    fn default() -> Self {
        Self {
            max_reach: DEFAULT_MAX_REACH,
            lerp_speed: DEFAULT_LERP_SPEED,
            probe_radius_multiplier: DEFAULT_PROBE_RADIUS_MULTIPLIER,
            push_step: DEFAULT_PUSH_STEP,
            position_update_threshold: DEFAULT_POSITION_UPDATE_THRESHOLD,
            max_position_jump: DEFAULT_MAX_POSITION_JUMP,
            max_scale_factor: DEFAULT_MAX_SCALE_FACTOR,
            min_scale_factor: DEFAULT_MIN_SCALE_FACTOR,
            max_distance_to_size_ratio: DEFAULT_MAX_DISTANCE_TO_SIZE_RATIO,
            rotation_speed_deg: DEFAULT_ROTATION_SPEED_DEG,
            release_policy: ReleasePolicy::default(),
            debug_draw: cfg!(debug_assertions),
        }
    }
}

impl GrabSettings {
    /// Check every field the algorithm reads.
    ///
    /// The unused tuning fields are only required to be finite.
    pub fn validate(&self) -> GrabResult<()> {
        non_negative("max_reach", self.max_reach)?;
        non_negative("lerp_speed", self.lerp_speed)?;
        non_negative("probe_radius_multiplier", self.probe_radius_multiplier)?;
        non_negative("push_step", self.push_step)?;
        non_negative("max_scale_factor", self.max_scale_factor)?;
        non_negative("min_scale_factor", self.min_scale_factor)?;
        finite("position_update_threshold", self.position_update_threshold)?;
        finite("max_position_jump", self.max_position_jump)?;
        finite("max_distance_to_size_ratio", self.max_distance_to_size_ratio)?;
        finite("rotation_speed_deg", self.rotation_speed_deg)?;

        if self.min_scale_factor > self.max_scale_factor {
            return Err(GrabError::InvalidScaleRange {
                min: self.min_scale_factor,
                max: self.max_scale_factor,
            });
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> GrabResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GrabError::InvalidSetting {
            field,
            value,
            reason: "must be finite",
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> GrabResult<()> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(GrabError::InvalidSetting {
            field,
            value,
            reason: "must be non-negative",
        });
    }
    Ok(())
}
