use crate::{
    category::CategoryId,
    types::{BodyFlags, ObjectId, Vec3},
};

/// Transient record of one grab, from the grab event to the release event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrabSession {
    pub object: ObjectId,
    /// Category to restore on release.
    pub original_category: CategoryId,
    /// Body flags observed at grab time; `None` when the object has no physical body.
    pub original_flags: Option<BodyFlags>,
    /// Where the ray met the object's surface when it was grabbed.
    pub grab_point: Vec3,
    /// Object center relative to `grab_point` at grab time.
    pub anchor_offset: Vec3,
    /// Viewpoint-to-closest-surface distance at grab time (meters).
    pub initial_distance: f32,
    pub initial_scale: Vec3,
    /// Last tick's resolved position; input to the anti-tunneling pass.
    pub previous_position: Vec3,
}

impl GrabSession {
    /// Start a session for `object`, currently at `translation`.
    pub fn begin(
        object: ObjectId,
        original_category: CategoryId,
        original_flags: Option<BodyFlags>,
        grab_point: Vec3,
        translation: Vec3,
        initial_distance: f32,
        initial_scale: Vec3,
    ) -> Self {
        Self {
            object,
            original_category,
            original_flags,
            grab_point,
            anchor_offset: translation - grab_point,
            initial_distance,
            initial_scale,
            previous_position: translation,
        }
    }
}
