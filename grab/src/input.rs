/// Snapshot of the two actions the controller listens to, sampled once per frame by the host.
///
/// Pointer motion is irrelevant: the ray follows the viewpoint's orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrabInput {
    /// Primary action went down this frame.
    pub primary_pressed: bool,
    /// Primary action went up this frame.
    pub primary_released: bool,
    /// Primary action is currently down.
    ///
    /// Not read by the controller: grab and release react to the edges only. Hosts fill it
    /// so one snapshot describes the whole action state.
    pub primary_held: bool,
    /// Secondary (rotate) action is currently down.
    pub secondary_held: bool,
}

impl GrabInput {
    pub const NONE: Self = Self {
        primary_pressed: false,
        primary_released: false,
        primary_held: false,
        secondary_held: false,
    };

    /// Frame on which the primary action goes down.
    pub fn press() -> Self {
        Self {
            primary_pressed: true,
            primary_held: true,
            ..Self::NONE
        }
    }

    /// Frame on which the primary action comes back up.
    pub fn release() -> Self {
        Self {
            primary_released: true,
            ..Self::NONE
        }
    }

    /// Primary held with no edge this frame.
    pub fn hold() -> Self {
        Self {
            primary_held: true,
            ..Self::NONE
        }
    }

    pub fn with_secondary(mut self) -> Self {
        self.secondary_held = true;
        self
    }
}
