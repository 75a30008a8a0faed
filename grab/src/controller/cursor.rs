//! Cursor feedback derived from the state machine.

/// Interaction state as seen by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorState {
    /// Nothing held, nothing getable under the ray.
    Idle,
    /// The ray rests on a getable object.
    Hovering,
    /// An object is held.
    Holding,
}

/// The two icons the presentation layer can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorIcon {
    Grab,
    Hand,
}

/// Idle shares the `Grab` icon with `Holding`.
#[inline]
pub fn cursor_icon(state: CursorState) -> CursorIcon {
    match state {
        CursorState::Holding => CursorIcon::Grab,
        CursorState::Hovering => CursorIcon::Hand,
        CursorState::Idle => CursorIcon::Grab,
    }
}
