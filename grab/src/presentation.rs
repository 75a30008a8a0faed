//! Presentation and viewpoint collaborators.
//!
//! Both are handed to [`crate::GrabController::new`] and owned by it for its whole lifetime.

use std::{cell::Cell, rc::Rc};

use crate::{
    controller::cursor::CursorIcon,
    types::{Vec3, Viewpoint},
};

/// Where the controller sends cursor and diagnostic output.
pub trait Presentation {
    /// Show `icon`. Only called when the icon changes.
    fn set_cursor(&mut self, icon: CursorIcon);

    /// Draw a world-space wireframe sphere for one frame.
    fn draw_debug_sphere(&mut self, _center: Vec3, _radius: f32) {}
}

/// Headless hosts can run without any presentation.
impl Presentation for () {
    fn set_cursor(&mut self, _icon: CursorIcon) {}
}

/// Source of the observer pose, read every frame and every physics tick.
pub trait ViewpointSource {
    /// `None` when the camera is gone.
    fn viewpoint(&self) -> Option<Viewpoint>;
}

/// A fixed pose; tests move it through `GrabController::viewpoint_mut`.
impl ViewpointSource for Viewpoint {
    fn viewpoint(&self) -> Option<Viewpoint> {
        Some(*self)
    }
}

/// A pose shared with the host's camera code.
impl ViewpointSource for Rc<Cell<Viewpoint>> {
    fn viewpoint(&self) -> Option<Viewpoint> {
        Some(self.get())
    }
}

/// A camera that may not exist yet.
impl ViewpointSource for Option<Viewpoint> {
    fn viewpoint(&self) -> Option<Viewpoint> {
        *self
    }
}
