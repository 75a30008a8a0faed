/*!
Grab controller: the grab/release state machine and its per-tick stages.

- ray:         pointer ray from the viewpoint
- target:      raw target for the held object from a ray cast
- clearance:   probe radius and the shared "too close" test
- constraints: push-out, reach clamp, anti-tunneling passes
- motion:      exponential smoothing toward the final target
- scale:       distance-driven rescaling
- session:     state recorded at grab time
- cursor:      icon derivation from state

The host calls [`GrabController::update`] once per rendered frame (input, hover, rotation,
cursor) and [`GrabController::fixed_update`] once per fixed physics step (positioning and
scaling). Neither blocks or spawns threads.
*/

pub mod clearance;
pub mod constraints;
pub mod cursor;
pub mod motion;
pub mod ray;
pub mod scale;
pub mod session;
pub mod target;

use crate::{
    category::ReservedCategories,
    error::{GrabError, GrabResult},
    input::GrabInput,
    presentation::{Presentation, ViewpointSource},
    scene::{GrabScene, QueryMask},
    settings::{GrabSettings, ReleasePolicy},
    types::{BodyFlags, ObjectId, Quat, Ray, RayHit, Vec3, Viewpoint},
};

use clearance::{ClearanceProbe, bounding_radius, probe_radius};
use constraints::{ConstraintPipeline, PipelineTrace};
use cursor::{CursorIcon, CursorState, cursor_icon};
use motion::{IntegrateParams, integrate};
use ray::build_ray;
use scale::{adjusted_scale, scale_factor};
use session::GrabSession;
use target::resolve_target;

/// Lifecycle transitions reported to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrabEvent {
    Grabbed(ObjectId),
    Released(ObjectId),
    /// The held object vanished from the scene; the session was dropped.
    Lost(ObjectId),
}

/// Diagnostics from the most recent physics tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    pub object: ObjectId,
    pub ray: Ray,
    pub trace: PipelineTrace,
    /// Position after integration.
    pub position: Vec3,
    pub probe_radius: f32,
    pub scale_factor: f32,
}

/// First-person grab controller.
///
/// Owns its viewpoint and presentation collaborators and at most one [`GrabSession`].
/// The scene is borrowed per call.
pub struct GrabController<V, P> {
    settings: GrabSettings,
    reserved: ReservedCategories,
    viewpoint: V,
    presentation: P,
    session: Option<GrabSession>,
    hover: Option<RayHit>,
    shown_icon: Option<CursorIcon>,
    enabled: bool,
    last_report: Option<TickReport>,
}

impl<V: ViewpointSource, P: Presentation> GrabController<V, P> {
    /// Build a controller.
    ///
    /// Invalid settings or a missing viewpoint do not fail construction: the error is logged
    /// once and the controller stays disabled, turning every tick into a no-op.
    pub fn new(
        settings: GrabSettings,
        reserved: ReservedCategories,
        viewpoint: V,
        presentation: P,
    ) -> Self {
        let check = Self::check(&settings, &viewpoint);
        if let Err(err) = &check {
            log::error!("grab controller disabled: {err}");
        }

        let mut controller = Self {
            settings,
            reserved,
            viewpoint,
            presentation,
            session: None,
            hover: None,
            shown_icon: None,
            enabled: check.is_ok(),
            last_report: None,
        };
        if controller.enabled {
            controller.refresh_cursor();
        }
        controller
    }

    /// Like [`GrabController::new`], but refuses to build a disabled controller.
    pub fn try_new(
        settings: GrabSettings,
        reserved: ReservedCategories,
        viewpoint: V,
        presentation: P,
    ) -> GrabResult<Self> {
        Self::check(&settings, &viewpoint)?;
        Ok(Self::new(settings, reserved, viewpoint, presentation))
    }

    fn check(settings: &GrabSettings, viewpoint: &V) -> GrabResult<()> {
        settings.validate()?;
        if viewpoint.viewpoint().is_none() {
            return Err(GrabError::MissingViewpoint);
        }
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn settings(&self) -> &GrabSettings {
        &self.settings
    }

    pub fn session(&self) -> Option<&GrabSession> {
        self.session.as_ref()
    }

    pub fn held_object(&self) -> Option<ObjectId> {
        self.session.as_ref().map(|s| s.object)
    }

    /// Object under the ray as of the last frame pass, while not holding.
    pub fn hovered_object(&self) -> Option<ObjectId> {
        self.hover.map(|h| h.object)
    }

    pub fn state(&self) -> CursorState {
        if self.session.is_some() {
            CursorState::Holding
        } else if self.hover.is_some() {
            CursorState::Hovering
        } else {
            CursorState::Idle
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        cursor_icon(self.state())
    }

    pub fn tick_report(&self) -> Option<&TickReport> {
        self.last_report.as_ref()
    }

    pub fn viewpoint(&self) -> &V {
        &self.viewpoint
    }

    pub fn viewpoint_mut(&mut self) -> &mut V {
        &mut self.viewpoint
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    /// Mask for ray and clearance queries made on behalf of the held object.
    fn query_mask(&self, held: Option<ObjectId>) -> QueryMask {
        let mask = QueryMask::new(self.reserved.query_mask());
        match held {
            Some(object) => mask.excluding(object),
            None => mask,
        }
    }

    /// Frame pass: hover detection, grab/release transitions, rotation and cursor feedback.
    pub fn update<S: GrabScene + ?Sized>(
        &mut self,
        scene: &mut S,
        input: &GrabInput,
        dt_seconds: f32,
    ) -> Option<GrabEvent> {
        if !self.enabled {
            return None;
        }

        // Release and rotation work without a viewpoint; only hover needs the ray.
        let event = if self.session.is_some() {
            if input.primary_released {
                self.release(scene).map(GrabEvent::Released)
            } else if input.secondary_held {
                self.rotate(scene, dt_seconds)
            } else {
                None
            }
        } else {
            let viewpoint = self.viewpoint.viewpoint()?;
            let hover = self.probe_hover(&*scene, &build_ray(&viewpoint));
            self.hover = hover;
            match hover {
                Some(hit) if input.primary_pressed => self.grab(scene, hit, &viewpoint),
                _ => None,
            }
        };

        self.refresh_cursor();
        event
    }

    /// Physics pass: resolve, constrain, integrate and rescale the held object.
    pub fn fixed_update<S: GrabScene + ?Sized>(
        &mut self,
        scene: &mut S,
        dt_seconds: f32,
    ) -> Option<GrabEvent> {
        if !self.enabled {
            return None;
        }
        let session = self.session?;
        let viewpoint = self.viewpoint.viewpoint()?;
        let object = session.object;

        let (Some(half_extents), Some(current)) =
            (scene.half_extents(object), scene.translation(object))
        else {
            return self.lose(scene);
        };

        let ray = build_ray(&viewpoint);
        let mask = self.query_mask(Some(object));
        let probe = ClearanceProbe::new(
            probe_radius(half_extents, self.settings.probe_radius_multiplier),
            mask,
        );

        let raw = resolve_target(
            &*scene,
            &ray,
            self.settings.max_reach,
            mask,
            bounding_radius(half_extents),
        );
        let trace = ConstraintPipeline {
            scene: &*scene,
            probe,
            ray,
            max_reach: self.settings.max_reach,
            push_step: self.settings.push_step,
        }
        .run(raw, session.previous_position);

        let moved = integrate(IntegrateParams {
            current,
            target: trace.target,
            lerp_speed: self.settings.lerp_speed,
            dt_seconds,
        });
        scene.set_translation(object, moved.position);

        let factor = self.adjust_size(scene, &session, &viewpoint, moved.position);

        if let Some(s) = self.session.as_mut() {
            s.previous_position = moved.position;
        }

        if self.settings.debug_draw {
            self.presentation
                .draw_debug_sphere(moved.position, probe.radius);
        }

        self.last_report = Some(TickReport {
            object,
            ray,
            trace,
            position: moved.position,
            probe_radius: probe.radius,
            scale_factor: factor,
        });
        None
    }

    /// Release the held object outside the input flow (scene reset, object despawn, ...).
    pub fn force_release<S: GrabScene + ?Sized>(&mut self, scene: &mut S) -> Option<GrabEvent> {
        let event = self.release(scene).map(GrabEvent::Released);
        self.refresh_cursor();
        event
    }

    /// The shared "too close" test, evaluated for the held object at `candidate`.
    ///
    /// Returns false when nothing is held.
    pub fn is_too_close<S: GrabScene + ?Sized>(&self, scene: &S, candidate: Vec3) -> bool {
        let Some(object) = self.held_object() else {
            return false;
        };
        let Some(half_extents) = scene.half_extents(object) else {
            return false;
        };
        ClearanceProbe::new(
            probe_radius(half_extents, self.settings.probe_radius_multiplier),
            self.query_mask(Some(object)),
        )
        .is_too_close(scene, candidate)
    }

    fn probe_hover<S: GrabScene + ?Sized>(&self, scene: &S, ray: &Ray) -> Option<RayHit> {
        scene
            .raycast(ray, self.settings.max_reach, self.query_mask(None))
            .filter(|hit| scene.is_getable(hit.object))
    }

    fn grab<S: GrabScene + ?Sized>(
        &mut self,
        scene: &mut S,
        hit: RayHit,
        viewpoint: &Viewpoint,
    ) -> Option<GrabEvent> {
        let object = hit.object;
        let (Some(category), Some(translation), Some(scale)) = (
            scene.category(object),
            scene.translation(object),
            scene.scale(object),
        ) else {
            log::warn!("cannot grab {object:?}: object is not in the scene");
            return None;
        };

        let closest = scene
            .closest_point(object, viewpoint.position)
            .unwrap_or(translation);
        let initial_distance = (closest - viewpoint.position).norm();
        let original_flags = scene.body_flags(object);

        let session = GrabSession::begin(
            object,
            category,
            original_flags,
            hit.point,
            translation,
            initial_distance,
            scale,
        );

        scene.set_category(object, self.reserved.grabbed);
        if original_flags.is_none() || !scene.set_body_flags(object, BodyFlags::HELD) {
            log::warn!("{object:?} has no physical body; holding it without body flags");
        }

        log::info!("grabbed {object:?} at {initial_distance:.2}m");
        self.session = Some(session);
        self.hover = None;
        Some(GrabEvent::Grabbed(object))
    }

    fn release<S: GrabScene + ?Sized>(&mut self, scene: &mut S) -> Option<ObjectId> {
        let session = self.session.take()?;
        let object = session.object;

        scene.set_category(object, session.original_category);
        if let Some(previous) = session.original_flags {
            let flags = match self.settings.release_policy {
                ReleasePolicy::ForceDynamic => BodyFlags::DYNAMIC,
                ReleasePolicy::RestorePrevious => previous,
            };
            scene.set_body_flags(object, flags);
        }

        log::info!("released {object:?}");
        Some(object)
    }

    /// Drop the session for an object the scene no longer knows.
    fn lose<S: GrabScene + ?Sized>(&mut self, scene: &mut S) -> Option<GrabEvent> {
        let object = self.release(scene)?;
        log::warn!("{object:?} left the scene while held");
        self.refresh_cursor();
        Some(GrabEvent::Lost(object))
    }

    fn rotate<S: GrabScene + ?Sized>(&mut self, scene: &mut S, dt_seconds: f32) -> Option<GrabEvent> {
        let object = self.held_object()?;
        let Some(rotation) = scene.rotation(object) else {
            return self.lose(scene);
        };

        let angle = self.settings.rotation_speed_deg.to_radians() * dt_seconds.max(0.0);
        let spin = Quat::from_axis_angle(&Vec3::y_axis(), angle);
        scene.set_rotation(object, spin * rotation);
        None
    }

    fn adjust_size<S: GrabScene + ?Sized>(
        &self,
        scene: &mut S,
        session: &GrabSession,
        viewpoint: &Viewpoint,
        position: Vec3,
    ) -> f32 {
        let closest = scene
            .closest_point(session.object, viewpoint.position)
            .unwrap_or(position);
        let distance = (closest - viewpoint.position).norm();
        let factor = scale_factor(
            distance,
            session.initial_distance,
            self.settings.min_scale_factor,
            self.settings.max_scale_factor,
        );
        scene.set_scale(session.object, adjusted_scale(session.initial_scale, factor));
        factor
    }

    /// Push the icon for the current state, only when it changed.
    fn refresh_cursor(&mut self) {
        let icon = self.cursor_icon();
        if self.shown_icon != Some(icon) {
            self.presentation.set_cursor(icon);
            self.shown_icon = Some(icon);
        }
    }
}
