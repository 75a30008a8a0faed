use std::{cell::Cell, rc::Rc};

use grab::{
    BodyFlags, CategoryRegistry, CursorIcon, CursorState, GrabController, GrabEvent, GrabInput,
    GrabScene, GrabSettings, ObjectDef, ObjectId, Presentation, RapierScene, ShapeDef, Vec3,
    Viewpoint,
};

const DT: f32 = 1.0 / 60.0;

#[derive(Default)]
struct CursorLog(Vec<CursorIcon>);

impl Presentation for CursorLog {
    fn set_cursor(&mut self, icon: CursorIcon) {
        self.0.push(icon);
    }
}

type Camera = Rc<Cell<Viewpoint>>;

struct Fixture {
    scene: RapierScene,
    camera: Camera,
    crate_box: ObjectId,
    controller: GrabController<Camera, CursorLog>,
}

/// A 1m crate 5m in front of the camera, a wall 8m out and a ground plane below.
fn fixture(settings: GrabSettings) -> Fixture {
    let mut scene = RapierScene::new(CategoryRegistry::default()).unwrap();
    let crate_box = scene.insert(ObjectDef::prop(
        Vec3::new(0.0, 0.0, -5.0),
        ShapeDef::Cuboid {
            half_extents: Vec3::new(0.5, 0.5, 0.5),
        },
    ));
    scene.insert(ObjectDef::fixed(
        Vec3::new(0.0, 0.0, -8.5),
        ShapeDef::Cuboid {
            half_extents: Vec3::new(5.0, 5.0, 0.5),
        },
    ));
    scene.insert(ObjectDef::fixed(
        Vec3::new(0.0, -2.0, 0.0),
        ShapeDef::Plane {
            offset_along_normal: 0.0,
        },
    ));

    let camera = Rc::new(Cell::new(Viewpoint::new(
        Vec3::zeros(),
        Vec3::new(0.0, 0.0, -1.0),
    )));
    let controller = GrabController::new(
        settings,
        scene.reserved(),
        camera.clone(),
        CursorLog::default(),
    );

    Fixture {
        scene,
        camera,
        crate_box,
        controller,
    }
}

fn settle(f: &mut Fixture, ticks: usize) {
    for _ in 0..ticks {
        f.controller.update(&mut f.scene, &GrabInput::hold(), DT);
        f.controller.fixed_update(&mut f.scene, DT);
    }
}

#[test]
fn grab_at_five_meters_keeps_scale_and_reserves_category() {
    let mut f = fixture(GrabSettings::default());
    let original = f.scene.category(f.crate_box).unwrap();

    f.controller.update(&mut f.scene, &GrabInput::NONE, DT);
    assert_eq!(f.controller.state(), CursorState::Hovering);

    let event = f.controller.update(&mut f.scene, &GrabInput::press(), DT);
    assert_eq!(event, Some(GrabEvent::Grabbed(f.crate_box)));
    assert_eq!(
        f.scene.category(f.crate_box),
        Some(f.scene.reserved().grabbed)
    );
    assert_ne!(f.scene.category(f.crate_box), Some(original));
    assert_eq!(f.scene.body_flags(f.crate_box), Some(BodyFlags::HELD));
    assert_eq!(f.scene.scale(f.crate_box), Some(Vec3::new(1.0, 1.0, 1.0)));

    let session = f.controller.session().unwrap();
    assert!((session.initial_distance - 4.5).abs() < 1.0e-3);
}

#[test]
fn held_crate_never_clips_into_the_wall() {
    let mut f = fixture(GrabSettings::default());
    f.controller.update(&mut f.scene, &GrabInput::press(), DT);
    settle(&mut f, 300);

    // The wall's near face is at z = -8.
    let pos = f.scene.translation(f.crate_box).unwrap();
    let half = f.scene.half_extents(f.crate_box).unwrap();
    assert!(pos.z - half.z > -8.0, "crate at {pos:?} overlaps the wall");

    // Just behind the wall surface is always too close.
    assert!(f.controller.is_too_close(&f.scene, Vec3::new(0.0, 0.0, -8.2)));
}

#[test]
fn held_crate_tracks_the_camera_within_reach() {
    let mut f = fixture(GrabSettings::default());
    f.controller.update(&mut f.scene, &GrabInput::press(), DT);

    // Turn to face open space.
    f.camera
        .set(Viewpoint::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0)));
    settle(&mut f, 600);

    let pos = f.scene.translation(f.crate_box).unwrap();
    assert!(pos.norm() <= f.controller.settings().max_reach + 1.0e-3);
    assert!(pos.x > 5.0);
    assert!(pos.z.abs() < 0.5);

    let report = f.controller.tick_report().unwrap();
    let settings = f.controller.settings();
    assert!(report.scale_factor >= settings.min_scale_factor);
    assert!(report.scale_factor <= settings.max_scale_factor);
}

#[test]
fn release_while_rotating_restores_the_crate() {
    let mut f = fixture(GrabSettings::default());
    f.controller.update(&mut f.scene, &GrabInput::NONE, DT);
    f.controller.update(&mut f.scene, &GrabInput::press(), DT);

    for _ in 0..30 {
        f.controller
            .update(&mut f.scene, &GrabInput::hold().with_secondary(), DT);
        f.controller.fixed_update(&mut f.scene, DT);
    }
    let spun = f.scene.rotation(f.crate_box).unwrap();
    assert!(spun.angle() > 0.0);

    let event = f
        .controller
        .update(&mut f.scene, &GrabInput::release().with_secondary(), DT);
    assert_eq!(event, Some(GrabEvent::Released(f.crate_box)));

    f.controller
        .update(&mut f.scene, &GrabInput::NONE.with_secondary(), DT);
    assert_eq!(f.scene.rotation(f.crate_box), Some(spun));
    assert_eq!(
        f.scene.category(f.crate_box),
        Some(f.scene.default_category())
    );
    assert_eq!(f.scene.body_flags(f.crate_box), Some(BodyFlags::DYNAMIC));
    assert_ne!(f.controller.state(), CursorState::Holding);
}

#[test]
fn despawned_crate_is_reported_lost() {
    let mut f = fixture(GrabSettings::default());
    f.controller.update(&mut f.scene, &GrabInput::press(), DT);
    settle(&mut f, 5);

    assert!(f.scene.remove(f.crate_box));
    assert_eq!(
        f.controller.fixed_update(&mut f.scene, DT),
        Some(GrabEvent::Lost(f.crate_box))
    );
    assert!(f.controller.held_object().is_none());
    assert_eq!(f.controller.presentation().0.last(), Some(&CursorIcon::Grab));
}
