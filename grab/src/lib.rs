pub mod category;
pub mod controller;
pub mod error;
pub mod input;
pub mod presentation;
pub mod rapier_scene;
pub mod scene;
pub mod settings;
pub mod types;

pub use category::{
    CategoryId, CategoryMask, CategoryRegistry, DEFAULT_CATEGORY, GRABBED_CATEGORY,
    ReservedCategories, VIEWPOINT_CATEGORY,
};
pub use controller::{
    GrabController, GrabEvent, TickReport,
    cursor::{CursorIcon, CursorState},
    session::GrabSession,
};
pub use error::{GrabError, GrabResult};
pub use input::GrabInput;
pub use presentation::{Presentation, ViewpointSource};
pub use rapier_scene::{ObjectDef, RapierScene, ShapeDef};
pub use scene::{CollisionQuery, GrabScene, QueryMask};
pub use settings::{GrabSettings, ReleasePolicy};
pub use types::{BodyFlags, ObjectId, Quat, Ray, RayHit, Vec3, Viewpoint};
