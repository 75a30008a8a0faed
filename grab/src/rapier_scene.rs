//! Rapier-backed scene for hosts that keep their collision geometry in a `ColliderSet`.
//!
//! Each object is one collider plus a little metadata the grab controller needs (category,
//! getable tag, body flags, scale). The body flags are bookkeeping for the host's own
//! simulation step; this scene never integrates bodies.
//!
//! Conventions
//! - Units are meters.
//! - Shapes are described at unit scale by [`ShapeDef`] and rebuilt when the scale changes.
//! - Collider `user_data` carries the owning [`ObjectId`], so hosts running their own Rapier
//!   queries can map hits back with [`RapierScene::object_of`].
//! - Queries scan every collider; scenes handled by a grab are small.

// Re-export Rapier so hosts can build colliders and handles without depending on it directly.
pub use rapier3d;

use std::collections::BTreeMap;

use rapier3d::{
    na::{Isometry3, Point3, Translation3},
    parry::query::{PointQuery, Ray as ParryRay, RayCast},
    prelude::{
        Collider, ColliderBuilder, ColliderHandle, ColliderSet, IslandManager, RigidBodySet,
        SharedShape,
    },
};

use crate::{
    category::{CategoryId, CategoryRegistry, DEFAULT_CATEGORY, ReservedCategories},
    error::GrabResult,
    scene::{CollisionQuery, GrabScene, QueryMask},
    types::{BodyFlags, ObjectId, Quat, Ray, RayHit, Vec3},
};

/// Supported collider shapes, at unit scale.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeDef {
    /// Infinite plane (half-space) whose normal is `rotation * +Y`.
    ///
    /// Scaling has no effect on a plane.
    Plane {
        /// Offset along the plane normal (meters).
        offset_along_normal: f32,
    },

    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vec3 },

    /// Sphere/ball (meters). Scales by the largest scale component.
    Sphere { radius: f32 },

    /// Y-aligned capsule (meters).
    CapsuleY { radius: f32, half_height: f32 },

    /// Y-aligned cylinder (meters).
    CylinderY { radius: f32, half_height: f32 },

    /// Rounded cuboid (meters). `border_radius` is not scaled.
    RoundCuboid {
        half_extents: Vec3,
        border_radius: f32,
    },
}

impl ShapeDef {
    /// Build the Rapier shape for this definition under `scale`.
    ///
    /// Round shapes keep their radial extent from the larger of the X/Z scale components.
    pub fn scaled(&self, scale: Vec3) -> SharedShape {
        let s = scale.abs();
        let radial = s.x.max(s.z);
        match self {
            ShapeDef::Plane { .. } => SharedShape::halfspace(Vec3::y_axis()),
            ShapeDef::Cuboid { half_extents } => {
                let he = half_extents.component_mul(&s);
                SharedShape::cuboid(he.x, he.y, he.z)
            }
            ShapeDef::Sphere { radius } => SharedShape::ball(radius * s.max()),
            ShapeDef::CapsuleY {
                radius,
                half_height,
            } => SharedShape::capsule_y(half_height * s.y, radius * radial),
            ShapeDef::CylinderY {
                radius,
                half_height,
            } => SharedShape::cylinder(half_height * s.y, radius * radial),
            ShapeDef::RoundCuboid {
                half_extents,
                border_radius,
            } => {
                let he = half_extents.component_mul(&s);
                SharedShape::round_cuboid(he.x, he.y, he.z, *border_radius)
            }
        }
    }

    /// Offset of the collider from the object's translation, in world space.
    fn pose_offset(&self, rotation: &Quat) -> Vec3 {
        match self {
            ShapeDef::Plane {
                offset_along_normal,
            } => rotation * Vec3::y() * *offset_along_normal,
            _ => Vec3::zeros(),
        }
    }
}

/// Everything needed to add one object to a [`RapierScene`].
#[derive(Clone, Debug)]
pub struct ObjectDef {
    /// World-space translation.
    pub translation: Vec3,
    /// World-space rotation (unit quaternion).
    pub rotation: Quat,
    pub shape: ShapeDef,
    /// `None` puts the object in the default category.
    pub category: Option<CategoryId>,
    pub getable: bool,
    /// `None` for objects without a physical body.
    pub body: Option<BodyFlags>,
}

impl ObjectDef {
    /// A getable object with a dynamic body.
    pub fn prop(translation: Vec3, shape: ShapeDef) -> Self {
        Self {
            translation,
            rotation: Quat::identity(),
            shape,
            category: None,
            getable: true,
            body: Some(BodyFlags::DYNAMIC),
        }
    }

    /// Immovable, non-getable geometry.
    pub fn fixed(translation: Vec3, shape: ShapeDef) -> Self {
        Self {
            translation,
            rotation: Quat::identity(),
            shape,
            category: None,
            getable: false,
            body: None,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }
}

/// Per-object metadata stored next to the collider.
#[derive(Clone, Debug)]
struct Entry {
    handle: ColliderHandle,
    shape: ShapeDef,
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,
    category: CategoryId,
    getable: bool,
    body: Option<BodyFlags>,
}

impl Entry {
    fn isometry(&self) -> Isometry3<f32> {
        pose(&self.shape, self.translation, self.rotation)
    }
}

fn pose(shape: &ShapeDef, translation: Vec3, rotation: Quat) -> Isometry3<f32> {
    let t = translation + shape.pose_offset(&rotation);
    Isometry3::from_parts(Translation3::from(t), rotation)
}

/// [`GrabScene`] over a Rapier `ColliderSet`.
pub struct RapierScene {
    registry: CategoryRegistry,
    reserved: ReservedCategories,
    default_category: CategoryId,
    bodies: RigidBodySet,
    islands: IslandManager,
    colliders: ColliderSet,
    objects: BTreeMap<ObjectId, Entry>,
    next_id: u64,
}

impl RapierScene {
    /// Empty scene using `registry` for category names.
    ///
    /// Fails if the registry lacks the default or reserved categories.
    pub fn new(registry: CategoryRegistry) -> GrabResult<Self> {
        let reserved = ReservedCategories::resolve(&registry)?;
        let default_category = registry.resolve(DEFAULT_CATEGORY)?;
        Ok(Self {
            registry,
            reserved,
            default_category,
            bodies: RigidBodySet::new(),
            islands: IslandManager::new(),
            colliders: ColliderSet::new(),
            objects: BTreeMap::new(),
            next_id: 1,
        })
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn reserved(&self) -> ReservedCategories {
        self.reserved
    }

    pub fn default_category(&self) -> CategoryId {
        self.default_category
    }

    pub fn colliders(&self) -> &ColliderSet {
        &self.colliders
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, object: ObjectId) -> bool {
        self.objects.contains_key(&object)
    }

    /// Add an object and return its id. Ids are never reused.
    pub fn insert(&mut self, def: ObjectDef) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;

        let scale = Vec3::new(1.0, 1.0, 1.0);
        let mut collider = ColliderBuilder::new(def.shape.scaled(scale))
            .user_data(u128::from(id.0))
            .build();
        collider.set_position(pose(&def.shape, def.translation, def.rotation));

        let entry = Entry {
            handle: self.colliders.insert(collider),
            shape: def.shape,
            translation: def.translation,
            rotation: def.rotation,
            scale,
            category: def.category.unwrap_or(self.default_category),
            getable: def.getable,
            body: def.body,
        };
        self.objects.insert(id, entry);
        id
    }

    /// Remove an object. Returns false if it was not in the scene.
    pub fn remove(&mut self, object: ObjectId) -> bool {
        let Some(entry) = self.objects.remove(&object) else {
            return false;
        };
        self.colliders
            .remove(entry.handle, &mut self.islands, &mut self.bodies, false);
        true
    }

    /// Object owning a collider, via the collider's `user_data`.
    pub fn object_of(&self, handle: ColliderHandle) -> Option<ObjectId> {
        let id = ObjectId(u64::try_from(self.colliders.get(handle)?.user_data).ok()?);
        self.objects.contains_key(&id).then_some(id)
    }

    /// Colliders whose object passes `mask`.
    fn candidates(&self, mask: QueryMask) -> impl Iterator<Item = (ObjectId, &Collider)> + '_ {
        self.objects
            .iter()
            .filter(move |(id, e)| mask.accepts(**id, e.category))
            .filter_map(move |(id, e)| self.colliders.get(e.handle).map(|c| (*id, c)))
    }

    fn collider(&self, object: ObjectId) -> Option<&Collider> {
        self.colliders.get(self.objects.get(&object)?.handle)
    }

    /// Push an entry's pose and shape back into its collider.
    fn sync(&mut self, object: ObjectId, reshape: bool) {
        let Some(entry) = self.objects.get(&object) else {
            return;
        };
        let Some(collider) = self.colliders.get_mut(entry.handle) else {
            return;
        };
        collider.set_position(entry.isometry());
        if reshape {
            collider.set_shape(entry.shape.scaled(entry.scale));
        }
    }
}

impl CollisionQuery for RapierScene {
    fn raycast(&self, ray: &Ray, max_distance: f32, mask: QueryMask) -> Option<RayHit> {
        let parry_ray = ParryRay::new(Point3::from(ray.origin), ray.direction);
        self.candidates(mask)
            .filter_map(|(id, collider)| {
                collider
                    .shape()
                    .cast_ray_and_get_normal(collider.position(), &parry_ray, max_distance, true)
                    .map(|hit| RayHit {
                        object: id,
                        point: ray.at(hit.time_of_impact),
                        normal: hit.normal,
                        distance: hit.time_of_impact,
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: QueryMask) -> Vec<ObjectId> {
        let point = Point3::from(center);
        self.candidates(mask)
            .filter(|(_, collider)| {
                collider
                    .shape()
                    .distance_to_point(collider.position(), &point, true)
                    <= radius
            })
            .map(|(id, _)| id)
            .collect()
    }

    fn closest_point(&self, object: ObjectId, point: Vec3) -> Option<Vec3> {
        let collider = self.collider(object)?;
        let projected = collider
            .shape()
            .project_point(collider.position(), &Point3::from(point), true);
        Some(projected.point.coords)
    }
}

impl GrabScene for RapierScene {
    fn is_getable(&self, object: ObjectId) -> bool {
        self.objects.get(&object).is_some_and(|e| e.getable)
    }

    fn category(&self, object: ObjectId) -> Option<CategoryId> {
        self.objects.get(&object).map(|e| e.category)
    }

    fn set_category(&mut self, object: ObjectId, category: CategoryId) {
        if let Some(e) = self.objects.get_mut(&object) {
            e.category = category;
        }
    }

    fn body_flags(&self, object: ObjectId) -> Option<BodyFlags> {
        self.objects.get(&object).and_then(|e| e.body)
    }

    fn set_body_flags(&mut self, object: ObjectId, flags: BodyFlags) -> bool {
        match self.objects.get_mut(&object).and_then(|e| e.body.as_mut()) {
            Some(body) => {
                *body = flags;
                true
            }
            None => false,
        }
    }

    fn translation(&self, object: ObjectId) -> Option<Vec3> {
        self.objects.get(&object).map(|e| e.translation)
    }

    fn set_translation(&mut self, object: ObjectId, translation: Vec3) {
        if let Some(e) = self.objects.get_mut(&object) {
            e.translation = translation;
            self.sync(object, false);
        }
    }

    fn rotation(&self, object: ObjectId) -> Option<Quat> {
        self.objects.get(&object).map(|e| e.rotation)
    }

    fn set_rotation(&mut self, object: ObjectId, rotation: Quat) {
        if let Some(e) = self.objects.get_mut(&object) {
            e.rotation = rotation;
            self.sync(object, false);
        }
    }

    fn scale(&self, object: ObjectId) -> Option<Vec3> {
        self.objects.get(&object).map(|e| e.scale)
    }

    fn set_scale(&mut self, object: ObjectId, scale: Vec3) {
        if let Some(e) = self.objects.get_mut(&object) {
            if e.scale == scale {
                return;
            }
            e.scale = scale;
            self.sync(object, true);
        }
    }

    fn half_extents(&self, object: ObjectId) -> Option<Vec3> {
        Some(self.collider(object)?.compute_aabb().half_extents())
    }
}
