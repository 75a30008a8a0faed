//! Collaborator traits for the scene the controller manipulates.
//!
//! The controller does not own geometry or objects. It talks to the host engine through:
//! - [`CollisionQuery`]: synchronous ray, sphere-overlap and closest-point queries.
//! - [`GrabScene`]: the handful of per-object properties a grab reads and writes.
//!
//! Every query is best-effort: `None` or an empty result means "nothing this tick", and the
//! controller corrects itself on the next tick.

use crate::{
    category::{CategoryId, CategoryMask},
    types::{BodyFlags, ObjectId, Quat, Ray, RayHit, Vec3},
};

/// Which objects a query may report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueryMask {
    /// Only objects whose category is in this set are reported.
    pub categories: CategoryMask,
    /// A single object to skip regardless of category (the held object's own volume).
    pub exclude: Option<ObjectId>,
}

impl QueryMask {
    #[inline]
    pub fn new(categories: CategoryMask) -> Self {
        Self {
            categories,
            exclude: None,
        }
    }

    #[inline]
    pub fn excluding(mut self, object: ObjectId) -> Self {
        self.exclude = Some(object);
        self
    }

    /// Does an object of `category` pass this mask?
    #[inline]
    pub fn accepts(&self, object: ObjectId, category: CategoryId) -> bool {
        self.exclude != Some(object) && self.categories.contains(category)
    }
}

/// Black-box collision query service.
pub trait CollisionQuery {
    /// Nearest hit along `ray` within `max_distance`.
    fn raycast(&self, ray: &Ray, max_distance: f32, mask: QueryMask) -> Option<RayHit>;

    /// Every object whose collision volume overlaps the sphere.
    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: QueryMask) -> Vec<ObjectId>;

    /// Closest point on `object`'s collision volume to `point`.
    fn closest_point(&self, object: ObjectId, point: Vec3) -> Option<Vec3>;
}

/// Object access needed to hold, move, rotate and rescale a grabbed object.
///
/// Getters return `None` for objects the scene no longer knows about.
pub trait GrabScene: CollisionQuery {
    /// Is the object tagged as something the player may pick up?
    fn is_getable(&self, object: ObjectId) -> bool;

    fn category(&self, object: ObjectId) -> Option<CategoryId>;
    fn set_category(&mut self, object: ObjectId, category: CategoryId);

    /// `None` when the object has no physical body.
    fn body_flags(&self, object: ObjectId) -> Option<BodyFlags>;
    /// Returns false when the object has no physical body.
    fn set_body_flags(&mut self, object: ObjectId, flags: BodyFlags) -> bool;

    fn translation(&self, object: ObjectId) -> Option<Vec3>;
    fn set_translation(&mut self, object: ObjectId, translation: Vec3);

    fn rotation(&self, object: ObjectId) -> Option<Quat>;
    fn set_rotation(&mut self, object: ObjectId, rotation: Quat);

    fn scale(&self, object: ObjectId) -> Option<Vec3>;
    fn set_scale(&mut self, object: ObjectId, scale: Vec3);

    /// World-space half extents of the object's bounding box.
    fn half_extents(&self, object: ObjectId) -> Option<Vec3>;
}

/// Analytic axis-aligned box scene used by the unit tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::collections::BTreeMap;

    use super::*;
    use crate::category::{CategoryRegistry, DEFAULT_CATEGORY, ReservedCategories};

    #[derive(Clone, Debug)]
    pub struct BoxObject {
        pub center: Vec3,
        /// Half extents at unit scale.
        pub base_half_extents: Vec3,
        pub scale: Vec3,
        pub rotation: Quat,
        pub category: CategoryId,
        pub getable: bool,
        pub body: Option<BodyFlags>,
    }

    impl BoxObject {
        pub fn half_extents(&self) -> Vec3 {
            self.base_half_extents.component_mul(&self.scale).abs()
        }

        fn closest_point(&self, p: Vec3) -> Vec3 {
            let he = self.half_extents();
            let lo = self.center - he;
            let hi = self.center + he;
            Vec3::new(
                p.x.clamp(lo.x, hi.x),
                p.y.clamp(lo.y, hi.y),
                p.z.clamp(lo.z, hi.z),
            )
        }

        /// Slab test. Rays starting inside the box do not hit it.
        fn cast(&self, ray: &Ray, max_distance: f32) -> Option<(f32, Vec3)> {
            let he = self.half_extents();
            let lo = self.center - he;
            let hi = self.center + he;
            let mut t_min = f32::NEG_INFINITY;
            let mut t_max = f32::INFINITY;
            let mut normal = Vec3::zeros();

            for axis in 0..3 {
                let o = ray.origin[axis];
                let d = ray.direction[axis];
                if d.abs() < 1.0e-9 {
                    if o < lo[axis] || o > hi[axis] {
                        return None;
                    }
                    continue;
                }
                let (mut t0, mut t1) = ((lo[axis] - o) / d, (hi[axis] - o) / d);
                let mut n = Vec3::zeros();
                n[axis] = -d.signum();
                if t0 > t1 {
                    std::mem::swap(&mut t0, &mut t1);
                }
                if t0 > t_min {
                    t_min = t0;
                    normal = n;
                }
                t_max = t_max.min(t1);
            }

            if t_min > t_max || t_min < 0.0 || t_min > max_distance {
                return None;
            }
            Some((t_min, normal))
        }
    }

    /// A tiny scene of axis-aligned boxes. Rotation is stored but does not affect geometry.
    pub struct BoxScene {
        pub registry: CategoryRegistry,
        pub reserved: ReservedCategories,
        pub default: CategoryId,
        pub objects: BTreeMap<ObjectId, BoxObject>,
        next_id: u64,
    }

    impl BoxScene {
        pub fn new() -> Self {
            let registry = CategoryRegistry::default();
            let reserved = ReservedCategories::resolve(&registry).unwrap();
            let default = registry.resolve(DEFAULT_CATEGORY).unwrap();
            Self {
                registry,
                reserved,
                default,
                objects: BTreeMap::new(),
                next_id: 1,
            }
        }

        fn insert(&mut self, object: BoxObject) -> ObjectId {
            let id = ObjectId(self.next_id);
            self.next_id += 1;
            self.objects.insert(id, object);
            id
        }

        /// A getable dynamic box.
        pub fn add_prop(&mut self, center: Vec3, half_extents: Vec3) -> ObjectId {
            let category = self.default;
            self.insert(BoxObject {
                center,
                base_half_extents: half_extents,
                scale: Vec3::new(1.0, 1.0, 1.0),
                rotation: Quat::identity(),
                category,
                getable: true,
                body: Some(BodyFlags::DYNAMIC),
            })
        }

        /// Static, non-getable geometry.
        pub fn add_wall(&mut self, center: Vec3, half_extents: Vec3) -> ObjectId {
            let category = self.default;
            self.insert(BoxObject {
                center,
                base_half_extents: half_extents,
                scale: Vec3::new(1.0, 1.0, 1.0),
                rotation: Quat::identity(),
                category,
                getable: false,
                body: None,
            })
        }

        pub fn get(&self, id: ObjectId) -> &BoxObject {
            &self.objects[&id]
        }

        pub fn get_mut(&mut self, id: ObjectId) -> &mut BoxObject {
            self.objects.get_mut(&id).unwrap()
        }
    }

    impl CollisionQuery for BoxScene {
        fn raycast(&self, ray: &Ray, max_distance: f32, mask: QueryMask) -> Option<RayHit> {
            self.objects
                .iter()
                .filter(|(id, o)| mask.accepts(**id, o.category))
                .filter_map(|(id, o)| {
                    o.cast(ray, max_distance).map(|(t, normal)| RayHit {
                        object: *id,
                        point: ray.at(t),
                        normal,
                        distance: t,
                    })
                })
                .min_by(|a, b| a.distance.total_cmp(&b.distance))
        }

        fn overlap_sphere(&self, center: Vec3, radius: f32, mask: QueryMask) -> Vec<ObjectId> {
            self.objects
                .iter()
                .filter(|(id, o)| mask.accepts(**id, o.category))
                .filter(|(_, o)| (o.closest_point(center) - center).norm() <= radius)
                .map(|(id, _)| *id)
                .collect()
        }

        fn closest_point(&self, object: ObjectId, point: Vec3) -> Option<Vec3> {
            self.objects.get(&object).map(|o| o.closest_point(point))
        }
    }

    impl GrabScene for BoxScene {
        fn is_getable(&self, object: ObjectId) -> bool {
            self.objects.get(&object).is_some_and(|o| o.getable)
        }

        fn category(&self, object: ObjectId) -> Option<CategoryId> {
            self.objects.get(&object).map(|o| o.category)
        }

        fn set_category(&mut self, object: ObjectId, category: CategoryId) {
            if let Some(o) = self.objects.get_mut(&object) {
                o.category = category;
            }
        }

        fn body_flags(&self, object: ObjectId) -> Option<BodyFlags> {
            self.objects.get(&object).and_then(|o| o.body)
        }

        fn set_body_flags(&mut self, object: ObjectId, flags: BodyFlags) -> bool {
            match self.objects.get_mut(&object).and_then(|o| o.body.as_mut()) {
                Some(body) => {
                    *body = flags;
                    true
                }
                None => false,
            }
        }

        fn translation(&self, object: ObjectId) -> Option<Vec3> {
            self.objects.get(&object).map(|o| o.center)
        }

        fn set_translation(&mut self, object: ObjectId, translation: Vec3) {
            if let Some(o) = self.objects.get_mut(&object) {
                o.center = translation;
            }
        }

        fn rotation(&self, object: ObjectId) -> Option<Quat> {
            self.objects.get(&object).map(|o| o.rotation)
        }

        fn set_rotation(&mut self, object: ObjectId, rotation: Quat) {
            if let Some(o) = self.objects.get_mut(&object) {
                o.rotation = rotation;
            }
        }

        fn scale(&self, object: ObjectId) -> Option<Vec3> {
            self.objects.get(&object).map(|o| o.scale)
        }

        fn set_scale(&mut self, object: ObjectId, scale: Vec3) {
            if let Some(o) = self.objects.get_mut(&object) {
                o.scale = scale;
            }
        }

        fn half_extents(&self, object: ObjectId) -> Option<Vec3> {
            self.objects.get(&object).map(BoxObject::half_extents)
        }
    }

    #[test]
    fn box_scene_ray_hits_near_face() {
        let mut scene = BoxScene::new();
        let wall = scene.add_wall(Vec3::new(0.0, 0.0, -5.0), Vec3::new(2.0, 2.0, 0.5));
        let ray = Ray {
            origin: Vec3::zeros(),
            direction: Vec3::new(0.0, 0.0, -1.0),
        };
        let hit = scene
            .raycast(&ray, 10.0, QueryMask::new(CategoryMask::ALL))
            .unwrap();
        assert_eq!(hit.object, wall);
        assert!((hit.distance - 4.5).abs() < 1.0e-5);
        assert!((hit.normal - Vec3::new(0.0, 0.0, 1.0)).norm() < 1.0e-6);
    }

    #[test]
    fn box_scene_mask_skips_excluded_object() {
        let mut scene = BoxScene::new();
        let a = scene.add_prop(Vec3::zeros(), Vec3::new(0.5, 0.5, 0.5));
        let mask = QueryMask::new(CategoryMask::ALL).excluding(a);
        assert!(scene.overlap_sphere(Vec3::zeros(), 1.0, mask).is_empty());
    }
}
