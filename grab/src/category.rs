//! Collision categories (layers) and the masks used to filter scene queries.
//!
//! Category names are resolved once, when the controller is built, into stable
//! [`CategoryId`]s. Queries then filter with a [`CategoryMask`] bit test instead of
//! looking names up every tick.

use crate::error::GrabError;

/// Name of the category every object starts in unless told otherwise.
pub const DEFAULT_CATEGORY: &str = "Default";

/// Name of the category reserved for the object currently being held.
pub const GRABBED_CATEGORY: &str = "Grabbed";

/// Name of the category holding the viewpoint's own collision volume.
pub const VIEWPOINT_CATEGORY: &str = "Viewpoint";

/// Maximum number of categories; one bit each in a [`CategoryMask`].
pub const MAX_CATEGORIES: usize = 32;

/// Stable index of a registered category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CategoryId(u8);

impl CategoryId {
    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn mask(self) -> CategoryMask {
        CategoryMask(1u32 << self.0)
    }
}

/// Bit set of categories.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryMask(pub u32);

impl CategoryMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    #[inline]
    pub fn contains(self, category: CategoryId) -> bool {
        self.0 & category.mask().0 != 0
    }

    #[inline]
    pub fn with(self, category: CategoryId) -> Self {
        Self(self.0 | category.mask().0)
    }

    #[inline]
    pub fn without(self, category: CategoryId) -> Self {
        Self(self.0 & !category.mask().0)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Name → id table for categories, filled by the host at startup.
#[derive(Clone, Debug)]
pub struct CategoryRegistry {
    names: Vec<String>,
}

impl Default for CategoryRegistry {
    /// A registry holding the default, grabbed and viewpoint categories.
    fn default() -> Self {
        let mut registry = Self { names: Vec::new() };
        for name in [DEFAULT_CATEGORY, GRABBED_CATEGORY, VIEWPOINT_CATEGORY] {
            // Cannot fail: three names, all distinct, well under the limit.
            let _ = registry.register(name);
        }
        registry
    }
}

impl CategoryRegistry {
    /// Register `name`, returning its id. Registering an existing name returns the same id.
    pub fn register(&mut self, name: &str) -> Result<CategoryId, GrabError> {
        if let Some(id) = self.lookup(name) {
            return Ok(id);
        }
        if self.names.len() >= MAX_CATEGORIES {
            return Err(GrabError::TooManyCategories(MAX_CATEGORIES));
        }
        self.names.push(name.to_owned());
        Ok(CategoryId((self.names.len() - 1) as u8))
    }

    /// Resolve a previously registered name.
    pub fn resolve(&self, name: &str) -> Result<CategoryId, GrabError> {
        self.lookup(name)
            .ok_or_else(|| GrabError::UnknownCategory(name.to_owned()))
    }

    pub fn name(&self, id: CategoryId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn lookup(&self, name: &str) -> Option<CategoryId> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| CategoryId(i as u8))
    }
}

/// Categories the controller treats specially, resolved once at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReservedCategories {
    /// Category the held object is moved into for the duration of a grab.
    pub grabbed: CategoryId,
    /// Category of the viewpoint's own collision volume.
    pub viewpoint: CategoryId,
}

impl ReservedCategories {
    /// Resolve the reserved categories by their standard names.
    pub fn resolve(registry: &CategoryRegistry) -> Result<Self, GrabError> {
        Self::resolve_named(registry, GRABBED_CATEGORY, VIEWPOINT_CATEGORY)
    }

    pub fn resolve_named(
        registry: &CategoryRegistry,
        grabbed: &str,
        viewpoint: &str,
    ) -> Result<Self, GrabError> {
        Ok(Self {
            grabbed: registry.resolve(grabbed)?,
            viewpoint: registry.resolve(viewpoint)?,
        })
    }

    /// Everything except the reserved categories; used by the ray and clearance queries.
    #[inline]
    pub fn query_mask(&self) -> CategoryMask {
        CategoryMask::ALL
            .without(self.grabbed)
            .without(self.viewpoint)
    }
}
