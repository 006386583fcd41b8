//! Primitive trait and RayHit for ray-surface intersection.

use crate::material::{Absorber, Material};
use fluo_math::{Aabb, DVec3, Interval, Ray};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while constructing geometry.
///
/// These are configuration mistakes; scene construction stops on the first one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("triangle resolves to a line or point")]
    DegenerateTriangle,

    #[error("rectangle resolves to a line or point")]
    DegenerateRectangle,

    #[error("rectangle corners do not lie on an axis-aligned plane")]
    NotAxisAligned,

    #[error("{0} is the zero vector")]
    ZeroVector(&'static str),

    #[error("radius must be positive, got {0}")]
    NonPositiveRadius(f64),

    #[error("height must be positive, got {0}")]
    NonPositiveHeight(f64),

    #[error("inner radius {inner} must be non-negative and below outer radius {outer}")]
    InvalidInnerRadius { inner: f64, outer: f64 },

    #[error("pyramid base corners are at different heights ({0} and {1})")]
    UnlevelBase(f64, f64),
}

/// Result type for geometry construction.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Record of a ray-surface intersection.
///
/// The normal is the primitive's geometric normal; it is not flipped to face
/// the incoming ray. Materials decide which side they are on.
#[derive(Clone, Copy)]
pub struct RayHit<'a> {
    /// The ray that produced this hit
    pub ray: Ray,
    /// Unit surface normal at the hit point
    pub normal: DVec3,
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// Surface coordinates (zero where a primitive does not define them)
    pub u: f64,
    pub v: f64,
    /// Material assigned to the primitive that was hit
    pub material: &'a dyn Material,
}

impl<'a> RayHit<'a> {
    /// Point of intersection.
    #[inline]
    pub fn point(&self) -> DVec3 {
        self.ray.at(self.t)
    }
}

impl std::fmt::Debug for RayHit<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RayHit")
            .field("ray", &self.ray)
            .field("normal", &self.normal)
            .field("t", &self.t)
            .field("u", &self.u)
            .field("v", &self.v)
            .finish_non_exhaustive()
    }
}

/// Trait for geometry that rays can strike.
///
/// Scene construction owns every primitive; rendering only reads them, so
/// implementations must be shareable across worker threads.
pub trait Primitive: Send + Sync {
    /// Nearest intersection with `t` inside `ray_t` (bounds inclusive), if any.
    fn intersection(&self, ray: &Ray, ray_t: Interval) -> Option<RayHit<'_>>;

    /// Bounding box over the time span `[t0, t1]`, or `None` when unbounded.
    fn bounding_box(&self, t0: f64, t1: f64) -> Option<Aabb>;

    /// Assign the material reported by every future hit.
    fn set_material(&mut self, material: Arc<dyn Material>);

    /// Whether this primitive extends without bound.
    fn is_infinite(&self) -> bool {
        false
    }

    /// Whether this primitive encloses a volume.
    fn is_closed(&self) -> bool {
        false
    }

    /// Clone into a new box. Geometry is copied; the material handle is copied
    /// too, so re-assigning the copy's material leaves the original untouched.
    fn box_clone(&self) -> Box<dyn Primitive>;
}

impl Clone for Box<dyn Primitive> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Material carried by primitives until one is assigned.
pub(crate) fn default_material() -> Arc<dyn Material> {
    Arc::new(Absorber)
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;

    /// Effectively unbounded range starting just past zero.
    pub fn open_range() -> Interval {
        Interval::new(1e-7, f64::MAX)
    }

    /// Assert that a reported hit lies inside the range, carries a unit normal
    /// and sits within 1e-6 of the surface. `surface_distance` is zero on it.
    pub fn assert_hit_consistent(hit: &RayHit<'_>, ray_t: Interval, surface_distance: impl Fn(DVec3) -> f64) {
        assert!(ray_t.contains(hit.t), "t={} outside {:?}", hit.t, ray_t);
        assert!((hit.normal.length() - 1.0).abs() < 1e-9, "normal not unit: {:?}", hit.normal);

        let distance = surface_distance(hit.point());
        assert!(distance.abs() < 1e-6, "hit {:?} is {} off the surface", hit.point(), distance);
    }

    /// Signed distance to the plane through `origin` with the given normal.
    pub fn off_plane(origin: DVec3, normal: DVec3) -> impl Fn(DVec3) -> f64 {
        let normal = normal.normalize();
        move |p| (p - origin).dot(normal)
    }

    /// Distance from the wall of a cylinder of `radius` around `axis`.
    pub fn off_cylinder(axis: Ray, radius: f64) -> impl Fn(DVec3) -> f64 {
        move |p| (p - axis.closest_point(p)).length() - radius
    }
}
