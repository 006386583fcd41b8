//! Axis-aligned rectangles.
//!
//! A [`Rectangle`] is given by two opposite corners that share one coordinate.
//! The shared coordinate picks the plane, and the rectangle then delegates to
//! an [`AxisRectangle`] specialised for that plane.

use crate::{
    material::Material,
    primitive::{default_material, GeometryError, GeometryResult, Primitive, RayHit},
};
use fluo_math::{Aabb, DVec3, Interval, Ray, EPSILON};
use std::sync::Arc;

/// The axis-aligned plane a rectangle lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// Constant z
    Xy,
    /// Constant y
    Xz,
    /// Constant x
    Yz,
}

impl Plane {
    /// Component indices as (normal axis, u axis, v axis).
    #[inline]
    fn axes(self) -> (usize, usize, usize) {
        match self {
            Plane::Xy => (2, 0, 1),
            Plane::Xz => (1, 0, 2),
            Plane::Yz => (0, 1, 2),
        }
    }
}

/// Rectangle lying in one axis-aligned plane.
#[derive(Clone)]
pub struct AxisRectangle {
    plane: Plane,
    /// Plane coordinate along the normal axis
    k: f64,
    u0: f64,
    u1: f64,
    v0: f64,
    v1: f64,
    is_culled: bool,
    normal: DVec3,
    material: Arc<dyn Material>,
}

impl AxisRectangle {
    fn new(plane: Plane, a: DVec3, b: DVec3, is_culled: bool, has_negative_normal: bool) -> Self {
        let (n, ua, va) = plane.axes();

        let mut normal = DVec3::ZERO;
        normal[n] = if has_negative_normal { -1.0 } else { 1.0 };

        Self {
            plane,
            k: a[n],
            u0: a[ua].min(b[ua]),
            u1: a[ua].max(b[ua]),
            v0: a[va].min(b[va]),
            v1: a[va].max(b[va]),
            is_culled,
            normal,
            material: default_material(),
        }
    }
}

impl Primitive for AxisRectangle {
    fn intersection(&self, ray: &Ray, ray_t: Interval) -> Option<RayHit<'_>> {
        let (n, ua, va) = self.plane.axes();

        let denominator = ray.direction.dot(self.normal);
        // Ray is coming from behind a single-sided rectangle
        if self.is_culled && denominator > -EPSILON {
            return None;
        }
        // Ray is parallel to the plane
        if denominator.abs() < EPSILON {
            return None;
        }

        let t = (self.k - ray.origin[n]) / ray.direction[n];
        if !ray_t.contains(t) {
            return None;
        }

        let p = ray.at(t);
        let (a, b) = (p[ua], p[va]);
        if a < self.u0 || a > self.u1 || b < self.v0 || b > self.v1 {
            return None;
        }

        Some(RayHit {
            ray: *ray,
            normal: self.normal,
            t,
            u: (a - self.u0) / (self.u1 - self.u0),
            v: (b - self.v0) / (self.v1 - self.v0),
            material: self.material.as_ref(),
        })
    }

    fn bounding_box(&self, _t0: f64, _t1: f64) -> Option<Aabb> {
        let (n, ua, va) = self.plane.axes();
        let mut min = DVec3::ZERO;
        let mut max = DVec3::ZERO;
        min[n] = self.k;
        max[n] = self.k;
        min[ua] = self.u0;
        max[ua] = self.u1;
        min[va] = self.v0;
        max[va] = self.v1;
        Some(Aabb::padded(min, max))
    }

    fn set_material(&mut self, material: Arc<dyn Material>) {
        self.material = material;
    }

    fn box_clone(&self) -> Box<dyn Primitive> {
        Box::new(self.clone())
    }
}

/// Axis-aligned rectangle defined by two opposite corners.
#[derive(Clone)]
pub struct Rectangle {
    inner: AxisRectangle,
}

impl Rectangle {
    /// Build a rectangle from opposite corners `a` and `b`.
    ///
    /// The normal points along the positive plane axis unless
    /// `has_negative_normal` is set. Fails if the corners collapse to a line
    /// or a point, or do not share any coordinate.
    pub fn new(a: DVec3, b: DVec3, is_culled: bool, has_negative_normal: bool) -> GeometryResult<Self> {
        let same = a.cmpeq(b);
        if (same.x && same.y) || (same.x && same.z) || (same.y && same.z) {
            return Err(GeometryError::DegenerateRectangle);
        }

        let plane = if same.x {
            Plane::Yz
        } else if same.y {
            Plane::Xz
        } else if same.z {
            Plane::Xy
        } else {
            return Err(GeometryError::NotAxisAligned);
        };

        Ok(Self {
            inner: AxisRectangle::new(plane, a, b, is_culled, has_negative_normal),
        })
    }

    /// Double-sided rectangle from (0,0,0) to (1,1,0), shifted by `offset`.
    pub fn unit(offset: DVec3) -> Self {
        Self {
            inner: AxisRectangle::new(Plane::Xy, offset, offset + DVec3::new(1.0, 1.0, 0.0), false, false),
        }
    }

    pub fn plane(&self) -> Plane {
        self.inner.plane
    }

    pub fn normal(&self) -> DVec3 {
        self.inner.normal
    }
}

impl Primitive for Rectangle {
    fn intersection(&self, ray: &Ray, ray_t: Interval) -> Option<RayHit<'_>> {
        self.inner.intersection(ray, ray_t)
    }

    fn bounding_box(&self, t0: f64, t1: f64) -> Option<Aabb> {
        self.inner.bounding_box(t0, t1)
    }

    fn set_material(&mut self, material: Arc<dyn Material>) {
        self.inner.set_material(material);
    }

    fn box_clone(&self) -> Box<dyn Primitive> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::test_util::{assert_hit_consistent, off_plane, open_range};

    #[test]
    fn test_plane_selection() {
        let xy = Rectangle::new(DVec3::ZERO, DVec3::new(1.0, 2.0, 0.0), false, false).unwrap();
        let xz = Rectangle::new(DVec3::ZERO, DVec3::new(1.0, 0.0, 2.0), false, false).unwrap();
        let yz = Rectangle::new(DVec3::ZERO, DVec3::new(0.0, 1.0, 2.0), false, true).unwrap();

        assert_eq!(xy.plane(), Plane::Xy);
        assert_eq!(xz.plane(), Plane::Xz);
        assert_eq!(yz.plane(), Plane::Yz);
        assert_eq!(xz.normal(), DVec3::Y);
        assert_eq!(yz.normal(), DVec3::NEG_X);
    }

    #[test]
    fn test_invalid_corners() {
        assert_eq!(
            Rectangle::new(DVec3::ZERO, DVec3::new(1.0, 0.0, 0.0), false, false).err(),
            Some(GeometryError::DegenerateRectangle)
        );
        assert_eq!(
            Rectangle::new(DVec3::ONE, DVec3::ONE, false, false).err(),
            Some(GeometryError::DegenerateRectangle)
        );
        assert_eq!(
            Rectangle::new(DVec3::ZERO, DVec3::ONE, false, false).err(),
            Some(GeometryError::NotAxisAligned)
        );
    }

    #[test]
    fn test_xz_hit_with_uv() {
        let rect = Rectangle::new(DVec3::new(-1.0, 2.0, -1.0), DVec3::new(1.0, 2.0, 3.0), false, false).unwrap();
        let ray = Ray::new(DVec3::new(0.5, 0.0, 2.0), DVec3::new(0.0, 2.0, 0.0));

        let hit = rect.intersection(&ray, open_range()).expect("hit");
        assert_hit_consistent(&hit, open_range(), off_plane(DVec3::new(0.0, 2.0, 0.0), DVec3::Y));
        assert!((hit.t - 1.0).abs() < 1e-12);
        assert!((hit.u - 0.75).abs() < 1e-12);
        assert!((hit.v - 0.75).abs() < 1e-12);
        assert!((hit.point().y - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_culled_rectangle_rejects_back_face() {
        let rect = Rectangle::new(DVec3::ZERO, DVec3::new(1.0, 1.0, 0.0), true, false).unwrap();

        // Normal is +Z, so the front face is seen from +Z looking down
        let front = Ray::new(DVec3::new(0.5, 0.5, 1.0), DVec3::NEG_Z);
        let back = Ray::new(DVec3::new(0.5, 0.5, -1.0), DVec3::Z);

        assert!(rect.intersection(&front, open_range()).is_some());
        assert!(rect.intersection(&back, open_range()).is_none());
    }

    #[test]
    fn test_yz_miss_and_parallel() {
        let rect = Rectangle::new(DVec3::new(3.0, 0.0, 0.0), DVec3::new(3.0, 1.0, 1.0), false, false).unwrap();

        let outside = Ray::new(DVec3::new(0.0, 2.0, 0.5), DVec3::X);
        assert!(rect.intersection(&outside, open_range()).is_none());

        let parallel = Ray::new(DVec3::new(0.0, 0.5, 0.5), DVec3::Y);
        assert!(rect.intersection(&parallel, open_range()).is_none());

        let inside = Ray::new(DVec3::new(0.0, 0.5, 0.5), DVec3::X);
        let hit = rect.intersection(&inside, open_range()).unwrap();
        assert!((hit.t - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_bounding_box_is_flat_and_padded() {
        let rect = Rectangle::unit(DVec3::new(0.0, 0.0, 5.0));
        let bbox = rect.bounding_box(0.0, 1.0).unwrap();

        assert_eq!(bbox.z.min, 5.0 - EPSILON);
        assert_eq!(bbox.z.max, 5.0 + EPSILON);
        assert_eq!(bbox.x.max, 1.0 + EPSILON);
    }
}
