//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::{
    material::Material,
    primitive::{default_material, GeometryError, GeometryResult, Primitive, RayHit},
};
use fluo_math::{Aabb, DVec3, Interval, Ray, EPSILON};
use std::sync::Arc;

/// A triangle primitive.
///
/// The face normal follows the winding `(b - a) × (c - a)`. A culled triangle
/// is single-sided: rays arriving from behind the normal pass through.
#[derive(Clone)]
pub struct Triangle {
    /// Vertices
    a: DVec3,
    b: DVec3,
    c: DVec3,
    /// Pre-computed face normal (unit length)
    normal: DVec3,
    is_culled: bool,
    material: Arc<dyn Material>,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    ///
    /// Fails if the vertices coincide or are collinear.
    pub fn new(a: DVec3, b: DVec3, c: DVec3, is_culled: bool) -> GeometryResult<Self> {
        if a == b || a == c || b == c {
            return Err(GeometryError::DegenerateTriangle);
        }

        // Collinear when the sine of the angle at `a` is below EPSILON, at any scale
        let (ab, ac) = (b - a, c - a);
        let cross = ab.cross(ac);
        if cross.length() <= EPSILON * ab.length() * ac.length() {
            return Err(GeometryError::DegenerateTriangle);
        }

        Ok(Self {
            a,
            b,
            c,
            normal: cross.normalize(),
            is_culled,
            material: default_material(),
        })
    }

    /// Culled triangle with vertices (0,0,0), (1,0,0), (0,1,0), shifted by `offset`.
    pub fn unit(offset: DVec3) -> Self {
        Self {
            a: offset,
            b: offset + DVec3::X,
            c: offset + DVec3::Y,
            normal: DVec3::Z,
            is_culled: true,
            material: default_material(),
        }
    }

    pub fn normal(&self) -> DVec3 {
        self.normal
    }

    pub fn vertices(&self) -> [DVec3; 3] {
        [self.a, self.b, self.c]
    }
}

impl Primitive for Triangle {
    fn intersection(&self, ray: &Ray, ray_t: Interval) -> Option<RayHit<'_>> {
        let ab = self.b - self.a;
        let ac = self.c - self.a;

        let p = ray.direction.cross(ac);
        let determinant = ab.dot(p);

        // Back-facing or parallel for a single-sided triangle
        if self.is_culled && determinant < EPSILON {
            return None;
        }
        // Parallel
        if determinant.abs() < EPSILON {
            return None;
        }

        let inverse_determinant = 1.0 / determinant;
        let s = ray.origin - self.a;
        let u = inverse_determinant * s.dot(p);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(ab);
        let v = inverse_determinant * ray.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = inverse_determinant * ac.dot(q);
        if !ray_t.contains(t) {
            return None;
        }

        Some(RayHit {
            ray: *ray,
            normal: self.normal,
            t,
            u,
            v,
            material: self.material.as_ref(),
        })
    }

    fn bounding_box(&self, _t0: f64, _t1: f64) -> Option<Aabb> {
        let min = self.a.min(self.b).min(self.c);
        let max = self.a.max(self.b).max(self.c);
        Some(Aabb::padded(min, max))
    }

    fn set_material(&mut self, material: Arc<dyn Material>) {
        self.material = material;
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
    fn test_unit_triangle_front_hit() {
        let tri = Triangle::unit(DVec3::ZERO);
        let ray = Ray::new(DVec3::new(0.25, 0.25, 1.0), DVec3::new(0.0, 0.0, -1.0));

        let hit = tri.intersection(&ray, open_range()).expect("front face hit");
        assert_hit_consistent(&hit, open_range(), off_plane(tri.vertices()[0], tri.normal()));
        assert!((hit.t - 1.0).abs() < 1e-12);

        // Barycentric reconstruction matches the ray point
        let [a, b, c] = tri.vertices();
        let from_uv = a + hit.u * (b - a) + hit.v * (c - a);
        assert!((from_uv - hit.point()).length() < 1e-6);
        assert!((hit.point() - DVec3::new(0.25, 0.25, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_unit_triangle_back_face_culled() {
        let tri = Triangle::unit(DVec3::ZERO);
        let ray = Ray::new(DVec3::new(0.25, 0.25, -1.0), DVec3::new(0.0, 0.0, 1.0));

        assert!(tri.intersection(&ray, open_range()).is_none());
    }

    #[test]
    fn test_double_sided_back_face_hit() {
        let tri = Triangle::new(DVec3::ZERO, DVec3::X, DVec3::Y, false).unwrap();
        let ray = Ray::new(DVec3::new(0.25, 0.25, -1.0), DVec3::new(0.0, 0.0, 1.0));

        let hit = tri.intersection(&ray, open_range()).expect("back face hit");
        assert!((hit.t - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_triangle_miss_outside() {
        let tri = Triangle::unit(DVec3::ZERO);
        let ray = Ray::new(DVec3::new(0.75, 0.75, 1.0), DVec3::new(0.0, 0.0, -1.0));

        assert!(tri.intersection(&ray, open_range()).is_none());
    }

    #[test]
    fn test_triangle_parallel_miss() {
        let tri = Triangle::new(DVec3::ZERO, DVec3::X, DVec3::Y, false).unwrap();
        let ray = Ray::new(DVec3::new(-1.0, 0.25, 0.0), DVec3::X);

        assert!(tri.intersection(&ray, open_range()).is_none());
    }

    #[test]
    fn test_triangle_range_is_inclusive() {
        let tri = Triangle::unit(DVec3::ZERO);
        let ray = Ray::new(DVec3::new(0.25, 0.25, 2.0), DVec3::new(0.0, 0.0, -1.0));

        assert!(tri.intersection(&ray, Interval::new(0.0, 2.0)).is_some());
        assert!(tri.intersection(&ray, Interval::new(0.0, 1.5)).is_none());
    }

    #[test]
    fn test_degenerate_triangles_rejected() {
        let p = DVec3::new(1.0, 2.0, 3.0);
        assert_eq!(
            Triangle::new(p, p, DVec3::ZERO, false).err(),
            Some(GeometryError::DegenerateTriangle)
        );
        assert!(Triangle::new(DVec3::ZERO, DVec3::X, DVec3::X * 2.0, true).is_err());
    }

    #[test]
    fn test_small_triangle_accepted() {
        let tri = Triangle::new(DVec3::ZERO, DVec3::X * 1e-4, DVec3::Y * 1e-4, false).unwrap();
        assert!((tri.normal() - DVec3::Z).length() < 1e-12);

        // A sliver is rejected however large it is
        let sliver = Triangle::new(DVec3::ZERO, DVec3::X * 1e3, DVec3::new(2e3, 1e-7, 0.0), false);
        assert_eq!(sliver.err(), Some(GeometryError::DegenerateTriangle));
    }

    #[test]
    fn test_triangle_bounding_box() {
        let tri = Triangle::new(DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0), DVec3::new(0.0, 3.0, 0.0), false)
            .unwrap();
        let bbox = tri.bounding_box(0.0, 0.0).unwrap();

        assert_eq!(bbox.x.max, 2.0 + EPSILON);
        assert_eq!(bbox.y.max, 3.0 + EPSILON);
        assert_eq!(bbox.z.min, -EPSILON);
    }
}
