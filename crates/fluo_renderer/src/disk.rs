//! Flat circular primitives: [`Disk`] and the annular [`HollowDisk`].

use crate::{
    material::Material,
    primitive::{default_material, GeometryError, GeometryResult, Primitive, RayHit},
};
use fluo_math::{Aabb, DVec3, Interval, Ray, EPSILON};
use std::f64::consts::PI;
use std::sync::Arc;

/// Oriented plane through a center point, shared by both disk variants.
#[derive(Debug, Clone, Copy)]
struct DiskPlane {
    center: DVec3,
    normal: DVec3,
    tangent: DVec3,
    bitangent: DVec3,
    is_culled: bool,
}

impl DiskPlane {
    fn new(center: DVec3, normal: DVec3, is_culled: bool) -> GeometryResult<Self> {
        if normal.length() < EPSILON {
            return Err(GeometryError::ZeroVector("disk normal"));
        }
        let normal = normal.normalize();
        let (tangent, bitangent) = normal.any_orthonormal_pair();
        Ok(Self {
            center,
            normal,
            tangent,
            bitangent,
            is_culled,
        })
    }

    /// Double-sided plane through `center` facing +Z.
    fn facing_z(center: DVec3) -> Self {
        let (tangent, bitangent) = DVec3::Z.any_orthonormal_pair();
        Self {
            center,
            normal: DVec3::Z,
            tangent,
            bitangent,
            is_culled: false,
        }
    }

    /// Plane hit as (t, offset of the hit point from the center).
    #[inline]
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<(f64, DVec3)> {
        let denominator = ray.direction.dot(self.normal);
        if self.is_culled && denominator > -EPSILON {
            return None;
        }
        if denominator.abs() < EPSILON {
            return None;
        }

        let t = (self.center - ray.origin).dot(self.normal) / denominator;
        if !ray_t.contains(t) {
            return None;
        }

        Some((t, ray.at(t) - self.center))
    }

    /// Polar surface coordinates: u is the angle as a fraction of a turn,
    /// v the distance as a fraction of `radius`.
    fn uv(&self, offset: DVec3, radius: f64) -> (f64, f64) {
        let angle = offset.dot(self.bitangent).atan2(offset.dot(self.tangent));
        ((angle + PI) / (2.0 * PI), offset.length() / radius)
    }

    fn bounding_box(&self, radius: f64) -> Aabb {
        let n = self.normal;
        let extent = radius
            * DVec3::new(
                (1.0 - n.x * n.x).max(0.0).sqrt(),
                (1.0 - n.y * n.y).max(0.0).sqrt(),
                (1.0 - n.z * n.z).max(0.0).sqrt(),
            );
        Aabb::padded(self.center - extent, self.center + extent)
    }
}

/// A filled disk.
#[derive(Clone)]
pub struct Disk {
    plane: DiskPlane,
    radius: f64,
    material: Arc<dyn Material>,
}

impl Disk {
    /// Create a disk. The normal is normalised here.
    pub fn new(center: DVec3, normal: DVec3, radius: f64, is_culled: bool) -> GeometryResult<Self> {
        if radius <= 0.0 {
            return Err(GeometryError::NonPositiveRadius(radius));
        }
        Ok(Self {
            plane: DiskPlane::new(center, normal, is_culled)?,
            radius,
            material: default_material(),
        })
    }

    /// Disk from an already unit-length normal and a positive radius.
    pub(crate) fn from_unit_normal(center: DVec3, normal: DVec3, radius: f64) -> Self {
        let (tangent, bitangent) = normal.any_orthonormal_pair();
        Self {
            plane: DiskPlane {
                center,
                normal,
                tangent,
                bitangent,
                is_culled: false,
            },
            radius,
            material: default_material(),
        }
    }

    /// Double-sided radius-1 disk in the XY plane facing +Z, centred on `offset`.
    pub fn unit(offset: DVec3) -> Self {
        Self {
            plane: DiskPlane::facing_z(offset),
            radius: 1.0,
            material: default_material(),
        }
    }

    pub fn center(&self) -> DVec3 {
        self.plane.center
    }

    pub fn normal(&self) -> DVec3 {
        self.plane.normal
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Primitive for Disk {
    fn intersection(&self, ray: &Ray, ray_t: Interval) -> Option<RayHit<'_>> {
        let (t, offset) = self.plane.hit(ray, ray_t)?;
        if offset.length_squared() > self.radius * self.radius {
            return None;
        }

        let (u, v) = self.plane.uv(offset, self.radius);
        Some(RayHit {
            ray: *ray,
            normal: self.plane.normal,
            t,
            u,
            v,
            material: self.material.as_ref(),
        })
    }

    fn bounding_box(&self, _t0: f64, _t1: f64) -> Option<Aabb> {
        Some(self.plane.bounding_box(self.radius))
    }

    fn set_material(&mut self, material: Arc<dyn Material>) {
        self.material = material;
    }

    fn box_clone(&self) -> Box<dyn Primitive> {
        Box::new(self.clone())
    }
}

/// A disk with a concentric hole: hits land between the inner and outer radius.
#[derive(Clone)]
pub struct HollowDisk {
    plane: DiskPlane,
    inner_radius: f64,
    outer_radius: f64,
    material: Arc<dyn Material>,
}

impl HollowDisk {
    pub fn new(
        center: DVec3,
        normal: DVec3,
        inner_radius: f64,
        outer_radius: f64,
        is_culled: bool,
    ) -> GeometryResult<Self> {
        if outer_radius <= 0.0 {
            return Err(GeometryError::NonPositiveRadius(outer_radius));
        }
        if inner_radius < 0.0 || inner_radius >= outer_radius {
            return Err(GeometryError::InvalidInnerRadius {
                inner: inner_radius,
                outer: outer_radius,
            });
        }
        Ok(Self {
            plane: DiskPlane::new(center, normal, is_culled)?,
            inner_radius,
            outer_radius,
            material: default_material(),
        })
    }

    /// Double-sided annulus with radii 0.5 and 1 in the XY plane, centred on `offset`.
    pub fn unit(offset: DVec3) -> Self {
        Self {
            plane: DiskPlane::facing_z(offset),
            inner_radius: 0.5,
            outer_radius: 1.0,
            material: default_material(),
        }
    }
}

impl Primitive for HollowDisk {
    fn intersection(&self, ray: &Ray, ray_t: Interval) -> Option<RayHit<'_>> {
        let (t, offset) = self.plane.hit(ray, ray_t)?;
        let dist_sq = offset.length_squared();
        if dist_sq < self.inner_radius * self.inner_radius || dist_sq > self.outer_radius * self.outer_radius {
            return None;
        }

        let (u, v) = self.plane.uv(offset, self.outer_radius);
        Some(RayHit {
            ray: *ray,
            normal: self.plane.normal,
            t,
            u,
            v,
            material: self.material.as_ref(),
        })
    }

    fn bounding_box(&self, _t0: f64, _t1: f64) -> Option<Aabb> {
        Some(self.plane.bounding_box(self.outer_radius))
    }

    fn set_material(&mut self, material: Arc<dyn Material>) {
        self.material = material;
    }

    fn box_clone(&self) -> Box<dyn Primitive> {
        Box::new(self.clone())
    }
}
