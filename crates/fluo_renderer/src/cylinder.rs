//! Cylinders around an arbitrary axis: finite [`Cylinder`] (optionally capped)
//! and [`InfiniteCylinder`].

use crate::{
    disk::Disk,
    material::Material,
    primitive::{default_material, GeometryError, GeometryResult, Primitive, RayHit},
};
use fluo_math::{Aabb, DVec3, Interval, Ray, EPSILON};
use std::f64::consts::PI;
use std::sync::Arc;

/// Axis ray, radius and normal orientation shared by both cylinder variants.
#[derive(Debug, Clone, Copy)]
struct CylinderAxis {
    /// Axis with unit direction
    axis: Ray,
    radius: f64,
    has_inverted_normals: bool,
    tangent: DVec3,
    bitangent: DVec3,
}

impl CylinderAxis {
    fn new(axis: Ray, radius: f64, has_inverted_normals: bool) -> GeometryResult<Self> {
        if axis.direction.length() < EPSILON {
            return Err(GeometryError::ZeroVector("cylinder axis"));
        }
        if radius <= 0.0 {
            return Err(GeometryError::NonPositiveRadius(radius));
        }
        Ok(Self::from_unit_axis(
            Ray::new(axis.origin, axis.direction.normalize()),
            radius,
            has_inverted_normals,
        ))
    }

    fn from_unit_axis(axis: Ray, radius: f64, has_inverted_normals: bool) -> Self {
        let (tangent, bitangent) = axis.direction.any_orthonormal_pair();
        Self {
            axis,
            radius,
            has_inverted_normals,
            tangent,
            bitangent,
        }
    }

    /// Both roots of the side quadratic, smaller first.
    ///
    /// Works on the components of the ray direction and origin offset that are
    /// perpendicular to the axis: `a·t² + 2b·t + c = 0`.
    fn roots(&self, ray: &Ray) -> Option<(f64, f64)> {
        let axis_dir = self.axis.direction;
        let delta_p = ray.origin - self.axis.origin;
        let perp_dir = ray.direction - axis_dir * ray.direction.dot(axis_dir);
        let perp_offset = delta_p - axis_dir * delta_p.dot(axis_dir);

        // Ray runs along the axis
        if perp_dir.length() < EPSILON {
            return None;
        }

        let a = perp_dir.dot(perp_dir);
        let b = perp_dir.dot(perp_offset);
        let c = perp_offset.dot(perp_offset) - self.radius * self.radius;

        let discriminant = b * b - a * c;
        if discriminant <= 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        Some(((-b - root) / a, (-b + root) / a))
    }

    /// Signed distance of `p` along the axis from the axis origin.
    #[inline]
    fn height_of(&self, p: DVec3) -> f64 {
        (p - self.axis.origin).dot(self.axis.direction)
    }

    fn normal_at(&self, p: DVec3) -> DVec3 {
        let outward = (p - self.axis.closest_point(p)).normalize();
        if self.has_inverted_normals {
            -outward
        } else {
            outward
        }
    }

    /// Angle around the axis as a fraction of a full turn.
    fn angle_of(&self, p: DVec3) -> f64 {
        let offset = p - self.axis.origin;
        let angle = offset.dot(self.bitangent).atan2(offset.dot(self.tangent));
        (angle + PI) / (2.0 * PI)
    }
}

/// Finite cylinder from the axis origin to `height` along the axis.
///
/// Uncapped cylinders are open tubes; capped ones close both ends with disks.
#[derive(Clone)]
pub struct Cylinder {
    shape: CylinderAxis,
    height: f64,
    caps: Option<[Disk; 2]>,
    material: Arc<dyn Material>,
}

impl Cylinder {
    /// Create an uncapped cylinder with outward normals.
    ///
    /// `axis.origin` is the center of the base; the direction is normalised here.
    pub fn new(axis: Ray, height: f64, radius: f64) -> GeometryResult<Self> {
        if height <= 0.0 {
            return Err(GeometryError::NonPositiveHeight(height));
        }
        Ok(Self {
            shape: CylinderAxis::new(axis, radius, false)?,
            height,
            caps: None,
            material: default_material(),
        })
    }

    /// Close (or open) both ends.
    pub fn with_caps(mut self, has_caps: bool) -> Self {
        let caps = has_caps.then(|| self.build_caps());
        self.caps = caps;
        self
    }

    /// Point normals into the cylinder instead of out of it.
    pub fn with_inverted_normals(mut self, has_inverted_normals: bool) -> Self {
        self.shape.has_inverted_normals = has_inverted_normals;
        if self.caps.is_some() {
            self.caps = Some(self.build_caps());
        }
        self
    }

    /// Uncapped cylinder with its base centred on `offset`, axis +Y, height 1, radius 1.
    pub fn unit(offset: DVec3) -> Self {
        Self {
            shape: CylinderAxis::from_unit_axis(Ray::new(offset, DVec3::Y), 1.0, false),
            height: 1.0,
            caps: None,
            material: default_material(),
        }
    }

    pub fn has_caps(&self) -> bool {
        self.caps.is_some()
    }

    fn top_center(&self) -> DVec3 {
        self.shape.axis.at(self.height)
    }

    fn build_caps(&self) -> [Disk; 2] {
        let outward = if self.shape.has_inverted_normals { -1.0 } else { 1.0 };
        let direction = self.shape.axis.direction;
        let mut bottom = Disk::from_unit_normal(self.shape.axis.origin, -outward * direction, self.shape.radius);
        let mut top = Disk::from_unit_normal(self.top_center(), outward * direction, self.shape.radius);
        bottom.set_material(self.material.clone());
        top.set_material(self.material.clone());
        [bottom, top]
    }

    /// Nearest side hit whose point lies within the axial extent.
    fn side_hit(&self, ray: &Ray, ray_t: Interval) -> Option<RayHit<'_>> {
        let (t1, t2) = self.shape.roots(ray)?;
        let (t, p, along) = [t1, t2]
            .into_iter()
            .filter(|t| ray_t.contains(*t))
            .map(|t| {
                let p = ray.at(t);
                (t, p, self.shape.height_of(p))
            })
            .find(|(_, _, along)| (0.0..=self.height).contains(along))?;

        Some(RayHit {
            ray: *ray,
            normal: self.shape.normal_at(p),
            t,
            u: self.shape.angle_of(p),
            v: along / self.height,
            material: self.material.as_ref(),
        })
    }
}

impl Primitive for Cylinder {
    fn intersection(&self, ray: &Ray, ray_t: Interval) -> Option<RayHit<'_>> {
        let mut closest = self.side_hit(ray, ray_t);

        if let Some(caps) = &self.caps {
            for cap in caps {
                let range = ray_t.with_max(closest.as_ref().map_or(ray_t.max, |hit| hit.t));
                if let Some(hit) = cap.intersection(ray, range) {
                    closest = Some(hit);
                }
            }
        }

        closest
    }

    fn bounding_box(&self, _t0: f64, _t1: f64) -> Option<Aabb> {
        let d = self.shape.axis.direction;
        let extent = self.shape.radius
            * DVec3::new(
                (1.0 - d.x * d.x).max(0.0).sqrt(),
                (1.0 - d.y * d.y).max(0.0).sqrt(),
                (1.0 - d.z * d.z).max(0.0).sqrt(),
            );
        let base = self.shape.axis.origin;
        let top = self.top_center();
        Some(Aabb::padded(base.min(top) - extent, base.max(top) + extent))
    }

    fn set_material(&mut self, material: Arc<dyn Material>) {
        if let Some(caps) = &mut self.caps {
            for cap in caps.iter_mut() {
                cap.set_material(material.clone());
            }
        }
        self.material = material;
    }

    fn is_closed(&self) -> bool {
        self.has_caps()
    }

    fn box_clone(&self) -> Box<dyn Primitive> {
        Box::new(self.clone())
    }
}

/// Cylinder extending forever in both directions along its axis.
#[derive(Clone)]
pub struct InfiniteCylinder {
    shape: CylinderAxis,
    material: Arc<dyn Material>,
}

impl InfiniteCylinder {
    /// Create an infinite cylinder; the axis direction is normalised here.
    pub fn new(axis: Ray, radius: f64, has_inverted_normals: bool) -> GeometryResult<Self> {
        Ok(Self {
            shape: CylinderAxis::new(axis, radius, has_inverted_normals)?,
            material: default_material(),
        })
    }

    /// Radius-1 cylinder along +Y through `offset`.
    pub fn unit(offset: DVec3) -> Self {
        Self {
            shape: CylinderAxis::from_unit_axis(Ray::new(offset, DVec3::Y), 1.0, false),
            material: default_material(),
        }
    }
}

impl Primitive for InfiniteCylinder {
    fn intersection(&self, ray: &Ray, ray_t: Interval) -> Option<RayHit<'_>> {
        let (t1, t2) = self.shape.roots(ray)?;
        let t = if ray_t.contains(t1) {
            t1
        } else if ray_t.contains(t2) {
            t2
        } else {
            return None;
        };

        let p = ray.at(t);
        Some(RayHit {
            ray: *ray,
            normal: self.shape.normal_at(p),
            t,
            u: self.shape.angle_of(p),
            v: 0.0,
            material: self.material.as_ref(),
        })
    }

    fn bounding_box(&self, _t0: f64, _t1: f64) -> Option<Aabb> {
        None
    }

    fn set_material(&mut self, material: Arc<dyn Material>) {
        self.material = material;
    }

    fn is_infinite(&self) -> bool {
        true
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn box_clone(&self) -> Box<dyn Primitive> {
        Box::new(self.clone())
    }
}
