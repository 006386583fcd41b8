use crate::{DVec3, Interval, Ray, EPSILON};

/// Axis-Aligned Bounding Box used as a cheap pre-filter before exact
/// intersection tests.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
/// Zero-volume boxes (a planar rectangle, for instance) are valid.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }
    }

    /// Create an AABB from two corner points (in any order).
    pub fn from_points(a: DVec3, b: DVec3) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self {
            x: Interval::new(min.x, max.x),
            y: Interval::new(min.y, max.y),
            z: Interval::new(min.z, max.z),
        }
    }

    /// Create an AABB from two corner points, grown by `EPSILON` on every face
    /// so that flat boxes do not lose grazing rays to round-off.
    pub fn padded(a: DVec3, b: DVec3) -> Self {
        Self::from_points(a, b).pad(EPSILON)
    }

    /// Grow every face outward by `delta`.
    pub fn pad(&self, delta: f64) -> Self {
        Self {
            x: self.x.expand(delta),
            y: self.y.expand(delta),
            z: self.z.expand(delta),
        }
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Minimum corner.
    pub fn min(&self) -> DVec3 {
        DVec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    pub fn max(&self) -> DVec3 {
        DVec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Returns true if `other` lies entirely inside this box.
    pub fn contains_box(&self, other: &Aabb) -> bool {
        self.x.contains_interval(&other.x)
            && self.y.contains_interval(&other.y)
            && self.z.contains_interval(&other.z)
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Slab method with inclusive bounds. A direction component within
    /// `EPSILON` of zero never divides: the ray is parallel to that slab and
    /// passes only if its origin already lies inside it.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let origin = r.origin[axis];
            let direction = r.direction[axis];

            if direction.abs() < EPSILON {
                if !slab.contains(origin) {
                    return false;
                }
                continue;
            }

            let inv_d = 1.0 / direction;
            let mut t0 = (slab.min - origin) * inv_d;
            let mut t1 = (slab.max - origin) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max < ray_t.min {
                return false;
            }
        }

        true
    }
}
