use crate::DVec3;

/// A ray in 3D space with an origin and a direction.
///
/// The direction is not required to be unit length. Primary rays from the
/// camera and scattered rays from materials are traced as-is.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Closest point to `p` on the infinite line carrying this ray.
    ///
    /// Returns the origin when the direction is zero.
    pub fn closest_point(&self, p: DVec3) -> DVec3 {
        let len_sq = self.direction.length_squared();
        if len_sq == 0.0 {
            return self.origin;
        }
        let t = (p - self.origin).dot(self.direction) / len_sq;
        self.at(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = DVec3::new(1.0, 2.0, 3.0);
        let direction = DVec3::new(0.0, 1.0, 0.0);
        let ray = Ray::new(origin, direction);

        assert_eq!(ray.origin, origin);
        assert_eq!(ray.direction, direction);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(DVec3::ZERO, DVec3::X);

        assert_eq!(ray.at(0.0), DVec3::ZERO);
        assert_eq!(ray.at(1.0), DVec3::X);
        assert_eq!(ray.at(2.0), DVec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), DVec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_closest_point() {
        let axis = Ray::new(DVec3::ZERO, DVec3::new(0.0, 2.0, 0.0));

        assert_eq!(axis.closest_point(DVec3::new(1.0, 0.5, 0.0)), DVec3::new(0.0, 0.5, 0.0));
        assert_eq!(axis.closest_point(DVec3::new(0.0, -3.0, 4.0)), DVec3::new(0.0, -3.0, 0.0));
    }

    #[test]
    fn test_closest_point_degenerate_direction() {
        let ray = Ray::new(DVec3::ONE, DVec3::ZERO);
        assert_eq!(ray.closest_point(DVec3::new(5.0, 5.0, 5.0)), DVec3::ONE);
    }
}
