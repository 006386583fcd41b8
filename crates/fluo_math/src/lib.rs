// Re-export glam for convenience
pub use glam::*;

// Fluorescence math types
mod aabb;
mod interval;
mod ray;
mod vector;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use vector::VectorExt;

/// Tolerance used for parallel-ray, back-face and degenerate-geometry tests.
pub const EPSILON: f64 = 1e-7;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dvec3_creation() {
        let v = DVec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_dvec3_componentwise_product() {
        let a = DVec3::new(1.0, 2.0, 3.0);
        let b = DVec3::new(4.0, 5.0, 6.0);
        assert_eq!(a * b, DVec3::new(4.0, 10.0, 18.0));
        assert_eq!(a.dot(b), 32.0);
    }
}
