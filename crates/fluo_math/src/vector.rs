// Scattering helpers for glam::DVec3
//
// Reflection and refraction formulas used by materials, plus a tolerance
// test shared by degenerate-geometry checks.

use crate::{DVec3, EPSILON};

/// Extension trait for DVec3 with the optics used by materials.
pub trait VectorExt {
    /// Mirror this vector about the unit normal `n`: v - 2(v·n)n.
    fn reflect_around(&self, n: DVec3) -> DVec3;

    /// Refract through a surface with unit normal `n` facing the incoming side.
    ///
    /// `ratio` is n_incident / n_transmitted. Returns `None` on total internal
    /// reflection.
    fn refract_around(&self, n: DVec3, ratio: f64) -> Option<DVec3>;

    /// True when every component lies within `EPSILON` of zero.
    fn is_near_zero(&self) -> bool;
}

impl VectorExt for DVec3 {
    #[inline]
    fn reflect_around(&self, n: DVec3) -> DVec3 {
        *self - 2.0 * self.dot(n) * n
    }

    fn refract_around(&self, n: DVec3, ratio: f64) -> Option<DVec3> {
        let uv = self.normalize();
        let dt = uv.dot(n);
        let discriminant = 1.0 - ratio * ratio * (1.0 - dt * dt);
        if discriminant > 0.0 {
            Some(ratio * (uv - n * dt) - n * discriminant.sqrt())
        } else {
            None
        }
    }

    #[inline]
    fn is_near_zero(&self) -> bool {
        self.abs().max_element() < EPSILON
    }
}
