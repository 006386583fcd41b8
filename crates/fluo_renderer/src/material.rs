//! Material trait for surface scattering.

use crate::primitive::RayHit;
use fluo_math::{DVec3, Ray, VectorExt};
use rand::{Rng, RngCore};

/// Color type alias (linear RGB, typically 0-1)
pub type Color = DVec3;

/// Trait for materials that describe how light interacts with surfaces.
///
/// Materials are built once during scene setup and only read while rendering.
pub trait Material: Send + Sync {
    /// Fraction of incoming light carried along a scattered ray, per channel.
    ///
    /// A zero reflectance marks a pure emitter: the integrator stops there.
    fn reflectance(&self) -> Color;

    /// Light emitted by the surface itself.
    fn emittance(&self) -> Color;

    /// True if scattering is a delta distribution (mirror, glass).
    fn is_specular(&self) -> bool;

    /// Scatter an incoming hit.
    ///
    /// Returns the continuation ray, or `None` if the light is absorbed.
    fn scatter(&self, hit: &RayHit<'_>, rng: &mut dyn RngCore) -> Option<Ray>;
}

/// Black, non-emitting, absorbing material. Primitives carry it until a real
/// material is assigned.
#[derive(Debug, Clone, Copy, Default)]
pub struct Absorber;

impl Material for Absorber {
    fn reflectance(&self) -> Color {
        Color::ZERO
    }

    fn emittance(&self) -> Color {
        Color::ZERO
    }

    fn is_specular(&self) -> bool {
        false
    }

    fn scatter(&self, _hit: &RayHit<'_>, _rng: &mut dyn RngCore) -> Option<Ray> {
        None
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    reflectance: Color,
    emittance: Color,
}

impl Lambertian {
    /// Create a new non-emitting Lambertian material with the given albedo.
    pub fn new(reflectance: Color) -> Self {
        Self::with_emittance(reflectance, Color::ZERO)
    }

    /// Create a Lambertian material that also glows.
    pub fn with_emittance(reflectance: Color, emittance: Color) -> Self {
        Self {
            reflectance,
            emittance,
        }
    }
}

impl Material for Lambertian {
    fn reflectance(&self) -> Color {
        self.reflectance
    }

    fn emittance(&self) -> Color {
        self.emittance
    }

    fn is_specular(&self) -> bool {
        false
    }

    fn scatter(&self, hit: &RayHit<'_>, rng: &mut dyn RngCore) -> Option<Ray> {
        let normal = facing_normal(hit);
        let mut scatter_direction = normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if scatter_direction.is_near_zero() {
            scatter_direction = normal;
        }

        Some(Ray::new(hit.point(), scatter_direction))
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    reflectance: Color,
    emittance: Color,
    fuzz: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `reflectance`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(reflectance: Color, fuzz: f64) -> Self {
        Self {
            reflectance,
            emittance: Color::ZERO,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn reflectance(&self) -> Color {
        self.reflectance
    }

    fn emittance(&self) -> Color {
        self.emittance
    }

    fn is_specular(&self) -> bool {
        self.fuzz == 0.0
    }

    fn scatter(&self, hit: &RayHit<'_>, rng: &mut dyn RngCore) -> Option<Ray> {
        let normal = facing_normal(hit);
        let reflected = hit.ray.direction.normalize().reflect_around(normal);
        let scattered_dir = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Fuzz can push the ray below the surface; that light is absorbed
        if scattered_dir.dot(normal) > 0.0 {
            Some(Ray::new(hit.point(), scattered_dir))
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    reflectance: Color,
    emittance: Color,
    /// Index of refraction
    refractive_index: f64,
}

impl Dielectric {
    /// Create a clear, non-emitting dielectric.
    ///
    /// - `refractive_index`: 1.0 = air, 1.5 = glass, 2.4 = diamond
    pub fn new(refractive_index: f64) -> Self {
        Self::with_colors(Color::ONE, Color::ZERO, refractive_index)
    }

    /// Create a tinted and/or emitting dielectric.
    pub fn with_colors(reflectance: Color, emittance: Color, refractive_index: f64) -> Self {
        Self {
            reflectance,
            emittance,
            refractive_index,
        }
    }

    pub fn refractive_index(&self) -> f64 {
        self.refractive_index
    }
}

/// Schlick's approximation of Fresnel reflectance.
pub fn schlick(cosine: f64, refractive_index: f64) -> f64 {
    let r0 = ((1.0 - refractive_index) / (1.0 + refractive_index)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

impl Material for Dielectric {
    fn reflectance(&self) -> Color {
        self.reflectance
    }

    fn emittance(&self) -> Color {
        self.emittance
    }

    fn is_specular(&self) -> bool {
        true
    }

    fn scatter(&self, hit: &RayHit<'_>, rng: &mut dyn RngCore) -> Option<Ray> {
        let n = self.refractive_index;
        let normal = hit.normal;
        let unit_direction = hit.ray.direction.normalize();
        let reflected = unit_direction.reflect_around(normal);

        let d_dot_n = unit_direction.dot(normal);
        let (refractive_normal, ratio, cosine) = if d_dot_n > 0.0 {
            // Leaving the medium
            let cosine = (1.0 - n * n * (1.0 - d_dot_n * d_dot_n)).max(0.0).sqrt();
            (-normal, n, cosine)
        } else {
            (normal, 1.0 / n, -d_dot_n)
        };

        let direction = match hit.ray.direction.refract_around(refractive_normal, ratio) {
            Some(refracted) if rng.gen::<f64>() >= schlick(cosine, n) => refracted,
            _ => reflected,
        };

        Some(Ray::new(hit.point(), direction))
    }
}

/// Diffuse light emitter.
#[derive(Debug, Clone)]
pub struct DiffuseLight {
    emittance: Color,
}

impl DiffuseLight {
    /// Create a new diffuse light with the given emission color.
    pub fn new(emittance: Color) -> Self {
        Self { emittance }
    }
}

impl Material for DiffuseLight {
    fn reflectance(&self) -> Color {
        Color::ZERO
    }

    fn emittance(&self) -> Color {
        self.emittance
    }

    fn is_specular(&self) -> bool {
        false
    }

    fn scatter(&self, _hit: &RayHit<'_>, _rng: &mut dyn RngCore) -> Option<Ray> {
        // Lights don't scatter rays
        None
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Geometric normal flipped, if needed, to face the incoming ray.
#[inline]
fn facing_normal(hit: &RayHit<'_>) -> DVec3 {
    if hit.ray.direction.dot(hit.normal) > 0.0 {
        -hit.normal
    } else {
        hit.normal
    }
}

/// Uniform random point inside the unit sphere (rejection sampling).
fn random_in_unit_sphere(rng: &mut dyn RngCore) -> DVec3 {
    loop {
        let v = DVec3::new(
            rng.gen::<f64>() * 2.0 - 1.0,
            rng.gen::<f64>() * 2.0 - 1.0,
            rng.gen::<f64>() * 2.0 - 1.0,
        );
        if v.length_squared() < 1.0 {
            return v;
        }
    }
}

/// Generate a random unit vector on the unit sphere.
fn random_unit_vector(rng: &mut dyn RngCore) -> DVec3 {
    loop {
        let v = random_in_unit_sphere(rng);
        let len_sq = v.length_squared();
        if len_sq > 1e-12 {
            return v / len_sq.sqrt();
        }
    }
}
