//! Camera contract and a look-at camera for ray generation.

use fluo_math::{DVec3, Ray};
use rand::{Rng, RngCore};

/// Anything that can turn normalised image coordinates into primary rays.
///
/// `u` runs left to right and `v` bottom to top, both over `[0, 1]`.
pub trait Camera: Send + Sync {
    fn get_ray(&self, u: f64, v: f64, rng: &mut dyn RngCore) -> Ray;
}

/// Thin-lens camera positioned with look-from / look-at / up vectors.
#[derive(Debug, Clone)]
pub struct LookAtCamera {
    // Camera positioning
    look_from: DVec3,
    look_at: DVec3,
    vup: DVec3,

    // Lens settings
    vfov: f64,          // Vertical field of view in degrees
    aspect_ratio: f64,  // Width over height
    defocus_angle: f64, // Variation angle of rays through each pixel
    focus_dist: f64,    // Distance from camera to plane of perfect focus

    // Cached computed values (set by initialize())
    lower_left: DVec3,
    horizontal: DVec3,
    vertical: DVec3,
    defocus_disk_u: DVec3,
    defocus_disk_v: DVec3,
}

impl LookAtCamera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            look_from: DVec3::ZERO,
            look_at: DVec3::new(0.0, 0.0, -1.0),
            vup: DVec3::Y,
            vfov: 90.0,
            aspect_ratio: 16.0 / 9.0,
            defocus_angle: 0.0,
            focus_dist: 1.0,
            lower_left: DVec3::ZERO,
            horizontal: DVec3::ZERO,
            vertical: DVec3::ZERO,
            defocus_disk_u: DVec3::ZERO,
            defocus_disk_v: DVec3::ZERO,
        }
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: DVec3, look_at: DVec3, vup: DVec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Set the aspect ratio from image dimensions.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.aspect_ratio = width as f64 / height.max(1) as f64;
        self
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        let theta = self.vfov.to_radians();
        let viewport_height = 2.0 * (theta / 2.0).tan() * self.focus_dist;
        let viewport_width = viewport_height * self.aspect_ratio;

        // Camera basis vectors
        let w = (self.look_from - self.look_at).normalize();
        let u = self.vup.cross(w).normalize();
        let v = w.cross(u);

        self.horizontal = viewport_width * u;
        self.vertical = viewport_height * v;
        self.lower_left = self.look_from - self.focus_dist * w - self.horizontal / 2.0 - self.vertical / 2.0;

        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = u * defocus_radius;
        self.defocus_disk_v = v * defocus_radius;
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> DVec3 {
        let p = random_in_unit_disk(rng);
        self.look_from + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }
}

impl Default for LookAtCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera for LookAtCamera {
    fn get_ray(&self, u: f64, v: f64, rng: &mut dyn RngCore) -> Ray {
        let origin = if self.defocus_angle <= 0.0 {
            self.look_from
        } else {
            self.defocus_disk_sample(rng)
        };
        let target = self.lower_left + u * self.horizontal + v * self.vertical;
        Ray::new(origin, target - origin)
    }
}

/// Sample a random point in the unit disk.
fn random_in_unit_disk(rng: &mut dyn RngCore) -> DVec3 {
    loop {
        let p = DVec3::new(rng.gen::<f64>() * 2.0 - 1.0, rng.gen::<f64>() * 2.0 - 1.0, 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}
