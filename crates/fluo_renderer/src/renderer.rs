//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive scatter-and-trace with a bounce cutoff
//! - Anti-aliasing via jittered multi-sampling
//! - Gamma correction
//! - One parallel task per image row, each with its own random stream

use crate::{Camera, Color, ConfigError, Primitive, RenderConfig};
use fluo_math::Ray;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors that stop a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid render configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("render workers stopped after {completed} of {total} pixels")]
    WorkersDisconnected { completed: usize, total: usize },
}

/// Compute the radiance arriving along a ray.
///
/// `depth` counts bounces so far; paths deeper than `max_bounces` return the
/// background. A surface with zero reflectance is a pure emitter and ends the
/// path with its emittance.
pub fn color_of(
    ray: &Ray,
    world: &dyn Primitive,
    config: &RenderConfig,
    depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    if depth > config.max_bounces {
        return config.background;
    }

    let Some(hit) = world.intersection(ray, config.ray_interval()) else {
        return config.background;
    };

    let material = hit.material;
    let reflectance = material.reflectance();
    if reflectance == Color::ZERO {
        return material.emittance();
    }

    match material.scatter(&hit, rng) {
        Some(scattered) => {
            let incoming = color_of(&scattered, world, config, depth + 1, rng);
            material.emittance() + reflectance * incoming
        }
        None => config.background,
    }
}

/// Render a single pixel: average the samples, clamp to [0, 1] and apply
/// gamma. `y` counts rows from the bottom of the image.
pub fn render_pixel(
    camera: &dyn Camera,
    world: &dyn Primitive,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut accumulator = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let u = (x as f64 + rng.gen::<f64>()) / config.image_width as f64;
        let v = (y as f64 + rng.gen::<f64>()) / config.image_height as f64;
        let ray = camera.get_ray(u, v, rng);
        accumulator += color_of(&ray, world, config, 0, rng);
    }

    let average = accumulator / config.samples_per_pixel as f64;
    average
        .clamp(Color::ZERO, Color::ONE)
        .powf(1.0 / config.gamma_correction)
}

/// Convert a display-ready color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let c = color.clamp(Color::ZERO, Color::ONE) * 255.0;
    [c.x.round() as u8, c.y.round() as u8, c.z.round() as u8, 255]
}

/// Row-major pixel buffer; row 0 is the top of the image.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Convert to RGBA bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|color| color_to_rgba(*color)).collect()
    }

    /// Convert to an `image` buffer ready for an encoder.
    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| image::Rgba(color_to_rgba(self.get(x, y))))
    }
}

/// Render the scene into an image buffer.
///
/// Every row is its own rayon task with a private `StdRng` seeded from the
/// configured seed plus the row number. Workers report each finished pixel on
/// a bounded channel; the calling thread drains exactly one signal per pixel
/// and logs progress as it goes. A panicking worker stops the render with
/// [`RenderError::WorkersDisconnected`].
pub fn render(
    camera: &dyn Camera,
    world: &dyn Primitive,
    config: &RenderConfig,
) -> Result<ImageBuffer, RenderError> {
    config.validate()?;

    let width = config.image_width;
    let height = config.image_height;
    let total = config.pixel_count();
    let base_seed = config.seed.unwrap_or_else(rand::random);

    log::info!(
        "Rendering {}x{} @ {} spp, max {} bounces",
        width,
        height,
        config.samples_per_pixel,
        config.max_bounces
    );
    match world.bounding_box(0.0, 0.0) {
        Some(bbox) => log::debug!("Scene bounds {:?} to {:?}", bbox.min(), bbox.max()),
        None => log::warn!("Scene is unbounded; every ray tests its infinite primitives"),
    }

    let mut image = ImageBuffer::new(width, height);
    let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(total);
    let start = Instant::now();

    std::thread::scope(|scope| {
        let rows = image.pixels.par_chunks_mut(width as usize).with_max_len(1).enumerate();
        let workers = scope.spawn(move || {
            rows.for_each_with(done_tx, |done, (row, pixels)| {
                // Scanlines count up from the bottom; buffer rows count down from the top
                let y = height - 1 - row as u32;
                let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(y as u64));
                for (x, pixel) in pixels.iter_mut().enumerate() {
                    *pixel = render_pixel(camera, world, x as u32, y, config, &mut rng);
                    // Only fails once the receiver is gone, and then nobody is counting
                    let _ = done.send(());
                }
                log::debug!("Row {} done", y);
            });
        });

        let drained = drain_completions(&done_rx, total, start);

        // A panicked thread left unjoined would make the scope itself panic
        match (workers.join(), drained) {
            (Ok(()), drained) => drained,
            (Err(_), drained) => {
                log::error!("Render worker panicked");
                drained.and(Err(RenderError::WorkersDisconnected {
                    completed: total,
                    total,
                }))
            }
        }
    })?;

    log::info!("Rendered {} pixels in {:?}", total, start.elapsed());
    Ok(image)
}

/// Block until `total` completion signals arrive, logging progress estimates.
fn drain_completions(
    done: &crossbeam_channel::Receiver<()>,
    total: usize,
    start: Instant,
) -> Result<(), RenderError> {
    let report_every = (total / 10).max(1);

    for completed in 1..=total {
        done.recv().map_err(|_| RenderError::WorkersDisconnected {
            completed: completed - 1,
            total,
        })?;

        if completed % report_every == 0 {
            let elapsed = start.elapsed();
            let estimated = estimate_total(elapsed, completed, total);
            log::info!(
                "{:5.1}% - est. remaining ~{:?}, total ~{:?}",
                100.0 * completed as f64 / total as f64,
                estimated.saturating_sub(elapsed),
                estimated
            );
        }
    }

    Ok(())
}

/// Linear extrapolation of the total render time from the work done so far.
fn estimate_total(elapsed: Duration, completed: usize, total: usize) -> Duration {
    elapsed.mul_f64(total as f64 / completed.max(1) as f64)
}
