//! Simple path tracer example.
//!
//! Renders a closed room lit from the ceiling and saves it as a PNG.
//! An optional first argument names a JSON render configuration.
//!
//! ```text
//! RUST_LOG=info cargo run --release --example simple_render -- config.json
//! ```

use anyhow::{Context, Result};
use fluo_renderer::{
    render, Color, Cylinder, DVec3, Dielectric, DiffuseLight, Disk, Lambertian, LookAtCamera, Material, Metal,
    Primitive, PrimitiveList, Pyramid, Ray, Rectangle, RenderConfig, Triangle,
};
use std::sync::Arc;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            RenderConfig::from_json_str(&json).with_context(|| format!("parsing {path}"))?
        }
        None => RenderConfig {
            image_width: 400,
            image_height: 400,
            samples_per_pixel: 64,
            max_bounces: 8,
            seed: Some(7),
            ..Default::default()
        },
    };

    let start = std::time::Instant::now();
    let world = build_scene()?;
    log::info!("Scene built with {} primitives in {:?}", world.len(), start.elapsed());

    let mut camera = LookAtCamera::new()
        .with_resolution(config.image_width, config.image_height)
        .with_position(DVec3::new(2.75, 2.75, -8.0), DVec3::new(2.75, 2.75, 0.0), DVec3::Y)
        .with_lens(38.0, 0.0, 10.0);
    camera.initialize();

    let image = render(&camera, &world, &config)?;

    let filename = "output.png";
    image.to_image().save(filename).with_context(|| format!("saving {filename}"))?;
    log::info!("Saved to {}", filename);
    Ok(())
}

fn with_material<P: Primitive + 'static>(mut primitive: P, material: &Arc<dyn Material>) -> Box<dyn Primitive> {
    primitive.set_material(Arc::clone(material));
    Box::new(primitive)
}

fn build_scene() -> Result<PrimitiveList> {
    let white: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.73)));
    let red: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let green: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.12, 0.45, 0.15)));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(15.0)));
    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    let mirror: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.8, 0.85, 0.88), 0.0));
    let brushed: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.9, 0.6, 0.3), 0.2));

    let size = 5.5;
    let mut world = PrimitiveList::new();

    // Walls, floor and ceiling; the open side faces the camera at -z
    world.push(with_material(
        Rectangle::new(DVec3::ZERO, DVec3::new(0.0, size, size), false, false)?,
        &green,
    ));
    world.push(with_material(
        Rectangle::new(DVec3::new(size, 0.0, 0.0), DVec3::new(size, size, size), false, true)?,
        &red,
    ));
    world.push(with_material(
        Rectangle::new(DVec3::ZERO, DVec3::new(size, 0.0, size), false, false)?,
        &white,
    ));
    world.push(with_material(
        Rectangle::new(DVec3::new(0.0, size, 0.0), DVec3::new(size, size, size), false, true)?,
        &white,
    ));
    world.push(with_material(
        Rectangle::new(DVec3::new(0.0, 0.0, size), DVec3::new(size, size, size), false, true)?,
        &white,
    ));

    world.push(with_material(
        Rectangle::new(DVec3::new(2.0, size - 0.01, 2.0), DVec3::new(3.5, size - 0.01, 3.5), false, true)?,
        &light,
    ));

    world.push(with_material(
        Pyramid::new(DVec3::new(0.6, 0.0, 2.8), DVec3::new(2.2, 0.0, 4.4), 2.2, false)?,
        &white,
    ));
    world.push(with_material(
        Cylinder::new(Ray::new(DVec3::new(3.9, 0.0, 2.0), DVec3::Y), 1.6, 0.7)?.with_caps(true),
        &glass,
    ));
    world.push(with_material(
        Disk::new(DVec3::new(2.75, 2.8, size - 0.02), DVec3::NEG_Z, 1.0, true)?,
        &mirror,
    ));
    world.push(with_material(
        Triangle::new(
            DVec3::new(1.0, 0.0, 1.0),
            DVec3::new(2.0, 0.0, 1.0),
            DVec3::new(1.5, 0.9, 1.2),
            false,
        )?,
        &brushed,
    ));

    Ok(world)
}
