//! Fluorescence renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer built from analytic primitives
//! (triangles, axis-aligned rectangles, disks, cylinders, pyramids),
//! a small set of materials and a row-parallel render driver.

mod camera;
mod config;
mod cylinder;
mod disk;
mod list;
mod material;
mod primitive;
mod pyramid;
mod rectangle;
mod renderer;
mod triangle;

pub use camera::{Camera, LookAtCamera};
pub use config::{ConfigError, RenderConfig};
pub use cylinder::{Cylinder, InfiniteCylinder};
pub use disk::{Disk, HollowDisk};
pub use list::PrimitiveList;
pub use material::{schlick, Absorber, Color, Dielectric, DiffuseLight, Lambertian, Material, Metal};
pub use primitive::{GeometryError, GeometryResult, Primitive, RayHit};
pub use pyramid::Pyramid;
pub use rectangle::{AxisRectangle, Plane, Rectangle};
pub use renderer::{color_of, color_to_rgba, render, render_pixel, ImageBuffer, RenderError};
pub use triangle::Triangle;

/// Re-export DVec3 and common math types from fluo_math
pub use fluo_math::{Aabb, DVec3, Interval, Ray, VectorExt};
