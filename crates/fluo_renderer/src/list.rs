//! Flat aggregate of primitives with per-child bounding-box culling.

use crate::{
    material::Material,
    primitive::{Primitive, RayHit},
};
use fluo_math::{Aabb, Interval, Ray};
use std::sync::Arc;

/// A child primitive and its cached bounding box (`None` when unbounded).
#[derive(Clone)]
struct Entry {
    primitive: Box<dyn Primitive>,
    bbox: Option<Aabb>,
}

/// An ordered list of primitives that is itself a primitive.
///
/// Intersection returns the closest hit across all children. Each child's
/// box is tested before the child itself; unbounded children are always tested.
#[derive(Clone, Default)]
pub struct PrimitiveList {
    entries: Vec<Entry>,
}

impl PrimitiveList {
    /// Create a new empty list.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Build a list from any sequence of boxed primitives.
    pub fn from_primitives<I>(primitives: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn Primitive>>,
    {
        let mut list = Self::new();
        for primitive in primitives {
            list.push(primitive);
        }
        list
    }

    /// Add a primitive to the list, caching its bounding box.
    pub fn push(&mut self, primitive: Box<dyn Primitive>) {
        let bbox = primitive.bounding_box(0.0, 0.0);
        self.entries.push(Entry { primitive, bbox });
    }

    /// Get the number of primitives.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the children in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Primitive> {
        self.entries.iter().map(|entry| entry.primitive.as_ref())
    }
}

impl Primitive for PrimitiveList {
    fn intersection(&self, ray: &Ray, ray_t: Interval) -> Option<RayHit<'_>> {
        let mut closest: Option<RayHit<'_>> = None;
        let mut closest_so_far = ray_t.max;

        for entry in &self.entries {
            let interval = ray_t.with_max(closest_so_far);
            if let Some(bbox) = &entry.bbox {
                if !bbox.hit(ray, interval) {
                    continue;
                }
            }
            if let Some(hit) = entry.primitive.intersection(ray, interval) {
                closest_so_far = hit.t;
                closest = Some(hit);
            }
        }

        closest
    }

    fn bounding_box(&self, t0: f64, t1: f64) -> Option<Aabb> {
        let mut boxes = self.entries.iter().map(|entry| {
            if entry.primitive.is_infinite() {
                None
            } else {
                entry.primitive.bounding_box(t0, t1)
            }
        });

        let first = boxes.next()??;
        boxes.try_fold(first, |acc, bbox| Some(Aabb::surrounding(&acc, &bbox?)))
    }

    fn set_material(&mut self, material: Arc<dyn Material>) {
        for entry in &mut self.entries {
            entry.primitive.set_material(material.clone());
        }
    }

    fn is_infinite(&self) -> bool {
        self.entries.iter().any(|entry| entry.primitive.is_infinite())
    }

    fn box_clone(&self) -> Box<dyn Primitive> {
        Box::new(self.clone())
    }
}
