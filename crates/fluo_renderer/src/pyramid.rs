//! Square-based pyramid built from a rectangle and four triangles.

use crate::{
    list::PrimitiveList,
    material::Material,
    primitive::{GeometryError, GeometryResult, Primitive, RayHit},
    rectangle::Rectangle,
    triangle::Triangle,
};
use fluo_math::{Aabb, DVec3, Interval, Ray};
use std::sync::Arc;

/// Upright pyramid over an axis-aligned rectangular base in an XZ plane.
///
/// The faces live in an owned [`PrimitiveList`]. The pyramid's own box is
/// tested before any face is.
#[derive(Clone)]
pub struct Pyramid {
    faces: PrimitiveList,
    bbox: Aabb,
}

impl Pyramid {
    /// Build a pyramid from two opposite base corners and the apex height
    /// above the base center.
    ///
    /// Normals point out of the solid unless `has_inverted_normals` is set.
    pub fn new(a: DVec3, b: DVec3, height: f64, has_inverted_normals: bool) -> GeometryResult<Self> {
        if height <= 0.0 {
            return Err(GeometryError::NonPositiveHeight(height));
        }
        if a.y != b.y {
            return Err(GeometryError::UnlevelBase(a.y, b.y));
        }

        let base = Rectangle::new(a, b, false, !has_inverted_normals)?;

        let c1 = a.min(b);
        let c3 = a.max(b);
        let c2 = DVec3::new(c1.x, c1.y, c3.z);
        let c4 = DVec3::new(c3.x, c1.y, c1.z);
        let apex = (c1 + c3) * 0.5 + DVec3::Y * height;

        let mut faces = PrimitiveList::new();
        faces.push(Box::new(base));
        for (from, to) in [(c1, c2), (c2, c3), (c3, c4), (c4, c1)] {
            let (p, q) = if has_inverted_normals { (to, from) } else { (from, to) };
            faces.push(Box::new(Triangle::new(p, q, apex, false)?));
        }

        let bbox = Aabb::padded(c1, DVec3::new(c3.x, c1.y + height, c3.z));
        log::debug!("Built pyramid over {:?}..{:?} with apex {:?}", c1, c3, apex);

        Ok(Self { faces, bbox })
    }
}

impl Primitive for Pyramid {
    fn intersection(&self, ray: &Ray, ray_t: Interval) -> Option<RayHit<'_>> {
        if !self.bbox.hit(ray, ray_t) {
            return None;
        }
        self.faces.intersection(ray, ray_t)
    }

    fn bounding_box(&self, _t0: f64, _t1: f64) -> Option<Aabb> {
        Some(self.bbox)
    }

    fn set_material(&mut self, material: Arc<dyn Material>) {
        self.faces.set_material(material);
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn box_clone(&self) -> Box<dyn Primitive> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::DiffuseLight;
    use crate::primitive::test_util::{assert_hit_consistent, off_plane, open_range};
    use crate::Color;

    fn unit_pyramid(inverted: bool) -> Pyramid {
        Pyramid::new(DVec3::ZERO, DVec3::new(1.0, 0.0, 1.0), 1.0, inverted).unwrap()
    }

    #[test]
    fn test_hit_slanted_face_from_above() {
        let pyramid = unit_pyramid(false);
        let ray = Ray::new(DVec3::new(0.5, 5.0, 0.4), DVec3::NEG_Y);

        let hit = pyramid.intersection(&ray, open_range()).expect("hit");
        let expected = DVec3::new(0.0, 0.5, -1.0).normalize();
        assert_hit_consistent(&hit, open_range(), off_plane(DVec3::ZERO, expected));
        assert!((hit.t - 4.2).abs() < 1e-9);

        assert!((hit.normal - expected).length() < 1e-9);
    }

    #[test]
    fn test_hit_base_from_below() {
        let pyramid = unit_pyramid(false);
        let ray = Ray::new(DVec3::new(0.5, -1.0, 0.5), DVec3::Y);

        let hit = pyramid.intersection(&ray, open_range()).expect("hit");
        assert!((hit.t - 1.0).abs() < 1e-12);
        assert_eq!(hit.normal, DVec3::NEG_Y);
    }

    #[test]
    fn test_inverted_normals_point_inward() {
        let pyramid = unit_pyramid(true);

        let base = pyramid
            .intersection(&Ray::new(DVec3::new(0.5, -1.0, 0.5), DVec3::Y), open_range())
            .unwrap();
        assert_eq!(base.normal, DVec3::Y);

        let side = pyramid
            .intersection(&Ray::new(DVec3::new(0.5, 5.0, 0.4), DVec3::NEG_Y), open_range())
            .unwrap();
        assert!(side.normal.y < 0.0);
    }

    #[test]
    fn test_miss_outside_box() {
        let pyramid = unit_pyramid(false);
        let ray = Ray::new(DVec3::new(2.0, 5.0, 0.5), DVec3::NEG_Y);
        assert!(pyramid.intersection(&ray, open_range()).is_none());

        // Near the rim the slope is low
        let rim = Ray::new(DVec3::new(0.05, 5.0, 0.5), DVec3::NEG_Y);
        let hit = pyramid.intersection(&rim, open_range()).unwrap();
        assert!((hit.point().y - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            Pyramid::new(DVec3::ZERO, DVec3::new(1.0, 0.0, 1.0), 0.0, false).err(),
            Some(GeometryError::NonPositiveHeight(0.0))
        );
        assert_eq!(
            Pyramid::new(DVec3::ZERO, DVec3::new(1.0, 0.5, 1.0), 1.0, false).err(),
            Some(GeometryError::UnlevelBase(0.0, 0.5))
        );
        assert_eq!(
            Pyramid::new(DVec3::ZERO, DVec3::new(1.0, 0.0, 0.0), 1.0, false).err(),
            Some(GeometryError::DegenerateRectangle)
        );
    }

    #[test]
    fn test_bounding_box_and_closed() {
        let pyramid = unit_pyramid(false);
        let bbox = pyramid.bounding_box(0.0, 0.0).unwrap();

        assert!(bbox.contains_box(&Aabb::from_points(DVec3::ZERO, DVec3::ONE)));
        assert!(pyramid.is_closed());
        assert!(!pyramid.is_infinite());
    }

    #[test]
    fn test_material_applies_to_all_faces() {
        let mut pyramid = unit_pyramid(false);
        pyramid.set_material(Arc::new(DiffuseLight::new(Color::ONE)));

        let rays = [
            Ray::new(DVec3::new(0.5, -1.0, 0.5), DVec3::Y),
            Ray::new(DVec3::new(0.5, 5.0, 0.4), DVec3::NEG_Y),
            Ray::new(DVec3::new(-3.0, 0.2, 0.5), DVec3::X),
        ];
        for ray in &rays {
            let hit = pyramid.intersection(ray, open_range()).unwrap();
            assert_eq!(hit.material.emittance(), Color::ONE);
        }
    }
}
