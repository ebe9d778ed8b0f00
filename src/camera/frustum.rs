//! View frustum for culling
//!
//! Extracts frustum planes from a GL-style view-projection matrix and
//! provides intersection tests for points, spheres and boxes.

use glam::{DMat4, DVec3, DVec4};

use crate::util::Aabb;

/// A plane in 3D space, represented as (normal.x, normal.y, normal.z, distance)
/// where the plane equation is: ax + by + cz + d = 0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal pointing out of the frustum.
    pub normal: DVec3,
    /// Signed distance from origin (`n · p + d = 0`).
    pub distance: f64,
}

impl Plane {
    /// Create a plane from coefficients and normalize it
    #[must_use]
    pub fn from_coefficients(coefficients: DVec4) -> Self {
        let normal = coefficients.truncate();
        let len = normal.length();
        if len > 0.0 {
            Self {
                normal: normal / len,
                distance: coefficients.w / len,
            }
        } else {
            Self {
                normal: DVec3::ZERO,
                distance: 0.0,
            }
        }
    }

    /// Signed distance from point to plane (positive = outside, negative =
    /// inside)
    #[inline]
    #[must_use]
    pub fn distance_to_point(&self, point: DVec3) -> f64 {
        self.normal.dot(point) + self.distance
    }

    /// Box corner furthest along the inward direction. If even this corner is
    /// on the outer side, the whole box is.
    #[inline]
    #[must_use]
    pub fn nearest_corner(&self, aabb: &Aabb) -> DVec3 {
        DVec3::new(
            if self.normal.x > 0.0 { aabb.min.x } else { aabb.max.x },
            if self.normal.y > 0.0 { aabb.min.y } else { aabb.max.y },
            if self.normal.z > 0.0 { aabb.min.z } else { aabb.max.z },
        )
    }
}

/// Corner pairs forming the twelve frustum edges, indexing
/// [`Frustum::corners`].
pub const FRUSTUM_EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// View frustum consisting of 6 planes
#[derive(Debug, Clone, PartialEq)]
pub struct Frustum {
    /// Six clipping planes: near, far, top, bottom, left, right.
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extract frustum planes from a view-projection matrix.
    /// Uses the Gribb/Hartmann method for plane extraction with a `[-1, 1]`
    /// depth range. Normals point outward.
    #[must_use]
    pub fn from_view_projection(vp: &DMat4) -> Self {
        let row0 = vp.row(0);
        let row1 = vp.row(1);
        let row2 = vp.row(2);
        let row3 = vp.row(3);

        let near = -(row3 + row2);
        let far = row2 - row3;
        let top = row1 - row3;
        let bottom = -(row3 + row1);
        let left = -(row3 + row0);
        let right = row0 - row3;

        Self {
            planes: [near, far, top, bottom, left, right]
                .map(Plane::from_coefficients),
        }
    }

    /// World-space frustum corners: near face first, then far face, each
    /// wound bottom-left, bottom-right, top-right, top-left. `None` when the
    /// matrix is singular.
    #[must_use]
    pub fn corners(vp: &DMat4) -> Option<[DVec3; 8]> {
        let inv = vp.inverse();
        if !inv.is_finite() {
            return None;
        }
        let ndc = [
            DVec3::new(-1.0, -1.0, -1.0),
            DVec3::new(1.0, -1.0, -1.0),
            DVec3::new(1.0, 1.0, -1.0),
            DVec3::new(-1.0, 1.0, -1.0),
            DVec3::new(-1.0, -1.0, 1.0),
            DVec3::new(1.0, -1.0, 1.0),
            DVec3::new(1.0, 1.0, 1.0),
            DVec3::new(-1.0, 1.0, 1.0),
        ];
        let mut out = [DVec3::ZERO; 8];
        for (dst, p) in out.iter_mut().zip(ndc) {
            let h = inv * p.extend(1.0);
            if h.w == 0.0 {
                return None;
            }
            *dst = h.truncate() / h.w;
        }
        Some(out)
    }

    /// Test if a point is strictly inside the frustum
    #[inline]
    #[must_use]
    pub fn contains_point(&self, point: DVec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(point) < 0.0)
    }

    /// Test if a sphere intersects or is inside the frustum
    #[inline]
    #[must_use]
    pub fn intersects_sphere(&self, center: DVec3, radius: f64) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(center) <= radius)
    }

    /// Test if a sphere is completely inside the frustum (not just
    /// intersecting)
    #[inline]
    #[must_use]
    pub fn contains_sphere(&self, center: DVec3, radius: f64) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(center) < -radius)
    }

    /// Conservative box rejection: `true` when the box lies entirely outside
    /// one of the planes. Boxes near frustum edges may pass even though they
    /// are outside.
    #[inline]
    #[must_use]
    pub fn is_aabb_outside(&self, aabb: &Aabb) -> bool {
        self.planes.iter().any(|plane| {
            plane.distance_to_point(plane.nearest_corner(aabb)) > 0.0
        })
    }

    /// Exact box rejection. Adds the frustum-corner separation test to
    /// [`Frustum::is_aabb_outside`], catching boxes beside frustum edges.
    #[must_use]
    pub fn is_aabb_outside_exact(
        &self,
        aabb: &Aabb,
        corners: &[DVec3; 8],
    ) -> bool {
        if self.is_aabb_outside(aabb) {
            return true;
        }
        (0..3).any(|axis| {
            corners.iter().all(|c| c[axis] > aabb.max[axis])
                || corners.iter().all(|c| c[axis] < aabb.min[axis])
        })
    }

    /// `true` when all eight box corners are strictly inside.
    #[must_use]
    pub fn contains_aabb(&self, aabb: &Aabb) -> bool {
        aabb.corners().iter().all(|&c| self.contains_point(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_vp() -> DMat4 {
        let proj =
            DMat4::perspective_rh_gl(45.0_f64.to_radians(), 1.0, 0.1, 100.0);
        let view = DMat4::look_at_rh(
            DVec3::new(0.0, 0.0, 10.0),
            DVec3::ZERO,
            DVec3::Y,
        );
        proj * view
    }

    #[test]
    fn test_frustum_contains_origin() {
        let frustum = Frustum::from_view_projection(&test_vp());

        // Origin should be inside the frustum
        assert!(frustum.contains_point(DVec3::ZERO));

        // Point far behind camera should be outside
        assert!(!frustum.contains_point(DVec3::new(0.0, 0.0, 20.0)));
    }

    #[test]
    fn test_planes_are_normalized_and_outward() {
        let frustum = Frustum::from_view_projection(&test_vp());
        for plane in &frustum.planes {
            assert!((plane.normal.length() - 1.0).abs() < 1e-9);
            assert!(plane.distance_to_point(DVec3::ZERO) < 0.0);
        }
        // Near plane faces the camera
        assert!(frustum.planes[0].normal.z > 0.99);
    }

    #[test]
    fn test_sphere_intersection() {
        let frustum = Frustum::from_view_projection(&test_vp());

        // Sphere at origin should intersect
        assert!(frustum.intersects_sphere(DVec3::ZERO, 1.0));
        assert!(frustum.contains_sphere(DVec3::ZERO, 1.0));

        // Sphere behind camera that doesn't reach frustum
        assert!(!frustum.intersects_sphere(DVec3::new(0.0, 0.0, 50.0), 1.0));
    }

    #[test]
    fn test_aabb_outside() {
        let frustum = Frustum::from_view_projection(&test_vp());
        let inside = Aabb::new(DVec3::splat(-1.0), DVec3::splat(1.0));
        let behind =
            Aabb::new(DVec3::new(-1.0, -1.0, 20.0), DVec3::new(1.0, 1.0, 22.0));
        let straddling =
            Aabb::new(DVec3::new(-1.0, -1.0, 5.0), DVec3::new(1.0, 1.0, 30.0));
        assert!(!frustum.is_aabb_outside(&inside));
        assert!(frustum.is_aabb_outside(&behind));
        assert!(!frustum.is_aabb_outside(&straddling));
        assert!(frustum.contains_aabb(&inside));
        assert!(!frustum.contains_aabb(&straddling));
    }

    #[test]
    fn test_exact_test_catches_edge_boxes() {
        let vp = test_vp();
        let frustum = Frustum::from_view_projection(&vp);
        let corners = Frustum::corners(&vp).unwrap();
        // Beyond the far plane diagonally, outside every corner's x range
        let far_side = Aabb::new(
            DVec3::new(500.0, -1.0, -200.0),
            DVec3::new(510.0, 1.0, -190.0),
        );
        assert!(frustum.is_aabb_outside_exact(&far_side, &corners));
    }

    #[test]
    fn test_corners_lie_on_planes() {
        let vp = test_vp();
        let frustum = Frustum::from_view_projection(&vp);
        let corners = Frustum::corners(&vp).unwrap();
        // Near face corners sit on the near plane
        for c in &corners[..4] {
            assert!(frustum.planes[0].distance_to_point(*c).abs() < 1e-6);
        }
        for c in &corners[4..] {
            assert!(frustum.planes[1].distance_to_point(*c).abs() < 1e-4);
        }
        for [a, b] in FRUSTUM_EDGES {
            assert!(corners[a].distance(corners[b]) > 0.0);
        }
    }

    #[test]
    fn test_singular_matrix_has_no_corners() {
        assert!(Frustum::corners(&DMat4::ZERO).is_none());
    }
}
