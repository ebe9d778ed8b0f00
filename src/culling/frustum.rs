use glam::{DMat4, DVec3};

use crate::camera::Frustum;
use crate::scene::Drawable;
use crate::util::Aabb;

/// Result of testing one drawable against the frustum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrustumVerdict {
    /// The drawable is outside.
    pub culled: bool,
    /// Plane evaluations performed.
    pub planes_tested: u32,
}

/// Frustum test with per-plane corner selection precomputed once per camera
/// change.
///
/// When the whole scene fits inside the frustum every drawable passes
/// without touching a plane.
#[derive(Debug, Clone)]
pub struct FrustumCull {
    frustum: Frustum,
    /// Per plane and axis: take the box minimum (else maximum).
    use_min: [[bool; 3]; 6],
    thresholds: [f64; 6],
    contains_scene: bool,
}

impl Default for FrustumCull {
    fn default() -> Self {
        Self::new(&DMat4::IDENTITY, None)
    }
}

impl FrustumCull {
    /// Frustum for `view_projection`, checking containment of `scene_bbox`.
    #[must_use]
    pub fn new(view_projection: &DMat4, scene_bbox: Option<&Aabb>) -> Self {
        let mut cull = Self {
            frustum: Frustum::from_view_projection(view_projection),
            use_min: [[false; 3]; 6],
            thresholds: [0.0; 6],
            contains_scene: false,
        };
        cull.update(view_projection, scene_bbox);
        cull
    }

    /// Re-extract the planes and re-check scene containment.
    pub fn update(
        &mut self,
        view_projection: &DMat4,
        scene_bbox: Option<&Aabb>,
    ) {
        self.frustum = Frustum::from_view_projection(view_projection);
        for (i, plane) in self.frustum.planes.iter().enumerate() {
            self.use_min[i] = plane.normal.to_array().map(|n| n > 0.0);
            self.thresholds[i] = -plane.distance;
        }
        self.contains_scene =
            scene_bbox.is_some_and(|bbox| self.frustum.contains_aabb(bbox));
    }

    /// Whether the last update found the whole scene inside.
    #[must_use]
    pub fn contains_scene(&self) -> bool {
        self.contains_scene
    }

    /// Current planes.
    #[must_use]
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// Test a drawable, reporting how many planes were evaluated.
    #[must_use]
    pub fn evaluate(&self, drawable: &Drawable) -> FrustumVerdict {
        if self.contains_scene {
            return FrustumVerdict {
                culled: false,
                planes_tested: 0,
            };
        }
        let bbox = &drawable.bbox;
        let mut planes_tested = 0;
        for (i, plane) in self.frustum.planes.iter().enumerate() {
            planes_tested += 1;
            let [x, y, z] = self.use_min[i];
            let corner = DVec3::new(
                if x { bbox.min.x } else { bbox.max.x },
                if y { bbox.min.y } else { bbox.max.y },
                if z { bbox.min.z } else { bbox.max.z },
            );
            if plane.normal.dot(corner) > self.thresholds[i] {
                return FrustumVerdict {
                    culled: true,
                    planes_tested,
                };
            }
        }
        FrustumVerdict {
            culled: false,
            planes_tested,
        }
    }

    /// `true` when the drawable is outside the frustum.
    #[must_use]
    pub fn is_culled(&self, drawable: &Drawable) -> bool {
        self.evaluate(drawable).culled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp() -> DMat4 {
        let proj =
            DMat4::perspective_rh_gl(45.0_f64.to_radians(), 1.0, 0.1, 100.0);
        let view = DMat4::look_at_rh(
            DVec3::new(0.0, 0.0, 10.0),
            DVec3::ZERO,
            DVec3::Y,
        );
        proj * view
    }

    fn boxed(min: [f64; 3], max: [f64; 3]) -> Drawable {
        Drawable::new(Aabb::new(
            DVec3::from_array(min),
            DVec3::from_array(max),
        ))
    }

    #[test]
    fn contained_scene_skips_plane_math() {
        let scene = Aabb::new(DVec3::splat(-1.0), DVec3::splat(1.0));
        let cull = FrustumCull::new(&vp(), Some(&scene));
        assert!(cull.contains_scene());

        // Even a drawable far outside passes without evaluation
        let outside = boxed([50.0, 50.0, 50.0], [51.0, 51.0, 51.0]);
        let verdict = cull.evaluate(&outside);
        assert!(!verdict.culled);
        assert_eq!(verdict.planes_tested, 0);
    }

    #[test]
    fn uncontained_scene_tests_planes() {
        let scene = Aabb::new(DVec3::splat(-500.0), DVec3::splat(500.0));
        let cull = FrustumCull::new(&vp(), Some(&scene));
        assert!(!cull.contains_scene());

        let inside = boxed([-1.0; 3], [1.0; 3]);
        let verdict = cull.evaluate(&inside);
        assert!(!verdict.culled);
        assert_eq!(verdict.planes_tested, 6);

        let behind = boxed([-1.0, -1.0, 20.0], [1.0, 1.0, 22.0]);
        assert!(cull.is_culled(&behind));
    }

    #[test]
    fn matches_generic_box_test() {
        let vp = vp();
        let cull = FrustumCull::new(&vp, None);
        let frustum = Frustum::from_view_projection(&vp);
        for x in [-30.0, -5.0, 0.0, 4.0, 30.0] {
            for z in [-120.0, -50.0, 0.0, 9.0, 15.0] {
                let d = boxed([x, -1.0, z], [x + 2.0, 1.0, z + 2.0]);
                assert_eq!(
                    cull.is_culled(&d),
                    frustum.is_aabb_outside(&d.bbox),
                    "box at ({x}, {z})"
                );
            }
        }
    }
}
