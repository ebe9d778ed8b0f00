use glam::{DMat4, DVec3};

use crate::camera::Camera;
use crate::options::ZeroAreaMode;
use crate::scene::Drawable;
use crate::util::{Aabb, BoundingSphere};

/// Area returned for a box surrounding the eye; never culled.
const INSIDE_AREA: f64 = 1e9;

/// Silhouette vertices of a box as seen from each of the 27 eye regions,
/// indexed by the 6-bit outcode of the eye against the box planes. Each row
/// is a vertex count followed by up to six [`Aabb::corners`] indices in
/// winding order. Unused outcodes have a zero count.
#[rustfmt::skip]
const SILHOUETTE: [[u8; 7]; 43] = [
    [0, 0, 0, 0, 0, 0, 0], // inside
    [4, 0, 4, 7, 3, 0, 0], // -x
    [4, 1, 2, 6, 5, 0, 0], // +x
    [0, 0, 0, 0, 0, 0, 0],
    [4, 0, 1, 5, 4, 0, 0], // -z
    [6, 0, 1, 2, 6, 5, 4],
    [6, 0, 1, 2, 6, 5, 4],
    [0, 0, 0, 0, 0, 0, 0],
    [4, 2, 3, 7, 6, 0, 0], // +z
    [6, 4, 7, 6, 2, 3, 0],
    [6, 2, 3, 7, 6, 5, 1],
    [0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0],
    [4, 0, 3, 2, 1, 0, 0], // -y
    [6, 0, 4, 7, 3, 2, 1],
    [6, 0, 3, 2, 6, 5, 1],
    [0, 0, 0, 0, 0, 0, 0],
    [6, 0, 3, 2, 1, 5, 4],
    [6, 1, 5, 4, 7, 3, 2],
    [6, 0, 3, 2, 6, 5, 4],
    [0, 0, 0, 0, 0, 0, 0],
    [6, 0, 3, 7, 6, 2, 1],
    [6, 0, 4, 7, 6, 2, 1],
    [6, 0, 3, 7, 6, 5, 1],
    [0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0],
    [4, 4, 5, 6, 7, 0, 0], // +y
    [6, 4, 5, 6, 7, 3, 0],
    [6, 1, 2, 6, 7, 4, 5],
    [0, 0, 0, 0, 0, 0, 0],
    [6, 0, 1, 5, 6, 7, 4],
    [6, 0, 1, 5, 6, 7, 3],
    [6, 0, 1, 2, 6, 7, 4],
    [0, 0, 0, 0, 0, 0, 0],
    [6, 2, 3, 7, 4, 5, 6],
    [6, 0, 4, 5, 6, 2, 3],
    [6, 1, 2, 3, 7, 4, 5],
];

/// Culls drawables whose screen footprint is under about 2x2 pixels.
///
/// Camera state is snapshotted by [`ZeroAreaCull::update`]; the per-drawable
/// test is then a handful of multiplies. Orthographic views are never culled
/// here.
#[derive(Debug, Clone)]
pub struct ZeroAreaCull {
    mode: ZeroAreaMode,
    perspective: bool,
    eye: DVec3,
    back: DVec3,
    /// `1 / tan(fov / 2)`.
    focal: f64,
    distance: f64,
    view_projection: DMat4,
    threshold: f64,
    area_threshold: f64,
}

impl ZeroAreaCull {
    /// Cull using `mode` to estimate footprints.
    #[must_use]
    pub fn new(mode: ZeroAreaMode) -> Self {
        Self {
            mode,
            perspective: true,
            eye: DVec3::ZERO,
            back: DVec3::Z,
            focal: 1.0,
            distance: 1.0,
            view_projection: DMat4::IDENTITY,
            threshold: 0.0,
            area_threshold: 0.0,
        }
    }

    /// Snapshot the camera and recompute the pixel thresholds from the
    /// viewport.
    pub fn update(&mut self, camera: &Camera) {
        self.perspective = camera.is_perspective();
        self.eye = camera.eye();
        self.back = camera.back_axis();
        self.focal = camera.projection_matrix().y_axis.y;
        self.distance = camera.distance();
        self.view_projection = *camera.view_projection();

        let viewport = camera.viewport();
        let inv_x = 2.0 / f64::from(viewport.width.max(1));
        let inv_y = 2.0 / f64::from(viewport.height.max(1));
        self.threshold = inv_x.min(inv_y) * 4.0;
        // Twice the NDC area of a 2x2 pixel square
        self.area_threshold = 2.0 * (inv_x * 2.0) * (inv_y * 2.0);
    }

    /// Footprint estimator in use.
    #[must_use]
    pub fn mode(&self) -> ZeroAreaMode {
        self.mode
    }

    /// Switch footprint estimator.
    pub fn set_mode(&mut self, mode: ZeroAreaMode) {
        self.mode = mode;
    }

    /// Radius threshold from the last update.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// `true` when the drawable would cover less than the pixel threshold.
    #[must_use]
    pub fn is_culled(&self, drawable: &Drawable) -> bool {
        if !self.perspective {
            return false;
        }
        let too_small = match self.mode {
            ZeroAreaMode::Approximate => {
                let ratio = self.projected_ratio(&drawable.bsphere);
                culls_ratio(ratio, self.threshold)
            }
            ZeroAreaMode::Precise => {
                let area = self.projected_area(&drawable.bbox);
                area.abs() < self.area_threshold
            }
        };
        if too_small {
            return true;
        }
        drawable.mesh_radius.is_some_and(|radius| {
            radius * self.focal / self.distance < self.threshold
        })
    }

    /// Projected sphere radius over the near-plane half height.
    #[must_use]
    pub fn projected_ratio(&self, sphere: &BoundingSphere) -> f64 {
        let depth = -(sphere.center - self.eye).dot(self.back);
        sphere.radius * self.focal / depth
    }

    /// Twice the signed NDC area of the box silhouette, or a large value
    /// when the eye is inside the box or part of the silhouette is behind
    /// the eye.
    #[must_use]
    pub fn projected_area(&self, bbox: &Aabb) -> f64 {
        let eye = self.eye;
        let outcode = usize::from(eye.x < bbox.min.x)
            | usize::from(eye.x > bbox.max.x) << 1
            | usize::from(eye.z < bbox.min.z) << 2
            | usize::from(eye.z > bbox.max.z) << 3
            | usize::from(eye.y < bbox.min.y) << 4
            | usize::from(eye.y > bbox.max.y) << 5;
        let Some(row) = SILHOUETTE.get(outcode) else {
            return INSIDE_AREA;
        };
        let count = usize::from(row[0]);
        if count == 0 {
            return INSIDE_AREA;
        }

        let corners = bbox.corners();
        let mut projected = [(0.0, 0.0); 6];
        for (dst, &index) in projected.iter_mut().zip(&row[1..=count]) {
            let corner = corners[usize::from(index)];
            let clip = self.view_projection * corner.extend(1.0);
            if clip.w <= 0.0 {
                return INSIDE_AREA;
            }
            *dst = (clip.x / clip.w, clip.y / clip.w);
        }

        let polygon = &projected[..count];
        let mut sum = 0.0;
        for (i, &(x0, y0)) in polygon.iter().enumerate() {
            let (x1, y1) = polygon[(i + 1) % count];
            sum += (x1 - x0) * (y0 + y1);
        }
        sum
    }
}

/// The footprint test: culled when the ratio is positive and strictly below
/// the threshold. A zero ratio (eye at the drawable center) is kept.
#[must_use]
pub fn culls_ratio(ratio: f64, threshold: f64) -> bool {
    ratio > 0.0 && ratio < threshold
}
