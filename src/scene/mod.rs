//! The scene as the camera sees it: overall bounds, section box and the
//! per-drawable records consumed by culling.
//!
//! Geometry, materials and the BIM element hierarchy live with the renderer;
//! only bounding volumes and index ranges cross into this crate.

mod clipping;
mod drawable;

pub use clipping::Clipping;
pub use drawable::{BimNode, Drawable, IndexRange, Layer};
use glam::DVec3;

use crate::util::Aabb;

/// Extent of the loaded model.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneBounds {
    /// Bounding box of the whole model.
    pub bbox: Aabb,
    /// Half of the bounding box diagonal.
    pub radius: f64,
    /// Half of the longest bounding box edge.
    pub scale: f64,
    /// Section box.
    pub clipping: Clipping,
    /// Whether the model carries BIM regions worth culling.
    pub bim_culling_needed: bool,
}

impl SceneBounds {
    /// Bounds derived from the model bounding box.
    #[must_use]
    pub fn new(bbox: Aabb) -> Self {
        Self {
            bbox,
            radius: bbox.diagonal() * 0.5,
            scale: bbox.half_max_extent(),
            clipping: Clipping::new(bbox),
            bim_culling_needed: false,
        }
    }

    /// Center of the model bounding box.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        self.bbox.center()
    }
}

impl Default for SceneBounds {
    fn default() -> Self {
        Self::new(Aabb::new(DVec3::splat(-1.0), DVec3::splat(1.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_and_scale_follow_bbox() {
        let scene = SceneBounds::new(Aabb::new(
            DVec3::ZERO,
            DVec3::new(4.0, 2.0, 4.0),
        ));
        assert!((scene.radius - 3.0).abs() < 1e-12);
        assert_eq!(scene.scale, 2.0);
        assert_eq!(scene.center(), DVec3::new(2.0, 1.0, 2.0));
        assert!(!scene.clipping.is_enabled());
    }
}
