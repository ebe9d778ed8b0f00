use glam::DVec3;

use crate::util::Aabb;

/// Section box applied to the scene.
///
/// When enabled, drawables entirely outside the box are culled and the
/// camera frames the box instead of the whole scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clipping {
    enabled: bool,
    scene_bbox: Aabb,
    clip: Aabb,
}

impl Clipping {
    /// Disabled clipping whose box covers `scene_bbox`.
    #[must_use]
    pub fn new(scene_bbox: Aabb) -> Self {
        Self {
            enabled: false,
            scene_bbox,
            clip: scene_bbox,
        }
    }

    /// Enable clipping to the box spanned by `min`/`max`.
    pub fn set(&mut self, min: DVec3, max: DVec3) {
        self.enabled = true;
        self.clip = Aabb::new(min, max);
    }

    /// Disable clipping and restore the box to the scene bounds.
    pub fn reset(&mut self) {
        self.enabled = false;
        self.clip = self.scene_bbox;
    }

    /// Whether the section box is active.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Toggle the section box without changing its extent.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Current clip box.
    #[must_use]
    pub fn bounds(&self) -> &Aabb {
        &self.clip
    }

    /// Center of the clip box.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        self.clip.center()
    }

    /// Half the clip box diagonal.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.clip.diagonal() * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_restores_scene_box() {
        let scene = Aabb::new(DVec3::ZERO, DVec3::splat(10.0));
        let mut clipping = Clipping::new(scene);
        assert!(!clipping.is_enabled());

        clipping.set(DVec3::ZERO, DVec3::new(2.0, 2.0, 1.0));
        assert!(clipping.is_enabled());
        assert_eq!(clipping.center(), DVec3::new(1.0, 1.0, 0.5));
        assert!((clipping.radius() - 1.5).abs() < 1e-12);

        clipping.reset();
        assert!(!clipping.is_enabled());
        assert_eq!(*clipping.bounds(), scene);
    }
}
