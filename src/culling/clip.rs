use crate::scene::{Clipping, Drawable};

/// Rejects drawables entirely outside the section box.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClipCull;

impl ClipCull {
    /// `true` when clipping is on and the drawable lies outside the box.
    #[must_use]
    pub fn is_culled(&self, drawable: &Drawable, clipping: &Clipping) -> bool {
        clipping.is_enabled() && drawable.bbox.is_disjoint(clipping.bounds())
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use super::*;
    use crate::util::Aabb;

    #[test]
    fn only_culls_when_enabled_and_outside() {
        let mut clipping =
            Clipping::new(Aabb::new(DVec3::splat(-10.0), DVec3::splat(10.0)));
        let far = Drawable::new(Aabb::new(
            DVec3::new(5.0, 5.0, 5.0),
            DVec3::new(6.0, 6.0, 6.0),
        ));
        assert!(!ClipCull.is_culled(&far, &clipping));

        clipping.set(DVec3::splat(-1.0), DVec3::splat(1.0));
        assert!(ClipCull.is_culled(&far, &clipping));

        let straddling =
            Drawable::new(Aabb::new(DVec3::splat(0.5), DVec3::splat(3.0)));
        assert!(!ClipCull.is_culled(&straddling, &clipping));
    }
}
