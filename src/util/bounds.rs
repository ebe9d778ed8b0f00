//! Axis-aligned boxes and bounding spheres in world space.

use glam::DVec3;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: DVec3,
    /// Maximum corner.
    pub max: DVec3,
}

impl Aabb {
    /// Create a box from its two corners.
    #[must_use]
    pub const fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all `points`, or `None` when empty.
    pub fn from_points(
        points: impl IntoIterator<Item = DVec3>,
    ) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::new(first, first), |acc, p| Self {
            min: acc.min.min(p),
            max: acc.max.max(p),
        }))
    }

    /// Box center.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths along each axis.
    #[must_use]
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Length of the min-to-max diagonal.
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        self.size().length()
    }

    /// Half of the longest edge.
    #[must_use]
    pub fn half_max_extent(&self) -> f64 {
        self.size().max_element() * 0.5
    }

    /// The eight corners. Indices 0-3 lie on the `min.y` face, 4-7 on the
    /// `max.y` face, each face wound x then z.
    #[must_use]
    pub fn corners(&self) -> [DVec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            DVec3::new(a.x, a.y, a.z),
            DVec3::new(b.x, a.y, a.z),
            DVec3::new(b.x, a.y, b.z),
            DVec3::new(a.x, a.y, b.z),
            DVec3::new(a.x, b.y, a.z),
            DVec3::new(b.x, b.y, a.z),
            DVec3::new(b.x, b.y, b.z),
            DVec3::new(a.x, b.y, b.z),
        ]
    }

    /// `true` when the two boxes share no interior. Touching faces count as
    /// disjoint.
    #[must_use]
    pub fn is_disjoint(&self, other: &Aabb) -> bool {
        self.max.x <= other.min.x
            || self.min.x >= other.max.x
            || self.max.y <= other.min.y
            || self.min.y >= other.max.y
            || self.max.z <= other.min.z
            || self.min.z >= other.max.z
    }

    /// `true` when `point` lies inside or on the box.
    #[must_use]
    pub fn contains_point(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Bounding sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// Sphere center.
    pub center: DVec3,
    /// Sphere radius.
    pub radius: f64,
}

impl BoundingSphere {
    /// Create a sphere.
    #[must_use]
    pub const fn new(center: DVec3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Sphere circumscribing `aabb`.
    #[must_use]
    pub fn from_aabb(aabb: &Aabb) -> Self {
        Self::new(aabb.center(), aabb.diagonal() * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(DVec3::ZERO, DVec3::ONE)
    }

    #[test]
    fn center_and_extent() {
        let b =
            Aabb::new(DVec3::new(-2.0, 0.0, 1.0), DVec3::new(2.0, 1.0, 2.0));
        assert_eq!(b.center(), DVec3::new(0.0, 0.5, 1.5));
        assert_eq!(b.half_max_extent(), 2.0);
        assert!((b.diagonal() - 18.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn touching_boxes_are_disjoint() {
        let a = unit_box();
        let b = Aabb::new(DVec3::new(1.0, 0.0, 0.0), DVec3::new(2.0, 1.0, 1.0));
        assert!(a.is_disjoint(&b));
        assert!(b.is_disjoint(&a));
    }

    #[test]
    fn overlapping_boxes_are_not_disjoint() {
        let a = unit_box();
        let b = Aabb::new(DVec3::splat(0.5), DVec3::splat(1.5));
        assert!(!a.is_disjoint(&b));
    }

    #[test]
    fn corners_span_the_box() {
        let b = unit_box();
        let corners = b.corners();
        assert_eq!(corners[0], b.min);
        assert_eq!(corners[6], b.max);
        assert_eq!(Aabb::from_points(corners), Some(b));
    }

    #[test]
    fn from_points_empty_is_none() {
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn sphere_circumscribes_box() {
        let s = BoundingSphere::from_aabb(&unit_box());
        assert_eq!(s.center, DVec3::splat(0.5));
        assert!((s.radius - 3.0_f64.sqrt() * 0.5).abs() < 1e-12);
    }
}
