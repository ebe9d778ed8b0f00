//! Shared utilities: bounding volumes and easing curves.

pub mod bounds;
pub mod easing;

pub use bounds::{Aabb, BoundingSphere};
pub use easing::EasingFunction;
