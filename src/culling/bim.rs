use crate::scene::{Drawable, IndexRange};

/// Skips the hidable BIM elements packed at the tail of a drawable's index
/// buffer.
///
/// Partial: the draw range is shortened to the always-visible prefix, and
/// the drawable is rejected outright only when every element is hidable.
#[derive(Debug, Clone, Copy, Default)]
pub struct BimCull {
    enabled: bool,
}

impl BimCull {
    /// Whether BIM culling runs.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn BIM culling on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Shrink `indices` to the visible prefix. Returns `true` when nothing
    /// of the drawable remains. Drawables without BIM nodes are left alone.
    pub fn is_culled(
        &self,
        drawable: &Drawable,
        indices: &mut IndexRange,
    ) -> bool {
        if !self.enabled || drawable.nodes.is_empty() {
            return false;
        }
        if drawable.hidables > 0 {
            if let Some(node) = drawable.nodes.get(drawable.hidables) {
                let index_size = drawable.index_size.max(1);
                indices.count = node.indices_offset / index_size;
            }
        }
        drawable.hidables == 0
    }
}
