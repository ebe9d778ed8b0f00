use crate::util::{Aabb, BoundingSphere};

/// Index range of a draw call, in elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexRange {
    /// First element to draw.
    pub offset: u32,
    /// Number of elements to draw.
    pub count: u32,
}

impl IndexRange {
    /// Range covering `count` elements from the start of the buffer.
    #[must_use]
    pub const fn full(count: u32) -> Self {
        Self { offset: 0, count }
    }
}

/// BIM element packed into a drawable's index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BimNode {
    /// Byte offset of the element's first index.
    pub indices_offset: u32,
}

/// What culling needs to know about a renderable object.
///
/// BIM nodes are sorted so that the always-visible elements come first;
/// `hidables` is the index of the first node that may be skipped, and the
/// tail from there on is interior or low-priority geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    /// World-space bounding box.
    pub bbox: Aabb,
    /// World-space bounding sphere.
    pub bsphere: BoundingSphere,
    /// Radius of a single instance's mesh, for instanced drawables.
    pub mesh_radius: Option<f64>,
    /// Number of always-visible BIM nodes; 0 means the whole drawable is
    /// hidable.
    pub hidables: usize,
    /// BIM nodes in index-buffer order.
    pub nodes: Vec<BimNode>,
    /// Size of one index in bytes.
    pub index_size: u32,
    /// Vertex count, used by cull statistics.
    pub vertex_count: u32,
}

impl Drawable {
    /// Non-BIM drawable bounded by `bbox`.
    #[must_use]
    pub fn new(bbox: Aabb) -> Self {
        Self {
            bbox,
            bsphere: BoundingSphere::from_aabb(&bbox),
            mesh_radius: None,
            hidables: 0,
            nodes: Vec::new(),
            index_size: 4,
            vertex_count: 0,
        }
    }

    /// Attach BIM nodes.
    #[must_use]
    pub fn with_bim_nodes(
        mut self,
        nodes: Vec<BimNode>,
        hidables: usize,
    ) -> Self {
        self.nodes = nodes;
        self.hidables = hidables;
        self
    }

    /// Mark as instanced with the given per-instance mesh radius.
    #[must_use]
    pub fn with_mesh_radius(mut self, radius: f64) -> Self {
        self.mesh_radius = Some(radius);
        self
    }
}

/// Group of drawables toggled together.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layer {
    /// Whether the layer is shown.
    pub visible: bool,
    /// Drawables in the layer.
    pub drawables: Vec<Drawable>,
}
