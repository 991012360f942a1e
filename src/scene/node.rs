use glam::Affine3A;

use crate::scene::NodeKey;
use crate::scene::transform::Transform;
use crate::scene::visual::Visual;

/// A minimal scene node: hierarchy links, transform, and what to draw.
///
/// Nodes form a tree through parent/child relationships; the parent link
/// is a non-owning [`NodeKey`] back-reference into the scene's arena,
/// never an owned cycle.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,

    /// Parent node key (None for root nodes)
    pub(crate) parent: Option<NodeKey>,
    /// Child node keys
    pub(crate) children: Vec<NodeKey>,

    /// Transform component (hot data touched every tick)
    pub transform: Transform,

    /// What the node contributes to the draw pass.
    pub visual: Visual,

    /// Visibility flag
    pub visible: bool,
}

impl Node {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            visual: Visual::None,
            visible: true,
        }
    }

    #[must_use]
    pub fn with_visual(name: &str, visual: Visual) -> Self {
        let mut node = Self::new(name);
        node.visual = visual;
        node
    }

    /// Returns the parent node key, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Returns a read-only slice of child node keys.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// World transformation matrix, updated by the transform system each
    /// tick.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}
