use alloc::boxed::Box;
use alloc::vec::Vec;

use super::VebTree;
use crate::raw::{Handle, Node, RawVebTree};

/// A read-only snapshot of one node of a [`VebTree`] and everything below it.
///
/// This is an extension for inspecting the recursive layout, mostly useful in tests. A node of
/// universe 2 has no summary and no clusters; every larger node has both.
///
/// # Examples
///
/// ```
/// use veb_tree::VebTree;
///
/// let tree = VebTree::with_values(16, [2, 3, 4, 5, 7, 14, 15])?;
/// let root = tree.shape();
///
/// assert_eq!((root.universe, root.minimum, root.maximum), (16, Some(2), Some(15)));
/// assert_eq!(root.clusters.len(), 4);
///
/// // The root's minimum is cached, not stored again in cluster 0.
/// assert_eq!(root.clusters[0].minimum, Some(3));
///
/// let summary = root.summary.as_deref().unwrap();
/// assert_eq!((summary.minimum, summary.maximum), (Some(0), Some(3)));
/// # Ok::<(), veb_tree::Error>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Shape {
    /// Size of this node's universe.
    pub universe: u64,
    /// Cached minimum, relative to this node's universe.
    pub minimum: Option<u64>,
    /// Cached maximum, relative to this node's universe.
    pub maximum: Option<u64>,
    /// Tracks which clusters are non-empty. `None` for universe 2.
    pub summary: Option<Box<Shape>>,
    /// The clusters partitioning this node's universe. Empty for universe 2.
    pub clusters: Vec<Shape>,
}

impl Shape {
    /// Returns `true` for a node of universe 2.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.summary.is_none()
    }

    fn of(raw: &RawVebTree, handle: Handle) -> Self {
        let node = raw.node(handle);
        let (summary, clusters) = match node {
            Node::Leaf(_) => (None, Vec::new()),
            Node::Internal(internal) => (
                Some(Box::new(Self::of(raw, internal.summary()))),
                internal.clusters().iter().map(|&cluster| Self::of(raw, cluster)).collect(),
            ),
        };
        Self {
            universe: node.universe().size(),
            minimum: node.minimum(),
            maximum: node.maximum(),
            summary,
            clusters,
        }
    }
}

impl VebTree {
    /// Takes a snapshot of the whole recursive structure.
    ///
    /// This is an extension for structural assertions; it copies every node.
    ///
    /// # Complexity
    ///
    /// O(U)
    #[must_use]
    pub fn shape(&self) -> Shape {
        Shape::of(&self.raw, self.raw.root())
    }
}
