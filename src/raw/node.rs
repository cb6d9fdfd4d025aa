use smallvec::SmallVec;

use super::handle::Handle;
use crate::Universe;

/// Inline cluster storage. Universes of 4, 8 and 16 have at most four clusters, and those small
/// nodes make up the bulk of any tree.
pub(crate) type Clusters = SmallVec<[Handle; 4]>;

#[derive(Clone)]
pub(crate) enum Node {
    /// Universe 2: no summary, no clusters.
    Leaf(LeafNode),
    /// Universe > 2: a summary and `upper_sqrt` clusters.
    Internal(InternalNode),
}

// Bit `v` is set iff `v` is a member.
#[derive(Clone, Copy, Default)]
pub(crate) struct LeafNode {
    bits: u8,
}

/// Cached minimum and maximum of a non-empty node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Bounds {
    pub(crate) min: u64,
    pub(crate) max: u64,
}

#[derive(Clone)]
pub(crate) struct InternalNode {
    universe: Universe,
    // The minimum is cached here and NOT stored in any cluster.
    pub(crate) bounds: Option<Bounds>,
    summary: Handle,
    clusters: Clusters,
}

impl Bounds {
    #[inline]
    pub(crate) const fn single(value: u64) -> Self {
        Self { min: value, max: value }
    }
}

impl Node {
    pub(crate) const fn new_leaf() -> Self {
        Node::Leaf(LeafNode { bits: 0 })
    }

    pub(crate) fn new_internal(universe: Universe, summary: Handle, clusters: Clusters) -> Self {
        debug_assert!(!universe.is_base());
        debug_assert_eq!(clusters.len() as u64, universe.upper_sqrt().size());
        Node::Internal(InternalNode {
            universe,
            bounds: None,
            summary,
            clusters,
        })
    }

    pub(crate) fn universe(&self) -> Universe {
        match self {
            Node::Leaf(_) => Universe::MIN,
            Node::Internal(internal) => internal.universe,
        }
    }

    /// Returns the internal node, panicking if this is a leaf.
    pub(crate) fn as_internal(&self) -> &InternalNode {
        match self {
            Node::Internal(internal) => internal,
            Node::Leaf(_) => panic!("expected internal node"),
        }
    }

    /// Returns the internal node mutably, panicking if this is a leaf.
    pub(crate) fn as_internal_mut(&mut self) -> &mut InternalNode {
        match self {
            Node::Internal(internal) => internal,
            Node::Leaf(_) => panic!("expected internal node"),
        }
    }

    #[inline]
    pub(crate) fn minimum(&self) -> Option<u64> {
        match self {
            Node::Leaf(leaf) => leaf.minimum(),
            Node::Internal(internal) => internal.bounds.map(|bounds| bounds.min),
        }
    }

    #[inline]
    pub(crate) fn maximum(&self) -> Option<u64> {
        match self {
            Node::Leaf(leaf) => leaf.maximum(),
            Node::Internal(internal) => internal.bounds.map(|bounds| bounds.max),
        }
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        match self {
            Node::Leaf(leaf) => leaf.is_empty(),
            Node::Internal(internal) => internal.bounds.is_none(),
        }
    }

    /// Makes `value` the only member of a node known to be empty, without recursing.
    #[inline]
    pub(crate) fn insert_into_empty(&mut self, value: u64) {
        debug_assert!(self.is_empty());
        match self {
            Node::Leaf(leaf) => leaf.insert(value),
            Node::Internal(internal) => internal.bounds = Some(Bounds::single(value)),
        }
    }

    /// Forgets this node's own members. Children are left alone.
    pub(crate) fn clear(&mut self) {
        match self {
            Node::Leaf(leaf) => leaf.bits = 0,
            Node::Internal(internal) => internal.bounds = None,
        }
    }
}

impl LeafNode {
    #[inline]
    pub(crate) const fn is_empty(self) -> bool {
        self.bits == 0
    }

    #[inline]
    pub(crate) const fn contains(self, value: u64) -> bool {
        value < 2 && self.bits & (1 << value) != 0
    }

    #[inline]
    pub(crate) fn insert(&mut self, value: u64) {
        debug_assert!(value < 2);
        self.bits |= 1 << value;
    }

    /// With both values present this leaves the other one as min and max; with one present it
    /// empties the leaf.
    #[inline]
    pub(crate) fn remove(&mut self, value: u64) {
        debug_assert!(self.contains(value));
        self.bits &= !(1 << value);
    }

    #[inline]
    pub(crate) const fn minimum(self) -> Option<u64> {
        match self.bits {
            0 => None,
            0b10 => Some(1),
            _ => Some(0),
        }
    }

    #[inline]
    pub(crate) const fn maximum(self) -> Option<u64> {
        match self.bits {
            0 => None,
            0b01 => Some(0),
            _ => Some(1),
        }
    }

    #[inline]
    pub(crate) const fn predecessor(self, value: u64) -> Option<u64> {
        if value == 1 && self.bits & 0b01 != 0 { Some(0) } else { None }
    }

    #[inline]
    pub(crate) const fn successor(self, value: u64) -> Option<u64> {
        if value == 0 && self.bits & 0b10 != 0 { Some(1) } else { None }
    }
}

impl InternalNode {
    #[inline]
    pub(crate) const fn universe(&self) -> Universe {
        self.universe
    }

    #[inline]
    pub(crate) const fn summary(&self) -> Handle {
        self.summary
    }

    /// Returns the handle of cluster `high`.
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn cluster(&self, high: u64) -> Handle {
        self.clusters[high as usize]
    }

    pub(crate) fn clusters(&self) -> &[Handle] {
        &self.clusters
    }

    /// Returns `true` if `value` is the cached minimum or maximum.
    #[inline]
    pub(crate) fn is_bound(&self, value: u64) -> bool {
        self.bounds.is_some_and(|bounds| bounds.min == value || bounds.max == value)
    }
}
