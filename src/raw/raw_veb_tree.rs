use super::arena::Arena;
use super::handle::Handle;
use super::node::{Bounds, Clusters, InternalNode, Node};
use crate::{Error, Universe};

/// The recursive van Emde Boas structure backing `VebTree`.
///
/// Every node of the full shape is allocated in `nodes` at construction time; operations only
/// change the cached bounds of the nodes they visit. Callers must keep values inside the
/// universe, only insert absent values and only remove present ones.
#[derive(Clone)]
pub(crate) struct RawVebTree {
    /// Arena storing every node. Children are allocated before their parent.
    nodes: Arena<Node>,
    /// Handle to the node covering the whole universe.
    root: Handle,
}

/// Returns the number of nodes in a tree over `universe`, or `None` on `usize` overflow.
pub(crate) fn node_count(universe: Universe) -> Option<usize> {
    if universe.is_base() {
        return Some(1);
    }
    let clusters = usize::try_from(universe.upper_sqrt().size()).ok()?;
    let summary = node_count(universe.upper_sqrt())?;
    let cluster = node_count(universe.lower_sqrt())?;
    clusters.checked_mul(cluster)?.checked_add(summary)?.checked_add(1)
}

impl RawVebTree {
    /// Allocates the full, empty shape for `universe`.
    ///
    /// Fails with [`Error::UniverseTooLarge`] before allocating anything if the shape needs more
    /// nodes than a [`Handle`] can address.
    pub(crate) fn new(universe: Universe) -> Result<Self, Error> {
        let needed = node_count(universe);
        let Some(count) = needed.filter(|&count| Handle::can_address(count)) else {
            return Err(Error::UniverseTooLarge {
                universe: universe.size(),
                nodes: needed.and_then(|count| u64::try_from(count).ok()).unwrap_or(u64::MAX),
            });
        };

        let mut nodes = Arena::with_capacity(count);
        let root = Self::build(&mut nodes, universe);
        debug_assert_eq!(nodes.len(), count);
        Ok(Self { nodes, root })
    }

    fn build(nodes: &mut Arena<Node>, universe: Universe) -> Handle {
        if universe.is_base() {
            return nodes.alloc(Node::new_leaf());
        }

        let summary = Self::build(nodes, universe.upper_sqrt());
        let clusters: Clusters = (0..universe.upper_sqrt().size())
            .map(|_| Self::build(nodes, universe.lower_sqrt()))
            .collect();
        nodes.alloc(Node::new_internal(universe, summary, clusters))
    }

    #[inline]
    pub(crate) fn universe(&self) -> Universe {
        self.nodes.get(self.root).universe()
    }

    #[inline]
    pub(crate) fn root(&self) -> Handle {
        self.root
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node {
        self.nodes.get(handle)
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) fn minimum(&self) -> Option<u64> {
        self.nodes.get(self.root).minimum()
    }

    #[inline]
    pub(crate) fn maximum(&self) -> Option<u64> {
        self.nodes.get(self.root).maximum()
    }

    /// Empties every node, keeping the allocated shape.
    pub(crate) fn clear(&mut self) {
        self.nodes.iter_mut().for_each(Node::clear);
    }

    // ─── Member ─────────────────────────────────────────────────────────────

    pub(crate) fn contains(&self, value: u64) -> bool {
        let (mut handle, mut value) = (self.root, value);
        loop {
            match self.nodes.get(handle) {
                Node::Leaf(leaf) => return leaf.contains(value),
                Node::Internal(internal) => {
                    if internal.is_bound(value) {
                        return true;
                    }
                    let (high, low) = internal.universe().split(value);
                    handle = internal.cluster(high);
                    value = low;
                }
            }
        }
    }

    // ─── Insert ─────────────────────────────────────────────────────────────

    /// Inserts `value`, which must be in the universe and absent.
    pub(crate) fn insert(&mut self, value: u64) {
        debug_assert!(self.universe().contains(value));
        self.insert_at(self.root, value);
    }

    fn insert_at(&mut self, handle: Handle, value: u64) {
        let internal = match self.nodes.get_mut(handle) {
            Node::Leaf(leaf) => {
                leaf.insert(value);
                return;
            }
            Node::Internal(internal) => internal,
        };

        let Some(bounds) = internal.bounds.as_mut() else {
            internal.bounds = Some(Bounds::single(value));
            return;
        };

        // A smaller value becomes the cached minimum and the old minimum moves down instead.
        let mut value = value;
        if value < bounds.min {
            core::mem::swap(&mut value, &mut bounds.min);
        }
        if value > bounds.max {
            bounds.max = value;
        }

        let (high, low) = internal.universe().split(value);
        let summary = internal.summary();
        let cluster = internal.cluster(high);

        if self.nodes.get(cluster).is_empty() {
            self.insert_at(summary, high);
            self.nodes.get_mut(cluster).insert_into_empty(low);
        } else {
            self.insert_at(cluster, low);
        }
    }

    // ─── Delete ─────────────────────────────────────────────────────────────

    /// Removes `value`, which must be present.
    pub(crate) fn remove(&mut self, value: u64) {
        debug_assert!(self.contains(value));
        self.remove_at(self.root, value);
    }

    fn remove_at(&mut self, handle: Handle, value: u64) {
        let internal = match self.nodes.get_mut(handle) {
            Node::Leaf(leaf) => {
                leaf.remove(value);
                return;
            }
            Node::Internal(internal) => internal,
        };

        let bounds = internal.bounds.expect("`RawVebTree::remove_at()` - node is empty!");
        if bounds.min == bounds.max {
            internal.bounds = None;
            return;
        }

        let universe = internal.universe();
        let summary = internal.summary();
        let mut value = value;

        if value == bounds.min {
            // Promote the smallest clustered value to minimum, then remove it from its cluster.
            let first = self.expect_minimum(summary);
            let offset = self.expect_minimum(self.cluster_of(handle, first));
            value = universe.index(first, offset);
            self.internal_mut(handle).bounds = Some(Bounds { min: value, ..bounds });
        }

        let (high, low) = universe.split(value);
        let cluster = self.cluster_of(handle, high);
        self.remove_at(cluster, low);

        if self.nodes.get(cluster).is_empty() {
            self.remove_at(summary, high);
            if value == bounds.max {
                let max = match self.nodes.get(summary).maximum() {
                    None => self.expect_minimum(handle),
                    Some(last) => universe.index(last, self.expect_maximum(self.cluster_of(handle, last))),
                };
                self.set_maximum(handle, max);
            }
        } else if value == bounds.max {
            let max = universe.index(high, self.expect_maximum(cluster));
            self.set_maximum(handle, max);
        }
    }

    // ─── Predecessor / Successor ────────────────────────────────────────────

    /// Returns the greatest member smaller than `value`, which must be in the universe.
    pub(crate) fn predecessor(&self, value: u64) -> Option<u64> {
        self.predecessor_at(self.root, value)
    }

    fn predecessor_at(&self, handle: Handle, value: u64) -> Option<u64> {
        let internal = match self.nodes.get(handle) {
            Node::Leaf(leaf) => return leaf.predecessor(value),
            Node::Internal(internal) => internal,
        };
        let bounds = internal.bounds?;
        if value > bounds.max {
            return Some(bounds.max);
        }

        let universe = internal.universe();
        let (high, low) = universe.split(value);
        let cluster = internal.cluster(high);

        if let Some(min_low) = self.nodes.get(cluster).minimum()
            && low > min_low
        {
            return self.predecessor_at(cluster, low).map(|offset| universe.index(high, offset));
        }

        match self.predecessor_at(internal.summary(), high) {
            Some(previous) => {
                let offset = self.expect_maximum(internal.cluster(previous));
                Some(universe.index(previous, offset))
            }
            // The cached minimum is the only member left of `value`'s cluster.
            None => (value > bounds.min).then_some(bounds.min),
        }
    }

    /// Returns the least member greater than `value`, which must be in the universe.
    pub(crate) fn successor(&self, value: u64) -> Option<u64> {
        self.successor_at(self.root, value)
    }

    fn successor_at(&self, handle: Handle, value: u64) -> Option<u64> {
        let internal = match self.nodes.get(handle) {
            Node::Leaf(leaf) => return leaf.successor(value),
            Node::Internal(internal) => internal,
        };
        let bounds = internal.bounds?;
        if value < bounds.min {
            return Some(bounds.min);
        }

        let universe = internal.universe();
        let (high, low) = universe.split(value);
        let cluster = internal.cluster(high);

        if let Some(max_low) = self.nodes.get(cluster).maximum()
            && low < max_low
        {
            return self.successor_at(cluster, low).map(|offset| universe.index(high, offset));
        }

        let next = self.successor_at(internal.summary(), high)?;
        let offset = self.expect_minimum(internal.cluster(next));
        Some(universe.index(next, offset))
    }

    // ─── Helpers ────────────────────────────────────────────────────────────

    #[inline]
    fn cluster_of(&self, handle: Handle, high: u64) -> Handle {
        self.nodes.get(handle).as_internal().cluster(high)
    }

    #[inline]
    fn internal_mut(&mut self, handle: Handle) -> &mut InternalNode {
        self.nodes.get_mut(handle).as_internal_mut()
    }

    fn set_maximum(&mut self, handle: Handle, max: u64) {
        let bounds = self.internal_mut(handle).bounds.as_mut();
        bounds.expect("`RawVebTree::set_maximum()` - node is empty!").max = max;
    }

    // Both are only called on nodes the summary (or the caller's bounds) proves non-empty.
    fn expect_minimum(&self, handle: Handle) -> u64 {
        self.nodes.get(handle).minimum().expect("`RawVebTree` - node expected to be non-empty!")
    }

    fn expect_maximum(&self, handle: Handle) -> u64 {
        self.nodes.get(handle).maximum().expect("`RawVebTree` - node expected to be non-empty!")
    }
}
