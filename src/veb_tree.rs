use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;

use crate::raw::RawVebTree;
use crate::{Error, OutOfRange, Universe};

mod shape;

pub use shape::Shape;

/// An ordered set of integers from a fixed universe `[0, U)`, based on a van Emde Boas tree.
///
/// Membership, insertion, removal, predecessor and successor all run in O(log log U) time, and
/// the minimum and maximum are available in O(1). The price is memory: the full recursive shape
/// for the universe is allocated when the tree is created, so a tree occupies O(U) space no
/// matter how few values it holds.
///
/// Queries and removal accept any `u64`; values outside the universe are simply never members.
/// Only insertion rejects them.
///
/// # Examples
///
/// ```
/// use veb_tree::VebTree;
///
/// let mut tree = VebTree::new(16)?;
///
/// for value in [2, 3, 4, 5, 7, 14, 15] {
///     tree.insert(value)?;
/// }
///
/// assert_eq!(tree.minimum(), Some(2));
/// assert_eq!(tree.maximum(), Some(15));
/// assert_eq!(tree.predecessor(14), Some(7));
/// assert_eq!(tree.successor(7), Some(14));
///
/// // Values outside the universe are rejected on insertion only.
/// assert!(tree.insert(16).is_err());
/// assert!(!tree.contains(16));
///
/// tree.remove(2);
/// assert_eq!(tree.iter().collect::<Vec<_>>(), [3, 4, 5, 7, 14, 15]);
/// # Ok::<(), veb_tree::Error>(())
/// ```
pub struct VebTree {
    raw: RawVebTree,
    len: usize,
}

/// An iterator over the values of a `VebTree`, in ascending order.
///
/// This `struct` is created by the [`iter`] method on [`VebTree`].
/// See its documentation for more.
///
/// # Examples
///
/// ```
/// use veb_tree::VebTree;
///
/// let tree = VebTree::with_values(8, [6, 1, 3])?;
/// let mut iter = tree.iter();
/// assert_eq!(iter.next(), Some(1));
/// assert_eq!(iter.next_back(), Some(6));
/// assert_eq!(iter.next(), Some(3));
/// assert_eq!(iter.next(), None);
/// # Ok::<(), veb_tree::Error>(())
/// ```
///
/// [`iter`]: VebTree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Clone)]
pub struct Iter<'a> {
    raw: &'a RawVebTree,
    // Only meaningful while `remaining > 0`.
    front: u64,
    back: u64,
    remaining: usize,
}

impl VebTree {
    /// Makes a new, empty `VebTree` over the universe `[0, universe)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUniverse`] if `universe` is smaller than 2 or not a power of two,
    /// and [`Error::UniverseTooLarge`] if its shape needs more nodes than a tree can address
    /// (universes of 2^32 and above).
    ///
    /// # Examples
    ///
    /// ```
    /// use veb_tree::{Error, VebTree};
    ///
    /// let tree = VebTree::new(256)?;
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.universe_size(), 256);
    ///
    /// assert_eq!(VebTree::new(100).err(), Some(Error::InvalidUniverse { universe: 100 }));
    /// assert!(matches!(VebTree::new(1 << 40), Err(Error::UniverseTooLarge { .. })));
    /// # Ok::<(), Error>(())
    /// ```
    ///
    /// # Complexity
    ///
    /// O(U) time and memory.
    pub fn new(universe: u64) -> Result<Self, Error> {
        Self::from_universe(Universe::new(universe)?)
    }

    /// Makes a new, empty `VebTree` over an already validated universe.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UniverseTooLarge`] if the universe needs more nodes than a tree can
    /// address. Nothing is allocated in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use veb_tree::{Universe, VebTree};
    ///
    /// let universe = Universe::from_bits(10).unwrap();
    /// let tree = VebTree::from_universe(universe)?;
    /// assert_eq!(tree.universe(), universe);
    /// # Ok::<(), veb_tree::Error>(())
    /// ```
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug"))]
    pub fn from_universe(universe: Universe) -> Result<Self, Error> {
        let raw = RawVebTree::new(universe)?;
        debug_log!(universe = universe.size(), nodes = raw.node_count(), "allocated tree");
        Ok(Self { raw, len: 0 })
    }

    /// Makes a `VebTree` over `[0, universe)` holding `values`.
    ///
    /// Duplicates in `values` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUniverse`] or [`Error::UniverseTooLarge`] as [`new`](Self::new)
    /// does, or [`Error::InitialValue`] naming the position of the first value that lies
    /// outside the universe.
    ///
    /// # Examples
    ///
    /// ```
    /// use veb_tree::{Error, OutOfRange, VebTree};
    ///
    /// let tree = VebTree::with_values(16, [2, 3, 4, 5, 7, 14, 15])?;
    /// assert_eq!(tree.len(), 7);
    ///
    /// let err = VebTree::with_values(16, [1, 2, 40]).unwrap_err();
    /// assert_eq!(
    ///     err,
    ///     Error::InitialValue { position: 2, source: OutOfRange { value: 40, universe: 16 } }
    /// );
    /// # Ok::<(), Error>(())
    /// ```
    pub fn with_values<I>(universe: u64, values: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = u64>,
    {
        let mut tree = Self::new(universe)?;
        tree.try_extend(values)?;
        Ok(tree)
    }

    /// Returns the universe this tree covers.
    #[must_use]
    pub fn universe(&self) -> Universe {
        self.raw.universe()
    }

    /// Returns the number of values in the universe, `U`.
    ///
    /// # Examples
    ///
    /// ```
    /// use veb_tree::VebTree;
    ///
    /// let tree = VebTree::new(1 << 12)?;
    /// assert_eq!(tree.universe_size(), 4096);
    /// # Ok::<(), veb_tree::Error>(())
    /// ```
    #[must_use]
    pub fn universe_size(&self) -> u64 {
        self.universe().size()
    }

    /// Returns the number of nodes allocated for this tree's universe.
    ///
    /// # Examples
    ///
    /// ```
    /// use veb_tree::VebTree;
    ///
    /// assert_eq!(VebTree::new(2)?.node_count(), 1);
    /// assert_eq!(VebTree::new(16)?.node_count(), 21);
    /// # Ok::<(), veb_tree::Error>(())
    /// ```
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.raw.node_count()
    }

    /// Returns the number of values in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the smallest value in the tree, if any.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn minimum(&self) -> Option<u64> {
        self.raw.minimum()
    }

    /// Returns the largest value in the tree, if any.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn maximum(&self) -> Option<u64> {
        self.raw.maximum()
    }

    /// Returns `true` if the tree contains `value`.
    ///
    /// Values outside the universe are never contained.
    ///
    /// # Complexity
    ///
    /// O(log log U)
    #[must_use]
    pub fn contains(&self, value: u64) -> bool {
        self.universe().contains(value) && self.raw.contains(value)
    }

    /// Adds `value` to the tree.
    ///
    /// Returns whether the value was newly inserted. Inserting a value that is already present
    /// leaves the tree unchanged and returns `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValueOutOfRange`] if `value` does not lie in `[0, U)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use veb_tree::VebTree;
    ///
    /// let mut tree = VebTree::new(8)?;
    /// assert_eq!(tree.insert(5), Ok(true));
    /// assert_eq!(tree.insert(5), Ok(false));
    /// assert!(tree.insert(8).is_err());
    /// assert_eq!(tree.len(), 1);
    /// # Ok::<(), veb_tree::Error>(())
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log log U)
    pub fn insert(&mut self, value: u64) -> Result<bool, Error> {
        Ok(self.insert_in_universe(value)?)
    }

    fn insert_in_universe(&mut self, value: u64) -> Result<bool, OutOfRange> {
        let universe = self.universe();
        if !universe.contains(value) {
            return Err(OutOfRange {
                value,
                universe: universe.size(),
            });
        }
        if self.raw.contains(value) {
            return Ok(false);
        }

        self.raw.insert(value);
        self.len += 1;
        trace_log!(value, len = self.len, "inserted");
        Ok(true)
    }

    /// Inserts every value from `values`, stopping at the first one outside the universe.
    ///
    /// Values before the rejected one stay inserted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InitialValue`] with the position of the rejected value in `values`.
    ///
    /// # Examples
    ///
    /// ```
    /// use veb_tree::{Error, VebTree};
    ///
    /// let mut tree = VebTree::new(4)?;
    /// assert!(matches!(tree.try_extend([0, 3, 9, 1]), Err(Error::InitialValue { position: 2, .. })));
    /// assert_eq!(tree.iter().collect::<Vec<_>>(), [0, 3]);
    /// # Ok::<(), Error>(())
    /// ```
    pub fn try_extend<I>(&mut self, values: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = u64>,
    {
        for (position, value) in values.into_iter().enumerate() {
            if let Err(source) = self.insert_in_universe(value) {
                warn_log!(position, value, "rejected value outside the universe");
                return Err(Error::InitialValue { position, source });
            }
        }
        Ok(())
    }

    /// Removes `value` from the tree. Returns whether it was present.
    ///
    /// Values outside the universe are never present, so removing one is a no-op.
    ///
    /// # Examples
    ///
    /// ```
    /// use veb_tree::VebTree;
    ///
    /// let mut tree = VebTree::with_values(16, [3, 9])?;
    /// assert!(tree.remove(3));
    /// assert!(!tree.remove(3));
    /// assert!(!tree.remove(1000));
    /// assert_eq!(tree.minimum(), Some(9));
    /// # Ok::<(), veb_tree::Error>(())
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log log U)
    pub fn remove(&mut self, value: u64) -> bool {
        if !self.contains(value) {
            return false;
        }

        self.raw.remove(value);
        self.len -= 1;
        trace_log!(value, len = self.len, "removed");
        true
    }

    /// Returns the greatest value in the tree strictly less than `value`.
    ///
    /// For a `value` at or beyond the end of the universe this is the [`maximum`](Self::maximum).
    ///
    /// # Examples
    ///
    /// ```
    /// use veb_tree::VebTree;
    ///
    /// let tree = VebTree::with_values(16, [2, 7, 14])?;
    /// assert_eq!(tree.predecessor(2), None);
    /// assert_eq!(tree.predecessor(3), Some(2));
    /// assert_eq!(tree.predecessor(14), Some(7));
    /// assert_eq!(tree.predecessor(500), Some(14));
    /// # Ok::<(), veb_tree::Error>(())
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log log U)
    #[must_use]
    pub fn predecessor(&self, value: u64) -> Option<u64> {
        if self.universe().contains(value) {
            self.raw.predecessor(value)
        } else {
            self.maximum()
        }
    }

    /// Returns the least value in the tree strictly greater than `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use veb_tree::VebTree;
    ///
    /// let tree = VebTree::with_values(16, [2, 7, 14])?;
    /// assert_eq!(tree.successor(0), Some(2));
    /// assert_eq!(tree.successor(7), Some(14));
    /// assert_eq!(tree.successor(14), None);
    /// assert_eq!(tree.successor(500), None);
    /// # Ok::<(), veb_tree::Error>(())
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log log U)
    #[must_use]
    pub fn successor(&self, value: u64) -> Option<u64> {
        if self.universe().contains(value) {
            self.raw.successor(value)
        } else {
            None
        }
    }

    /// Removes and returns the smallest value in the tree, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use veb_tree::VebTree;
    ///
    /// let mut tree = VebTree::with_values(32, [20, 4])?;
    /// assert_eq!(tree.pop_minimum(), Some(4));
    /// assert_eq!(tree.pop_minimum(), Some(20));
    /// assert_eq!(tree.pop_minimum(), None);
    /// # Ok::<(), veb_tree::Error>(())
    /// ```
    pub fn pop_minimum(&mut self) -> Option<u64> {
        let value = self.minimum()?;
        self.raw.remove(value);
        self.len -= 1;
        Some(value)
    }

    /// Removes and returns the largest value in the tree, if any.
    pub fn pop_maximum(&mut self) -> Option<u64> {
        let value = self.maximum()?;
        self.raw.remove(value);
        self.len -= 1;
        Some(value)
    }

    /// Removes every value, keeping the allocated shape.
    ///
    /// # Complexity
    ///
    /// O(U), one visit per node.
    pub fn clear(&mut self) {
        self.raw.clear();
        self.len = 0;
        debug_log!(nodes = self.raw.node_count(), "cleared tree");
    }

    /// Gets an iterator that visits the values in ascending order.
    ///
    /// Each step is a successor (or predecessor, from the back) query.
    ///
    /// # Examples
    ///
    /// ```
    /// use veb_tree::VebTree;
    ///
    /// let tree = VebTree::with_values(64, [40, 3, 17])?;
    /// assert_eq!(tree.iter().collect::<Vec<_>>(), [3, 17, 40]);
    /// assert_eq!(tree.iter().rev().collect::<Vec<_>>(), [40, 17, 3]);
    /// # Ok::<(), veb_tree::Error>(())
    /// ```
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            raw: &self.raw,
            front: self.minimum().unwrap_or_default(),
            back: self.maximum().unwrap_or_default(),
            remaining: self.len,
        }
    }
}

impl Clone for VebTree {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
            len: self.len,
        }
    }
}

impl fmt::Debug for VebTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl PartialEq for VebTree {
    fn eq(&self, other: &Self) -> bool {
        self.universe() == other.universe() && self.len == other.len && self.iter().eq(other.iter())
    }
}

impl Eq for VebTree {}

impl Hash for VebTree {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.universe().hash(state);
        state.write_usize(self.len);
        for value in self {
            value.hash(state);
        }
    }
}

impl<'a> IntoIterator for &'a VebTree {
    type Item = u64;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl Iterator for Iter<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.remaining == 0 {
            return None;
        }
        let value = self.front;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.front = self.raw.successor(value).expect("`Iter::next()` - tree shorter than its length!");
        }
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn min(mut self) -> Option<u64> {
        self.next()
    }

    fn max(mut self) -> Option<u64> {
        self.next_back()
    }

    fn last(mut self) -> Option<u64> {
        self.next_back()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<u64> {
        if self.remaining == 0 {
            return None;
        }
        let value = self.back;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.back = self.raw.predecessor(value).expect("`Iter::next_back()` - tree shorter than its length!");
        }
        Some(value)
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

impl fmt::Debug for Iter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
