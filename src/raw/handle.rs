use core::num::NonZero;

/// Width of a stored node index.
///
/// 32 bits hold the full shape of every universe up to `2^31` (about 2.8 billion nodes). The
/// shape for `2^32` already needs about 6 billion, and a tree that large could not be allocated
/// anyway, so wider handles would only make every cluster slot bigger.
type RawHandle = u32;

/// Position of a node in the tree's [`Arena`](super::arena::Arena).
///
/// Stored off by one in a `NonZero` so `Option<Handle>` costs nothing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    /// The largest node index a handle can address.
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;

    /// The most nodes one tree can hold.
    pub(crate) const CAPACITY: usize = Self::MAX + 1;

    /// Returns `true` if a tree of `nodes` nodes can be addressed entirely by handles.
    #[inline]
    pub(crate) const fn can_address(nodes: usize) -> bool {
        nodes <= Self::CAPACITY
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        match NonZero::new((index + 1) as RawHandle) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}
