use thiserror::Error;

/// A value that does not fit in a tree's universe.
///
/// Returned (wrapped in [`Error`]) by [`VebTree::insert`](crate::VebTree::insert)
/// and the bulk constructors when `value >= universe`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
#[error("value {value} lies outside the universe [0, {universe})")]
pub struct OutOfRange {
    /// The rejected value.
    pub value: u64,
    /// The size of the universe the value was checked against.
    pub universe: u64,
}

/// Errors returned by this crate.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// The requested universe size is smaller than two or not a power of two.
    #[error("invalid universe size {universe}: must be a power of two no smaller than 2")]
    InvalidUniverse {
        /// The rejected universe size.
        universe: u64,
    },

    /// The universe is valid, but its full shape needs more nodes than one tree can address.
    #[error("universe {universe} needs {nodes} nodes, more than a tree can address")]
    UniverseTooLarge {
        /// The rejected universe size.
        universe: u64,
        /// Nodes the universe would need, saturated at `u64::MAX`.
        nodes: u64,
    },

    /// A value passed to an insertion lies outside the universe.
    #[error(transparent)]
    ValueOutOfRange(#[from] OutOfRange),

    /// A value in a bulk insertion lies outside the universe.
    #[error("initial value at position {position} cannot be inserted")]
    InitialValue {
        /// Zero-based position of the value in the input sequence.
        position: usize,
        /// The underlying range failure.
        #[source]
        source: OutOfRange,
    },
}
