use core::fmt;

use crate::Error;

/// The size of the integer domain `[0, size)` a tree covers.
///
/// A universe is always a power of two no smaller than 2. It is stored as its binary logarithm,
/// so the square roots used to split a node into clusters are exact: the upper square root is
/// `2^ceil(bits / 2)` and the lower square root is `2^floor(bits / 2)`.
///
/// # Examples
///
/// ```
/// use veb_tree::Universe;
///
/// let universe = Universe::new(256).unwrap();
/// assert_eq!(universe.bits(), 8);
/// assert!(universe.contains(255));
/// assert!(!universe.contains(256));
///
/// assert!(Universe::new(1).is_err());
/// assert!(Universe::new(24).is_err());
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Universe {
    bits: u32,
}

impl Universe {
    /// The smallest universe, `[0, 2)`.
    pub const MIN: Self = Self { bits: 1 };

    /// The largest universe whose size fits in a `u64`, `[0, 2^63)`.
    pub const MAX: Self = Self { bits: u64::BITS - 1 };

    /// Validates `size` and returns the matching universe.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUniverse`] if `size` is smaller than 2 or not a power of two.
    pub const fn new(size: u64) -> Result<Self, Error> {
        if size < 2 || !size.is_power_of_two() {
            return Err(Error::InvalidUniverse { universe: size });
        }
        Ok(Self {
            bits: size.trailing_zeros(),
        })
    }

    /// Returns the universe of size `2^bits`, or `None` unless `1 <= bits <= 63`.
    ///
    /// # Examples
    ///
    /// ```
    /// use veb_tree::Universe;
    ///
    /// assert_eq!(Universe::from_bits(4).map(Universe::size), Some(16));
    /// assert_eq!(Universe::from_bits(0), None);
    /// assert_eq!(Universe::from_bits(64), None);
    /// ```
    #[must_use]
    pub const fn from_bits(bits: u32) -> Option<Self> {
        if bits < Self::MIN.bits || bits > Self::MAX.bits {
            return None;
        }
        Some(Self { bits })
    }

    /// Returns the number of values in the universe.
    #[inline]
    #[must_use]
    pub const fn size(self) -> u64 {
        1 << self.bits
    }

    /// Returns the binary logarithm of the universe size.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.bits
    }

    /// Returns `true` if `value` lies in `[0, size)`.
    #[inline]
    #[must_use]
    pub const fn contains(self, value: u64) -> bool {
        value >> self.bits == 0
    }

    /// Returns `true` for the base universe of size 2, whose nodes have no children.
    #[inline]
    pub(crate) const fn is_base(self) -> bool {
        self.bits == Self::MIN.bits
    }

    /// `2^ceil(bits / 2)`: the number of clusters, and the summary's universe.
    #[inline]
    pub(crate) const fn upper_sqrt(self) -> Self {
        Self {
            bits: self.bits.div_ceil(2),
        }
    }

    /// `2^floor(bits / 2)`: the universe of every cluster.
    #[inline]
    pub(crate) const fn lower_sqrt(self) -> Self {
        Self { bits: self.bits / 2 }
    }

    /// The cluster `value` belongs to.
    #[inline]
    pub(crate) const fn high(self, value: u64) -> u64 {
        value >> self.lower_sqrt().bits
    }

    /// The offset of `value` within its cluster.
    #[inline]
    pub(crate) const fn low(self, value: u64) -> u64 {
        value & (self.lower_sqrt().size() - 1)
    }

    /// Rebuilds a value from its cluster and its offset within that cluster.
    #[inline]
    pub(crate) const fn index(self, high: u64, low: u64) -> u64 {
        (high << self.lower_sqrt().bits) | low
    }

    /// Returns `(high(value), low(value))`.
    #[inline]
    pub(crate) const fn split(self, value: u64) -> (u64, u64) {
        (self.high(value), self.low(value))
    }
}

impl TryFrom<u64> for Universe {
    type Error = Error;

    fn try_from(size: u64) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

impl From<Universe> for u64 {
    fn from(universe: Universe) -> Self {
        universe.size()
    }
}

impl fmt::Display for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[0, {})", self.size())
    }
}
