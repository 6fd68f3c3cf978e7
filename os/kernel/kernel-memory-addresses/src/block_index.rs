use crate::{BLOCK_SHIFT, PhysicalAddress};
use core::fmt;
use core::ops::{Add, AddAssign};

/// Index of a physical memory block.
///
/// Block `i` covers the byte range `[i * BLOCK_SIZE, (i + 1) * BLOCK_SIZE)`.
/// The index doubles as the bit position in the allocation bitmap, so it is a
/// `usize` rather than a `u64`.
///
/// ### Invariants
/// - A `BlockIndex` is never a byte quantity. Go through
///   [`BlockIndex::containing`] / [`BlockIndex::base`] to cross units.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BlockIndex(usize);

impl BlockIndex {
    /// The null block. Never handed out by the allocator.
    pub const ZERO: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// The block that contains `addr`.
    ///
    /// Addresses whose block number does not fit a `usize` saturate to
    /// `usize::MAX`, which no bitmap can hold; indexing with it faults.
    #[inline]
    #[must_use]
    pub const fn containing(addr: PhysicalAddress) -> Self {
        Self::containing_raw(addr.as_u64())
    }

    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn containing_raw(addr: u64) -> Self {
        let block = addr >> BLOCK_SHIFT;
        if block > usize::MAX as u64 {
            Self(usize::MAX)
        } else {
            Self(block as usize)
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0
    }

    /// First byte of this block.
    ///
    /// Bits shifted past 64 are lost; only indices that came out of a bitmap
    /// are guaranteed to round-trip.
    #[inline]
    #[must_use]
    pub const fn base(self) -> PhysicalAddress {
        PhysicalAddress::new((self.0 as u64) << BLOCK_SHIFT)
    }
}

impl fmt::Debug for BlockIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockIndex({})", self.0)
    }
}

impl fmt::Display for BlockIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<PhysicalAddress> for BlockIndex {
    #[inline]
    fn from(value: PhysicalAddress) -> Self {
        Self::containing(value)
    }
}

impl Add<usize> for BlockIndex {
    type Output = Self;
    #[inline]
    fn add(self, rhs: usize) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl AddAssign<usize> for BlockIndex {
    #[inline]
    fn add_assign(&mut self, rhs: usize) {
        self.0 += rhs;
    }
}
