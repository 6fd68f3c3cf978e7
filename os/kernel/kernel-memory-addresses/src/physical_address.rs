use crate::{BlockIndex, MemoryAddress};
use core::fmt;
use core::ops::{Add, AddAssign};

/// Physical memory address.
///
/// A thin wrapper around [`MemoryAddress`] that denotes **physical** addresses
/// (host RAM / MMIO) as reported by the boot memory map and returned by the
/// block allocator.
///
/// ### Semantics
/// - Use [`PhysicalAddress::block`] to find the [`BlockIndex`] that contains
///   the address; [`BlockIndex::base`] goes the other way.
/// - Arithmetic is in **bytes**. Block arithmetic lives on [`BlockIndex`].
///
/// ### Examples
/// ```rust
/// # use kernel_memory_addresses::*;
/// let pa = PhysicalAddress::from_halves(0x2000_0042, 0x10);
/// assert_eq!(pa.as_u64(), 0x0000_0010_2000_0042);
/// assert_eq!(pa.block().base(), pa.align_down());
/// ```
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PhysicalAddress(pub(crate) MemoryAddress);

impl PhysicalAddress {
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0)
    }

    #[inline]
    #[must_use]
    pub const fn new(v: u64) -> Self {
        Self(MemoryAddress::new(v))
    }

    #[inline]
    #[must_use]
    pub const fn from_halves(low: u32, high: u32) -> Self {
        Self(MemoryAddress::from_halves(low, high))
    }

    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0.as_u64()
    }

    #[inline]
    #[must_use]
    pub const fn block(self) -> BlockIndex {
        self.0.block()
    }

    #[inline]
    #[must_use]
    pub const fn block_offset(self) -> u64 {
        self.0.block_offset()
    }

    #[inline]
    #[must_use]
    pub const fn align_down(self) -> Self {
        Self(self.0.align_down())
    }

    #[inline]
    #[must_use]
    pub const fn align_up(self) -> Self {
        Self(self.0.align_up())
    }

    #[inline]
    #[must_use]
    pub const fn is_block_aligned(self) -> bool {
        self.0.is_block_aligned()
    }

    #[inline]
    #[must_use]
    pub const fn checked_add(self, len: u64) -> Option<Self> {
        match self.0.checked_add(len) {
            Some(a) => Some(Self(a)),
            None => None,
        }
    }
}

impl fmt::Debug for PhysicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PA(0x{:016X})", self.as_u64())
    }
}

impl fmt::Display for PhysicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.as_u64())
    }
}

impl From<u64> for PhysicalAddress {
    #[inline]
    fn from(v: u64) -> Self {
        Self::new(v)
    }
}

impl From<PhysicalAddress> for u64 {
    #[inline]
    fn from(a: PhysicalAddress) -> Self {
        a.as_u64()
    }
}

impl From<BlockIndex> for PhysicalAddress {
    #[inline]
    fn from(value: BlockIndex) -> Self {
        value.base()
    }
}

impl Add<u64> for PhysicalAddress {
    type Output = Self;
    #[inline]
    fn add(self, rhs: u64) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl AddAssign<u64> for PhysicalAddress {
    #[inline]
    fn add_assign(&mut self, rhs: u64) {
        self.0 += rhs;
    }
}
