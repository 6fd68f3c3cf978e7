use crate::{BLOCK_SIZE, BlockIndex};
use core::fmt;
use core::ops::{Add, AddAssign};

/// Principal raw memory address, see [`PhysicalAddress`](super::PhysicalAddress).
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MemoryAddress(u64);

impl MemoryAddress {
    #[inline]
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Combine the two 32-bit halves the boot memory map reports.
    #[inline]
    #[must_use]
    pub const fn from_halves(low: u32, high: u32) -> Self {
        Self(((high as u64) << 32) | low as u64)
    }

    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// The block that contains this address (lower bits dropped).
    #[inline]
    #[must_use]
    pub const fn block(self) -> BlockIndex {
        BlockIndex::containing_raw(self.0)
    }

    /// Byte offset of this address inside its block.
    #[inline]
    #[must_use]
    pub const fn block_offset(self) -> u64 {
        self.0 & (BLOCK_SIZE - 1)
    }

    /// Align down to a block boundary.
    #[inline]
    #[must_use]
    pub const fn align_down(self) -> Self {
        Self(self.0 & !(BLOCK_SIZE - 1))
    }

    /// Align up to a block boundary, saturating at the last block.
    #[inline]
    #[must_use]
    pub const fn align_up(self) -> Self {
        match self.0.checked_add(BLOCK_SIZE - 1) {
            Some(v) => Self(v & !(BLOCK_SIZE - 1)),
            None => Self(u64::MAX & !(BLOCK_SIZE - 1)),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_block_aligned(self) -> bool {
        self.block_offset() == 0
    }

    /// Checked add of a byte length, returning `None` on overflow.
    #[inline]
    #[must_use]
    pub const fn checked_add(self, len: u64) -> Option<Self> {
        match self.0.checked_add(len) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl fmt::Debug for MemoryAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 0xHHHH_HHHH_HHHH_HHHH style
        write!(f, "MemoryAddress(0x{:016X})", self.0)
    }
}

impl fmt::Display for MemoryAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.as_u64())
    }
}

impl From<u64> for MemoryAddress {
    #[inline]
    fn from(v: u64) -> Self {
        Self::new(v)
    }
}

impl From<MemoryAddress> for u64 {
    #[inline]
    fn from(a: MemoryAddress) -> Self {
        a.as_u64()
    }
}

impl Add<u64> for MemoryAddress {
    type Output = Self;
    #[inline]
    fn add(self, rhs: u64) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl AddAssign<u64> for MemoryAddress {
    #[inline]
    fn add_assign(&mut self, rhs: u64) {
        self.0 += rhs;
    }
}
