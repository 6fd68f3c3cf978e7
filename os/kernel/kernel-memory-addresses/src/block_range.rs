use crate::{BLOCK_SHIFT, BLOCK_SIZE, BlockIndex, PhysicalAddress};
use core::fmt;

/// A contiguous run of blocks `[start, start + count)`.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct BlockRange {
    start: BlockIndex,
    count: usize,
}

impl BlockRange {
    #[inline]
    #[must_use]
    pub const fn new(start: BlockIndex, count: usize) -> Self {
        Self { start, count }
    }

    /// Blocks covered by the byte region `[base, base + len)`.
    ///
    /// Both values are truncated: `start = base / BLOCK_SIZE` and
    /// `count = len / BLOCK_SIZE`. A region that starts mid-block therefore
    /// reaches into the block right after its last whole block, and a region
    /// shorter than one block covers nothing.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_byte_range(base: PhysicalAddress, len: u64) -> Self {
        let count = len >> BLOCK_SHIFT;
        let count = if count > usize::MAX as u64 {
            usize::MAX
        } else {
            count as usize
        };
        Self {
            start: BlockIndex::containing(base),
            count,
        }
    }

    #[inline]
    #[must_use]
    pub const fn start(self) -> BlockIndex {
        self.start
    }

    #[inline]
    #[must_use]
    pub const fn count(self) -> usize {
        self.count
    }

    /// One past the last block. Saturates instead of wrapping.
    #[inline]
    #[must_use]
    pub const fn end(self) -> BlockIndex {
        BlockIndex::new(self.start.as_usize().saturating_add(self.count))
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.count == 0
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, block: BlockIndex) -> bool {
        block.as_usize() >= self.start.as_usize() && block.as_usize() < self.end().as_usize()
    }

    /// Length of the run in bytes.
    #[inline]
    #[must_use]
    pub const fn byte_len(self) -> u64 {
        (self.count as u64).saturating_mul(BLOCK_SIZE)
    }

    #[inline]
    pub fn iter(self) -> impl Iterator<Item = BlockIndex> {
        (self.start.as_usize()..self.end().as_usize()).map(BlockIndex::new)
    }
}

impl fmt::Debug for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BlockRange({}..{})",
            self.start.as_usize(),
            self.end().as_usize()
        )
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}
