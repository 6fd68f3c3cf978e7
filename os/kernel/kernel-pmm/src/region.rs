//! Region accounting: opening and closing byte ranges of physical memory.
//!
//! A region `(base, length)` covers the blocks
//! `[base / BLOCK_SIZE, base / BLOCK_SIZE + length / BLOCK_SIZE)`. Opening
//! frees those blocks, closing reserves them; either way `used_blocks` moves
//! by the number of blocks in the range.
//!
//! The plain operations trust their caller. Opening a region twice or closing
//! more than is open desynchronizes `used_blocks` from the bitmap. The
//! `_checked` variants validate the whole range first and refuse to touch
//! anything on mismatch.

use crate::allocator::BlockAllocator;
use crate::RegionError;
use kernel_info::memory::NULL_GUARD_BLOCK;
use kernel_memory_addresses::{BlockIndex, BlockRange, PhysicalAddress};
use log::debug;

impl BlockAllocator<'_> {
    /// Make the blocks of `[base, base + length)` available.
    ///
    /// Block 0 is reserved again afterwards (and counted if the region had
    /// freed it), so the null address is never handed out.
    ///
    /// # Panics
    /// If the range reaches past the tracked range.
    pub fn open_region(&mut self, base: PhysicalAddress, length: u64) -> BlockRange {
        let range = BlockRange::from_byte_range(base, length);
        for block in range.iter() {
            self.bitmap.unset(block);
        }
        self.used_blocks = self.used_blocks.wrapping_sub(range.count());
        self.reserve_guard_block();

        debug!("PMM: opened region {base} (+{length:#x}) = blocks {range}");
        range
    }

    /// Reserve the blocks of `[base, base + length)`.
    ///
    /// # Panics
    /// If the range reaches past the tracked range.
    pub fn close_region(&mut self, base: PhysicalAddress, length: u64) -> BlockRange {
        let range = BlockRange::from_byte_range(base, length);
        for block in range.iter() {
            self.bitmap.set(block);
        }
        self.used_blocks = self.used_blocks.wrapping_add(range.count());

        debug!("PMM: closed region {base} (+{length:#x}) = blocks {range}");
        range
    }

    /// Like [`open_region`](Self::open_region), but only if every block in the
    /// range is inside the tracked range and currently used.
    ///
    /// # Errors
    /// [`RegionError::OutOfRange`] or [`RegionError::AlreadyFree`] naming the
    /// first offending block. Nothing is modified in that case.
    pub fn open_region_checked(
        &mut self,
        base: PhysicalAddress,
        length: u64,
    ) -> Result<BlockRange, RegionError> {
        let range = BlockRange::from_byte_range(base, length);
        self.validate_range(range, true)?;
        Ok(self.open_region(base, length))
    }

    /// Like [`close_region`](Self::close_region), but only if every block in
    /// the range is inside the tracked range and currently free.
    ///
    /// # Errors
    /// [`RegionError::OutOfRange`] or [`RegionError::AlreadyUsed`] naming the
    /// first offending block. Nothing is modified in that case.
    pub fn close_region_checked(
        &mut self,
        base: PhysicalAddress,
        length: u64,
    ) -> Result<BlockRange, RegionError> {
        let range = BlockRange::from_byte_range(base, length);
        self.validate_range(range, false)?;
        Ok(self.close_region(base, length))
    }

    /// Reserve the still-free blocks of `range` and return how many that was.
    ///
    /// Blocks outside the tracked range and blocks already in use are skipped,
    /// so the counter stays exact even if `range` overlaps reserved memory.
    pub(crate) fn claim_range(&mut self, range: BlockRange) -> usize {
        let end = range.end().as_usize().min(self.max_blocks());
        let mut claimed = 0usize;
        for i in range.start().as_usize()..end {
            let block = BlockIndex::new(i);
            if !self.bitmap.test(block) {
                self.bitmap.set(block);
                claimed += 1;
            }
        }
        self.used_blocks = self.used_blocks.wrapping_add(claimed);
        claimed
    }

    fn reserve_guard_block(&mut self) {
        let guard = BlockIndex::new(NULL_GUARD_BLOCK);
        if guard.as_usize() < self.max_blocks() && !self.bitmap.test(guard) {
            self.bitmap.set(guard);
            self.used_blocks = self.used_blocks.wrapping_add(1);
        }
    }

    fn validate_range(&self, range: BlockRange, expect_used: bool) -> Result<(), RegionError> {
        if range.end().as_usize() > self.max_blocks() {
            let first_outside = range.start().as_usize().max(self.max_blocks());
            return Err(RegionError::OutOfRange {
                block: BlockIndex::new(first_outside),
            });
        }

        for block in range.iter() {
            match (self.bitmap.test(block), expect_used) {
                (false, true) => return Err(RegionError::AlreadyFree { block }),
                (true, false) => return Err(RegionError::AlreadyUsed { block }),
                _ => {}
            }
        }
        Ok(())
    }
}
