//! The block allocator: capacity check, first-fit search and accounting.

use crate::bitmap::BlockBitmap;
use crate::phys_mapper::PhysMapper;
use crate::stats::PmmStats;
use crate::PmmError;
use kernel_memory_addresses::{BlockIndex, BlockRange, PhysicalAddress};
use log::{debug, trace, warn};

/// Bitmap-backed allocator for runs of physical blocks.
///
/// Owns the bitmap and the `used_blocks` counter and updates them together.
/// It has no internal locking: every mutation takes `&mut self`. Wrap it in
/// a [`LockedBlockAllocator`](crate::LockedBlockAllocator) before sharing it
/// between execution contexts.
///
/// # Invariants
/// - Directly after construction every block is used.
/// - `used_blocks` equals the number of set bits, provided callers honor the
///   [`open_region`](Self::open_region) / [`free`](Self::free) contracts.
/// - Once any region has been opened, block 0 stays reserved.
pub struct BlockAllocator<'a> {
    pub(crate) bitmap: BlockBitmap<'a>,
    pub(crate) used_blocks: usize,
}

impl<'a> BlockAllocator<'a> {
    /// Number of blocks needed to track `tracked_size` bytes (truncating).
    #[must_use]
    pub const fn max_blocks_for(tracked_size: u64) -> usize {
        BlockRange::from_byte_range(PhysicalAddress::zero(), tracked_size).count()
    }

    /// Place the bitmap in `storage` and mark every tracked block used.
    ///
    /// # Errors
    /// [`PmmError::StorageTooSmall`] if `storage` cannot hold one bit per
    /// block of `tracked_size`.
    pub fn new(storage: &'a mut [u64], tracked_size: u64) -> Result<Self, PmmError> {
        let max_blocks = Self::max_blocks_for(tracked_size);
        let bitmap = BlockBitmap::new(storage, max_blocks)?;
        debug!(
            "PMM: bitmap of {} words tracks {max_blocks} blocks ({tracked_size:#x} bytes)",
            bitmap.words().len()
        );
        Ok(Self {
            bitmap,
            used_blocks: max_blocks,
        })
    }

    /// Place the bitmap at the physical address `storage`.
    ///
    /// # Errors
    /// Same as [`new`](Self::new); with a correctly sized mapping this
    /// cannot fail.
    ///
    /// # Safety
    /// - `mapper` must translate `storage` into a non-null pointer, aligned for
    ///   `u64`, to at least `BlockBitmap::words_for(max_blocks_for(tracked_size))`
    ///   writable words.
    /// - That memory must not be accessed through any other path for `'a`.
    pub unsafe fn from_physical<M: PhysMapper>(
        mapper: &M,
        storage: PhysicalAddress,
        tracked_size: u64,
    ) -> Result<Self, PmmError> {
        let words = BlockBitmap::words_for(Self::max_blocks_for(tracked_size));
        // SAFETY: the caller guarantees the mapping covers `words` words.
        let storage = unsafe {
            let ptr = mapper.phys_to_ptr::<u64>(storage);
            core::slice::from_raw_parts_mut(ptr, words)
        };
        Self::new(storage, tracked_size)
    }

    /// Allocate `count` contiguous blocks and return the physical base address.
    ///
    /// The capacity guard demands **strictly more** free blocks than
    /// requested, so at least one block always stays spare. When the guard
    /// passes but no contiguous run is long enough (fragmentation), the
    /// request fails the same way.
    ///
    /// # Errors
    /// - [`PmmError::InvalidArgument`] if `count == 0`.
    /// - [`PmmError::OutOfMemory`] if the guard or the search fails.
    pub fn alloc(&mut self, count: usize) -> Result<PhysicalAddress, PmmError> {
        if count == 0 {
            return Err(PmmError::InvalidArgument);
        }

        let free = self.free_blocks();
        if free <= count {
            warn!("PMM: cannot allocate {count} blocks, only {free} free");
            return Err(PmmError::OutOfMemory);
        }

        let Ok(start) = self.bitmap.find_free_run(count) else {
            warn!("PMM: no run of {count} contiguous blocks ({free} free in total)");
            return Err(PmmError::OutOfMemory);
        };

        for block in BlockRange::new(start, count).iter() {
            self.bitmap.set(block);
        }
        self.used_blocks = self.used_blocks.wrapping_add(count);

        let address = start.base();
        trace!("PMM: allocated {count} blocks at {address}");
        Ok(address)
    }

    /// Return `count` blocks starting at `address` to the pool.
    ///
    /// Nothing checks that the run was actually allocated, or allocated with
    /// this length: `address` and `count` must match an earlier successful
    /// [`alloc`](Self::alloc). Use [`TrackedAllocator`](crate::TrackedAllocator)
    /// to have that verified.
    ///
    /// # Panics
    /// If the run reaches past the tracked range.
    pub fn free(&mut self, address: PhysicalAddress, count: usize) {
        let range = BlockRange::new(address.block(), count);
        for block in range.iter() {
            self.bitmap.unset(block);
        }
        self.used_blocks = self.used_blocks.wrapping_sub(count);
        trace!("PMM: freed {count} blocks at {address}");
    }

    #[inline]
    #[must_use]
    pub const fn max_blocks(&self) -> usize {
        self.bitmap.max_blocks()
    }

    #[inline]
    #[must_use]
    pub const fn used_blocks(&self) -> usize {
        self.used_blocks
    }

    #[inline]
    #[must_use]
    pub const fn free_blocks(&self) -> usize {
        self.max_blocks().saturating_sub(self.used_blocks)
    }

    /// Whether `block` is marked used.
    ///
    /// # Panics
    /// If `block` is outside the tracked range.
    #[inline]
    #[must_use]
    pub fn is_used(&self, block: BlockIndex) -> bool {
        self.bitmap.test(block)
    }

    #[inline]
    #[must_use]
    pub const fn bitmap(&self) -> &BlockBitmap<'a> {
        &self.bitmap
    }

    /// Snapshot of the block counters.
    #[must_use]
    pub const fn stats(&self) -> PmmStats {
        PmmStats::new(self.max_blocks(), self.used_blocks)
    }
}
