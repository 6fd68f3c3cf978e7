//! Memory-map scanning: byte totals and the bitmap placement candidate.

use crate::allocator::BlockAllocator;
use crate::bitmap::BlockBitmap;
use kernel_info::boot::{MemoryMapEntry, MemoryRegion};
use kernel_memory_addresses::PhysicalAddress;

/// Result of one pass over the boot memory map.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct MemoryMapSummary {
    /// Sum of all region lengths, regardless of kind.
    pub total_bytes: u64,
    /// Sum of the lengths of available regions.
    pub free_bytes: u64,
    /// Longest available region; the earliest one wins ties.
    pub largest: Option<MemoryRegion>,
    /// One past the last byte of the highest available region.
    pub highest_available_end: PhysicalAddress,
}

impl MemoryMapSummary {
    /// Number of bytes the allocator has to track to cover every available region.
    #[inline]
    #[must_use]
    pub const fn tracked_size(&self) -> u64 {
        self.highest_available_end.as_u64()
    }

    /// Number of blocks covered by [`tracked_size`](Self::tracked_size).
    #[inline]
    #[must_use]
    pub const fn max_blocks(&self) -> usize {
        BlockAllocator::max_blocks_for(self.tracked_size())
    }

    /// Bytes occupied by a bitmap for [`max_blocks`](Self::max_blocks).
    #[inline]
    #[must_use]
    pub const fn bitmap_bytes(&self) -> u64 {
        (BlockBitmap::words_for(self.max_blocks()) * size_of::<u64>()) as u64
    }

    /// Free memory in KiB.
    #[inline]
    #[must_use]
    pub const fn free_kib(&self) -> u64 {
        self.free_bytes / 1024
    }

    /// Total memory in KiB.
    #[inline]
    #[must_use]
    pub const fn total_kib(&self) -> u64 {
        self.total_bytes / 1024
    }
}

/// Summarize raw boot descriptors.
#[must_use]
pub fn scan(entries: &[MemoryMapEntry]) -> MemoryMapSummary {
    scan_regions(entries.iter().map(MemoryMapEntry::region))
}

/// Summarize decoded regions in a single pass.
#[must_use]
pub fn scan_regions<I>(regions: I) -> MemoryMapSummary
where
    I: IntoIterator<Item = MemoryRegion>,
{
    let mut summary = MemoryMapSummary::default();
    let mut largest_len = 0u64;

    for region in regions {
        summary.total_bytes = summary.total_bytes.saturating_add(region.length);
        if !region.kind.is_available() {
            continue;
        }

        summary.free_bytes = summary.free_bytes.saturating_add(region.length);
        if region.length > largest_len {
            largest_len = region.length;
            summary.largest = Some(region);
        }
        if region.end() > summary.highest_available_end {
            summary.highest_available_end = region.end();
        }
    }

    summary
}
