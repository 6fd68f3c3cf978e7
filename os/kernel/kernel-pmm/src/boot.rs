//! Boot-time setup of the block allocator from the loader's memory map.

use crate::allocator::BlockAllocator;
use crate::phys_mapper::PhysMapper;
use crate::scanner::{MemoryMapSummary, scan};
use crate::stats::{log_memory_map, log_stats};
use crate::PmmError;
use kernel_info::boot::MemoryMapEntry;
use kernel_memory_addresses::{BLOCK_SIZE, BlockRange};
use log::info;

/// Build the allocator from the boot memory map.
///
/// 1. Scan the map and pick the largest available region.
/// 2. Place the bitmap at the (block-aligned) start of that region.
/// 3. Open every available region.
/// 4. Reserve the blocks the bitmap itself occupies.
///
/// # Errors
/// [`PmmError::NoBitmapRegion`] if the map has no available region, or the
/// largest one cannot hold the bitmap.
///
/// # Safety
/// - `mapper` must map the whole largest available region writable.
/// - The memory map must be accurate: available regions must not be in use
///   by anything else, and nothing else may touch the bitmap storage for `'a`.
#[allow(clippy::cast_possible_truncation)]
pub unsafe fn bootstrap<'a, M: PhysMapper>(
    entries: &[MemoryMapEntry],
    mapper: &M,
) -> Result<(BlockAllocator<'a>, MemoryMapSummary), PmmError> {
    let summary = scan(entries);
    log_memory_map(entries, &summary);

    let largest = summary.largest.ok_or(PmmError::NoBitmapRegion)?;
    let storage = largest.base.align_up();
    let bitmap_bytes = summary.bitmap_bytes();
    let fits = storage
        .checked_add(bitmap_bytes)
        .is_some_and(|end| end <= largest.end());
    if !fits {
        return Err(PmmError::NoBitmapRegion);
    }

    let tracked_size = summary.tracked_size();
    info!(
        "PMM: tracking {tracked_size:#x} bytes, bitmap ({bitmap_bytes} bytes) at {storage}"
    );

    // SAFETY: the bitmap fits into the largest region, which the caller
    // guarantees is mapped and unused.
    let mut pmm = unsafe { BlockAllocator::from_physical(mapper, storage, tracked_size)? };

    for entry in entries.iter().filter(|e| e.memory_kind().is_available()) {
        pmm.open_region(entry.base(), entry.length());
    }

    let bitmap_blocks = BlockRange::new(
        storage.block(),
        bitmap_bytes.div_ceil(BLOCK_SIZE) as usize,
    );
    let claimed = pmm.claim_range(bitmap_blocks);
    info!("PMM: bitmap occupies blocks {bitmap_blocks} ({claimed} reserved)");

    log_stats(&pmm.stats());
    Ok((pmm, summary))
}
