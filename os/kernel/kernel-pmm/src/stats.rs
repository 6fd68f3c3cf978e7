//! Read-only diagnostics: block counters and the boot memory-map dump.

use crate::scanner::MemoryMapSummary;
use core::fmt;
use kernel_info::boot::MemoryMapEntry;
use kernel_memory_addresses::BLOCK_SIZE;
use log::info;

const BLOCK_KIB: u64 = BLOCK_SIZE / 1024;

/// Snapshot of the allocator's block counters.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct PmmStats {
    pub max_blocks: usize,
    pub used_blocks: usize,
    pub free_blocks: usize,
}

impl PmmStats {
    #[must_use]
    pub const fn new(max_blocks: usize, used_blocks: usize) -> Self {
        Self {
            max_blocks,
            used_blocks,
            free_blocks: max_blocks.saturating_sub(used_blocks),
        }
    }

    #[inline]
    #[must_use]
    pub const fn max_kib(&self) -> u64 {
        self.max_blocks as u64 * BLOCK_KIB
    }

    #[inline]
    #[must_use]
    pub const fn used_kib(&self) -> u64 {
        self.used_blocks as u64 * BLOCK_KIB
    }

    #[inline]
    #[must_use]
    pub const fn free_kib(&self) -> u64 {
        self.free_blocks as u64 * BLOCK_KIB
    }

    #[inline]
    #[must_use]
    pub const fn free_bytes(&self) -> u64 {
        self.free_blocks as u64 * BLOCK_SIZE
    }
}

impl fmt::Display for PmmStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " max blocks:  {} ({} KB)", self.max_blocks, self.max_kib())?;
        writeln!(f, " used blocks: {} ({} KB)", self.used_blocks, self.used_kib())?;
        write!(f, " free blocks: {} ({} KB)", self.free_blocks, self.free_kib())
    }
}

/// One row of the memory-map table, in the loader's raw field layout.
pub struct MemoryMapRow<'a>(pub &'a MemoryMapEntry);

impl fmt::Display for MemoryMapRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = self.0;
        write!(
            f,
            " <{:#x}> | <{:#x}> |  {:#x} | {:#x} |  {:#x} | {}",
            e.addr_low,
            e.addr_high,
            e.len_low,
            e.len_high,
            e.size,
            e.memory_kind()
        )
    }
}

/// Log the boot memory map as a table followed by the byte totals.
pub fn log_memory_map(entries: &[MemoryMapEntry], summary: &MemoryMapSummary) {
    info!("Physical memory map ({} entries):", entries.len());
    info!(" addr low | addr high | len low | len high | size | kind");
    for entry in entries {
        info!("{}", MemoryMapRow(entry));
    }
    info!(
        "total: {} KB free: {} KB",
        summary.total_kib(),
        summary.free_kib()
    );
}

/// Log the block counters, one line each.
pub fn log_stats(stats: &PmmStats) {
    info!(" max blocks:  {} ({} KB)", stats.max_blocks, stats.max_kib());
    info!(" used blocks: {} ({} KB)", stats.used_blocks, stats.used_kib());
    info!(" free blocks: {} ({} KB)", stats.free_blocks, stats.free_kib());
}
