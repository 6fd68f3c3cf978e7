//! Allocation tracking on top of the plain block allocator.
//!
//! [`BlockAllocator::free`] believes whatever it is told. A double free, or a
//! free with the wrong length, silently skews `used_blocks`. The
//! [`TrackedAllocator`] keeps a fixed table of outstanding runs and refuses
//! frees that do not match one exactly.

use crate::allocator::BlockAllocator;
use crate::ProvenanceError;
use kernel_memory_addresses::{BlockIndex, BlockRange, PhysicalAddress};
use log::warn;

/// One outstanding run of blocks.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub start: BlockIndex,
    pub count: usize,
}

impl Allocation {
    #[inline]
    #[must_use]
    pub const fn address(&self) -> PhysicalAddress {
        self.start.base()
    }

    #[inline]
    #[must_use]
    pub const fn range(&self) -> BlockRange {
        BlockRange::new(self.start, self.count)
    }
}

/// A [`BlockAllocator`] that remembers up to `N` live allocations.
pub struct TrackedAllocator<'a, const N: usize> {
    pmm: BlockAllocator<'a>,
    table: [Option<Allocation>; N],
}

impl<'a, const N: usize> TrackedAllocator<'a, N> {
    /// Start tracking. Runs allocated from `pmm` before this call are unknown
    /// to the table and cannot be freed through it.
    #[must_use]
    pub const fn new(pmm: BlockAllocator<'a>) -> Self {
        Self {
            pmm,
            table: [None; N],
        }
    }

    /// Allocate `count` blocks and record the run.
    ///
    /// # Errors
    /// - [`ProvenanceError::TableFull`] if no slot is left; the allocator is
    ///   not touched in that case.
    /// - [`ProvenanceError::Pmm`] if the allocation itself fails.
    pub fn alloc(&mut self, count: usize) -> Result<PhysicalAddress, ProvenanceError> {
        let Some(slot) = self.table.iter().position(Option::is_none) else {
            warn!("PMM: allocation table full ({N} entries)");
            return Err(ProvenanceError::TableFull);
        };

        let address = self.pmm.alloc(count)?;
        self.table[slot] = Some(Allocation {
            start: address.block(),
            count,
        });
        Ok(address)
    }

    /// Free a run previously returned by [`alloc`](Self::alloc).
    ///
    /// # Errors
    /// - [`ProvenanceError::UnknownAllocation`] if no recorded run starts at
    ///   `address` (including a second free of the same run).
    /// - [`ProvenanceError::SizeMismatch`] if `count` differs from the
    ///   recorded length.
    ///
    /// Nothing is freed when an error is returned.
    pub fn free(&mut self, address: PhysicalAddress, count: usize) -> Result<(), ProvenanceError> {
        let slot = self
            .table
            .iter()
            .position(|a| a.is_some_and(|a| a.address() == address))
            .ok_or(ProvenanceError::UnknownAllocation { address })?;

        let recorded = self.table[slot].map_or(0, |a| a.count);
        if recorded != count {
            warn!("PMM: free of {count} blocks at {address}, but {recorded} were allocated");
            return Err(ProvenanceError::SizeMismatch {
                address,
                recorded,
                requested: count,
            });
        }

        self.pmm.free(address, count);
        self.table[slot] = None;
        Ok(())
    }

    /// The recorded run starting at `address`, if any.
    #[must_use]
    pub fn lookup(&self, address: PhysicalAddress) -> Option<Allocation> {
        self.allocations().find(|a| a.address() == address)
    }

    /// All outstanding runs, in table order.
    pub fn allocations(&self) -> impl Iterator<Item = Allocation> + '_ {
        self.table.iter().filter_map(|a| *a)
    }

    /// Number of outstanding runs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.allocations().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Read access to the wrapped allocator.
    #[inline]
    #[must_use]
    pub const fn allocator(&self) -> &BlockAllocator<'a> {
        &self.pmm
    }

    /// Stop tracking and return the wrapped allocator.
    #[must_use]
    pub fn into_inner(self) -> BlockAllocator<'a> {
        self.pmm
    }
}
