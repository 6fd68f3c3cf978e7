//! # Physical Memory Manager
//!
//! A bitmap allocator for physical memory, handing out runs of contiguous
//! [`BLOCK_SIZE`](kernel_memory_addresses::BLOCK_SIZE) blocks.
//!
//! ## Model
//!
//! Every block of the tracked range `[0, max_blocks)` owns one bit:
//! `1` = used, `0` = free. Everything starts out used; the boot memory map
//! then *opens* the regions that are actually available.
//!
//! ```text
//!  block:   0   1   2   3   4   5   6   7   8   9  ...
//!  bit:   [ 1 | 0 | 0 | 0 | 1 | 1 | 0 | 0 | 0 | 0 | ...]
//!           │   └───┬───┘           └──────┬──────┘
//!           │     free run              free run
//!           └── null guard, always reserved
//! ```
//!
//! ## Boot flow
//!
//! ```text
//!  memory map ──► scan ──► largest available region ──► bitmap storage
//!                                                            │
//!      alloc / free ◄── re-reserve bitmap ◄── open_region ◄──┘
//! ```
//!
//! [`bootstrap`] performs the whole sequence. The result can be installed as
//! the kernel-wide instance through [`pmm::init`].
//!
//! ## Contracts
//!
//! The fast path trusts its caller. [`BlockAllocator::free`] and
//! [`BlockAllocator::open_region`] do not check the current state of the
//! blocks they touch; misuse skews the `used_blocks` counter. Use the
//! `_checked` region operations or a [`TrackedAllocator`] where that matters.
//! Indexing outside the tracked range always panics.
//!
//! The allocator keeps one block spare: a request for `n` blocks needs
//! strictly more than `n` free blocks.
//!
//! ## Example
//! ```rust
//! use kernel_memory_addresses::{BLOCK_SIZE, PhysicalAddress};
//! use kernel_pmm::BlockAllocator;
//!
//! let mut storage = [0u64; 1];
//! let mut pmm = BlockAllocator::new(&mut storage, 16 * BLOCK_SIZE).unwrap();
//! pmm.open_region(PhysicalAddress::zero(), 16 * BLOCK_SIZE);
//!
//! let run = pmm.alloc(4).unwrap();
//! assert_eq!(run, PhysicalAddress::new(BLOCK_SIZE));
//! pmm.free(run, 4);
//! assert_eq!(pmm.used_blocks(), 1);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod allocator;
mod bitmap;
mod boot;
mod error;
mod phys_mapper;
pub mod pmm;
mod provenance;
mod region;
mod scanner;
mod search;
mod stats;

pub use allocator::BlockAllocator;
pub use bitmap::{BITMAP_WORD_BITS, BlockBitmap};
pub use boot::bootstrap;
pub use error::{PmmError, ProvenanceError, RegionError, SearchError};
pub use phys_mapper::{HhdmPhysMapper, OffsetPhysMapper, PhysMapper};
pub use pmm::LockedBlockAllocator;
pub use provenance::{Allocation, TrackedAllocator};
pub use scanner::{MemoryMapSummary, scan, scan_regions};
pub use stats::{MemoryMapRow, PmmStats, log_memory_map, log_stats};

const _: () = {
    assert!(BITMAP_WORD_BITS == 64);
    assert!(kernel_memory_addresses::BLOCK_SIZE.is_power_of_two());
};
