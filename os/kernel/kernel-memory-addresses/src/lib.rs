//! # Physical Memory Address and Block Types
//!
//! Strongly typed wrappers for raw physical addresses and the fixed-size
//! blocks the physical memory manager hands out.
//!
//! ## Overview
//!
//! The physical memory manager works in two units that are easy to mix up:
//! **bytes** (addresses and lengths reported by the boot memory map) and
//! **blocks** (indices into the allocation bitmap). This crate keeps them apart
//! at compile time while remaining zero-cost wrappers around integers.
//!
//! | Concept | Unit | Description |
//! |----------|------|-------------|
//! | [`MemoryAddress`] | bytes | A raw 64-bit address. |
//! | [`PhysicalAddress`] | bytes | A physical address (RAM / MMIO). |
//! | [`BlockIndex`] | blocks | Index of a [`BLOCK_SIZE`] block, i.e. one bitmap bit. |
//! | [`BlockRange`] | blocks | A contiguous run `[start, start + count)` of blocks. |
//!
//! ## Conversions
//!
//! All conversions between bytes and blocks are explicit:
//!
//! - [`BlockIndex::containing`] truncates a [`PhysicalAddress`] down to the
//!   block that contains it.
//! - [`BlockIndex::base`] goes back to the first byte of the block.
//! - [`BlockRange::from_byte_range`] turns a `(base, length)` region into the
//!   block run it covers, truncating both values to whole blocks.
//!
//! ```rust
//! # use kernel_memory_addresses::*;
//! let pa = PhysicalAddress::new(0x3000 + 0x42);
//! let block = BlockIndex::containing(pa);
//! assert_eq!(block.as_usize(), 3);
//! assert_eq!(block.base(), PhysicalAddress::new(0x3000));
//!
//! let range = BlockRange::from_byte_range(PhysicalAddress::new(0x1000), 0x2fff);
//! assert_eq!(range.start().as_usize(), 1);
//! assert_eq!(range.count(), 2);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

mod block_index;
mod block_range;
mod memory_address;
mod physical_address;

pub use block_index::BlockIndex;
pub use block_range::BlockRange;
pub use memory_address::MemoryAddress;
pub use physical_address::PhysicalAddress;

/// Size of one allocation block in bytes.
pub const BLOCK_SIZE: u64 = 4096;

/// log2([`BLOCK_SIZE`]), i.e. the number of low address bits inside a block.
pub const BLOCK_SHIFT: u32 = 12;

const _: () = {
    assert!(BLOCK_SIZE.is_power_of_two());
    assert!(1 << BLOCK_SHIFT == BLOCK_SIZE);
};
