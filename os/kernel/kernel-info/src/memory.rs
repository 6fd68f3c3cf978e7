//! # Memory Layout

/// A simple Higher Half Direct Map (HHDM) base.
/// Anything you map at [`HHDM_BASE`] + `pa` lets the kernel
/// access physical memory via a fixed offset.
pub const HHDM_BASE: u64 = 0xffff_8880_0000_0000;

/// Physical block that is never handed out, so no allocation can be mistaken
/// for a null pointer.
pub const NULL_GUARD_BLOCK: usize = 0;

const _: () = assert!(HHDM_BASE.is_multiple_of(kernel_memory_addresses::BLOCK_SIZE));
