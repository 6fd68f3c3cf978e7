//! # Kernel Boot Interface and Memory Layout
//!
//! This crate defines the data structures and constants shared between the
//! boot loader and the kernel's early memory management.
//!
//! ## Overview
//!
//! ### Boot Information ([`boot`])
//! The boot loader reports physical memory as an array of fixed-size
//! descriptors:
//! * **ABI Layout**: [`MemoryMapEntry`](boot::MemoryMapEntry) is `#[repr(C)]`
//!   and matches the multiboot memory-map entry (addresses and lengths split
//!   into 32-bit halves)
//! * **Typed View**: [`MemoryRegion`](boot::MemoryRegion) carries a
//!   [`PhysicalAddress`](kernel_memory_addresses::PhysicalAddress), a 64-bit
//!   length and a decoded [`MemoryKind`](boot::MemoryKind)
//! * **Raw Buffer**: [`MemoryMapInfo`](boot::MemoryMapInfo) locates the
//!   descriptor array in memory
//!
//! ### Memory Layout ([`memory`])
//! Compile-time constants describing where physical memory is reachable and
//! which blocks are never allocatable.
//!
//! ```text
//! Physical Memory Layout (typical PC):
//! 0x0000_0000 ┌─────────────────────────────────┐
//!             │ Block 0 (null guard, reserved)  │
//!             │     Low Memory (< 640KiB)       │
//! 0x000A_0000 ├─────────────────────────────────┤
//!             │  VGA / BIOS ROM (reserved)      │
//! 0x0010_0000 ├─────────────────────────────────┤ 1 MiB
//!             │    Available RAM                │
//!             │  (largest region hosts the PMM  │
//!             │   bitmap, rest is allocatable)  │
//!             └─────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use kernel_info::boot::{MemoryKind, MemoryMapEntry};
//!
//! let entry = MemoryMapEntry::new(0x10_0000, 0x7F0_0000, MemoryKind::Available);
//! let region = entry.region();
//! assert!(region.kind.is_available());
//! assert_eq!(region.end().as_u64(), 0x800_0000);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

pub mod boot;
pub mod memory;
