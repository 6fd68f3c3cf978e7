//! # Boot Memory Map Interface
//!
//! The boot loader hands the kernel an array of fixed-size memory-map
//! descriptors. This module defines their ABI layout ([`MemoryMapEntry`]) and
//! the decoded, typed view the kernel works with ([`MemoryRegion`]).

use core::fmt;
use kernel_memory_addresses::PhysicalAddress;

/// Location of the raw memory map handed over by the boot loader.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct MemoryMapInfo {
    /// Physical (identity-accessible) address of the first [`MemoryMapEntry`].
    pub mmap_ptr: u64,

    /// Length of the memory map buffer in **bytes**.
    pub mmap_len: u64,
}

impl MemoryMapInfo {
    /// Number of whole descriptors in the buffer.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn entry_count(&self) -> usize {
        let count = self.mmap_len / MemoryMapEntry::STRIDE;
        if count > usize::MAX as u64 {
            usize::MAX
        } else {
            count as usize
        }
    }

    /// View the buffer as a slice of descriptors.
    ///
    /// Trailing bytes that do not form a whole descriptor are ignored.
    ///
    /// # Safety
    /// - `mmap_ptr` must point to `mmap_len` readable bytes, aligned for
    ///   [`MemoryMapEntry`], that stay valid and unmodified for `'a`.
    #[allow(unsafe_code)]
    #[must_use]
    pub unsafe fn entries<'a>(&self) -> &'a [MemoryMapEntry] {
        let count = self.entry_count();
        if count == 0 || self.mmap_ptr == 0 {
            return &[];
        }
        // SAFETY: upheld by the caller.
        unsafe { core::slice::from_raw_parts(self.mmap_ptr as *const MemoryMapEntry, count) }
    }
}

/// One boot memory-map descriptor, laid out as the multiboot loader writes it.
///
/// Addresses and lengths are split into 32-bit halves.
#[repr(C)]
#[derive(Clone, Copy, Eq, PartialEq, Default)]
pub struct MemoryMapEntry {
    /// Size of the descriptor as reported by the loader (excluding this field).
    pub size: u32,
    pub addr_low: u32,
    pub addr_high: u32,
    pub len_low: u32,
    pub len_high: u32,
    /// Raw region type, see [`MemoryKind::from_raw`].
    pub kind: u32,
}

const _: () = {
    assert!(size_of::<MemoryMapEntry>() == 24);
};

impl MemoryMapEntry {
    /// Distance between consecutive descriptors in the raw buffer.
    pub const STRIDE: u64 = size_of::<Self>() as u64;

    /// Build a descriptor from full 64-bit values.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(base: u64, length: u64, kind: MemoryKind) -> Self {
        Self {
            size: (size_of::<Self>() - size_of::<u32>()) as u32,
            addr_low: base as u32,
            addr_high: (base >> 32) as u32,
            len_low: length as u32,
            len_high: (length >> 32) as u32,
            kind: kind.as_raw(),
        }
    }

    #[must_use]
    pub const fn base(&self) -> PhysicalAddress {
        PhysicalAddress::from_halves(self.addr_low, self.addr_high)
    }

    #[must_use]
    pub const fn length(&self) -> u64 {
        ((self.len_high as u64) << 32) | self.len_low as u64
    }

    #[must_use]
    pub const fn memory_kind(&self) -> MemoryKind {
        MemoryKind::from_raw(self.kind)
    }

    #[must_use]
    pub const fn region(&self) -> MemoryRegion {
        MemoryRegion::new(self.base(), self.length(), self.memory_kind())
    }
}

impl fmt::Debug for MemoryMapEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryMapEntry")
            .field("base", &self.base())
            .field("length", &format_args!("{:#x}", self.length()))
            .field("kind", &self.memory_kind())
            .finish()
    }
}

/// Region type reported by the boot loader.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MemoryKind {
    /// Usable RAM.
    Available = 1,
    /// Reserved by firmware or hardware.
    Reserved = 2,
    /// ACPI tables; reclaimable once they have been parsed.
    AcpiReclaimable = 3,
    /// ACPI non-volatile storage.
    Nvs = 4,
    /// Defective RAM.
    Bad = 5,
}

impl MemoryKind {
    /// Decode a raw type. Unknown values are treated as [`MemoryKind::Reserved`].
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Self::Available,
            3 => Self::AcpiReclaimable,
            4 => Self::Nvs,
            5 => Self::Bad,
            _ => Self::Reserved,
        }
    }

    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self as u32
    }

    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }

    /// Short name used in memory map dumps.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Reserved => "reserved",
            Self::AcpiReclaimable => "reclaimable",
            Self::Nvs => "nvs",
            Self::Bad => "bad RAM",
        }
    }
}

impl fmt::Display for MemoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded memory-map region.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct MemoryRegion {
    pub base: PhysicalAddress,
    pub length: u64,
    pub kind: MemoryKind,
}

impl MemoryRegion {
    #[must_use]
    pub const fn new(base: PhysicalAddress, length: u64, kind: MemoryKind) -> Self {
        Self { base, length, kind }
    }

    /// One past the last byte, saturating at the top of the address space.
    #[must_use]
    pub const fn end(&self) -> PhysicalAddress {
        PhysicalAddress::new(self.base.as_u64().saturating_add(self.length))
    }

    #[must_use]
    pub const fn contains(&self, addr: PhysicalAddress) -> bool {
        addr.as_u64() >= self.base.as_u64() && addr.as_u64() < self.end().as_u64()
    }
}

impl From<MemoryMapEntry> for MemoryRegion {
    fn from(value: MemoryMapEntry) -> Self {
        value.region()
    }
}
