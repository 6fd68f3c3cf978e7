//! # Physical Memory Mappers
//!
//! The bitmap lives in physical memory, but the allocator can only touch it
//! through a virtual pointer. A [`PhysMapper`] performs that translation.
//!
//! - [`HhdmPhysMapper`] is what the kernel uses: physical memory is mapped
//!   linearly at [`HHDM_BASE`].
//! - [`OffsetPhysMapper`] adds an arbitrary offset. Tests use it to pretend a
//!   host buffer sits at some physical address.
//!
//! ## Example
//! ```rust
//! use kernel_memory_addresses::PhysicalAddress;
//! use kernel_pmm::{OffsetPhysMapper, PhysMapper};
//!
//! let mut buffer = [0u64; 4];
//! let base = PhysicalAddress::new(0x10_0000);
//! let mapper = OffsetPhysMapper::for_buffer(buffer.as_mut_ptr(), base);
//! let ptr: *mut u64 = unsafe { mapper.phys_to_ptr(base + 8) };
//! unsafe { ptr.write(42) };
//! assert_eq!(buffer[1], 42);
//! ```

use kernel_info::memory::HHDM_BASE;
use kernel_memory_addresses::PhysicalAddress;

/// Translates physical addresses into pointers in the current address space.
pub trait PhysMapper {
    /// Convert a *physical* address to a raw pointer.
    ///
    /// # Safety
    /// The returned pointer is only valid if the physical range behind `pa`
    /// is actually mapped by this mapper. Dereferencing it is up to the caller.
    unsafe fn phys_to_ptr<T>(&self, pa: PhysicalAddress) -> *mut T;
}

/// [`PhysMapper`] for kernels with a higher-half direct map (HHDM).
///
/// # Safety
/// - The HHDM mapping must be present and cover the referenced physical range.
#[derive(Debug, Copy, Clone, Default)]
pub struct HhdmPhysMapper;

impl PhysMapper for HhdmPhysMapper {
    #[allow(clippy::cast_possible_truncation)]
    unsafe fn phys_to_ptr<T>(&self, pa: PhysicalAddress) -> *mut T {
        HHDM_BASE.wrapping_add(pa.as_u64()) as usize as *mut T
    }
}

/// [`PhysMapper`] that adds a fixed offset (modulo 2^64) to every address.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OffsetPhysMapper {
    offset: u64,
}

impl OffsetPhysMapper {
    #[inline]
    #[must_use]
    pub const fn new(offset: u64) -> Self {
        Self { offset }
    }

    /// Mapper under which the physical address `base` lands on `buffer`.
    #[inline]
    #[must_use]
    pub fn for_buffer<T>(buffer: *mut T, base: PhysicalAddress) -> Self {
        Self::new((buffer as usize as u64).wrapping_sub(base.as_u64()))
    }

    #[inline]
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }
}

impl PhysMapper for OffsetPhysMapper {
    #[allow(clippy::cast_possible_truncation)]
    unsafe fn phys_to_ptr<T>(&self, pa: PhysicalAddress) -> *mut T {
        pa.as_u64().wrapping_add(self.offset) as usize as *mut T
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hhdm_adds_base() {
        let ptr: *mut u8 = unsafe { HhdmPhysMapper.phys_to_ptr(PhysicalAddress::new(0x1000)) };
        assert_eq!(ptr as usize as u64, HHDM_BASE + 0x1000);
    }

    #[test]
    fn offset_wraps() {
        let mapper = OffsetPhysMapper::new(u64::MAX);
        let ptr: *mut u8 = unsafe { mapper.phys_to_ptr(PhysicalAddress::new(0x2000)) };
        assert_eq!(ptr as usize as u64, 0x1fff);
    }

    #[test]
    fn buffer_mapper_lands_on_buffer() {
        let mut buffer = [0u64; 2];
        let base = PhysicalAddress::new(0x8000);
        let mapper = OffsetPhysMapper::for_buffer(buffer.as_mut_ptr(), base);
        let ptr: *mut u64 = unsafe { mapper.phys_to_ptr(base) };
        assert_eq!(ptr, buffer.as_mut_ptr());
    }
}
