//! The global instance can only be initialized once per process, so this
//! file holds a single test.

use kernel_memory_addresses::{BLOCK_SIZE, PhysicalAddress};
use kernel_pmm::{BlockAllocator, pmm};
use std::panic;

#[test]
fn global_lifecycle() {
    assert!(!pmm::is_initialized());
    assert_eq!(pmm::try_with(|p| p.used_blocks()), None);
    assert!(panic::catch_unwind(|| pmm::with(|p| p.used_blocks())).is_err());

    let storage: &'static mut [u64] = Box::leak(vec![0u64; 1].into_boxed_slice());
    let mut allocator = BlockAllocator::new(storage, 32 * BLOCK_SIZE).unwrap();
    allocator.open_region(PhysicalAddress::zero(), 32 * BLOCK_SIZE);
    pmm::init(allocator);
    assert!(pmm::is_initialized());

    let a = pmm::with(|p| p.alloc(8)).unwrap();
    assert_eq!(a, PhysicalAddress::new(BLOCK_SIZE));
    assert_eq!(pmm::try_with(|p| p.used_blocks()), Some(9));
    pmm::with(|p| p.free(a, 8));
    assert_eq!(pmm::with(|p| p.free_blocks()), 31);

    let second: &'static mut [u64] = Box::leak(vec![0u64; 1].into_boxed_slice());
    let again = BlockAllocator::new(second, 32 * BLOCK_SIZE).unwrap();
    assert!(panic::catch_unwind(panic::AssertUnwindSafe(|| pmm::init(again))).is_err());

    // the failed init left the installed allocator alone
    assert_eq!(pmm::with(|p| p.max_blocks()), 32);
}
