use kernel_memory_addresses::{BLOCK_SIZE, BlockIndex, PhysicalAddress};
use kernel_pmm::{BlockAllocator, BlockBitmap, PmmError};

const KIB_64: u64 = 64 * 1024;

fn opened(storage: &mut [u64], size: u64) -> BlockAllocator<'_> {
    let mut pmm = BlockAllocator::new(storage, size).unwrap();
    pmm.open_region(PhysicalAddress::zero(), size);
    pmm
}

#[test]
fn nothing_is_allocatable_before_a_region_is_opened() {
    let mut storage = [0u64; 4];
    let mut pmm = BlockAllocator::new(&mut storage, 256 * BLOCK_SIZE).unwrap();
    assert_eq!(pmm.alloc(1), Err(PmmError::OutOfMemory));
    assert_eq!(pmm.used_blocks(), 256);
    assert_eq!(pmm.bitmap().count_used(), 256);
}

#[test]
fn guard_block_survives_any_sequence_of_opens() {
    let mut storage = [0u64; 2];
    let mut pmm = BlockAllocator::new(&mut storage, 128 * BLOCK_SIZE).unwrap();

    // cover the whole range in pieces, block 0 in the middle of the sequence
    pmm.open_region(PhysicalAddress::new(64 * BLOCK_SIZE), 64 * BLOCK_SIZE);
    assert!(pmm.is_used(BlockIndex::ZERO));
    pmm.open_region(PhysicalAddress::zero(), 32 * BLOCK_SIZE);
    assert!(pmm.is_used(BlockIndex::ZERO));
    pmm.open_region(PhysicalAddress::new(32 * BLOCK_SIZE), 32 * BLOCK_SIZE);
    assert!(pmm.is_used(BlockIndex::ZERO));

    assert_eq!(pmm.used_blocks(), 1);
    assert_eq!(pmm.bitmap().count_used(), 1);
}

#[test]
fn alloc_free_round_trip() {
    let mut storage = [0u64; 2];
    let mut pmm = opened(&mut storage, 128 * BLOCK_SIZE);

    for n in [1usize, 2, 7, 63, 64, 65, 100] {
        let before = pmm.used_blocks();
        let a = pmm.alloc(n).unwrap();
        let start = a.block().as_usize();
        assert!((start..start + n).all(|i| pmm.is_used(BlockIndex::new(i))));
        assert_eq!(pmm.used_blocks(), before + n);

        pmm.free(a, n);
        assert!((start..start + n).all(|i| !pmm.is_used(BlockIndex::new(i))));
        assert_eq!(pmm.used_blocks(), before);
    }
}

#[test]
fn allocations_do_not_overlap() {
    let mut storage = [0u64; 2];
    let mut pmm = opened(&mut storage, 128 * BLOCK_SIZE);

    let a = pmm.alloc(10).unwrap();
    let b = pmm.alloc(10).unwrap();
    let c = pmm.alloc(1).unwrap();
    assert_eq!(a, PhysicalAddress::new(BLOCK_SIZE));
    assert_eq!(b, PhysicalAddress::new(11 * BLOCK_SIZE));
    assert_eq!(c, PhysicalAddress::new(21 * BLOCK_SIZE));

    // the hole left by `a` is reused first
    pmm.free(a, 10);
    assert_eq!(pmm.alloc(4).unwrap(), a);
}

#[test]
fn first_fit_ordering() {
    let mut storage = [0u64; 1];
    let mut bitmap = BlockBitmap::new(&mut storage, 32).unwrap();
    for i in (5..8).chain(10..15) {
        bitmap.unset(BlockIndex::new(i));
    }
    assert_eq!(bitmap.find_free_run(3), Ok(BlockIndex::new(5)));
}

#[test]
fn capacity_keeps_one_block_spare() {
    let mut storage = [0u64; 1];
    let mut pmm = opened(&mut storage, KIB_64);
    // 1 (guard) + 13 = 14 used, 2 free
    pmm.alloc(13).unwrap();
    assert_eq!(pmm.used_blocks(), 14);
    assert_eq!(pmm.free_blocks(), 2);

    assert_eq!(pmm.alloc(2), Err(PmmError::OutOfMemory));
    assert_eq!(pmm.used_blocks(), 14);
    assert!(pmm.alloc(1).is_ok());
    assert_eq!(pmm.used_blocks(), 15);
}

#[test]
fn sixty_four_kib_scenario() {
    let mut storage = [0u64; 1];
    let mut pmm = BlockAllocator::new(&mut storage, KIB_64).unwrap();
    assert_eq!(pmm.max_blocks(), 16);
    assert_eq!(pmm.used_blocks(), 16);

    pmm.open_region(PhysicalAddress::zero(), KIB_64);
    assert_eq!(pmm.used_blocks(), 1);
    assert_eq!(pmm.free_blocks(), 15);

    // all 15 free blocks would leave nothing spare
    assert_eq!(pmm.alloc(15), Err(PmmError::OutOfMemory));

    let a = pmm.alloc(14).unwrap();
    assert_eq!(a, PhysicalAddress::new(4096));
    assert_eq!(pmm.used_blocks(), 15);
    assert_eq!(pmm.alloc(1), Err(PmmError::OutOfMemory));
}

#[test]
fn fragmentation_fails_after_guard_passes() {
    let mut storage = [0u64; 1];
    let mut pmm = opened(&mut storage, KIB_64);

    // reserve every other block from 2 on: free blocks are 1, 3, 5, ..., 15
    for i in (2..16).step_by(2) {
        pmm.close_region(PhysicalAddress::new(i * BLOCK_SIZE), BLOCK_SIZE);
    }
    assert_eq!(pmm.free_blocks(), 8);
    assert_eq!(pmm.alloc(2), Err(PmmError::OutOfMemory));
    assert_eq!(pmm.used_blocks(), 8);
}

#[test]
fn stats_follow_counters() {
    let mut storage = [0u64; 1];
    let mut pmm = opened(&mut storage, KIB_64);
    pmm.alloc(3).unwrap();

    let stats = pmm.stats();
    assert_eq!(stats.max_blocks, 16);
    assert_eq!(stats.used_blocks, 4);
    assert_eq!(stats.free_blocks, 12);
}
