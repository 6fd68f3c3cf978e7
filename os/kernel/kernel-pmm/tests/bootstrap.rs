use kernel_info::boot::{MemoryKind, MemoryMapEntry};
use kernel_memory_addresses::{BLOCK_SIZE, BlockIndex, PhysicalAddress};
use kernel_pmm::{OffsetPhysMapper, PmmError, bootstrap};

const MIB: u64 = 1024 * 1024;

/// A typical low-memory map: real-mode area, a reserved hole, then RAM.
fn small_map() -> [MemoryMapEntry; 4] {
    [
        MemoryMapEntry::new(0, 0x9_f000, MemoryKind::Available),
        MemoryMapEntry::new(0x9_f000, 0x6_1000, MemoryKind::Reserved),
        MemoryMapEntry::new(MIB, 7 * MIB, MemoryKind::Available),
        MemoryMapEntry::new(8 * MIB, MIB, MemoryKind::AcpiReclaimable),
    ]
}

#[test]
fn builds_allocator_from_memory_map() {
    let entries = small_map();
    let mut buffer = vec![0u64; 64];
    let mapper = OffsetPhysMapper::for_buffer(buffer.as_mut_ptr(), PhysicalAddress::new(MIB));

    let (mut pmm, summary) = unsafe { bootstrap(&entries, &mapper) }.unwrap();

    assert_eq!(summary.total_bytes, 9 * MIB);
    assert_eq!(summary.free_bytes, 0x9_f000 + 7 * MIB);
    assert_eq!(summary.largest.unwrap().base, PhysicalAddress::new(MIB));
    assert_eq!(summary.tracked_size(), 8 * MIB);

    // 8 MiB = 2048 blocks -> 32 words, a single block of storage
    assert_eq!(pmm.max_blocks(), 2048);
    assert_eq!(pmm.bitmap().words().len(), 32);

    let bitmap_block = BlockIndex::containing(PhysicalAddress::new(MIB));
    assert!(pmm.is_used(BlockIndex::ZERO));
    assert!(pmm.is_used(bitmap_block));
    assert!(!pmm.is_used(bitmap_block + 1));
    assert!(!pmm.is_used(BlockIndex::new(1)));
    // reserved hole stays reserved
    assert!(pmm.is_used(BlockIndex::new(0x9f)));
    assert!(pmm.is_used(BlockIndex::new(0xff)));

    // 0x9f usable low blocks minus the guard, plus 7 MiB minus the bitmap block
    let expected_free = (0x9f - 1) + (7 * MIB / BLOCK_SIZE) as usize - 1;
    assert_eq!(pmm.free_blocks(), expected_free);
    assert_eq!(pmm.used_blocks(), pmm.bitmap().count_used());

    // first allocation lands right after the guard block
    assert_eq!(pmm.alloc(1).unwrap(), PhysicalAddress::new(BLOCK_SIZE));
}

#[test]
fn bitmap_storage_is_the_mapped_buffer() {
    let entries = small_map();
    let mut buffer = vec![0u64; 64];
    let ptr = buffer.as_mut_ptr();
    let mapper = OffsetPhysMapper::for_buffer(ptr, PhysicalAddress::new(MIB));

    let (pmm, _) = unsafe { bootstrap(&entries, &mapper) }.unwrap();
    assert_eq!(pmm.bitmap().words().as_ptr(), ptr.cast_const());
}

#[test]
fn unaligned_largest_region_is_rounded_up() {
    let entries = [
        MemoryMapEntry::new(0, 4 * BLOCK_SIZE, MemoryKind::Available),
        MemoryMapEntry::new(0x10_0800, 0x10_0000, MemoryKind::Available),
    ];
    let storage = PhysicalAddress::new(0x10_1000);
    let mut buffer = vec![0u64; 64];
    let mapper = OffsetPhysMapper::for_buffer(buffer.as_mut_ptr(), storage);

    let (pmm, _) = unsafe { bootstrap(&entries, &mapper) }.unwrap();
    assert!(pmm.is_used(storage.block()));
    assert!(!pmm.is_used(storage.block() + 1));
    assert_eq!(pmm.used_blocks(), pmm.bitmap().count_used());
}

#[test]
fn no_available_memory() {
    let entries = [
        MemoryMapEntry::new(0, MIB, MemoryKind::Reserved),
        MemoryMapEntry::new(MIB, MIB, MemoryKind::Bad),
    ];
    let mapper = OffsetPhysMapper::new(0);
    let result = unsafe { bootstrap(&entries, &mapper) };
    assert_eq!(result.err(), Some(PmmError::NoBitmapRegion));
}

#[test]
fn largest_region_too_small_for_bitmap() {
    // 4 GiB tracked needs 128 KiB of bitmap; the largest region is 64 KiB
    let entries = [
        MemoryMapEntry::new(0, 64 * 1024, MemoryKind::Available),
        MemoryMapEntry::new(4 * 1024 * MIB - 0x1000, 0x1000, MemoryKind::Available),
    ];
    let mapper = OffsetPhysMapper::new(0);
    let result = unsafe { bootstrap(&entries, &mapper) };
    assert_eq!(result.err(), Some(PmmError::NoBitmapRegion));
}

#[test]
fn high_memory_above_four_gib() {
    let entries = [
        MemoryMapEntry::new(0, 0x8_0000, MemoryKind::Available),
        MemoryMapEntry::new(0x1_0000_0000, 2 * MIB, MemoryKind::Available),
    ];
    assert_eq!(entries[1].addr_high, 1);

    let base = PhysicalAddress::new(0x1_0000_0000);
    let mut buffer = vec![0u64; 16_392];
    let mapper = OffsetPhysMapper::for_buffer(buffer.as_mut_ptr(), base);

    let (pmm, summary) = unsafe { bootstrap(&entries, &mapper) }.unwrap();
    assert_eq!(summary.largest.unwrap().base, base);
    assert_eq!(pmm.max_blocks(), (0x1_0000_0000 + 2 * MIB) as usize / BLOCK_SIZE as usize);
    // 1,049,088 blocks -> 16,392 words = 131,136 bytes -> 33 blocks of storage
    assert!(pmm.is_used(base.block() + 32));
    assert!(!pmm.is_used(base.block() + 33));
    assert_eq!(pmm.used_blocks(), pmm.bitmap().count_used());
}
