use kernel_memory_addresses::{BlockIndex, PhysicalAddress};

/// Errors returned by the block allocator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PmmError {
    /// A block count of zero was requested.
    #[error("invalid argument: block count must be non-zero")]
    InvalidArgument,
    /// Not enough free blocks, or no contiguous run long enough.
    #[error("out of physical memory")]
    OutOfMemory,
    /// The storage handed to the bitmap cannot hold one bit per tracked block.
    #[error("bitmap storage too small: need {required_words} words, got {provided_words}")]
    StorageTooSmall {
        required_words: usize,
        provided_words: usize,
    },
    /// The memory map has no available region large enough for the bitmap.
    #[error("no available region large enough for the bitmap")]
    NoBitmapRegion,
}

/// Errors returned by [`BlockBitmap::find_free_run`](crate::BlockBitmap::find_free_run).
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("invalid argument: run length must be non-zero")]
    InvalidArgument,
    #[error("no run of free blocks long enough")]
    NotFound,
}

/// Errors returned by the checked region operations.
///
/// Each variant names the first block that failed validation. The bitmap is
/// left untouched when one of these is returned.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegionError {
    #[error("block {block} lies outside the tracked range")]
    OutOfRange { block: BlockIndex },
    #[error("block {block} is already free")]
    AlreadyFree { block: BlockIndex },
    #[error("block {block} is already used")]
    AlreadyUsed { block: BlockIndex },
}

/// Errors returned by the provenance-tracking allocator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProvenanceError {
    #[error(transparent)]
    Pmm(#[from] PmmError),
    #[error("allocation table is full")]
    TableFull,
    #[error("no allocation starts at {address}")]
    UnknownAllocation { address: PhysicalAddress },
    #[error("allocation at {address} has {recorded} blocks, {requested} were freed")]
    SizeMismatch {
        address: PhysicalAddress,
        recorded: usize,
        requested: usize,
    },
}
