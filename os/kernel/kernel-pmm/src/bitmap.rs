//! Block bitmap: one bit per physical block, `1` = used, `0` = free.

use crate::PmmError;
use kernel_memory_addresses::BlockIndex;

/// Number of blocks tracked by one bitmap word.
pub const BITMAP_WORD_BITS: usize = u64::BITS as usize;

/// Raw bit storage for the block allocator.
///
/// The bitmap borrows its words from the caller. In the kernel they live in
/// physical memory reached through a [`PhysMapper`](crate::PhysMapper); in
/// tests they are an ordinary buffer.
///
/// # Invariants
/// - `words.len() == max_blocks.div_ceil(64)`.
/// - Padding bits past `max_blocks` in the last word are always set, so a
///   word-level scan never mistakes them for free blocks.
pub struct BlockBitmap<'a> {
    words: &'a mut [u64],
    max_blocks: usize,
}

impl<'a> BlockBitmap<'a> {
    /// Number of words needed to track `max_blocks` blocks.
    #[inline]
    #[must_use]
    pub const fn words_for(max_blocks: usize) -> usize {
        max_blocks.div_ceil(BITMAP_WORD_BITS)
    }

    /// Take over `storage` and mark every block used.
    ///
    /// Only the first [`words_for(max_blocks)`](Self::words_for) words are
    /// touched.
    ///
    /// # Errors
    /// [`PmmError::StorageTooSmall`] if `storage` has fewer words than needed.
    pub fn new(storage: &'a mut [u64], max_blocks: usize) -> Result<Self, PmmError> {
        let required = Self::words_for(max_blocks);
        if storage.len() < required {
            return Err(PmmError::StorageTooSmall {
                required_words: required,
                provided_words: storage.len(),
            });
        }

        let (words, _) = storage.split_at_mut(required);
        let mut bitmap = Self { words, max_blocks };
        bitmap.fill_used();
        Ok(bitmap)
    }

    /// Mark every block (and the padding) used.
    pub fn fill_used(&mut self) {
        self.words.fill(u64::MAX);
    }

    #[inline]
    #[must_use]
    pub const fn max_blocks(&self) -> usize {
        self.max_blocks
    }

    /// Read-only view of the raw words.
    #[inline]
    #[must_use]
    pub fn words(&self) -> &[u64] {
        self.words
    }

    /// Word index and bit mask for `block`.
    ///
    /// # Panics
    /// If `block` is outside `[0, max_blocks)`.
    #[inline]
    fn locate(&self, block: BlockIndex) -> (usize, u64) {
        let i = block.as_usize();
        assert!(
            i < self.max_blocks,
            "block index {i} out of range (max_blocks = {})",
            self.max_blocks
        );
        (i / BITMAP_WORD_BITS, 1u64 << (i % BITMAP_WORD_BITS))
    }

    /// Mark `block` used.
    ///
    /// # Panics
    /// If `block` is outside `[0, max_blocks)`.
    #[inline]
    pub fn set(&mut self, block: BlockIndex) {
        let (word, mask) = self.locate(block);
        self.words[word] |= mask;
    }

    /// Mark `block` free.
    ///
    /// # Panics
    /// If `block` is outside `[0, max_blocks)`.
    #[inline]
    pub fn unset(&mut self, block: BlockIndex) {
        let (word, mask) = self.locate(block);
        self.words[word] &= !mask;
    }

    /// Whether `block` is used.
    ///
    /// # Panics
    /// If `block` is outside `[0, max_blocks)`.
    #[inline]
    #[must_use]
    pub fn test(&self, block: BlockIndex) -> bool {
        let (word, mask) = self.locate(block);
        self.words[word] & mask != 0
    }

    /// Raw word `index`, for word-level scans.
    #[inline]
    pub(crate) fn word(&self, index: usize) -> u64 {
        self.words[index]
    }

    /// Number of used blocks in `[0, max_blocks)`, counted bit by bit.
    #[must_use]
    pub fn count_used(&self) -> usize {
        let ones: usize = self.words.iter().map(|w| w.count_ones() as usize).sum();
        let padding = self.words.len() * BITMAP_WORD_BITS - self.max_blocks;
        ones - padding
    }
}
