//! First-fit search for runs of free blocks.

use crate::bitmap::{BITMAP_WORD_BITS, BlockBitmap};
use crate::SearchError;
use kernel_memory_addresses::BlockIndex;

impl BlockBitmap<'_> {
    /// Find the lowest block that starts a run of at least `count` free blocks.
    ///
    /// The scan goes one word at a time in ascending order. Fully used words
    /// are skipped. Inside a word the first free bit opens a tentative run,
    /// which is extended across word boundaries until either `count` free
    /// blocks are confirmed or a used block ends it; the scan then resumes
    /// right after that used block.
    ///
    /// First fit, not best fit: the earliest qualifying run wins even if a
    /// later one would fit more snugly.
    ///
    /// # Errors
    /// - [`SearchError::InvalidArgument`] if `count == 0`.
    /// - [`SearchError::NotFound`] if no run of `count` free blocks exists in
    ///   `[0, max_blocks)`.
    pub fn find_free_run(&self, count: usize) -> Result<BlockIndex, SearchError> {
        if count == 0 {
            return Err(SearchError::InvalidArgument);
        }
        if count > self.max_blocks() {
            return Err(SearchError::NotFound);
        }

        let max_blocks = self.max_blocks();
        let mut block = 0usize;
        while block < max_blocks {
            let word_idx = block / BITMAP_WORD_BITS;
            let word = self.word(word_idx);
            let next_word = (word_idx + 1) * BITMAP_WORD_BITS;

            if word == u64::MAX {
                block = next_word;
                continue;
            }

            // Free bits at or above the current position within this word.
            let free = !word & (u64::MAX << (block % BITMAP_WORD_BITS));
            if free == 0 {
                block = next_word;
                continue;
            }

            let start = word_idx * BITMAP_WORD_BITS + free.trailing_zeros() as usize;
            match self.extend_run(start, count) {
                Ok(()) => return Ok(BlockIndex::new(start)),
                Err(resume) => block = resume,
            }
        }

        Err(SearchError::NotFound)
    }

    /// Walk forward from the free block `start` until `count` free blocks are
    /// seen.
    ///
    /// Returns `Err(resume)` with the block right after the used block that
    /// cut the run short, or `max_blocks` if the bitmap ended first.
    fn extend_run(&self, start: usize, count: usize) -> Result<(), usize> {
        let max_blocks = self.max_blocks();
        let mut len = 0usize;
        let mut block = start;

        while block < max_blocks {
            let word_idx = block / BITMAP_WORD_BITS;
            let bit = block % BITMAP_WORD_BITS;
            let word = self.word(word_idx);

            if bit == 0 && word == 0 {
                // A zero word has no padding bits, so all 64 blocks are real.
                len += BITMAP_WORD_BITS;
                block += BITMAP_WORD_BITS;
            } else if word & (1u64 << bit) == 0 {
                len += 1;
                block += 1;
            } else {
                return Err(block + 1);
            }

            if len >= count {
                return Ok(());
            }
        }

        Err(max_blocks)
    }
}
