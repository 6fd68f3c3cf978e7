//! The kernel-wide physical memory manager instance.
//!
//! [`BlockAllocator`] has no synchronization of its own. Past boot it lives in
//! a [`LockedBlockAllocator`]: one spin lock guarding the bitmap and the
//! counters together, so every `alloc`, `free` and region update is atomic
//! with respect to the others.
//!
//! Boot code builds the allocator (usually through
//! [`bootstrap`](crate::bootstrap)) and hands it to [`init`]; everything
//! after that allocates through [`with`] or [`try_with`].

use crate::allocator::BlockAllocator;
use kernel_sync::SpinLock;
use log::info;

/// A block allocator behind a spin lock; `None` until one is installed.
pub type LockedBlockAllocator = SpinLock<Option<BlockAllocator<'static>>>;

static PMM: LockedBlockAllocator = SpinLock::new(None);

/// Install the global allocator. Call once in early boot.
///
/// # Panics
/// If the global allocator was already initialized.
pub fn init(allocator: BlockAllocator<'static>) {
    let stats = allocator.stats();
    let installed = PMM.with_lock(|slot| {
        if slot.is_some() {
            return false;
        }
        *slot = Some(allocator);
        true
    });
    assert!(installed, "PMM already initialized");

    info!(
        "PMM: online, {} of {} blocks free",
        stats.free_blocks, stats.max_blocks
    );
}

/// Whether [`init`] has run.
#[must_use]
pub fn is_initialized() -> bool {
    PMM.with_lock(|slot| slot.is_some())
}

/// Run `f` on the global allocator, spinning for the lock.
///
/// # Panics
/// If the global allocator was not initialized.
#[inline]
pub fn with<R>(f: impl FnOnce(&mut BlockAllocator<'static>) -> R) -> R {
    PMM.with_lock(|slot| slot.as_mut().map(f))
        .expect("PMM not initialized")
}

/// Run `f` on the global allocator if it is initialized and the lock is free.
///
/// Never spins, so it is safe to call from contexts that may have interrupted
/// a lock holder.
#[inline]
pub fn try_with<R>(f: impl FnOnce(&mut BlockAllocator<'static>) -> R) -> Option<R> {
    let mut guard = PMM.try_lock()?;
    guard.as_mut().map(f)
}
