//! Reentrancy lock for payout entry points.
//!
//! Control leaves the engine during a payout (pre-payout hook, bridging
//! adapter). Any payout call that arrives while the lock is held is rejected
//! with [`SpokePoolError::ReentrantCall`], whichever thread it comes from.
//! Acquisition never blocks, so a collaborator that forwards the callback to
//! another thread and waits for it gets an error back instead of a hang.
//! Ordering independent callers is left to whoever submits the calls.
//!
//! The lock is released when the [`ReentrancyGuard`] drops, so every exit
//! path (including early `?` returns) releases it.

use std::sync::atomic::{AtomicBool, Ordering};

use spokepool_types::{Result, SpokePoolError};

/// Single-holder, non-blocking lock.
#[derive(Debug, Default)]
pub struct ReentrancyLock {
    held: AtomicBool,
}

impl ReentrancyLock {
    /// Create an unlocked lock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the payout section.
    ///
    /// # Errors
    /// Returns [`SpokePoolError::ReentrantCall`] if the lock is already held.
    pub fn acquire(&self) -> Result<ReentrancyGuard<'_>> {
        self.held
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| SpokePoolError::ReentrantCall)?;
        Ok(ReentrancyGuard { lock: self })
    }

    /// Whether a payout is in flight.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

/// Scoped holder of a [`ReentrancyLock`]. Releases on drop.
#[derive(Debug)]
pub struct ReentrancyGuard<'a> {
    lock: &'a ReentrancyLock,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        self.lock.held.store(false, Ordering::Release);
    }
}
