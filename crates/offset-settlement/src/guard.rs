//! Reentrancy guard: single occupancy around a settlement.
//!
//! Collaborators run untrusted code while a settlement is in flight. If
//! any of them calls back into the helper, the nested entry is rejected
//! with [`OffsetError::ReentrantCall`] instead of acting on half-updated
//! custody state.
//!
//! The in-flight flag is released by [`Entered`]'s `Drop`, so every exit
//! path (success, error, unwinding) clears it.

use std::sync::atomic::{AtomicBool, Ordering};

use offset_types::{OffsetError, Result};

/// In-flight flag for one helper instance.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    entered: AtomicBool,
}

impl ReentrancyGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the guard for the duration of the returned token.
    ///
    /// # Errors
    /// Returns [`OffsetError::ReentrantCall`] if the guard is already held.
    pub fn enter(&self) -> Result<Entered<'_>> {
        self.entered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| OffsetError::ReentrantCall)?;
        Ok(Entered { guard: self })
    }

    /// Whether a guarded call is currently in flight.
    #[must_use]
    pub fn is_entered(&self) -> bool {
        self.entered.load(Ordering::Acquire)
    }
}

/// Proof of occupancy. Dropping it releases the guard.
#[derive(Debug)]
#[must_use = "the guard is released as soon as this token is dropped"]
pub struct Entered<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for Entered<'_> {
    fn drop(&mut self) {
        self.guard.entered.store(false, Ordering::Release);
    }
}
