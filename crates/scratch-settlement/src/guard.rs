use scratch_core::ModuleError;
use std::sync::atomic::{AtomicBool, Ordering};

/// Held/not-held flag scoped to one state-mutating call.
///
/// Entering while the flag is held fails with [`ModuleError::Reentrancy`].
/// The flag is released when the returned [`Entered`] token drops, including
/// on early returns.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    held: AtomicBool,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&self) -> Result<Entered<'_>, ModuleError> {
        if self
            .held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ModuleError::Reentrancy);
        }
        Ok(Entered { guard: self })
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

/// Token proving the guard is held. Releases on drop.
#[derive(Debug)]
pub struct Entered<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for Entered<'_> {
    fn drop(&mut self) {
        self.guard.held.store(false, Ordering::Release);
    }
}
