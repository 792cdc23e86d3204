//! Cooperative cancellation
//!
//! A `CancelToken` is a shared flag. The renderer polls it once per tag match
//! and at every stage boundary; any clone of the token can raise it from
//! another thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask any render using this token to stop
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Clear the flag so the next render runs to completion
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
