//! The "settings sync" capability flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Runtime switch selecting the current (named, timestamped) protocol.
///
/// Clones share the same underlying switch, so one flag handed to every
/// session acts process-wide. Sessions read it once per attempt.
#[derive(Debug, Clone, Default)]
pub struct CapabilityFlag(Arc<AtomicBool>);

impl CapabilityFlag {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Release);
    }
}
