//! Hand-off from an interrupt to the worker.
//!
//! A single pending slot: notifications coalesce, and a notification issued
//! while nobody waits stays pending until the next wait consumes it.

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use embassy_time::{Duration, with_timeout};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeReason {
    Woken,
    TimedOut,
}

pub struct WakeSignal {
    pending: Signal<CriticalSectionRawMutex, ()>,
}

impl WakeSignal {
    pub const fn new() -> Self {
        WakeSignal { pending: Signal::new() }
    }

    /// Never blocks and never allocates; safe from interrupt context.
    pub fn notify(&self) {
        self.pending.signal(());
    }

    /// Only the single worker may wait.
    pub async fn wait_or_timeout(&self, timeout: Duration) -> WakeReason {
        match with_timeout(timeout, self.pending.wait()).await {
            Ok(()) => WakeReason::Woken,
            Err(_) => WakeReason::TimedOut,
        }
    }

    pub async fn wait(&self) {
        self.pending.wait().await
    }

    pub fn is_pending(&self) -> bool {
        self.pending.signaled()
    }

    /// Drops a pending notification, if any.
    pub fn clear(&self) {
        self.pending.reset();
    }
}

impl Default for WakeSignal {
    fn default() -> Self {
        Self::new()
    }
}
