use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Fixed-interval auto-save schedule. The owner polls it; nothing here runs
/// on its own.
#[derive(Debug, Clone)]
pub struct AutoSave {
    enabled: bool,
    interval: Duration,
    next_due: Instant,
}

impl AutoSave {
    pub fn new(enabled: bool, interval: Duration, now: Instant) -> Self {
        Self {
            enabled,
            interval,
            next_due: now + interval,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_due
    }

    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }

    pub fn rearm(&mut self, now: Instant) {
        self.next_due = now + self.interval;
    }
}

/// Non-reentrant guard allowing a single save in flight
#[derive(Debug, Clone, Default)]
pub struct SaveLatch {
    busy: Arc<AtomicBool>,
}

/// Held while a save runs; releases the latch on drop
#[derive(Debug)]
pub struct SaveTicket {
    busy: Arc<AtomicBool>,
}

impl SaveLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<SaveTicket> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SaveTicket {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for SaveTicket {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
