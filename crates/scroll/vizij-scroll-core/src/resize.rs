//! Resize Coordinator: trailing-edge debounce of viewport resizes.
//!
//! Each resize cancels the pending settle task and schedules a new one. When a
//! settle task fires, the engine refreshes trigger boundaries first and then
//! re-runs pin setup, since pin geometry depends on the refreshed layout.

use crate::timer::{TaskHandle, TimerQueue};

/// Default quiet period, in ms.
pub const RESIZE_DEBOUNCE_MS: f64 = 250.0;

/// Work queued on the engine clock.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScheduledTask {
    /// A resize burst has settled.
    ResizeSettled,
}

#[derive(Debug)]
pub struct ResizeCoordinator {
    delay_ms: f64,
    pending: Option<TaskHandle>,
    /// Resize events seen since the last settle.
    burst: u32,
}

impl Default for ResizeCoordinator {
    fn default() -> Self {
        Self::new(RESIZE_DEBOUNCE_MS)
    }
}

impl ResizeCoordinator {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            pending: None,
            burst: 0,
        }
    }

    pub fn pending(&self) -> Option<TaskHandle> {
        self.pending
    }

    /// Record a resize event at `now_ms`, restarting the debounce window.
    pub fn on_resize(&mut self, now_ms: f64, timers: &mut TimerQueue<ScheduledTask>) -> TaskHandle {
        if let Some(prev) = self.pending.take() {
            timers.cancel(prev);
        }
        self.burst += 1;
        let handle = timers.schedule(now_ms, self.delay_ms, ScheduledTask::ResizeSettled);
        self.pending = Some(handle);
        handle
    }

    /// Called when the settle task fires. Returns the burst size, or None if
    /// `handle` is not the live task.
    pub fn settle(&mut self, handle: TaskHandle) -> Option<u32> {
        if self.pending != Some(handle) {
            return None;
        }
        self.pending = None;
        Some(std::mem::take(&mut self.burst))
    }
}
