//! Cancellable delayed tasks on the engine's clock.

use crate::ids::{IdAllocator, TimerId};

/// Handle to a scheduled task.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TaskHandle {
    pub id: TimerId,
    /// Clock time (ms) at which the task fires.
    pub due_ms: f64,
}

#[derive(Debug)]
struct Pending<A> {
    handle: TaskHandle,
    action: A,
}

/// Queue of delayed actions. Nothing runs on its own; the owner polls
/// [`TimerQueue::take_due`] with the current clock.
#[derive(Debug)]
pub struct TimerQueue<A> {
    ids: IdAllocator,
    pending: Vec<Pending<A>>,
}

impl<A> Default for TimerQueue<A> {
    fn default() -> Self {
        Self {
            ids: IdAllocator::new(),
            pending: Vec::new(),
        }
    }
}

impl<A> TimerQueue<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, action: A) -> TaskHandle {
        let handle = TaskHandle {
            id: self.ids.alloc_timer(),
            due_ms: now_ms + delay_ms.max(0.0),
        };
        self.pending.push(Pending { handle, action });
        handle
    }

    /// Returns false if the task already fired or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle.id != handle.id);
        before != self.pending.len()
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.pending.iter().any(|p| p.handle.id == handle.id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every action due at `now_ms`, earliest first.
    pub fn take_due(&mut self, now_ms: f64) -> Vec<(TaskHandle, A)> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].handle.due_ms <= now_ms {
                let p = self.pending.remove(i);
                due.push((p.handle, p.action));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.0.due_ms.total_cmp(&b.0.due_ms));
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_when_due() {
        let mut q = TimerQueue::new();
        let h = q.schedule(0.0, 250.0, "refresh");
        assert!(q.take_due(249.0).is_empty());
        assert!(q.is_pending(h));
        let due = q.take_due(250.0);
        assert_eq!(due, vec![(h, "refresh")]);
        assert!(q.is_empty());
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut q = TimerQueue::new();
        let h = q.schedule(0.0, 100.0, 1);
        assert!(q.cancel(h));
        assert!(!q.cancel(h));
        assert!(q.take_due(1_000.0).is_empty());
    }

    #[test]
    fn due_tasks_come_out_in_time_order() {
        let mut q = TimerQueue::new();
        q.schedule(0.0, 300.0, "b");
        q.schedule(0.0, 100.0, "a");
        let order: Vec<_> = q.take_due(500.0).into_iter().map(|(_, a)| a).collect();
        assert_eq!(order, vec!["a", "b"]);
    }
}
