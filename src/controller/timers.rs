//! # Deferred Tasks
//!
//! A virtual-time timer queue. Nothing here reads a clock: hosts report how
//! much time passed through [`Scheduler::advance`], and tests do the same
//! with simulated durations.

use std::time::Duration;

/// Handle to a scheduled task, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Scheduled<T> {
    handle: TimerHandle,
    due: Duration,
    task: T,
}

/// Fire-once timers over a virtual clock.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: Duration,
    next_handle: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_handle: 0,
            pending: Vec::new(),
        }
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(Scheduled {
            handle,
            due: self.now + delay,
            task,
        });
        handle
    }

    /// Cancel a pending task. Returns false if it already ran or was canceled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|scheduled| scheduled.handle != handle);
        self.pending.len() != before
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|scheduled| scheduled.handle == handle)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Delay from now until the earliest pending task.
    pub fn next_due(&self) -> Option<Duration> {
        self.pending
            .iter()
            .map(|scheduled| scheduled.due.saturating_sub(self.now))
            .min()
    }

    /// Pop the earliest task due at or before `deadline`, moving the clock to
    /// its due time. Ties run in scheduling order.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<(TimerHandle, T)> {
        let position = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, scheduled)| scheduled.due <= deadline)
            .min_by_key(|(_, scheduled)| (scheduled.due, scheduled.handle.0))
            .map(|(position, _)| position)?;
        let scheduled = self.pending.remove(position);
        self.now = self.now.max(scheduled.due);
        Some((scheduled.handle, scheduled.task))
    }

    /// Move the clock forward without running anything.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_tasks_pop_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(500), "collapse");
        scheduler.schedule(ms(150), "swap");

        assert_eq!(scheduler.next_due(), Some(ms(150)));
        assert_eq!(scheduler.pop_due(ms(1000)).map(|(_, t)| t), Some("swap"));
        assert_eq!(scheduler.now(), ms(150));
        assert_eq!(scheduler.pop_due(ms(1000)).map(|(_, t)| t), Some("collapse"));
        assert_eq!(scheduler.pop_due(ms(1000)), None);
    }

    #[test]
    fn test_ties_run_in_scheduling_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(100), 1);
        scheduler.schedule(ms(100), 2);
        assert_eq!(scheduler.pop_due(ms(100)).map(|(_, t)| t), Some(1));
        assert_eq!(scheduler.pop_due(ms(100)).map(|(_, t)| t), Some(2));
    }

    #[test]
    fn test_nothing_pops_before_deadline() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(500), ());
        assert!(scheduler.pop_due(ms(499)).is_none());
        assert_eq!(scheduler.pending_count(), 1);
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule(ms(500), ());
        assert!(scheduler.is_pending(handle));
        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));
        assert!(!scheduler.is_pending(handle));
        assert_eq!(scheduler.next_due(), None);
    }

    #[test]
    fn test_delays_are_relative_to_now() {
        let mut scheduler = Scheduler::new();
        scheduler.set_now(ms(1000));
        scheduler.schedule(ms(150), ());
        assert_eq!(scheduler.next_due(), Some(ms(150)));
        assert!(scheduler.pop_due(ms(1149)).is_none());
        assert!(scheduler.pop_due(ms(1150)).is_some());
    }
}
