//! Single-threaded task scheduler
//!
//! Delayed one-shots and periodic tasks on a simulated clock. The owner
//! advances the clock and then pops due tasks one at a time, so a task can
//! cancel others before they run.

use serde::{Deserialize, Serialize};

/// Cancellation token for a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskHandle(u64);

/// Shortest allowed repeat interval (seconds)
const MIN_INTERVAL: f64 = 1e-3;

#[derive(Debug, Clone)]
struct Entry<T> {
    handle: TaskHandle,
    due: f64,
    interval: Option<f64>,
    task: T,
}

#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    /// Seconds since creation
    now: f64,
    next_handle: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_handle: 0,
            entries: Vec::new(),
        }
    }
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    /// Run `task` once, `delay` seconds from now
    pub fn schedule_once(&mut self, delay: f32, task: T) -> TaskHandle {
        self.push(delay as f64, None, task)
    }

    /// Run `task` every `interval` seconds, first after one interval
    pub fn schedule_repeating(&mut self, interval: f32, task: T) -> TaskHandle {
        let interval = (interval as f64).max(MIN_INTERVAL);
        self.push(interval, Some(interval), task)
    }

    /// Stop a task from firing again. Returns false if it was not pending.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Move the clock forward
    pub fn advance(&mut self, dt: f32) {
        self.now += dt as f64;
    }

    /// Take the earliest task that is due, rescheduling it if periodic.
    /// Ties run in scheduling order.
    pub fn pop_due(&mut self) -> Option<T> {
        let (index, _) = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= self.now)
            .min_by(|(_, a), (_, b)| {
                a.due
                    .partial_cmp(&b.due)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.handle.0.cmp(&b.handle.0))
            })?;

        match self.entries[index].interval {
            Some(interval) => {
                let entry = &mut self.entries[index];
                entry.due += interval;
                Some(entry.task.clone())
            }
            None => Some(self.entries.remove(index).task),
        }
    }

    fn push(&mut self, delay: f64, interval: Option<f64>, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push(Entry {
            handle,
            due: self.now + delay.max(0.0),
            interval,
            task,
        });
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler<&'static str>) -> Vec<&'static str> {
        std::iter::from_fn(|| s.pop_due()).collect()
    }

    #[test]
    fn test_once_fires_after_delay() {
        let mut s = Scheduler::new();
        s.schedule_once(1.0, "a");
        s.advance(0.5);
        assert!(drain(&mut s).is_empty());
        s.advance(0.5);
        assert_eq!(drain(&mut s), vec!["a"]);
        s.advance(5.0);
        assert!(drain(&mut s).is_empty());
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn test_repeating_catches_up_in_order() {
        let mut s = Scheduler::new();
        s.schedule_repeating(1.0, "tick");
        s.schedule_once(1.5, "once");
        s.advance(3.0);
        assert_eq!(drain(&mut s), vec!["tick", "once", "tick", "tick"]);
        assert_eq!(s.pending(), 1);
    }

    #[test]
    fn test_cancel_stops_repeating() {
        let mut s = Scheduler::new();
        let h = s.schedule_repeating(1.0, "tick");
        s.advance(1.0);
        assert_eq!(drain(&mut s), vec!["tick"]);
        assert!(s.cancel(h));
        assert!(!s.is_scheduled(h));
        assert!(!s.cancel(h));
        s.advance(10.0);
        assert!(drain(&mut s).is_empty());
    }

    #[test]
    fn test_ties_run_in_scheduling_order() {
        let mut s = Scheduler::new();
        s.schedule_once(2.0, "first");
        s.schedule_once(2.0, "second");
        s.advance(2.0);
        assert_eq!(drain(&mut s), vec!["first", "second"]);
    }
}
