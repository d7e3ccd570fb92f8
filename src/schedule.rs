use std::time::{Duration, Instant};

/// A handle to a periodic schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduleHandle {
    generation: u64,
    interval: Duration,
    next_due: Instant,
}

impl ScheduleHandle {
    /// Identifies this schedule. Every new schedule gets a new generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// A task that fires periodically.
///
/// There's at most one live schedule at a time: scheduling again replaces the current schedule,
/// and a cancelled schedule never fires again.
#[derive(Debug, Default)]
pub struct PeriodicTask {
    handle: Option<ScheduleHandle>,
    generations: u64,
}

impl PeriodicTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule this task to fire every `interval`, starting right away.
    ///
    /// Any existing schedule is cancelled first. Returns whether one was.
    pub fn schedule(&mut self, interval: Duration, now: Instant) -> bool {
        let replaced = self.cancel();
        self.generations += 1;
        self.handle = Some(ScheduleHandle { generation: self.generations, interval, next_due: now });
        replaced
    }

    /// Cancel the current schedule, returning whether there was one.
    pub fn cancel(&mut self) -> bool {
        self.handle.take().is_some()
    }

    pub fn handle(&self) -> Option<&ScheduleHandle> {
        self.handle.as_ref()
    }

    pub fn is_scheduled(&self) -> bool {
        self.handle.is_some()
    }

    /// The point in time this task fires next, if it's scheduled.
    pub fn next_due(&self) -> Option<Instant> {
        self.handle.map(|handle| handle.next_due)
    }

    /// Check whether the task is due at `now`, moving the schedule forward if so.
    ///
    /// A task that fell behind by more than an interval fires once and then resumes from `now`
    /// rather than firing a burst of catch up ticks.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(handle) = self.handle.as_mut() else {
            return false;
        };
        if now < handle.next_due {
            return false;
        }
        let next_due = handle.next_due + handle.interval;
        handle.next_due = if next_due <= now { now + handle.interval } else { next_due };
        true
    }
}
