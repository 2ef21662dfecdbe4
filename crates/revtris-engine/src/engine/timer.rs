use std::{collections::VecDeque, time::Duration};

/// Handle of a scheduled timer, unique within one [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct PendingTimer<T> {
    id: TimerId,
    deadline: Duration,
    payload: T,
}

/// Virtual-clock timer queue.
///
/// Timers are ordered by deadline, then by issuance. Every timer resolves at
/// most once: it is either popped (fired) or cancelled, never both. The clock
/// only moves forward, and firing a timer moves the clock to that timer's
/// deadline so work triggered by it is scheduled relative to the right instant.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use revtris_engine::Scheduler;
///
/// let mut scheduler = Scheduler::new();
/// scheduler.schedule(Duration::from_millis(20), "drop");
/// scheduler.schedule(Duration::from_millis(10), "settle");
///
/// let until = Duration::from_millis(30);
/// assert_eq!(scheduler.pop_next_until(until), Some("settle"));
/// assert_eq!(scheduler.now(), Duration::from_millis(10));
/// assert_eq!(scheduler.pop_next_until(until), Some("drop"));
/// assert_eq!(scheduler.pop_next_until(until), None);
/// ```
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    pending: VecDeque<PendingTimer<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: VecDeque::new(),
        }
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Deadline of the earliest pending timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.front().map(|timer| timer.deadline)
    }

    /// Schedules `payload` to fire `after` the current time.
    pub fn schedule(&mut self, after: Duration, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let deadline = self.now + after;
        // Equal deadlines keep issuance order.
        let index = self.pending.partition_point(|timer| timer.deadline <= deadline);
        self.pending.insert(
            index,
            PendingTimer {
                id,
                deadline,
                payload,
            },
        );
        id
    }

    /// Cancels a pending timer.
    ///
    /// Returns `false` if the timer already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let Some(index) = self.pending.iter().position(|timer| timer.id == id) else {
            return false;
        };
        self.pending.remove(index);
        true
    }

    /// Cancels every pending timer and returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    /// Pops the earliest timer whose deadline is at or before `until`.
    ///
    /// The clock moves to the popped timer's deadline. When no timer is due,
    /// the clock is left unchanged and `None` is returned.
    pub fn pop_next_until(&mut self, until: Duration) -> Option<T> {
        if self.next_deadline()? > until {
            return None;
        }
        let timer = self.pending.pop_front()?;
        self.now = self.now.max(timer.deadline);
        Some(timer.payload)
    }

    /// Pops the earliest timer regardless of its deadline.
    pub fn pop_next(&mut self) -> Option<T> {
        let timer = self.pending.pop_front()?;
        self.now = self.now.max(timer.deadline);
        Some(timer.payload)
    }

    /// Moves the clock forward to `time`. Earlier times are ignored.
    pub fn advance_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_timers_fire_in_deadline_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(30), 'c');
        scheduler.schedule(ms(10), 'a');
        scheduler.schedule(ms(20), 'b');

        let fired: Vec<_> = std::iter::from_fn(|| scheduler.pop_next_until(ms(100))).collect();
        assert_eq!(fired, ['a', 'b', 'c']);
        assert_eq!(scheduler.now(), ms(30));
    }

    #[test]
    fn test_equal_deadlines_keep_issuance_order() {
        let mut scheduler = Scheduler::new();
        for n in 0..5 {
            scheduler.schedule(ms(50), n);
        }
        let fired: Vec<_> = std::iter::from_fn(|| scheduler.pop_next()).collect();
        assert_eq!(fired, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_pop_until_leaves_future_timers() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(20), ());
        assert_eq!(scheduler.pop_next_until(ms(19)), None);
        assert_eq!(scheduler.now(), Duration::ZERO);
        assert_eq!(scheduler.pop_next_until(ms(20)), Some(()));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_schedule_is_relative_to_now() {
        let mut scheduler = Scheduler::new();
        scheduler.advance_to(ms(100));
        scheduler.schedule(ms(20), ());
        assert_eq!(scheduler.next_deadline(), Some(ms(120)));

        // The clock never goes backwards.
        scheduler.advance_to(ms(50));
        assert_eq!(scheduler.now(), ms(100));
    }

    #[test]
    fn test_cancel_resolves_once() {
        let mut scheduler = Scheduler::new();
        let first = scheduler.schedule(ms(10), 1);
        let second = scheduler.schedule(ms(10), 2);

        assert!(scheduler.cancel(first));
        assert!(!scheduler.cancel(first));
        assert_eq!(scheduler.pop_next(), Some(2));
        assert!(!scheduler.cancel(second));
        assert_eq!(scheduler.pop_next(), None);
    }

    #[test]
    fn test_cancel_all() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(10), 1);
        scheduler.schedule(ms(20), 2);
        assert_eq!(scheduler.next_deadline(), Some(ms(10)));
        assert_eq!(scheduler.cancel_all(), 2);
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.next_deadline(), None);
    }
}
