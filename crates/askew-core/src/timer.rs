#![forbid(unsafe_code)]

//! Keyed timer scheduler on a virtual clock.
//!
//! Every control owns one [`TimerSet`]. Timers are addressed by a logical
//! target key (a checkbox value, the text field, the relocation slot) and
//! carry an action that the owning control interprets when the timer fires.
//!
//! The clock never advances on its own: the host drives it with
//! [`TimerSet::pop_due`] followed by [`TimerSet::settle`], which is what the
//! controls' `tick` implementations do.
//!
//! # Invariants
//!
//! 1. At most one timer per key. Scheduling on an occupied key cancels the
//!    previous timer (last interaction wins).
//! 2. Due timers fire in deadline order; equal deadlines fire in the order
//!    they were scheduled.
//! 3. A repeating timer is re-armed *before* its action is handed out, so the
//!    handler may cancel it.
//! 4. While a timer fires, `now()` equals its deadline, so timers scheduled
//!    from inside the handler are relative to the fire instant.
//!
//! # Example
//!
//! ```
//! use askew_core::timer::TimerSet;
//! use web_time::Duration;
//!
//! let mut timers: TimerSet<&str, u32> = TimerSet::new();
//! timers.schedule_once("save", Duration::from_millis(500), 1);
//! timers.schedule_once("save", Duration::from_millis(500), 2); // supersedes
//!
//! let target = Duration::from_millis(600);
//! let fired = timers.pop_due(target).unwrap();
//! assert_eq!(fired.action, 2);
//! assert!(timers.pop_due(target).is_none());
//! timers.settle(target);
//! assert_eq!(timers.now(), target);
//! ```

use std::collections::BTreeMap;
use std::fmt::Debug;

use web_time::Duration;

/// Smallest period a repeating timer may use; protects drive loops from
/// spinning on a zero period.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// How often a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Fire once, then forget.
    Once,
    /// Fire repeatedly with the given period until cancelled.
    Every(Duration),
}

#[derive(Debug, Clone)]
struct Entry<A> {
    deadline: Duration,
    seq: u64,
    cadence: Cadence,
    action: A,
}

/// A timer that came due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<K, A> {
    /// Logical target the timer was scheduled for.
    pub key: K,
    /// The action to perform.
    pub action: A,
    /// Virtual instant the timer fired at.
    pub at: Duration,
}

/// Keyed set of cancellable single-shot and repeating timers.
#[derive(Debug, Clone)]
pub struct TimerSet<K, A> {
    now: Duration,
    next_seq: u64,
    entries: BTreeMap<K, Entry<A>>,
}

impl<K: Ord + Clone + Debug, A: Clone> Default for TimerSet<K, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone + Debug, A: Clone> TimerSet<K, A> {
    /// Create an empty set with the clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            entries: BTreeMap::new(),
        }
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `action` to fire once after `delay`.
    ///
    /// Returns `true` if a pending timer for the same key was superseded.
    pub fn schedule_once(&mut self, key: K, delay: Duration, action: A) -> bool {
        self.insert(key, delay, Cadence::Once, action)
    }

    /// Schedule `action` to fire after `delay` and then every `period`.
    ///
    /// Returns `true` if a pending timer for the same key was superseded.
    pub fn schedule_every(&mut self, key: K, delay: Duration, period: Duration, action: A) -> bool {
        self.insert(key, delay, Cadence::Every(period.max(MIN_PERIOD)), action)
    }

    fn insert(&mut self, key: K, delay: Duration, cadence: Cadence, action: A) -> bool {
        let seq = self.bump_seq();
        let entry = Entry {
            deadline: self.now + delay,
            seq,
            cadence,
            action,
        };
        let replaced = self.entries.insert(key.clone(), entry).is_some();
        if replaced {
            tracing::trace!(?key, "timer superseded");
        }
        replaced
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Cancel the timer for `key`. Returns `true` if one was pending.
    pub fn cancel(&mut self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Cancel every pending timer. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    /// Whether a timer is pending for `key`.
    #[must_use]
    pub fn is_pending(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// The action that would run for `key`, if a timer is pending.
    #[must_use]
    pub fn pending_action(&self, key: &K) -> Option<&A> {
        self.entries.get(key).map(|entry| &entry.action)
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.values().map(|entry| entry.deadline).min()
    }

    /// Take the next timer due at or before `until`, advancing the clock to
    /// its deadline. Repeating timers are re-armed before being returned.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired<K, A>> {
        let key = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.deadline <= until)
            .min_by_key(|(_, entry)| (entry.deadline, entry.seq))
            .map(|(key, _)| key.clone())?;

        let entry = self.entries.remove(&key)?;
        self.now = self.now.max(entry.deadline);

        if let Cadence::Every(period) = entry.cadence {
            let seq = self.bump_seq();
            self.entries.insert(
                key.clone(),
                Entry {
                    deadline: entry.deadline + period,
                    seq,
                    cadence: entry.cadence,
                    action: entry.action.clone(),
                },
            );
        }

        Some(Fired {
            key,
            action: entry.action,
            at: entry.deadline,
        })
    }

    /// Move the clock forward to `until` once all due timers are drained.
    ///
    /// The clock never moves backwards.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}
