//! Property-based invariant tests for the keyed timer set.
//!
//! 1. Fire instants never decrease, and the clock never moves backwards.
//! 2. A key holds at most one timer; only the latest schedule fires.
//! 3. Cancelled timers never fire.
//! 4. Nothing fires after its deadline has been passed by a drain.

use std::collections::BTreeMap;

use askew_core::{Duration, TimerSet};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Once { key: u8, delay: u64 },
    Every { key: u8, delay: u64, period: u64 },
    Cancel(u8),
    Advance(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..4, 0u64..500).prop_map(|(key, delay)| Op::Once { key, delay }),
        (0u8..4, 0u64..500, 1u64..300)
            .prop_map(|(key, delay, period)| Op::Every { key, delay, period }),
        (0u8..4).prop_map(Op::Cancel),
        (0u64..800).prop_map(Op::Advance),
    ]
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn timer_set_matches_model(ops in proptest::collection::vec(op(), 1..50)) {
        let mut timers: TimerSet<u8, u32> = TimerSet::new();
        // key -> generation of the live timer
        let mut live: BTreeMap<u8, u32> = BTreeMap::new();
        let mut generation = 0u32;
        let mut last_fire = Duration::ZERO;

        for op in ops {
            match op {
                Op::Once { key, delay } => {
                    generation += 1;
                    let superseded = timers.schedule_once(key, ms(delay), generation);
                    prop_assert_eq!(superseded, live.contains_key(&key));
                    live.insert(key, generation);
                }
                Op::Every { key, delay, period } => {
                    generation += 1;
                    timers.schedule_every(key, ms(delay), ms(period), generation);
                    live.insert(key, generation);
                }
                Op::Cancel(key) => {
                    prop_assert_eq!(timers.cancel(&key), live.remove(&key).is_some());
                }
                Op::Advance(n) => {
                    let target = timers.now() + ms(n);
                    let mut fired = 0;
                    while let Some(f) = timers.pop_due(target) {
                        fired += 1;
                        prop_assert!(fired < 10_000);
                        prop_assert!(f.at >= last_fire);
                        prop_assert!(f.at <= target);
                        prop_assert_eq!(timers.now(), f.at);
                        last_fire = f.at;

                        let entry = live.get(&f.key).copied();
                        prop_assert!(entry.is_some(), "fired a cancelled key {}", f.key);
                        let live_generation = entry.unwrap_or_default();
                        prop_assert_eq!(f.action, live_generation);

                        if timers.is_pending(&f.key) {
                            let next = timers.pending_action(&f.key).copied();
                            prop_assert_eq!(next, Some(live_generation));
                        } else {
                            live.remove(&f.key);
                        }
                    }
                    let before = timers.now();
                    timers.settle(target);
                    prop_assert!(timers.now() >= before);
                    prop_assert_eq!(timers.now(), target);
                    if let Some(deadline) = timers.next_deadline() {
                        prop_assert!(deadline > target);
                    }
                }
            }
            prop_assert_eq!(timers.pending_count(), live.len());
        }
    }
}
