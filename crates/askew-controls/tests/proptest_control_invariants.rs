//! Property-based invariant tests for the control behavior units.
//!
//! 1. Drag-drop: no item is in two categories in any committed snapshot.
//! 2. Checkbox: the settled selection equals a model that applies every
//!    surviving toggle in order.
//! 3. Radio: a regular selection superseded within the delay is never
//!    committed.
//! 4. Number: nothing is committed while a validation error is set, except
//!    the pirate sentinel.
//! 5. Number: a shifty run commits exactly ten times, each step within the
//!    drift band of its predecessor.

use std::collections::{BTreeMap, BTreeSet};

use askew_controls::{
    Assignments, CheckOption, CheckboxGroup, Control, DragDropOptions, DragDropSorter,
    NumberField, NumberOptions, NumberValue, RadioGroup, RadioOption, Step,
};
use askew_core::{BehaviorKind, CommitRecorder, Duration, Interaction, SeededRandom};
use proptest::prelude::*;

const CATEGORIES: [&str; 3] = ["fruit", "tool", "animal"];
const ITEMS: [&str; 5] = ["apple", "hammer", "llama", "pear", "saw"];
const VALUES: [&str; 3] = ["A", "B", "C"];

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

// ── Strategies ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum DragOp {
    Start(usize),
    Drop(Option<usize>, usize),
    Tick(u64),
}

fn drag_op() -> impl Strategy<Value = DragOp> {
    prop_oneof![
        (0..ITEMS.len()).prop_map(DragOp::Start),
        (proptest::option::of(0..CATEGORIES.len()), 0..ITEMS.len())
            .prop_map(|(c, i)| DragOp::Drop(c, i)),
        (0u64..=400).prop_map(DragOp::Tick),
    ]
}

#[derive(Debug, Clone)]
enum CheckOp {
    Toggle(usize),
    Tick(u64),
}

fn check_op() -> impl Strategy<Value = CheckOp> {
    prop_oneof![
        (0..VALUES.len()).prop_map(CheckOp::Toggle),
        (0u64..=700).prop_map(CheckOp::Tick),
    ]
}

#[derive(Debug, Clone)]
enum NumberOp {
    Type(String),
    Tick(u64),
}

fn number_op() -> impl Strategy<Value = NumberOp> {
    prop_oneof![
        "[0-9a-x.\\- ]{0,5}".prop_map(NumberOp::Type),
        (0u64..=1_500).prop_map(NumberOp::Tick),
    ]
}

fn number_behavior() -> impl Strategy<Value = BehaviorKind> {
    prop_oneof![
        Just(BehaviorKind::Regular),
        Just(BehaviorKind::Shifty),
        Just(BehaviorKind::Pirate),
    ]
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Drag-drop snapshots never duplicate an item
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn drag_drop_snapshots_have_no_duplicates(
        seed in any::<u64>(),
        shifty in any::<bool>(),
        ops in proptest::collection::vec(drag_op(), 1..60),
    ) {
        let behavior = if shifty { BehaviorKind::Shifty } else { BehaviorKind::Regular };
        let recorder = CommitRecorder::new();
        let mut sorter = DragDropSorter::new(
            behavior,
            DragDropOptions::new(CATEGORIES).with_items(ITEMS),
            Assignments::new(),
        )
        .with_random(SeededRandom::seeded(seed))
        .on_commit(recorder.sink());

        for op in ops {
            match op {
                DragOp::Start(i) => sorter.handle(&Interaction::drag_start(ITEMS[i])),
                DragOp::Drop(Some(c), i) => {
                    sorter.handle(&Interaction::drop_on(CATEGORIES[c], ITEMS[i]));
                }
                DragOp::Drop(None, i) => sorter.handle(&Interaction::drop_on_pool(ITEMS[i])),
                DragOp::Tick(n) => {
                    sorter.tick(ms(n));
                }
            }
        }
        sorter.run_until_idle();

        for snapshot in recorder.snapshots() {
            prop_assert!(!snapshot.has_duplicates(), "{snapshot:?}");
            prop_assert_eq!(snapshot.len(), CATEGORIES.len());
        }
        prop_assert!(!sorter.assignments().has_duplicates());
        prop_assert!(sorter.relocation_highlight().is_none());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Checkbox selection matches a toggle model
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn checkbox_regular_matches_model(
        ops in proptest::collection::vec(check_op(), 1..40),
    ) {
        let options = VALUES.iter().map(|v| CheckOption::new(*v, *v)).collect();
        let mut group = CheckboxGroup::new(BehaviorKind::Regular, options, Vec::new());

        let delay = 500u64;
        let mut now = 0u64;
        let mut model: BTreeSet<&str> = BTreeSet::new();
        let mut pending: BTreeMap<&str, (bool, u64)> = BTreeMap::new();

        for op in ops {
            match op {
                CheckOp::Toggle(i) => {
                    let value = VALUES[i];
                    pending.insert(value, (!model.contains(value), now + delay));
                    group.handle(&Interaction::change(value));
                }
                CheckOp::Tick(n) => {
                    now += n;
                    pending.retain(|value, (checked, due)| {
                        if *due > now {
                            return true;
                        }
                        if *checked {
                            model.insert(*value);
                        } else {
                            model.remove(*value);
                        }
                        false
                    });
                    group.tick(ms(n));
                }
            }
            let actual: BTreeSet<&str> = group.selected().iter().map(String::as_str).collect();
            prop_assert_eq!(&actual, &model);
        }

        group.run_until_idle();
        for (value, (checked, _)) in pending {
            if checked {
                model.insert(value);
            } else {
                model.remove(value);
            }
        }
        let actual: BTreeSet<&str> = group.selected().iter().map(String::as_str).collect();
        prop_assert_eq!(actual, model);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Radio: superseded regular selection never commits
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn radio_regular_only_last_choice_commits(
        first in 0..VALUES.len(),
        offset in 1..VALUES.len(),
        gap in 0u64..600,
    ) {
        let second = (first + offset) % VALUES.len();
        let recorder = CommitRecorder::new();
        let options = VALUES.iter().map(|v| RadioOption::new(*v, *v)).collect();
        let mut group = RadioGroup::new(BehaviorKind::Regular, options, None)
            .on_commit(recorder.sink());

        group.handle(&Interaction::change(VALUES[first]));
        group.tick(ms(gap));
        group.handle(&Interaction::change(VALUES[second]));
        group.run_until_idle();

        prop_assert_eq!(recorder.snapshots(), vec![Some(VALUES[second].to_owned())]);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Number: no commit while invalid
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn number_never_commits_while_invalid(
        behavior in number_behavior(),
        seed in any::<u64>(),
        ops in proptest::collection::vec(number_op(), 1..30),
    ) {
        let recorder = CommitRecorder::new();
        let options = NumberOptions::default()
            .with_min(-50.0)
            .with_max(500.0)
            .with_step(Step::Value(0.5));
        let mut field = NumberField::new(behavior, options, NumberValue::Empty)
            .with_random(SeededRandom::seeded(seed))
            .on_commit(recorder.sink());

        for op in ops {
            match op {
                NumberOp::Type(raw) => field.handle(&Interaction::input(raw)),
                NumberOp::Tick(n) => {
                    let invalid = field.validation_error().is_some();
                    let before = recorder.len();
                    field.tick(ms(n));
                    if invalid {
                        for value in &recorder.snapshots()[before..] {
                            prop_assert!(
                                matches!(value, NumberValue::Sentinel(_)),
                                "committed {value:?} while invalid"
                            );
                        }
                    }
                }
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Number: shifty run shape
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn number_shifty_run_is_ten_bounded_steps(
        typed in -1_000i32..1_000,
        seed in any::<u64>(),
    ) {
        let recorder = CommitRecorder::new();
        let mut field = NumberField::new(
            BehaviorKind::Shifty,
            NumberOptions::default(),
            NumberValue::Empty,
        )
        .with_random(SeededRandom::seeded(seed))
        .on_commit(recorder.sink());

        field.handle(&Interaction::input(typed.to_string()));
        field.run_until_idle();

        let commits = recorder.snapshots();
        prop_assert_eq!(commits.len(), 10);

        let mut previous = f64::from(typed);
        for value in commits {
            let current = value.as_number();
            prop_assert!(current.is_some());
            let current = current.unwrap_or_default();
            let delta = current - previous;
            prop_assert!((-49.5..=59.5).contains(&delta), "step {previous} -> {current}");
            previous = current;
        }

        field.tick(ms(10_000));
        prop_assert_eq!(recorder.len(), 10);
    }
}
