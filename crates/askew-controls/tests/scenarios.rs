#![forbid(unsafe_code)]

//! End-to-end scenarios for each control, driven through the public API the
//! way a host page would drive them.
//!
//! Run:
//!   cargo test -p askew-controls --test scenarios

use askew_controls::{
    Assignments, BehaviorConfig, CheckOption, CheckboxConfig, CheckboxGroup, Control,
    DragDropConfig, DragDropOptions, DragDropSorter, NumberField, NumberOptions, NumberValue,
    RelocationPolicy, TextField, TextOptions,
};
use askew_core::{BehaviorKind, CommitRecorder, Duration, Interaction, ScriptedRandom, SeededRandom};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

// ============================================================================
// Text
// ============================================================================

#[test]
fn toxic_text_replaces_cat_from_pool() {
    for seed in 0..16 {
        let recorder = CommitRecorder::new();
        let mut field = TextField::new(
            BehaviorKind::Toxic,
            TextOptions::with_replacements(["llama", "widget"]),
            "",
        )
        .with_random(SeededRandom::seeded(seed))
        .on_commit(recorder.sink());

        field.handle(&Interaction::input("the cat"));

        let committed = recorder.last().unwrap_or_default();
        assert!(
            committed == "the llama" || committed == "the widget",
            "seed {seed}: {committed}"
        );
        assert_eq!(field.display(), committed);
    }
}

// ============================================================================
// Checkbox
// ============================================================================

#[test]
fn toxic_checkbox_swaps_once_with_threshold_one() {
    let config = CheckboxConfig {
        toxic_threshold: 1,
        ..CheckboxConfig::default()
    };
    let options = vec![
        CheckOption::new("A", "Yes"),
        CheckOption::new("B", "No"),
        CheckOption::new("C", "Maybe"),
    ];
    let mut group = CheckboxGroup::new(BehaviorKind::Toxic, options, Vec::new())
        .with_config(config)
        .with_random(SeededRandom::seeded(7));

    group.handle(&Interaction::change("A"));
    let a = group.label("A").to_owned();
    assert!(a == "No" || a == "Maybe", "A shows {a}");
    let swapped_with = if a == "No" { "B" } else { "C" };
    let untouched = if a == "No" { "C" } else { "B" };
    assert_eq!(group.label(swapped_with), "Yes");
    assert_eq!(
        group.label(untouched),
        if untouched == "B" { "No" } else { "Maybe" }
    );

    let labels: Vec<String> = ["A", "B", "C"].iter().map(|v| group.label(v).to_owned()).collect();
    group.handle(&Interaction::change("B"));
    group.handle(&Interaction::change("C"));
    group.handle(&Interaction::change("A"));
    group.handle(&Interaction::change("A"));
    let after: Vec<String> = ["A", "B", "C"].iter().map(|v| group.label(v).to_owned()).collect();
    assert_eq!(labels, after);
    assert!(group.is_idle());
}

#[test]
fn shifty_checkbox_reverts_first_checks_then_settles() {
    let recorder = CommitRecorder::new();
    let options = vec![CheckOption::new("A", "Yes"), CheckOption::new("B", "No")];
    let mut group = CheckboxGroup::new(BehaviorKind::Shifty, options, Vec::new())
        .on_commit(recorder.sink());

    group.handle(&Interaction::change("A"));
    group.handle(&Interaction::change("B"));
    assert_eq!(group.selected(), ["A".to_owned(), "B".to_owned()]);
    group.tick(ms(800));
    assert!(group.selected().is_empty());

    group.handle(&Interaction::change("A"));
    group.run_until_idle();
    assert_eq!(group.selected(), ["A".to_owned()]);
    assert_eq!(recorder.len(), 5);
}

// ============================================================================
// Number
// ============================================================================

#[test]
fn pirate_number_scenario() {
    let recorder = CommitRecorder::new();
    let mut field = NumberField::new(
        BehaviorKind::Pirate,
        NumberOptions::default(),
        NumberValue::Empty,
    )
    .on_commit(recorder.sink());

    field.handle(&Interaction::input("5"));
    field.tick(ms(1_100));
    field.handle(&Interaction::input("9"));
    field.tick(ms(100));
    assert!(!field.is_pirate_mode(), "original deadline must not fire");
    assert!(recorder.is_empty());

    field.tick(ms(1_100));
    assert!(field.is_pirate_mode());
    assert!(field.show_pirate_message());
    assert_eq!(field.value(), &NumberValue::Sentinel("ARRRGH!".into()));
    assert_eq!(recorder.len(), 1);

    field.sync(NumberValue::Empty);
    assert!(!field.is_pirate_mode());
    field.handle(&Interaction::input("1"));
    field.run_until_idle();
    assert_eq!(recorder.len(), 2);
}

#[test]
fn number_config_changes_sentinel_and_delay() {
    let mut config = BehaviorConfig::default().number;
    config.pirate_delay_ms = 50;
    config.pirate_sentinel = "YARR".into();
    let mut field = NumberField::new(
        BehaviorKind::Pirate,
        NumberOptions::default(),
        NumberValue::Empty,
    )
    .with_config(config);

    field.handle(&Interaction::input("3"));
    field.tick(ms(50));
    assert_eq!(field.display(), "YARR");
}

// ============================================================================
// Drag-drop
// ============================================================================

#[test]
fn per_category_relocation_counts_each_category() {
    let config = DragDropConfig {
        relocation_policy: RelocationPolicy::PerCategory,
        ..DragDropConfig::default()
    };
    let recorder = CommitRecorder::new();
    let mut sorter = DragDropSorter::new(
        BehaviorKind::Shifty,
        DragDropOptions::new(["fruit", "tool"]).with_items(["a", "b", "c", "d"]),
        Assignments::new(),
    )
    .with_config(config)
    .with_random(ScriptedRandom::new([0]))
    .on_commit(recorder.sink());

    sorter.handle(&Interaction::drop_on("fruit", "a"));
    sorter.handle(&Interaction::drop_on("tool", "b"));
    sorter.handle(&Interaction::drop_on("fruit", "c"));
    assert!(!sorter.is_relocation_pending());

    sorter.handle(&Interaction::drop_on("fruit", "d"));
    assert_eq!(sorter.relocation_highlight(), Some("tool"));
    sorter.tick(ms(200));
    assert_eq!(sorter.assignments().category_of("d"), Some("tool"));
    assert_eq!(sorter.announcement(), "d moved automatically to tool");
    assert_eq!(recorder.len(), 5);
}

#[test]
fn drag_drop_announcement_clears_after_window() {
    let mut sorter = DragDropSorter::new(
        BehaviorKind::Regular,
        DragDropOptions::new(["fruit"]).with_items(["a"]),
        Assignments::new(),
    );
    sorter.handle(&Interaction::drop_on("fruit", "a"));
    assert_eq!(sorter.announcement(), "Dropped a into fruit");
    sorter.tick(ms(600));
    sorter.handle(&Interaction::drop_on_pool("a"));
    sorter.tick(ms(600));
    assert_eq!(sorter.announcement(), "Returned a to available items");
    sorter.tick(ms(400));
    assert_eq!(sorter.announcement(), "");
    assert_eq!(sorter.available_items().collect::<Vec<_>>(), ["a"]);
}
