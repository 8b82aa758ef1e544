#![forbid(unsafe_code)]

//! Drag-and-drop category sorter.
//!
//! Items are sorted into categories by dropping them; dropping on the pool
//! unassigns them. Every drop commits the complete [`Assignments`] map.
//!
//! Under shifty behavior every Nth counted drop is followed by a relocation:
//! a different category is picked at random, highlighted, and after a short
//! delay the item is moved there and committed again. Starting a new drag
//! before the relocation fires cancels it.
//!
//! # Invariants
//!
//! 1. No item appears in more than one category in any committed snapshot.
//! 2. Snapshots always list every configured category, in full.
//! 3. At most one relocation is pending at a time.

use std::collections::{BTreeMap, BTreeSet};

use askew_core::{
    Announcer, BehaviorKind, CommitPort, CommitSink, DropZone, Duration, Fired, Interaction,
    RandomSource, SeededRandom, TimerSet, choose,
};

use crate::config::{DragDropConfig, RelocationPolicy};
use crate::control::{Control, ignored};

const SUPPORTED: [BehaviorKind; 2] = [BehaviorKind::Regular, BehaviorKind::Shifty];

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

/// Category id to the ordered items placed in it.
///
/// Items absent from every category are implicitly in the pool.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignments {
    slots: BTreeMap<String, Vec<String>>,
}

impl Assignments {
    /// No categories.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every category present and empty.
    pub fn with_categories<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            slots: categories
                .into_iter()
                .map(|c| (c.into(), Vec::new()))
                .collect(),
        }
    }

    /// Add `items` to `category`, creating it if needed (builder).
    #[must_use]
    pub fn with<I, S>(mut self, category: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.slots
            .entry(category.into())
            .or_default()
            .extend(items.into_iter().map(Into::into));
        self
    }

    /// Items in `category`, in placement order.
    #[must_use]
    pub fn items(&self, category: &str) -> &[String] {
        self.slots.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Category holding `item`.
    #[must_use]
    pub fn category_of(&self, item: &str) -> Option<&str> {
        self.slots
            .iter()
            .find(|(_, items)| items.iter().any(|i| i == item))
            .map(|(category, _)| category.as_str())
    }

    /// Whether `item` is assigned anywhere.
    #[must_use]
    pub fn contains_item(&self, item: &str) -> bool {
        self.category_of(item).is_some()
    }

    /// Category ids.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    /// `(category, items)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.slots
            .iter()
            .map(|(category, items)| (category.as_str(), items.as_slice()))
    }

    /// Number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether there are no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Total number of assigned items.
    #[must_use]
    pub fn assigned_count(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    /// Whether some item is listed twice (in one or several categories).
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        let mut seen = BTreeSet::new();
        self.slots
            .values()
            .flatten()
            .any(|item| !seen.insert(item.as_str()))
    }

    /// Copy with `item` removed from every category.
    #[must_use]
    pub fn without(&self, item: &str) -> Self {
        Self {
            slots: self
                .slots
                .iter()
                .map(|(category, items)| {
                    let kept = items.iter().filter(|i| *i != item).cloned().collect();
                    (category.clone(), kept)
                })
                .collect(),
        }
    }

    /// Copy with `item` moved to the end of `category`.
    #[must_use]
    pub fn placed(&self, item: &str, category: &str) -> Self {
        let mut next = self.without(item);
        next.slots
            .entry(category.to_owned())
            .or_default()
            .push(item.to_owned());
        next
    }
}

impl FromIterator<(String, Vec<String>)> for Assignments {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Static setup of a sorter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragDropOptions {
    /// Category ids, in display order.
    pub categories: Vec<String>,
    /// Every sortable item, in pool order.
    pub items: Vec<String>,
}

impl DragDropOptions {
    /// Options with the given categories and no known items.
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            items: Vec::new(),
        }
    }

    /// Set the sortable items (builder).
    #[must_use]
    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }
}

// ---------------------------------------------------------------------------
// Sorter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum DragTimer {
    Relocation,
    Announcement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DragAction {
    Relocate { item: String, from: String, to: String },
    ClearAnnouncement(u64),
}

/// Drag-and-drop category sorter.
#[derive(Debug)]
pub struct DragDropSorter {
    behavior: BehaviorKind,
    config: DragDropConfig,
    categories: Vec<String>,
    items: Vec<String>,
    assignments: Assignments,
    dragging: Option<String>,
    hover: Option<DropZone>,
    highlight: Option<String>,
    total_drops: u64,
    placements: BTreeMap<String, u64>,
    announcer: Announcer,
    timers: TimerSet<DragTimer, DragAction>,
    rng: Box<dyn RandomSource>,
    port: CommitPort<Assignments>,
}

impl DragDropSorter {
    /// Mount a sorter seeded from the externally stored `current` map.
    pub fn new(behavior: BehaviorKind, options: DragDropOptions, current: Assignments) -> Self {
        let config = DragDropConfig::default();
        let categories = if options.categories.is_empty() {
            current.categories().map(str::to_owned).collect()
        } else {
            options.categories
        };
        let mut sorter = Self {
            behavior,
            announcer: Announcer::new(config.announcement_window()),
            config,
            placements: categories.iter().map(|c| (c.clone(), 0)).collect(),
            categories,
            items: options.items,
            assignments: Assignments::default(),
            dragging: None,
            hover: None,
            highlight: None,
            total_drops: 0,
            timers: TimerSet::new(),
            rng: Box::new(SeededRandom::from_entropy()),
            port: CommitPort::new(),
        };
        sorter.assignments = sorter.normalize(&current);
        sorter
    }

    /// Use `config` for delays and relocation policy (builder).
    #[must_use]
    pub fn with_config(mut self, config: DragDropConfig) -> Self {
        self.announcer.set_window(config.announcement_window());
        self.config = config;
        self
    }

    /// Use `rng` for relocation targets (builder).
    #[must_use]
    pub fn with_random(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Send committed maps to `sink` (builder).
    #[must_use]
    pub fn on_commit(mut self, sink: impl CommitSink<Assignments> + 'static) -> Self {
        self.port.connect(sink);
        self
    }

    /// Forward announcements to `listener` (builder).
    #[must_use]
    pub fn on_announce(mut self, listener: impl FnMut(&str) + 'static) -> Self {
        self.announcer.on_announce(listener);
        self
    }

    /// Last committed map.
    #[must_use]
    pub fn assignments(&self) -> &Assignments {
        &self.assignments
    }

    /// Category ids, in display order.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Known items that are in no category.
    pub fn available_items(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .map(String::as_str)
            .filter(|item| !self.assignments.contains_item(item))
    }

    /// Item currently being dragged.
    #[must_use]
    pub fn dragging(&self) -> Option<&str> {
        self.dragging.as_deref()
    }

    /// Zone under the drag pointer.
    #[must_use]
    pub fn hover(&self) -> Option<&DropZone> {
        self.hover.as_ref()
    }

    /// Category that a pending relocation will move into.
    #[must_use]
    pub fn relocation_highlight(&self) -> Option<&str> {
        self.highlight.as_deref()
    }

    /// Whether a relocation is scheduled.
    #[must_use]
    pub fn is_relocation_pending(&self) -> bool {
        self.timers.is_pending(&DragTimer::Relocation)
    }

    /// Current screen-reader text; empty when nothing is announced.
    #[must_use]
    pub fn announcement(&self) -> &str {
        self.announcer.current()
    }

    /// Drops into categories so far.
    #[must_use]
    pub fn drop_count(&self) -> u64 {
        self.total_drops
    }

    fn is_category(&self, id: &str) -> bool {
        self.categories.iter().any(|c| c == id)
    }

    fn normalize(&self, current: &Assignments) -> Assignments {
        let mut seen = BTreeSet::new();
        let normalized: Assignments = self
            .categories
            .iter()
            .map(|category| {
                let items = current
                    .items(category)
                    .iter()
                    .filter(|item| seen.insert(item.as_str()))
                    .cloned()
                    .collect();
                (category.clone(), items)
            })
            .collect();
        if normalized.assigned_count() != current.assigned_count() {
            tracing::debug!(
                control = Self::NAME,
                dropped = current.assigned_count() - normalized.assigned_count(),
                "external map had duplicate or uncategorized items"
            );
        }
        normalized
    }

    fn commit(&mut self, next: Assignments) {
        self.assignments = next;
        self.port.emit(&self.assignments);
        tracing::debug!(
            control = Self::NAME,
            version = self.port.version(),
            assigned = self.assignments.assigned_count(),
            "commit"
        );
    }

    fn announce(&mut self, message: String) {
        let token = self.announcer.announce(message);
        self.timers.schedule_once(
            DragTimer::Announcement,
            self.announcer.window(),
            DragAction::ClearAnnouncement(token),
        );
    }

    fn start_drag(&mut self, item: &str) {
        if self.timers.cancel(&DragTimer::Relocation) {
            self.highlight = None;
            tracing::debug!(control = Self::NAME, item, "relocation cancelled by new drag");
        }
        self.dragging = Some(item.to_owned());
        self.announce(format!("Picked up {item}"));
    }

    fn end_drag(&mut self) {
        self.dragging = None;
        self.hover = None;
    }

    fn drop_into(&mut self, category: &str, item: &str) {
        let next = self.assignments.placed(item, category);
        self.commit(next);

        self.total_drops += 1;
        let placed = {
            let count = self.placements.entry(category.to_owned()).or_insert(0);
            *count += 1;
            *count
        };
        if self.effective_behavior() == BehaviorKind::Shifty {
            let count = match self.config.relocation_policy {
                RelocationPolicy::Global => self.total_drops,
                RelocationPolicy::PerCategory => placed,
            };
            if count % u64::from(self.config.relocate_every.max(1)) == 0 {
                self.schedule_relocation(category, item);
            }
        }

        self.hover = None;
        self.dragging = None;
        self.announce(format!("Dropped {item} into {category}"));
    }

    fn return_to_pool(&mut self, item: &str) {
        let next = self.assignments.without(item);
        self.commit(next);
        self.hover = None;
        self.dragging = None;
        self.announce(format!("Returned {item} to available items"));
    }

    fn schedule_relocation(&mut self, from: &str, item: &str) {
        let others: Vec<&String> = self.categories.iter().filter(|c| *c != from).collect();
        let Some(to) = choose(self.rng.as_mut(), &others).map(|c| (*c).clone()) else {
            return;
        };
        tracing::debug!(control = Self::NAME, item, from, to = %to, "relocation scheduled");
        self.highlight = Some(to.clone());
        self.timers.schedule_once(
            DragTimer::Relocation,
            self.config.relocation_delay(),
            DragAction::Relocate {
                item: item.to_owned(),
                from: from.to_owned(),
                to,
            },
        );
    }

    fn relocate(&mut self, item: &str, from: &str, to: &str) {
        self.highlight = None;
        if !self.assignments.items(from).iter().any(|i| i == item) {
            tracing::debug!(control = Self::NAME, item, from, "relocation skipped, item moved");
            return;
        }
        let next = self.assignments.placed(item, to);
        self.commit(next);
        self.announce(format!("{item} moved automatically to {to}"));
    }
}

impl Control for DragDropSorter {
    type Value = Assignments;

    const NAME: &'static str = "drag_drop";

    fn behavior(&self) -> BehaviorKind {
        self.behavior
    }

    fn effective_behavior(&self) -> BehaviorKind {
        self.behavior.restricted_to(&SUPPORTED)
    }

    fn resolved(&self) -> &Assignments {
        &self.assignments
    }

    fn sync(&mut self, current: Assignments) {
        self.assignments = self.normalize(&current);
    }

    fn handle(&mut self, interaction: &Interaction) {
        match interaction {
            Interaction::DragStart { item } if !item.is_empty() => self.start_drag(item),
            Interaction::DragEnd => self.end_drag(),
            Interaction::DragOver { zone } => match zone {
                DropZone::Category(id) if !self.is_category(id) => {
                    ignored(Self::NAME, interaction, "unknown category");
                }
                _ => self.hover = Some(zone.clone()),
            },
            Interaction::DragLeave { zone } => {
                if self.hover.as_ref() == Some(zone) {
                    self.hover = None;
                }
            }
            Interaction::Drop { zone, payload } => {
                let Some(item) = payload.as_deref().filter(|p| !p.is_empty()) else {
                    ignored(Self::NAME, interaction, "empty payload");
                    return;
                };
                match zone {
                    DropZone::Category(id) if self.is_category(id) => self.drop_into(id, item),
                    DropZone::Category(_) => ignored(Self::NAME, interaction, "unknown category"),
                    DropZone::Pool => self.return_to_pool(item),
                }
            }
            _ => ignored(Self::NAME, interaction, "not a drag interaction"),
        }
    }

    fn now(&self) -> Duration {
        self.timers.now()
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    fn advance_to(&mut self, deadline: Duration) -> usize {
        let mut fired = 0;
        while let Some(Fired { action, .. }) = self.timers.pop_due(deadline) {
            fired += 1;
            match action {
                DragAction::Relocate { item, from, to } => self.relocate(&item, &from, &to),
                DragAction::ClearAnnouncement(token) => {
                    self.announcer.expire(token);
                }
            }
        }
        self.timers.settle(deadline);
        fired
    }

    fn reset(&mut self) {
        let cancelled = self.timers.cancel_all();
        self.highlight = None;
        tracing::debug!(control = Self::NAME, cancelled, "reset");
    }

    fn version(&self) -> u64 {
        self.port.version()
    }
}
