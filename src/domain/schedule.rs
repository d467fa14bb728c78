//! Schedule derivation
//!
//! Turns a graph snapshot into concrete start/end dates for every task
//! reachable from a chosen node. The traversal is a stack-based variant
//! of topological processing: a child with several parents is parked
//! behind a pending-join counter and scheduled only once every parent
//! has been processed, so its start is always the latest parent end.
//!
//! Every call walks the whole snapshot from scratch and returns a fresh
//! [`Schedule`]; nothing is cached between calls.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use super::node::{Color, Node};

/// Read-only view of a graph's node collection.
///
/// Borrowing the collection immutably for the lifetime of the snapshot
/// is what enforces the "no mutation during traversal" contract: the
/// borrow checker will not let the owning [`TaskGraph`](super::TaskGraph)
/// change while a snapshot is alive.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    nodes: &'a HashMap<String, Node>,
    root_name: &'a str,
    project_start: NaiveDate,
}

impl<'a> Snapshot<'a> {
    pub(crate) fn new(
        nodes: &'a HashMap<String, Node>,
        root_name: &'a str,
        project_start: NaiveDate,
    ) -> Self {
        Self {
            nodes,
            root_name,
            project_start,
        }
    }

    pub fn root_name(&self) -> &str {
        self.root_name
    }

    pub fn project_start(&self) -> NaiveDate {
        self.project_start
    }

    fn get(&self, name: &str) -> Option<&'a Node> {
        self.nodes.get(name)
    }
}

/// One scheduled task bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEntry {
    pub name: String,

    /// Computed start date (or the honored user request).
    pub start: NaiveDate,

    /// Exclusive end date: start plus duration in whole days.
    pub end: NaiveDate,

    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub parents: BTreeSet<String>,

    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub children: BTreeSet<String>,

    pub color: Color,

    /// The user-requested start, recorded here when it was rejected for
    /// preceding the earliest feasible start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlapping_start: Option<NaiveDate>,
}

/// A derived schedule: entries in the order tasks became ready, with
/// name lookup on the side.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Schedule {
    pub fn get(&self, name: &str) -> Option<&ScheduleEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduleEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, entry: ScheduleEntry) {
        self.index.insert(entry.name.clone(), self.entries.len());
        self.entries.push(entry);
    }
}

/// Derives the schedule for everything reachable from the root.
pub fn build_schedule(snapshot: &Snapshot<'_>) -> Schedule {
    build_schedule_from(snapshot, snapshot.root_name)
}

/// Derives the schedule for everything reachable from `start_node`.
///
/// Returns an empty schedule if `start_node` does not exist in the
/// snapshot.
pub fn build_schedule_from(snapshot: &Snapshot<'_>, start_node: &str) -> Schedule {
    let mut schedule = Schedule::default();
    let Some(seed) = snapshot.get(start_node) else {
        return schedule;
    };

    // Join nodes not yet ready: how many parents are still unprocessed.
    let mut pending: HashMap<&str, usize> = HashMap::new();
    let mut stack: Vec<&str> = Vec::new();

    schedule.push(make_entry(seed, snapshot.project_start));
    if !seed.children.is_empty() {
        stack.push(&seed.name);
    }

    while let Some(current) = stack.pop() {
        let Some(node) = snapshot.get(current) else {
            continue;
        };

        let mut ready: Vec<&Node> = Vec::new();
        for child_name in &node.children {
            let Some(child) = snapshot.get(child_name) else {
                continue;
            };
            if schedule.contains(child_name) {
                continue;
            }
            if is_ready(child, &mut pending) {
                ready.push(child);
            }
        }

        // Sibling order: branches above leaves, earlier finishers first
        // within each group.
        let mut batch: Vec<ScheduleEntry> = ready
            .iter()
            .map(|&child| make_entry(child, computed_start(child, &schedule, snapshot)))
            .collect();
        batch.sort_by(|a, b| {
            let a_leaf = a.children.is_empty();
            let b_leaf = b.children.is_empty();
            a_leaf.cmp(&b_leaf).then(a.end.cmp(&b.end))
        });

        let mut expand: Vec<&str> = Vec::new();
        for entry in batch {
            if let Some(child) = snapshot.get(&entry.name) {
                if !child.children.is_empty() {
                    expand.push(&child.name);
                }
            }
            schedule.push(entry);
        }
        // Reversed so the first-ordered child is expanded first.
        for name in expand.into_iter().rev() {
            stack.push(name);
        }
    }

    schedule
}

/// A child is ready once all of its parents have been processed. Single
/// parents make it ready immediately; join nodes count down one pending
/// parent per visit.
fn is_ready<'a>(child: &'a Node, pending: &mut HashMap<&'a str, usize>) -> bool {
    if child.parents.len() <= 1 {
        return true;
    }
    match pending.get_mut(child.name.as_str()) {
        Some(count) => {
            *count -= 1;
            *count == 0
        }
        None => {
            pending.insert(&child.name, child.parents.len() - 1);
            false
        }
    }
}

/// Earliest feasible start: the project start when the task hangs
/// directly off the root, otherwise the latest end among its parents.
/// Parents without a schedule entry contribute the project start as a
/// floor.
fn computed_start(child: &Node, schedule: &Schedule, snapshot: &Snapshot<'_>) -> NaiveDate {
    if child.parents.len() == 1 && child.parents.contains(snapshot.root_name) {
        return snapshot.project_start;
    }
    child
        .parents
        .iter()
        .map(|parent| {
            schedule
                .get(parent)
                .map(|entry| entry.end)
                .unwrap_or(snapshot.project_start)
        })
        .max()
        .unwrap_or(snapshot.project_start)
}

/// Builds the entry for a node given its earliest feasible start. A
/// user-requested start on or after that date wins; an earlier request
/// is overridden and recorded as `overlapping_start`.
fn make_entry(node: &Node, earliest: NaiveDate) -> ScheduleEntry {
    let (start, overlapping_start) = match node.start {
        Some(requested) if requested >= earliest => (requested, None),
        Some(requested) => (earliest, Some(requested)),
        None => (earliest, None),
    };

    ScheduleEntry {
        name: node.name.clone(),
        start,
        end: start + Duration::days(node.duration),
        parents: node.parents.clone(),
        children: node.children.clone(),
        color: node.color,
        overlapping_start,
    }
}
