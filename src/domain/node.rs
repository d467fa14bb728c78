//! Task node model
//!
//! A node is one bar on the chart: a named task with a duration in whole
//! days, a color, and parent/child edges to other tasks. Edges are stored
//! by task name on both endpoints; [`TaskGraph`](super::TaskGraph) keeps
//! the two sides consistent.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One of the ten fixed chart colors, identified as 1 through 10.
///
/// Colors carry no meaning beyond identity; rendering frontends map them
/// to an actual palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Color(u8);

impl Color {
    /// Number of colors in the palette.
    pub const COUNT: u8 = 10;

    /// Creates a color from its 1-based identifier, if in range.
    pub fn new(value: u8) -> Option<Self> {
        (1..=Self::COUNT).contains(&value).then_some(Self(value))
    }

    /// Returns the 1-based identifier.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self(1)
    }
}

impl TryFrom<u8> for Color {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Color::new(value)
            .ok_or_else(|| format!("color must be between 1 and {}, got {}", Color::COUNT, value))
    }
}

impl From<Color> for u8 {
    fn from(color: Color) -> u8 {
        color.0
    }
}

/// A task node within a chart's dependency graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique task name within the chart.
    pub name: String,

    /// Duration in whole days. Zero is only valid for the synthetic root.
    pub duration: i64,

    /// Names of tasks that must finish before this one starts.
    ///
    /// Every non-root node has at least one parent; a task with no
    /// declared parents is bound to the synthetic root.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub parents: BTreeSet<String>,

    /// Names of tasks that start after this one finishes.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub children: BTreeSet<String>,

    /// Display color.
    pub color: Color,

    /// User-requested start date. Honored only when it does not precede
    /// the earliest feasible start; see the schedule builder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
}

impl Node {
    /// Returns true if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns true if `name` is a parent of this node.
    pub fn has_parent(&self, name: &str) -> bool {
        self.parents.contains(name)
    }

    /// Returns true if `name` is a child of this node.
    pub fn has_child(&self, name: &str) -> bool {
        self.children.contains(name)
    }
}

/// Input for inserting a task into a [`TaskGraph`](super::TaskGraph).
///
/// `parents: None` means "no parents declared": the task is bound to the
/// synthetic root. `Some` with an empty set behaves the same way after
/// root-binding maintenance runs.
#[derive(Debug, Clone, Default)]
pub struct NodeSpec {
    pub name: String,
    pub duration: i64,
    pub parents: Option<BTreeSet<String>>,
    pub children: Option<BTreeSet<String>>,
    pub color: Option<Color>,
    pub start: Option<NaiveDate>,
}

impl NodeSpec {
    /// Creates a spec with the given name and duration and nothing else.
    pub fn new(name: impl Into<String>, duration: i64) -> Self {
        Self {
            name: name.into(),
            duration,
            ..Self::default()
        }
    }

    /// Declares a single parent.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parents
            .get_or_insert_with(BTreeSet::new)
            .insert(parent.into());
        self
    }

    /// Declares a set of parents.
    pub fn with_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parents = Some(parents.into_iter().map(Into::into).collect());
        self
    }

    /// Declares a single child.
    pub fn with_child(mut self, child: impl Into<String>) -> Self {
        self.children
            .get_or_insert_with(BTreeSet::new)
            .insert(child.into());
        self
    }

    /// Declares a set of children.
    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = Some(children.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the display color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Sets the requested start date.
    pub fn with_start(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }
}

/// Partial update for an existing task.
///
/// Omitted fields keep the node's current values. An update is a
/// replacement, not a patch: the graph validates the full proposed state
/// and then swaps the node wholesale.
#[derive(Debug, Clone, Default)]
pub struct NodePatch {
    pub new_name: Option<String>,
    pub duration: Option<i64>,
    pub parents: Option<BTreeSet<String>>,
    pub children: Option<BTreeSet<String>>,
    pub color: Option<Color>,
    pub start: Option<NaiveDate>,
}

impl NodePatch {
    /// Creates an empty patch (updating with it is a no-op rename-to-self).
    pub fn new() -> Self {
        Self::default()
    }

    /// Renames the task.
    pub fn rename(mut self, new_name: impl Into<String>) -> Self {
        self.new_name = Some(new_name.into());
        self
    }

    /// Replaces the duration.
    pub fn duration(mut self, duration: i64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Replaces the parent set.
    pub fn parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parents = Some(parents.into_iter().map(Into::into).collect());
        self
    }

    /// Replaces the child set.
    pub fn children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = Some(children.into_iter().map(Into::into).collect());
        self
    }

    /// Replaces the color.
    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Replaces the requested start date.
    pub fn start(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_accepts_palette_range() {
        assert_eq!(Color::new(1).map(|c| c.value()), Some(1));
        assert_eq!(Color::new(10).map(|c| c.value()), Some(10));
        assert_eq!(Color::new(0), None);
        assert_eq!(Color::new(11), None);
    }

    #[test]
    fn color_default_is_first() {
        assert_eq!(Color::default().value(), 1);
    }

    #[test]
    fn color_serde_rejects_out_of_range() {
        let ok: Result<Color, _> = serde_json::from_str("7");
        assert_eq!(ok.unwrap().value(), 7);

        let bad: Result<Color, _> = serde_json::from_str("11");
        assert!(bad.is_err());
    }

    #[test]
    fn spec_builder_collects_edges() {
        let spec = NodeSpec::new("Build", 10)
            .with_parent("Design")
            .with_parent("Spike")
            .with_child("Test");

        let parents = spec.parents.unwrap();
        assert!(parents.contains("Design"));
        assert!(parents.contains("Spike"));
        assert!(spec.children.unwrap().contains("Test"));
    }

    #[test]
    fn spec_without_parents_declares_none() {
        let spec = NodeSpec::new("Solo", 2);
        assert!(spec.parents.is_none());
        assert!(spec.children.is_none());
    }

    #[test]
    fn node_serde_roundtrip() {
        let node = Node {
            name: "Design".to_string(),
            duration: 5,
            parents: BTreeSet::from(["root-abc1234".to_string()]),
            children: BTreeSet::new(),
            color: Color::new(3).unwrap(),
            start: NaiveDate::from_ymd_opt(2026, 1, 2),
        };

        let json = serde_json::to_string(&node).unwrap();
        let parsed: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(node, parsed);
    }
}
