//! Task dependency graph
//!
//! Owns the node collection and every structural invariant: unique names,
//! the 10,000-node capacity, acyclicity, bidirectional edges, and the
//! synthetic root that anchors any task without a real parent. All
//! mutation goes through [`TaskGraph`]; the schedule builder only ever
//! sees a read-only [`Snapshot`](super::Snapshot) of it.
//!
//! Validation always runs to completion before any mutation, so a failed
//! insert or update leaves the graph untouched.

use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap, HashSet};
use thiserror::Error;

use super::node::{Color, Node, NodePatch, NodeSpec};

/// Maximum number of nodes per chart, the synthetic root included.
pub const MAX_NODES: usize = 10_000;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("the root task cannot be renamed or updated")]
    RootChange,

    #[error("the root task cannot be removed")]
    RootRemoval,

    #[error("a task named '{0}' already exists")]
    EntryDuplicate(String),

    #[error("task name must not be empty")]
    EmptyName,

    #[error("task '{0}' must last at least one day")]
    ZeroDuration(String),

    #[error("task '{0}' has a negative duration")]
    NegativeDuration(String),

    #[error("no task named '{0}' exists")]
    MissingEntry(String),

    #[error("parent task '{0}' does not exist")]
    MissingParent(String),

    #[error("child task '{0}' does not exist")]
    MissingChild(String),

    #[error("task '{0}' cannot depend on itself")]
    SelfReference(String),

    #[error("the root task cannot be declared as a child")]
    RootReference,

    #[error("linking '{0}' would create a dependency cycle")]
    GraphLoop(String),

    #[error("chart is full ({MAX_NODES} tasks)")]
    NodeLimitExceeded,
}

/// What root-binding maintenance must do for a node with the given
/// parent set. The root edge is a default, not a persistent fact: it is
/// dropped as soon as a real parent exists and re-established when the
/// last parent goes away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RootBinding {
    Drop,
    Establish,
    Keep,
}

pub(crate) fn root_binding_action(parents: &BTreeSet<String>, root_name: &str) -> RootBinding {
    if parents.len() > 1 && parents.contains(root_name) {
        RootBinding::Drop
    } else if parents.is_empty() {
        RootBinding::Establish
    } else {
        RootBinding::Keep
    }
}

/// A bounded directed acyclic task graph with a synthetic root.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskGraph {
    /// Chart title.
    name: String,

    /// Node collection, keyed by task name.
    nodes: HashMap<String, Node>,

    /// Name of the synthetic root, injected at construction. The caller
    /// guarantees it cannot collide with user task names.
    root_name: String,

    /// Color assigned to tasks that declare none.
    default_color: Color,

    /// Project start date; the floor for every computed schedule date.
    start_date: NaiveDate,
}

impl TaskGraph {
    /// Creates a graph containing only the synthetic root.
    pub fn new(
        name: impl Into<String>,
        root_name: impl Into<String>,
        start_date: NaiveDate,
    ) -> Self {
        let root_name = root_name.into();
        let default_color = Color::default();
        let root = Node {
            name: root_name.clone(),
            duration: 0,
            parents: BTreeSet::new(),
            children: BTreeSet::new(),
            color: default_color,
            start: None,
        };
        let mut nodes = HashMap::new();
        nodes.insert(root_name.clone(), root);

        Self {
            name: name.into(),
            nodes,
            root_name,
            default_color,
            start_date,
        }
    }

    /// Chart title.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the synthetic root node.
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// How many more tasks fit before the capacity limit.
    pub fn remaining_capacity(&self) -> usize {
        MAX_NODES.saturating_sub(self.nodes.len())
    }

    /// Returns true once the capacity limit is reached.
    pub fn is_at_capacity(&self) -> bool {
        self.nodes.len() >= MAX_NODES
    }

    pub fn default_color(&self) -> Color {
        self.default_color
    }

    pub fn set_default_color(&mut self, color: Color) {
        self.default_color = color;
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn set_start_date(&mut self, start_date: NaiveDate) {
        self.start_date = start_date;
    }

    /// Looks up a single node.
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// Returns true if a node with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Read-only view of the node collection.
    pub fn tasks(&self) -> &HashMap<String, Node> {
        &self.nodes
    }

    /// Inserts a new task.
    ///
    /// With no declared parents the task is bound to the root; declaring
    /// a real parent alongside drops that binding again as the edges are
    /// wired up. Fails without mutating on any validation error.
    pub fn add_task(&mut self, spec: NodeSpec) -> Result<(), GraphError> {
        if self.is_at_capacity() {
            return Err(GraphError::NodeLimitExceeded);
        }
        if self.nodes.contains_key(&spec.name) {
            return Err(GraphError::EntryDuplicate(spec.name));
        }
        self.validate(
            &spec.name,
            spec.duration,
            spec.parents.as_ref(),
            spec.children.as_ref(),
        )?;

        self.insert_validated(spec);
        Ok(())
    }

    /// Replaces an existing task wholesale.
    ///
    /// Omitted patch fields default to the node's current values. The
    /// full proposed state is validated against the current graph before
    /// anything is touched, so a failed update leaves the original node
    /// in place.
    pub fn update_task(&mut self, name: &str, patch: NodePatch) -> Result<(), GraphError> {
        if name == self.root_name {
            return Err(GraphError::RootChange);
        }
        let current = self
            .nodes
            .get(name)
            .ok_or_else(|| GraphError::MissingEntry(name.to_string()))?;

        let new_name = patch.new_name.unwrap_or_else(|| name.to_string());
        if new_name != name && self.nodes.contains_key(&new_name) {
            return Err(GraphError::EntryDuplicate(new_name));
        }

        let spec = NodeSpec {
            name: new_name,
            duration: patch.duration.unwrap_or(current.duration),
            parents: Some(patch.parents.unwrap_or_else(|| current.parents.clone())),
            children: Some(patch.children.unwrap_or_else(|| current.children.clone())),
            color: Some(patch.color.unwrap_or(current.color)),
            start: patch.start.or(current.start),
        };
        self.validate(
            &spec.name,
            spec.duration,
            spec.parents.as_ref(),
            spec.children.as_ref(),
        )?;

        // Validation passed: swap. Child re-linking is suppressed because
        // the node comes right back under its new attributes.
        self.remove_unchecked(name, false);
        self.insert_validated(spec);
        Ok(())
    }

    /// Removes a task, re-linking its children to its former parents so
    /// reachability from the root is preserved.
    pub fn remove_task(&mut self, name: &str) -> Result<(), GraphError> {
        if name == self.root_name {
            return Err(GraphError::RootRemoval);
        }
        if !self.nodes.contains_key(name) {
            return Err(GraphError::MissingEntry(name.to_string()));
        }
        self.remove_unchecked(name, true);
        Ok(())
    }

    /// Read-only snapshot for the schedule builder.
    pub fn snapshot(&self) -> super::Snapshot<'_> {
        super::Snapshot::new(&self.nodes, &self.root_name, self.start_date)
    }

    /// Inserts a node whose spec has already passed validation, wiring
    /// up every declared edge bidirectionally.
    fn insert_validated(&mut self, spec: NodeSpec) {
        let node = Node {
            name: spec.name.clone(),
            duration: spec.duration,
            parents: BTreeSet::new(),
            children: BTreeSet::new(),
            color: spec.color.unwrap_or(self.default_color),
            start: spec.start,
        };
        self.nodes.insert(spec.name.clone(), node);

        for parent in spec.parents.iter().flatten() {
            self.bind(parent, &spec.name);
        }
        for child in spec.children.iter().flatten() {
            self.bind(&spec.name, child);
        }
        // Covers both the no-parents-declared case and an empty declared
        // parent set: either way the node ends up under the root.
        self.ensure_root_binding(&spec.name);
    }

    /// Removes a node and detaches all of its edges. When `relink` is
    /// set, the node's former parents inherit its children.
    fn remove_unchecked(&mut self, name: &str, relink: bool) {
        let Some(node) = self.nodes.remove(name) else {
            return;
        };

        for parent in &node.parents {
            if let Some(parent_node) = self.nodes.get_mut(parent) {
                parent_node.children.remove(name);
            }
        }
        for child in &node.children {
            if let Some(child_node) = self.nodes.get_mut(child) {
                child_node.parents.remove(name);
            }
            if relink {
                for parent in &node.parents {
                    self.bind(parent, child);
                }
            }
            self.ensure_root_binding(child);
        }

        // The root must never keep an edge to a name that is gone.
        let root_name = self.root_name.clone();
        if let Some(root) = self.nodes.get_mut(&root_name) {
            root.children.remove(name);
        }
    }

    /// Adds the edge parent -> child on both endpoints, then re-checks
    /// the child's root binding. Missing endpoints are skipped so a
    /// one-sided edge can never appear.
    fn bind(&mut self, parent: &str, child: &str) {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return;
        }
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.insert(child.to_string());
        }
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parents.insert(parent.to_string());
        }
        self.ensure_root_binding(child);
    }

    /// Invariant maintenance after any edge change: a node with a real
    /// parent loses its placeholder root edge, a node with no parents
    /// regains it. The decision itself is the pure
    /// [`root_binding_action`] so it can be tested in isolation.
    fn ensure_root_binding(&mut self, name: &str) {
        if name == self.root_name {
            return;
        }
        let action = match self.nodes.get(name) {
            Some(node) => root_binding_action(&node.parents, &self.root_name),
            None => return,
        };
        let root_name = self.root_name.clone();

        match action {
            RootBinding::Drop => {
                if let Some(node) = self.nodes.get_mut(name) {
                    node.parents.remove(&root_name);
                }
                if let Some(root) = self.nodes.get_mut(&root_name) {
                    root.children.remove(name);
                }
            }
            RootBinding::Establish => {
                if let Some(node) = self.nodes.get_mut(name) {
                    node.parents.insert(root_name.clone());
                }
                if let Some(root) = self.nodes.get_mut(&root_name) {
                    root.children.insert(name.to_string());
                }
            }
            RootBinding::Keep => {}
        }
    }

    /// Shared validation for insert and update, fail-fast in a fixed
    /// order. Runs entirely before any mutation.
    ///
    /// The node's own name counts as present so that a self-reference is
    /// reported as such rather than as a missing parent or child.
    fn validate(
        &self,
        name: &str,
        duration: i64,
        parents: Option<&BTreeSet<String>>,
        children: Option<&BTreeSet<String>>,
    ) -> Result<(), GraphError> {
        if name.is_empty() {
            return Err(GraphError::EmptyName);
        }
        if duration == 0 && name != self.root_name {
            return Err(GraphError::ZeroDuration(name.to_string()));
        }
        if duration < 0 {
            return Err(GraphError::NegativeDuration(name.to_string()));
        }

        if let Some(parents) = parents {
            for parent in parents {
                if parent != name && !self.nodes.contains_key(parent) {
                    return Err(GraphError::MissingParent(parent.clone()));
                }
            }
            if parents.contains(name) {
                return Err(GraphError::SelfReference(name.to_string()));
            }
        }

        if let Some(children) = children {
            for child in children {
                if child != name && !self.nodes.contains_key(child) {
                    return Err(GraphError::MissingChild(child.clone()));
                }
            }
            if children.contains(name) {
                return Err(GraphError::SelfReference(name.to_string()));
            }
            if children.contains(&self.root_name) {
                return Err(GraphError::RootReference);
            }
        }

        if let (Some(parents), Some(children)) = (parents, children) {
            self.detect_cycle(parents, children)?;
        }

        Ok(())
    }

    /// Depth-first walk from every proposed child along existing child
    /// edges. Reaching a proposed parent means that parent sits below a
    /// proposed child, so wiring both edges would close a cycle.
    ///
    /// Only called when both edge sets are declared: with one side empty
    /// this operation cannot complete a cycle on its own.
    fn detect_cycle(
        &self,
        parents: &BTreeSet<String>,
        children: &BTreeSet<String>,
    ) -> Result<(), GraphError> {
        let mut stack: Vec<&str> = children.iter().map(String::as_str).collect();
        let mut visited: HashSet<&str> = HashSet::new();

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if parents.contains(current) {
                return Err(GraphError::GraphLoop(current.to_string()));
            }
            if let Some(node) = self.nodes.get(current) {
                stack.extend(node.children.iter().map(String::as_str));
            }
        }
        Ok(())
    }
}
