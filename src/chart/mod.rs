//! Chart façade
//!
//! Wraps the domain graph with everything user input needs before it
//! may touch the core: name sanitization, date parsing, root-name
//! generation, and error messages that say which operation failed on
//! which task. The CLI talks to [`Chart`], never to the graph directly.

use chrono::{NaiveDate, Utc};
use thiserror::Error;

use crate::domain::{
    build_schedule, build_schedule_from, is_match, GraphError, Node, NodePatch, NodeSpec,
    Schedule, TaskGraph,
};

/// Maximum length of a task or chart name, in characters.
pub const MAX_NAME_LEN: usize = 300;

#[derive(Debug, Error, PartialEq)]
pub enum ChartError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("name exceeds {MAX_NAME_LEN} characters")]
    NameTooLong,

    #[error("name must not contain markup: '{0}'")]
    MarkupRejected(String),

    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("color must be between 1 and 10, got {0}")]
    InvalidColor(u8),

    #[error("failed to {action} '{name}': {source}")]
    Graph {
        action: &'static str,
        name: String,
        #[source]
        source: GraphError,
    },
}

impl ChartError {
    fn graph(action: &'static str, name: &str, source: GraphError) -> Self {
        Self::Graph {
            action,
            name: name.to_string(),
            source,
        }
    }
}

/// Trims and validates a user-supplied name: non-empty, at most
/// [`MAX_NAME_LEN`] characters, no angle-bracket markup.
pub fn sanitize(text: &str) -> Result<String, ChartError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ChartError::EmptyName);
    }
    if text.chars().count() > MAX_NAME_LEN {
        return Err(ChartError::NameTooLong);
    }
    if text.contains('<') || text.contains('>') {
        return Err(ChartError::MarkupRejected(text.to_string()));
    }
    Ok(text.to_string())
}

/// Parses a `YYYY-MM-DD` date string.
pub fn parse_date(value: &str) -> Result<NaiveDate, ChartError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ChartError::InvalidDate(value.to_string()));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ChartError::InvalidDate(value.to_string()))
}

/// Generates the synthetic root's name: `root-{7-char-hash}`, hashed
/// from the chart title and the construction instant. The sanitizer
/// never produces this shape from plain titles, and [`Chart`] holds the
/// name so duplicate detection covers it like any other node.
pub fn generate_root_name(title: &str) -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or(0);
    let hash = blake3::hash(format!("{title}{nanos}").as_bytes());
    format!("root-{}", &hash.to_hex()[..7])
}

/// A project chart: the task graph plus the input hygiene around it.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    graph: TaskGraph,
}

impl Chart {
    /// Creates an empty chart starting on `start_date`.
    pub fn new(title: &str, start_date: NaiveDate) -> Result<Self, ChartError> {
        let title = sanitize(title)?;
        let root_name = generate_root_name(&title);
        Ok(Self {
            graph: TaskGraph::new(title, root_name, start_date),
        })
    }

    /// Adds a task after sanitizing its name.
    pub fn add_task(&mut self, mut spec: NodeSpec) -> Result<(), ChartError> {
        spec.name = sanitize(&spec.name)?;
        let name = spec.name.clone();
        self.graph
            .add_task(spec)
            .map_err(|e| ChartError::graph("add task", &name, e))
    }

    /// Updates a task; a new name in the patch is sanitized first.
    pub fn update_task(&mut self, name: &str, mut patch: NodePatch) -> Result<(), ChartError> {
        if let Some(new_name) = patch.new_name.take() {
            patch.new_name = Some(sanitize(&new_name)?);
        }
        self.graph
            .update_task(name, patch)
            .map_err(|e| ChartError::graph("update task", name, e))
    }

    /// Removes a task.
    pub fn remove_task(&mut self, name: &str) -> Result<(), ChartError> {
        self.graph
            .remove_task(name)
            .map_err(|e| ChartError::graph("remove task", name, e))
    }

    /// Derives the full schedule.
    pub fn schedule(&self) -> Schedule {
        build_schedule(&self.graph.snapshot())
    }

    /// Derives the schedule for the subtree under `start_node`.
    pub fn schedule_from(&self, start_node: &str) -> Result<Schedule, ChartError> {
        if !self.graph.contains(start_node) {
            return Err(ChartError::graph(
                "render from",
                start_node,
                GraphError::MissingEntry(start_node.to_string()),
            ));
        }
        Ok(build_schedule_from(&self.graph.snapshot(), start_node))
    }

    /// Tasks whose names contain `pattern` as a case-insensitive
    /// substring, sorted by name. The synthetic root never matches.
    pub fn search(&self, pattern: &str) -> Vec<&Node> {
        let mut hits: Vec<&Node> = self
            .graph
            .tasks()
            .values()
            .filter(|node| node.name != self.graph.root_name())
            .filter(|node| is_match(pattern, &node.name))
            .collect();
        hits.sort_by(|a, b| a.name.cmp(&b.name));
        hits
    }

    /// The underlying graph, read-only.
    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }

    /// The underlying graph, for direct mutation of chart-level
    /// settings (default color, start date).
    pub fn graph_mut(&mut self) -> &mut TaskGraph {
        &mut self.graph
    }
}
