//! Domain models for Gantt CLI
//!
//! Contains the graph, scheduling, and matching logic without any I/O
//! concerns.

mod graph;
mod matcher;
mod node;
mod schedule;

pub use graph::{GraphError, TaskGraph, MAX_NODES};
pub use matcher::{is_match, relevance};
pub use node::{Color, Node, NodePatch, NodeSpec};
pub use schedule::{build_schedule, build_schedule_from, Schedule, ScheduleEntry, Snapshot};
