//! Gantt CLI - schedule derivation for dependency-driven project plans
//!
//! A chart is a bounded acyclic graph of tasks anchored by a synthetic
//! root. The graph engine keeps names unique, edges bidirectional, and
//! cycles out; the schedule builder turns the graph into concrete
//! start/end dates by propagating parent completion through join
//! points.

pub mod chart;
pub mod cli;
pub mod domain;

pub use chart::{Chart, ChartError};
pub use domain::{Color, GraphError, Node, NodePatch, NodeSpec, Schedule, ScheduleEntry, TaskGraph};
