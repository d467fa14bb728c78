//! Chart definition files
//!
//! A chart is described in TOML: one `[chart]` section and any number
//! of `[[task]]` sections, applied in file order. Tasks reference each
//! other by name; a task without `parents` hangs off the synthetic
//! root. Nothing is ever written back — the file is the single source
//! of truth and every run derives the schedule from scratch.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::chart::{parse_date, Chart, ChartError};
use crate::domain::{Color, NodeSpec};

/// Top-level chart definition file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartFile {
    pub chart: ChartSection,

    #[serde(default, rename = "task")]
    pub tasks: Vec<TaskSection>,
}

/// The `[chart]` header.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartSection {
    /// Chart title.
    pub name: String,

    /// Project start date, `YYYY-MM-DD`.
    pub start: String,

    /// Default color for tasks that declare none, 1-10.
    pub color: Option<u8>,
}

/// One `[[task]]` entry.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskSection {
    pub name: String,

    /// Duration in whole days.
    pub duration: i64,

    /// Parent task names; omitted means the task hangs off the root.
    pub parents: Option<Vec<String>>,

    /// Child task names, for forward edges to tasks defined earlier.
    pub children: Option<Vec<String>>,

    /// Color 1-10.
    pub color: Option<u8>,

    /// Requested start date, `YYYY-MM-DD`.
    pub start: Option<String>,
}

/// Reads and applies a chart definition, returning the built chart.
pub fn load_chart(path: &Path) -> Result<Chart> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read chart file '{}'", path.display()))?;
    let file: ChartFile = toml::from_str(&text)
        .with_context(|| format!("cannot parse chart file '{}'", path.display()))?;
    build_chart(file).with_context(|| format!("invalid chart in '{}'", path.display()))
}

/// Builds a chart from a parsed definition, inserting tasks in file
/// order.
pub fn build_chart(file: ChartFile) -> Result<Chart, ChartError> {
    let start = parse_date(&file.chart.start)?;
    let mut chart = Chart::new(&file.chart.name, start)?;

    if let Some(value) = file.chart.color {
        let color = Color::new(value).ok_or(ChartError::InvalidColor(value))?;
        chart.graph_mut().set_default_color(color);
    }

    for task in file.tasks {
        let mut spec = NodeSpec::new(task.name, task.duration);
        spec.parents = task.parents.map(|p| p.into_iter().collect());
        spec.children = task.children.map(|c| c.into_iter().collect());
        if let Some(value) = task.color {
            spec.color = Some(Color::new(value).ok_or(ChartError::InvalidColor(value))?);
        }
        if let Some(date) = task.start {
            spec.start = Some(parse_date(&date)?);
        }
        chart.add_task(spec)?;
    }

    Ok(chart)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> ChartFile {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn minimal_chart_parses() {
        let file = parse(
            r#"
            [chart]
            name = "Release"
            start = "2026-01-01"
            "#,
        );
        assert_eq!(file.chart.name, "Release");
        assert!(file.tasks.is_empty());
    }

    #[test]
    fn tasks_parse_in_order() {
        let file = parse(
            r#"
            [chart]
            name = "Release"
            start = "2026-01-01"

            [[task]]
            name = "Design"
            duration = 5
            color = 2

            [[task]]
            name = "Build"
            duration = 10
            parents = ["Design"]
            "#,
        );
        assert_eq!(file.tasks.len(), 2);
        assert_eq!(file.tasks[0].name, "Design");
        assert_eq!(file.tasks[1].parents, Some(vec!["Design".to_string()]));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<ChartFile, _> = toml::from_str(
            r#"
            [chart]
            name = "Release"
            start = "2026-01-01"
            typo_field = true
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn build_chart_wires_dependencies() {
        let file = parse(
            r#"
            [chart]
            name = "Release"
            start = "2026-01-01"
            color = 3

            [[task]]
            name = "Design"
            duration = 5

            [[task]]
            name = "Build"
            duration = 10
            parents = ["Design"]
            "#,
        );
        let chart = build_chart(file).unwrap();
        assert_eq!(chart.graph().node_count(), 3);
        assert!(chart.graph().get("Build").unwrap().has_parent("Design"));
        assert_eq!(chart.graph().get("Design").unwrap().color.value(), 3);
    }

    #[test]
    fn build_chart_rejects_bad_color() {
        let file = parse(
            r#"
            [chart]
            name = "Release"
            start = "2026-01-01"

            [[task]]
            name = "Design"
            duration = 5
            color = 11
            "#,
        );
        assert_eq!(build_chart(file).unwrap_err(), ChartError::InvalidColor(11));
    }

    #[test]
    fn build_chart_rejects_bad_date() {
        let file = parse(
            r#"
            [chart]
            name = "Release"
            start = "january"
            "#,
        );
        assert!(matches!(
            build_chart(file).unwrap_err(),
            ChartError::InvalidDate(_)
        ));
    }

    #[test]
    fn build_chart_rejects_unknown_parent() {
        let file = parse(
            r#"
            [chart]
            name = "Release"
            start = "2026-01-01"

            [[task]]
            name = "Build"
            duration = 10
            parents = ["Ghost"]
            "#,
        );
        assert!(matches!(
            build_chart(file).unwrap_err(),
            ChartError::Graph { .. }
        ));
    }
}
