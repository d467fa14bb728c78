//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use super::chart_file::load_chart;
use super::output::{Output, OutputFormat};
use crate::chart::Chart;
use crate::domain::{relevance, ScheduleEntry};

#[derive(Parser)]
#[command(name = "gantt")]
#[command(author, version, about = "Derive Gantt schedules from dependency-driven chart files")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Derive and print the schedule for a chart file
    Render {
        /// Path to the chart definition (TOML)
        file: PathBuf,

        /// Render only the subtree under this task
        #[arg(long)]
        from: Option<String>,
    },

    /// Validate a chart file and report its size
    Check {
        /// Path to the chart definition (TOML)
        file: PathBuf,
    },

    /// Find tasks whose names contain a pattern
    Search {
        /// Path to the chart definition (TOML)
        file: PathBuf,

        /// Case-insensitive substring to look for
        pattern: String,
    },
}

/// Parses arguments and executes the appropriate command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    match cli.command {
        Commands::Render { file, from } => render(&output, &file, from.as_deref())?,
        Commands::Check { file } => check(&output, &file)?,
        Commands::Search { file, pattern } => search(&output, &file, &pattern)?,
    }

    Ok(())
}

fn render(output: &Output, file: &Path, from: Option<&str>) -> Result<()> {
    let chart = load_chart(file)?;
    output.note(&format!(
        "loaded '{}' with {} tasks",
        chart.graph().name(),
        chart.graph().node_count() - 1
    ));

    let schedule = match from {
        Some(task) => chart.schedule_from(task)?,
        None => chart.schedule(),
    };

    // The synthetic root is bookkeeping, not a task bar.
    let bars: Vec<&ScheduleEntry> = schedule
        .iter()
        .filter(|entry| entry.name != chart.graph().root_name())
        .collect();

    if output.is_json() {
        output.data(&bars);
        return Ok(());
    }

    output.row(&["TASK", "START", "END", "COLOR", "NOTE"]);
    for entry in bars {
        let start = entry.start.to_string();
        let end = entry.end.to_string();
        let color = entry.color.value().to_string();
        let note = match entry.overlapping_start {
            Some(requested) => format!("requested {} not feasible", requested),
            None => String::new(),
        };
        output.row(&[&entry.name, &start, &end, &color, &note]);
    }
    Ok(())
}

fn check(output: &Output, file: &Path) -> Result<()> {
    let chart = load_chart(file)?;
    let tasks = chart.graph().node_count() - 1;

    if output.is_json() {
        output.data(&serde_json::json!({
            "chart": chart.graph().name(),
            "tasks": tasks,
            "remaining_capacity": chart.graph().remaining_capacity(),
            "start": chart.graph().start_date(),
        }));
    } else {
        output.success(&format!(
            "Chart '{}' is valid: {} tasks, starts {}, capacity for {} more",
            chart.graph().name(),
            tasks,
            chart.graph().start_date(),
            chart.graph().remaining_capacity(),
        ));
    }
    Ok(())
}

fn search(output: &Output, file: &Path, pattern: &str) -> Result<()> {
    let chart = load_chart(file)?;
    let hits = search_hits(&chart, pattern);
    output.note(&format!(
        "{} of {} tasks match",
        hits.len(),
        chart.graph().node_count() - 1
    ));

    if output.is_json() {
        let items: Vec<_> = hits
            .iter()
            .map(|(name, score)| {
                serde_json::json!({
                    "name": name,
                    "relevance": score,
                })
            })
            .collect();
        output.data(&items);
        return Ok(());
    }

    if hits.is_empty() {
        output.success(&format!("No tasks match '{}'", pattern));
        return Ok(());
    }
    for (name, _) in hits {
        output.row(&[&name]);
    }
    Ok(())
}

/// Matching task names with their relevance scores, sorted by name.
fn search_hits(chart: &Chart, pattern: &str) -> Vec<(String, usize)> {
    chart
        .search(pattern)
        .into_iter()
        .map(|node| (node.name.clone(), relevance(pattern, &node.name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::NodeSpec;

    #[test]
    fn cli_parses_render_with_from() {
        let cli =
            Cli::try_parse_from(["gantt", "render", "chart.toml", "--from", "Build"]).unwrap();
        match cli.command {
            Commands::Render { file, from } => {
                assert_eq!(file, PathBuf::from("chart.toml"));
                assert_eq!(from.as_deref(), Some("Build"));
            }
            _ => panic!("expected render command"),
        }
    }

    #[test]
    fn cli_parses_global_format_flag() {
        let cli = Cli::try_parse_from(["gantt", "-f", "json", "check", "chart.toml"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn search_hits_carry_scores() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let mut chart = Chart::new("Release", start).unwrap();
        chart.add_task(NodeSpec::new("Development", 5)).unwrap();
        chart.add_task(NodeSpec::new("Design", 3)).unwrap();

        let hits = search_hits(&chart, "dev");
        assert_eq!(hits, vec![("Development".to_string(), 3)]);
    }
}
