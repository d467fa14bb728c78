//! Output formatting for CLI commands

use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
    verbose: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Prints a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "message": message
                    })
                );
            }
        }
    }

    /// Prints structured data: pretty in text mode, compact in JSON mode
    pub fn data<T: Serialize>(&self, data: &T) {
        let json = match self.format {
            OutputFormat::Text => serde_json::to_string_pretty(data),
            OutputFormat::Json => serde_json::to_string(data),
        };
        if let Ok(json) = json {
            println!("{}", json);
        }
    }

    /// Prints a table row (text only, ignored in JSON mode)
    pub fn row(&self, columns: &[&str]) {
        if self.format == OutputFormat::Text {
            println!("{}", columns.join("\t"));
        }
    }

    /// Prints a blank line (text only)
    pub fn blank(&self) {
        if self.format == OutputFormat::Text {
            println!();
        }
    }

    /// Prints a debug note (only when --verbose is set)
    pub fn note(&self, message: &str) {
        if self.verbose {
            eprintln!("[gantt] {}", message);
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_format_is_text() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }

    #[test]
    fn json_detection() {
        assert!(Output::new(OutputFormat::Json, false).is_json());
        assert!(!Output::new(OutputFormat::Text, false).is_json());
    }
}
