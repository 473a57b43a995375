//! Output formatting for suite results

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use smoke_common::{TestResult, TestSuiteResult};

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

impl TableDisplay for TestResult {
    fn headers() -> Vec<&'static str> {
        vec!["Test", "Result", "Duration", "Failure"]
    }

    fn row(&self) -> Vec<String> {
        let failure = match (&self.error_kind, &self.error) {
            (Some(kind), Some(error)) => format!("[{}] {}", kind, error),
            (None, Some(error)) => error.clone(),
            _ => String::new(),
        };

        vec![
            self.name.clone(),
            if self.success { "✓" } else { "✗" }.to_string(),
            format!("{}ms", self.duration_ms),
            failure,
        ]
    }
}

/// Print a suite result
pub fn print_suite(suite: &TestSuiteResult, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic);

            table.set_header(TestResult::headers());
            for result in &suite.results {
                table.add_row(result.row());
            }

            println!("{table}");

            let line = format!(
                "{} passed, {} failed, {} skipped ({} ms)",
                suite.passed, suite.failed, suite.skipped, suite.duration_ms
            );
            if suite.success() {
                print_success(&line);
            } else {
                print_error(&line);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(suite).unwrap_or_default());
        }
    }
}

/// Print success message
pub fn print_success(message: &str) {
    println!("✅ {}", message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("❌ {}", message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use smoke_common::ErrorKind;

    #[test]
    fn test_row_shows_failure_kind() {
        let result = TestResult {
            name: "api::get_root_endpoint".into(),
            success: false,
            duration_ms: 12,
            error: Some("Assertion failed: Response should not be empty".into()),
            error_kind: Some(ErrorKind::Assertion),
        };

        let row = result.row();
        assert_eq!(row[1], "✗");
        assert_eq!(row[2], "12ms");
        assert_eq!(row[3], "[assertion] Assertion failed: Response should not be empty");
    }
}
