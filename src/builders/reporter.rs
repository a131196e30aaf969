use anyhow::{Context, Result};
use colored::Colorize;

use crate::core::engine::RunSummary;

pub trait StatusReporter {
    fn render(&self, summary: &RunSummary) -> Result<String>;

    fn report(&self, summary: &RunSummary) -> Result<()> {
        println!("{}", self.render(summary)?);
        Ok(())
    }
}

/// Human-readable run report with icons and colors.
pub struct ConsoleReporter {
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl StatusReporter for ConsoleReporter {
    fn render(&self, summary: &RunSummary) -> Result<String> {
        let mut lines = Vec::new();

        let title = if summary.dry_run {
            "🧹 Copyright Strip Report (dry run)"
        } else {
            "🧹 Copyright Strip Report"
        };
        lines.push(title.cyan().bold().to_string());
        lines.push("==========================".to_string());

        for root in &summary.skipped_roots {
            lines.push(format!("🔴 {} (not a directory, skipped)", root.display()));
        }

        if self.verbose {
            for file in &summary.stripped {
                lines.push(format!(
                    "🟢 {} ({} bytes removed)",
                    file.path.display(),
                    file.removed_bytes
                ));
            }
        }

        for failure in &summary.failures {
            lines.push(format!("{} {}", "❌".red(), failure.error.red()));
        }

        for root in &summary.abandoned_roots {
            lines.push(format!("⚠️  Abandoned the rest of {}", root.display()));
        }

        let verb = if summary.dry_run { "Would strip" } else { "Stripped" };
        lines.push(String::new());
        lines.push("📈 Summary:".bold().to_string());
        lines.push(format!("  Roots scanned: {}", summary.roots_scanned.len()));
        lines.push(format!("  Files visited: {}", summary.files_visited));
        lines.push(format!(
            "  {verb}: {} ({} bytes)",
            summary.stripped.len().to_string().bright_green(),
            summary.removed_bytes()
        ));
        lines.push(format!("  Unchanged: {}", summary.unchanged));
        lines.push(format!("  Ignored: {}", summary.ignored));
        lines.push(format!("  Failures: {}", summary.failures.len()));

        if summary.aborted {
            lines.push(format!(
                "\n{}",
                "Run aborted at the first failure (--on-error abort)".red().bold()
            ));
        } else if !self.verbose && !summary.stripped.is_empty() {
            lines.push("\nRun with --verbose to list every stripped file".to_string());
        }

        Ok(lines.join("\n"))
    }
}

/// Machine-readable run report.
pub struct JsonReporter;

impl StatusReporter for JsonReporter {
    fn render(&self, summary: &RunSummary) -> Result<String> {
        serde_json::to_string_pretty(summary).context("Failed to serialize run summary")
    }
}
