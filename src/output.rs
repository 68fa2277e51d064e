//! Report formatters

use crate::finding::{Finding, Report, Severity};
use colored::*;

/// Renders a report for display
pub trait ReportFormatter: Send + Sync {
    fn format(&self, report: &Report) -> String;

    fn format_finding(&self, finding: &Finding) -> String;
}

/// Human-readable text with optional color
pub struct TextFormatter {
    pub colored: bool,

    /// Print the finding counts after the lists
    pub show_summary: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            colored: true,
            show_summary: true,
        }
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn severity_str(&self, severity: Severity) -> ColoredString {
        let s = format!("{}", severity);
        if !self.colored {
            return s.normal();
        }
        match severity {
            Severity::Critical => s.red().bold(),
            Severity::Warning => s.yellow().bold(),
            Severity::Info => s.blue(),
        }
    }

    fn section(&self, output: &mut String, title: &str, findings: &[Finding]) {
        if findings.is_empty() {
            return;
        }
        if self.colored {
            output.push_str(&format!("\n{}\n", title.bold()));
        } else {
            output.push_str(&format!("\n{}\n", title));
        }
        for finding in findings {
            output.push_str("  ");
            output.push_str(&self.format_finding(finding));
            output.push('\n');
        }
    }
}

impl ReportFormatter for TextFormatter {
    fn format(&self, report: &Report) -> String {
        let mut output = String::new();

        let verdict = if report.compatible {
            "Build is compatible"
        } else {
            "Build is NOT compatible"
        };
        if !self.colored {
            output.push_str(verdict);
        } else if report.compatible {
            output.push_str(&verdict.green().bold().to_string());
        } else {
            output.push_str(&verdict.red().bold().to_string());
        }
        output.push('\n');

        self.section(&mut output, "Errors:", &report.errors);
        self.section(&mut output, "Warnings:", &report.warnings);
        self.section(&mut output, "Suggestions:", &report.suggestions);

        if self.show_summary {
            let (errors, warnings, suggestions) = report.count_by_severity();
            output.push_str(&format!(
                "\n{} {}, {} {}, {} {}\n",
                errors,
                if errors == 1 { "error" } else { "errors" },
                warnings,
                if warnings == 1 { "warning" } else { "warnings" },
                suggestions,
                if suggestions == 1 { "suggestion" } else { "suggestions" },
            ));
        }

        output
    }

    fn format_finding(&self, finding: &Finding) -> String {
        format!(
            "{}[{}] {}: {}",
            self.severity_str(finding.severity),
            if self.colored {
                finding.kind.as_str().cyan().to_string()
            } else {
                finding.kind.to_string()
            },
            finding.component_pair,
            finding.message
        )
    }
}

/// Machine-readable JSON in the shape of [`Report`]
#[derive(Default)]
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &Report) -> String {
        if self.pretty {
            serde_json::to_string_pretty(report).unwrap_or_default()
        } else {
            serde_json::to_string(report).unwrap_or_default()
        }
    }

    fn format_finding(&self, finding: &Finding) -> String {
        serde_json::to_string(finding).unwrap_or_default()
    }
}
