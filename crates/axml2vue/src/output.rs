//! Output formatting for progress, diagnostics and the run summary.

use crate::cli::OutputFormat;
use crate::orchestrator::ConvertSummary;
use convert_diagnostics::{Diagnostic, Severity};
use serde::Serialize;
use source_text::LineIndex;
use std::path::Path;

/// What happened to one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEvent {
    /// Converted to a new form.
    Converted,
    /// Copied unchanged.
    Copied,
}

impl FileEvent {
    fn as_str(&self) -> &'static str {
        match self {
            FileEvent::Converted => "converted",
            FileEvent::Copied => "copied",
        }
    }
}

/// The JSON summary record.
#[derive(Serialize)]
struct SummaryEvent<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    summary: &'a ConvertSummary,
}

/// Formatter for run output.
pub struct OutputFormatter {
    format: OutputFormat,
    verbose: bool,
}

impl OutputFormatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Report a converted or copied file. Only shown when verbose.
    pub fn print_file_event(&self, event: FileEvent, source: &Path, target: &Path) {
        if !self.verbose {
            return;
        }
        match self.format {
            OutputFormat::Human | OutputFormat::HumanVerbose => {
                let label = match event {
                    FileEvent::Converted => "\x1b[32mconverted\x1b[0m",
                    FileEvent::Copied => "\x1b[2mcopied\x1b[0m",
                };
                println!("{} {} -> {}", label, source.display(), target.display());
            }
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "type": event.as_str(),
                    "file": source.to_string_lossy(),
                    "output": target.to_string_lossy(),
                });
                println!("{}", json);
            }
            OutputFormat::Machine => {
                println!("{}:{}", source.display(), event.as_str());
            }
        }
    }

    /// Report a file whose pipeline failed.
    pub fn print_failure(&self, file: &Path, error: &miette::Report) {
        match self.format {
            OutputFormat::Human | OutputFormat::HumanVerbose => {
                eprintln!("\x1b[31mfailed\x1b[0m {}", file.display());
                eprintln!("{:?}", error);
            }
            OutputFormat::Json => {
                let causes: Vec<String> = error.chain().map(|cause| cause.to_string()).collect();
                let json = serde_json::json!({
                    "type": "failed",
                    "file": file.to_string_lossy(),
                    "message": error.to_string(),
                    "causes": causes,
                });
                println!("{}", json);
            }
            OutputFormat::Machine => {
                println!(
                    "{}:failed:{}",
                    file.display(),
                    error.to_string().replace(':', "\\:")
                );
            }
        }
    }

    /// Print conversion diagnostics for one file.
    pub fn print_diagnostics(&self, file: &Path, source: &str, diagnostics: &[Diagnostic]) {
        if diagnostics.is_empty() {
            return;
        }
        let index = LineIndex::new(source);
        for diagnostic in diagnostics {
            let (line, col) = index.line_col(diagnostic.span.start).to_display();
            match self.format {
                OutputFormat::Human | OutputFormat::HumanVerbose => {
                    self.print_human(file, line, col, diagnostic);
                }
                OutputFormat::Json => self.print_json(file, line, col, diagnostic),
                OutputFormat::Machine => {
                    println!(
                        "{}:{}:{}:{}:{}:{}",
                        file.display(),
                        line,
                        col,
                        diagnostic.severity.as_str(),
                        diagnostic.code.as_str(),
                        diagnostic.message.replace(':', "\\:")
                    );
                }
            }
        }
    }

    /// Print the summary.
    pub fn print_summary(&self, summary: &ConvertSummary) {
        match self.format {
            OutputFormat::Human | OutputFormat::HumanVerbose => {
                self.print_summary_human(summary);
            }
            OutputFormat::Json => {
                let event = SummaryEvent {
                    kind: "summary",
                    summary,
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    println!("{}", json);
                }
            }
            OutputFormat::Machine => {
                println!(
                    "summary:{}:{}:{}:{}:{}",
                    summary.converted,
                    summary.copied,
                    summary.failed,
                    summary.warnings,
                    summary.duration_ms
                );
            }
        }
    }

    // Human format

    fn print_human(&self, file: &Path, line: u32, col: u32, diagnostic: &Diagnostic) {
        let severity_str = match diagnostic.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Hint => "\x1b[34mhint\x1b[0m",
        };

        println!(
            "{}:{}:{}: {} [{}]: {}",
            file.display(),
            line,
            col,
            severity_str,
            diagnostic.code,
            diagnostic.message
        );
    }

    fn print_summary_human(&self, summary: &ConvertSummary) {
        println!();
        let mark = if summary.failed == 0 {
            "\x1b[32m✓\x1b[0m"
        } else {
            "\x1b[31m✗\x1b[0m"
        };
        println!(
            "{} Converted {} file{}, copied {} ({}ms)",
            mark,
            summary.converted,
            if summary.converted == 1 { "" } else { "s" },
            summary.copied,
            summary.duration_ms
        );
        if summary.failed > 0 {
            println!(
                "\x1b[31m✗\x1b[0m {} file{} failed",
                summary.failed,
                if summary.failed == 1 { "" } else { "s" }
            );
        }
        if summary.warnings > 0 {
            println!(
                "\x1b[33m⚠\x1b[0m {} warning{}",
                summary.warnings,
                if summary.warnings == 1 { "" } else { "s" }
            );
        }
    }

    // JSON format

    fn print_json(&self, file: &Path, line: u32, col: u32, diagnostic: &Diagnostic) {
        let json = serde_json::json!({
            "type": "diagnostic",
            "file": file.to_string_lossy(),
            "severity": diagnostic.severity.as_str(),
            "code": diagnostic.code.as_str(),
            "message": diagnostic.message,
            "line": line,
            "column": col,
            "span": {
                "start": diagnostic.span.start,
                "end": diagnostic.span.end
            }
        });
        println!("{}", json);
    }
}
