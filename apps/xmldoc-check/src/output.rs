//! Output rendering for findings and check results.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes the
//! full coverage tree per library and a top-level summary.

use crate::key::ElementKind;
use crate::models::CheckResult;
use crate::report::{Finding, Reporter};
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::json;
use serde_json::Value as JsonVal;

/// Marker printed in place of an absent summary.
pub const MISSING_MARKER: &str = "<MISSING>";

pub fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if use_colors("human") {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix() -> String {
    if use_colors("human") {
        "note:".blue().bold().to_string()
    } else {
        "note:".to_string()
    }
}

#[derive(Debug, Serialize)]
/// Outcome of checking one library, as printed.
pub struct LibraryReport {
    pub library: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<CheckResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LibraryReport {
    pub fn failed(&self) -> bool {
        self.error.is_some() || self.result.as_ref().is_some_and(|r| r.has_errors())
    }

    pub fn error_count(&self) -> usize {
        self.result.as_ref().map(|r| r.error_count()).unwrap_or(0)
    }
}

/// Streams one line per finding to stdout.
pub struct ConsoleReporter {
    color: bool,
}

impl ConsoleReporter {
    pub fn new(output: &str) -> Self {
        ConsoleReporter {
            color: use_colors(output),
        }
    }
}

/// Render a finding as a single line (no trailing newline).
pub fn format_finding(f: &Finding, color: bool) -> String {
    let indent = match f.kind {
        ElementKind::Namespace => "",
        ElementKind::Type => "  ",
        _ => "    ",
    };
    let text = f.summary.as_deref().unwrap_or(MISSING_MARKER);
    if !color {
        let icon = if f.is_missing() { "✖" } else { "◆" };
        return format!("{}{} {}: {}, XML: {}", indent, icon, f.kind.label(), f.qualified_name, text);
    }
    if f.is_missing() {
        format!(
            "{}{} {}: {}, XML: {}",
            indent,
            "✖".red(),
            f.kind.label().red().bold(),
            f.qualified_name.bold(),
            text.red()
        )
    } else {
        format!(
            "{}{} {}: {}, XML: {}",
            indent,
            "◆".blue(),
            f.kind.label().blue().bold(),
            f.qualified_name,
            text.bright_black()
        )
    }
}

impl Reporter for ConsoleReporter {
    fn finding(&mut self, finding: Finding) {
        println!("{}", format_finding(&finding, self.color));
    }
}

/// Print per-library results in the requested format.
pub fn print_reports(reports: &[LibraryReport], output: &str) {
    match output {
        "json" => match serde_json::to_string_pretty(&compose_report_json(reports)) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("{} {}", error_prefix(), e),
        },
        _ => {
            let color = use_colors(output);
            for r in reports {
                println!("{}", format_report_line(r, color));
            }
            let summary = format!(
                "— Summary — libraries={} failed={} errors={}",
                reports.len(),
                reports.iter().filter(|r| r.failed()).count(),
                reports.iter().map(LibraryReport::error_count).sum::<usize>()
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

fn format_report_line(r: &LibraryReport, color: bool) -> String {
    match (&r.result, &r.error) {
        (_, Some(err)) => {
            if color {
                format!("{} {} ❲{}❳ — {}", "✖".red(), "⟦fatal⟧".red().bold(), r.library.bold(), err)
            } else {
                format!("✖ ⟦fatal⟧ ❲{}❳ — {}", r.library, err)
            }
        }
        (Some(res), None) if res.has_errors() => {
            let msg = format!(
                "{} ({}): check completed with {} errors",
                res.assembly_name,
                res.namespaces.len(),
                res.error_count()
            );
            if color {
                format!("{} {} ❲{}❳ — {}", "✖".red(), "⟦error⟧".red().bold(), r.library.bold(), msg)
            } else {
                format!("✖ ⟦error⟧ ❲{}❳ — {}", r.library, msg)
            }
        }
        (Some(res), None) => {
            let msg = format!("{}: check completed successfully", res.assembly_name);
            if color {
                format!("{} {} ❲{}❳ — {}", "✔".green(), "⟦ok⟧".green().bold(), r.library.bold(), msg)
            } else {
                format!("✔ ⟦ok⟧ ❲{}❳ — {}", r.library, msg)
            }
        }
        (None, None) => format!("◆ ❲{}❳ — not checked", r.library),
    }
}

/// Compose the JSON document (pure) for testing/snapshot purposes.
pub fn compose_report_json(reports: &[LibraryReport]) -> JsonVal {
    let summary = json!({
        "libraries": reports.len(),
        "failed": reports.iter().filter(|r| r.failed()).count(),
        "errors": reports.iter().map(LibraryReport::error_count).sum::<usize>(),
    });
    json!({"results": reports, "summary": summary})
}
