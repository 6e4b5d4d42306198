//! Output formatting for analysis results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output, one block per function
//! - JSON: structured output for programmatic consumption

use std::io::{self, Write};

use colored::*;
use serde::{Deserialize, Serialize};

use crate::analysis::{FunctionRecord, WalkSummary};

const SEPARATOR: &str = "----------------------------------------";

/// What to include per function.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Print a one-line summary of each top-level body statement.
    pub statements: bool,
}

// =============================================================================
// JSON Format
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    pub files_analyzed: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<JsonSkipped>,
    pub functions: Vec<JsonFunction>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonSkipped {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonFunction {
    pub key: String,
    pub name: String,
    pub doc: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub receiver: String,
    pub signature: String,
    pub line: usize,
    pub variables: Vec<JsonVariable>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub statements: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonVariable {
    pub name: String,
    #[serde(rename = "type")]
    pub descriptor: String,
}

/// Build the JSON report structure for a walk.
pub fn build_json_report(path: &str, summary: &WalkSummary, options: ReportOptions) -> JsonReport {
    let functions = summary
        .table
        .iter()
        .map(|(key, record)| function_to_json(key, record, options))
        .collect();

    let skipped = summary
        .skipped
        .iter()
        .map(|s| JsonSkipped {
            path: s.path.to_string_lossy().to_string(),
            reason: s.reason.clone(),
        })
        .collect();

    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: path.to_string(),
        files_analyzed: summary.files_analyzed,
        skipped,
        functions,
    }
}

fn function_to_json(key: &str, record: &FunctionRecord, options: ReportOptions) -> JsonFunction {
    JsonFunction {
        key: key.to_string(),
        name: record.name.clone(),
        doc: record.doc.clone(),
        receiver: record.receiver.clone(),
        signature: record.signature.to_string(),
        line: record.span.start_line,
        variables: record
            .variables
            .iter()
            .map(|v| JsonVariable {
                name: v.name.clone(),
                descriptor: v.descriptor.clone(),
            })
            .collect(),
        statements: body_statements(record, options),
    }
}

/// Write results in JSON format to stdout.
pub fn write_json(path: &str, summary: &WalkSummary, options: ReportOptions) -> anyhow::Result<()> {
    let report = build_json_report(path, summary, options);
    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format to stdout.
pub fn write_pretty(summary: &WalkSummary, options: ReportOptions) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_pretty(&mut out, summary, options)
}

/// Render the pretty report into any writer.
pub fn render_pretty<W: Write>(
    out: &mut W,
    summary: &WalkSummary,
    options: ReportOptions,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "========== Analysis Results ==========".bold())?;

    for (key, record) in &summary.table {
        writeln!(out)?;
        writeln!(out, "{} {}", "Function:".dimmed(), key.cyan().bold())?;
        writeln!(out, "{} {}", "Documentation:".dimmed(), record.doc.trim_end())?;
        if record.is_method() {
            writeln!(out, "{} {}", "Receiver:".dimmed(), record.receiver)?;
        }
        writeln!(out, "{} {}", "Signature:".dimmed(), record.signature)?;

        writeln!(out, "{}", "Variables:".dimmed())?;
        for variable in &record.variables {
            writeln!(out, "  - Name: {}, Type: {}", variable.name, variable.descriptor)?;
        }

        if options.statements {
            let statements = body_statements(record, options);
            if !statements.is_empty() {
                writeln!(out, "{}", "Body:".dimmed())?;
                for statement in statements {
                    writeln!(out, "  {}", statement)?;
                }
            }
        }
        writeln!(out, "{}", SEPARATOR)?;
    }

    writeln!(out)?;
    let mut footer = format!(
        "{} functions in {} files",
        summary.table.len(),
        summary.files_analyzed
    );
    if !summary.skipped.is_empty() {
        footer.push_str(&format!(", {} skipped", summary.skipped.len()));
    }
    writeln!(out, "{}", footer.dimmed())?;
    for skipped in &summary.skipped {
        writeln!(out, "  {} {}", "✗".red(), skipped.reason)?;
    }
    Ok(())
}

fn body_statements(record: &FunctionRecord, options: ReportOptions) -> Vec<String> {
    if !options.statements {
        return Vec::new();
    }
    record
        .body
        .as_ref()
        .map(|b| b.describe_statements())
        .unwrap_or_default()
}
