//! Terminal output.
//!
//! Data goes to stdout as one JSON document per line so it can be piped into
//! `jq`. Progress and status lines go to stderr.

use anyhow::Result;
use archivematica::CloseCompletedReport;
use colored::Colorize;
use serde::Serialize;

pub fn success(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

pub fn failure(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn note(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

/// A labeled value on stdout, e.g. the UUID a command produced.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// One JSON document on a single line.
pub fn line<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

/// One JSON document, indented when `pretty` is set.
pub fn value<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    if pretty {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    } else {
        line(value)
    }
}

/// Summary of a close-completed run.
pub fn close_report(report: &CloseCompletedReport) {
    for uuid in &report.close_succeeded {
        success(&format!("Closed {}", uuid));
    }
    for uuid in &report.close_failed {
        failure(&format!("Could not close {}", uuid));
    }
    field("Completed", &report.completed.len().to_string());
    field("Closed", &report.close_succeeded.len().to_string());
    field("Failed", &report.close_failed.len().to_string());
}
