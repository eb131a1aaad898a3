//! Console output for a generation run.
//!
//! # Output Format
//!
//! ```text
//! CSV Blog Generator for Hugo
//!     CSV File: titles.csv
//!     Hugo Blog Path: content/posts
//!     Interval between posts: 30 seconds
//!
//! ============================================================
//! 001/002 Top 5 Web Trends
//! ============================================================
//!     ✓ top-5-web-trends-20240305-140709 (1 placeholder)
//!     Waiting 30 seconds before next post...
//!
//! ============================================================
//! 002/002 Why Rust
//! ============================================================
//!     ✗ failed after idea generated: Plan generation failed: ...
//!
//! ============================================================
//! Processing complete
//!     Successful: 1 | Failed: 1
//!     Blog posts saved to: content/posts
//! ============================================================
//! ```
//!
//! # Architecture
//!
//! Each kind of output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects. Log lines go through `tracing` on stderr
//! and never through this module.

use crate::pipeline::{PipelineEvent, RunSummary, TitleOutcome};
use std::path::Path;

const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Format a 1-based position as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

/// Format the banner printed before any title is processed.
pub fn format_run_header(csv_path: &Path, output_root: &Path, interval_seconds: u64) -> Vec<String> {
    vec![
        "CSV Blog Generator for Hugo".to_string(),
        format!("    CSV File: {}", csv_path.display()),
        format!("    Hugo Blog Path: {}", output_root.display()),
        format!("    Interval between posts: {} seconds", interval_seconds),
    ]
}

pub fn print_run_header(csv_path: &Path, output_root: &Path, interval_seconds: u64) {
    for line in format_run_header(csv_path, output_root, interval_seconds) {
        println!("{}", line);
    }
}

/// Format one progress event.
pub fn format_pipeline_event(event: &PipelineEvent) -> Vec<String> {
    match event {
        PipelineEvent::TitleStarted {
            index,
            total,
            title,
        } => vec![
            String::new(),
            rule(),
            format!("{}/{} {}", format_index(*index), format_index(*total), title),
            rule(),
        ],
        PipelineEvent::TitleSucceeded {
            bundle,
            placeholders,
            ..
        } => {
            let name = bundle
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| bundle.display().to_string());
            let detail = if *placeholders == 0 {
                String::new()
            } else {
                format!(" ({})", plural(*placeholders, "placeholder"))
            };
            vec![format!("    \u{2713} {}{}", name, detail)]
        }
        PipelineEvent::TitleFailed { stage, error, .. } => {
            vec![format!("    \u{2717} failed after {}: {}", stage, error)]
        }
        PipelineEvent::Waiting { seconds } => {
            vec![format!("    Waiting {} seconds before next post...", seconds)]
        }
    }
}

pub fn print_pipeline_event(event: &PipelineEvent) {
    for line in format_pipeline_event(event) {
        println!("{}", line);
    }
}

/// Format the closing summary: counts, then one line per failed title.
pub fn format_summary(summary: &RunSummary, output_root: &Path) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        rule(),
        "Processing complete".to_string(),
        format!(
            "    Successful: {} | Failed: {}",
            summary.successful(),
            summary.failed()
        ),
    ];
    for outcome in &summary.outcomes {
        if let TitleOutcome::Failed { title, stage, .. } = outcome {
            lines.push(format!("        {} (after {})", title, stage));
        }
    }
    lines.push(format!("    Blog posts saved to: {}", output_root.display()));
    lines.push(rule());
    lines
}

pub fn print_summary(summary: &RunSummary, output_root: &Path) {
    for line in format_summary(summary, output_root) {
        println!("{}", line);
    }
}
