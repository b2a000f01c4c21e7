//! Console output helpers shared by every command.
//!
//! Findings go to stdout, diagnostics to stderr. Colors are dropped
//! automatically when `NO_COLOR` is set or stdout is not a terminal.

use colored::Colorize;
use std::sync::atomic::{AtomicBool, Ordering};

static TRACE_ENABLED: AtomicBool = AtomicBool::new(false);

/// Turn on trace lines for the rest of the process.
pub fn enable_trace() {
    TRACE_ENABLED.store(true, Ordering::Relaxed);
}

pub fn trace_enabled() -> bool {
    TRACE_ENABLED.load(Ordering::Relaxed)
        || std::env::var("RECORDKIT_TRACE").ok().as_deref() == Some("1")
}

pub fn trace(message: &str) {
    if trace_enabled() {
        eprintln!("{} {}", "recordkit: trace".dimmed(), message);
    }
}

pub fn success(message: &str) {
    println!("{} {}", "✓".bright_green(), message);
}

pub fn heading(message: &str) {
    println!("{}", message.bright_white().bold());
}

pub fn finding(message: &str) {
    println!("  {} {}", "-".bright_red(), message);
}

/// Non-fatal diagnostic, e.g. a record file that could not be read.
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".bright_yellow(), message);
}

pub fn failure(message: &str) {
    eprintln!("{} {}", "✗".bright_red().bold(), message);
}

/// Collapse newlines/extra whitespace and bound length for terminal display.
pub fn compact_line(input: &str, max_chars: usize) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    let preview: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", preview)
    } else {
        preview
    }
}

/// Render up to `max_items` messages on one line.
pub fn preview_messages(messages: &[String], max_items: usize, max_chars: usize) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let shown = messages
        .iter()
        .take(max_items)
        .map(|m| compact_line(m, max_chars))
        .collect::<Vec<_>>()
        .join(" | ");
    if messages.len() > max_items {
        format!("{} (+{} more)", shown, messages.len() - max_items)
    } else {
        shown
    }
}
