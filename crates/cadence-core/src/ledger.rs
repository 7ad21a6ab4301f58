//! Reads of the persisted run state (`.cadence/state.md`). The ledger is
//! written by the calling assistant after each invocation; the runner only
//! ever reads it, and most fields have defined defaults when absent.

use crate::error::{CadenceError, Result};
use crate::paths;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

pub const UNKNOWN: &str = "(unknown)";

static SPEC_GAPS_RE: OnceLock<Regex> = OnceLock::new();
static NEXT_COMMAND_RE: OnceLock<Regex> = OnceLock::new();
static COMPLETED_LINE_RE: OnceLock<Regex> = OnceLock::new();
static NEXT_LINE_RE: OnceLock<Regex> = OnceLock::new();

fn spec_gaps_re() -> &'static Regex {
    SPEC_GAPS_RE.get_or_init(|| Regex::new(r"(\d+)\s+spec gaps").unwrap())
}

fn next_command_re() -> &'static Regex {
    NEXT_COMMAND_RE.get_or_init(|| Regex::new(r"(?m)^next:\s*/(\S+)(?:[ \t]+(\S+))?").unwrap())
}

fn completed_line_re() -> &'static Regex {
    COMPLETED_LINE_RE.get_or_init(|| Regex::new(r"(?m)^completed:\s*(.+)$").unwrap())
}

fn next_line_re() -> &'static Regex {
    NEXT_LINE_RE.get_or_init(|| Regex::new(r"(?m)^next:\s*(.+)$").unwrap())
}

/// Raw ledger text; the `{{state}}` placeholder.
pub fn load_state(root: &Path) -> Result<String> {
    crate::io::read_artifact(&paths::state_path(root))
}

/// The integer before "spec gaps" in the progress line. Zero when the ledger
/// is absent or carries no such phrase.
pub fn spec_gap_count(root: &Path) -> u32 {
    let Ok(text) = load_state(root) else {
        return 0;
    };
    spec_gaps_re()
        .captures(&text)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

/// The command the previous run recommended: `next: /<command> [<feature>]`.
#[derive(Debug, Clone, PartialEq)]
pub struct NextStep {
    pub command: String,
    pub feature: Option<String>,
}

/// Resolve `continue` from the ledger. A missing ledger or a ledger without
/// a `next:` line is fatal here: continuation has nothing to go on.
pub fn resolve_next(root: &Path) -> Result<NextStep> {
    let text = load_state(root)?;
    let caps = next_command_re()
        .captures(&text)
        .ok_or_else(|| CadenceError::NoNextCommand(paths::state_path(root)))?;
    Ok(NextStep {
        command: caps[1].to_string(),
        feature: caps.get(2).map(|m| m.as_str().to_string()),
    })
}

/// Free text after `completed:`, for the status report.
pub fn completed_summary(root: &Path) -> String {
    summary_field(root, completed_line_re())
}

/// Free text after `next:`, for the status report.
pub fn next_summary(root: &Path) -> String {
    summary_field(root, next_line_re())
}

fn summary_field(root: &Path, re: &Regex) -> String {
    load_state(root)
        .ok()
        .and_then(|text| re.captures(&text).map(|caps| caps[1].trim().to_string()))
        .unwrap_or_else(|| UNKNOWN.to_string())
}
