//! Markdown section extraction: features live under `##` headings, tasks
//! under `###` headings inside a per-feature file.

use crate::error::{CadenceError, Result};
use regex::Regex;
use std::sync::OnceLock;

static FEATURE_HEADING_RE: OnceLock<Regex> = OnceLock::new();
static TASK_HEADING_RE: OnceLock<Regex> = OnceLock::new();

/// `## <ID> ...` headings. `###` lines do not match: the character after the
/// marker must be a space or tab.
fn feature_heading_re() -> &'static Regex {
    FEATURE_HEADING_RE.get_or_init(|| Regex::new(r"(?m)^##[ \t]+(\w+)").unwrap())
}

/// `### <ID> ...` headings.
fn task_heading_re() -> &'static Regex {
    TASK_HEADING_RE.get_or_init(|| Regex::new(r"(?m)^###[ \t]+(\w+)").unwrap())
}

/// Extract the `## <id> ...` section for a feature, up to the next `##`
/// heading or end of document. ID matching is case-insensitive.
pub fn extract_feature(doc: &str, id: &str) -> Result<String> {
    extract(doc, feature_heading_re(), id)
        .ok_or_else(|| CadenceError::FeatureNotFound(id.to_uppercase()))
}

/// Extract the `### <id> ...` section for a task.
pub fn extract_task(doc: &str, id: &str) -> Result<String> {
    extract(doc, task_heading_re(), id).ok_or_else(|| CadenceError::TaskNotFound(id.to_uppercase()))
}

/// Slice from the heading whose leading `\w+` token equals `id` (ignoring
/// case) to the next same-level heading or end of document. Comparing the
/// captured token, rather than searching for `id` inside the line, is what
/// makes the match whole-word: `F0` never equals `F01`.
fn extract(doc: &str, heading_re: &Regex, id: &str) -> Option<String> {
    let mut start = None;
    for caps in heading_re.captures_iter(doc) {
        let heading = caps.get(0).expect("group 0 always exists");
        match start {
            None if caps[1].eq_ignore_ascii_case(id) => start = Some(heading.start()),
            None => {}
            Some(s) => return Some(doc[s..heading.start()].trim().to_string()),
        }
    }
    start.map(|s| doc[s..].trim().to_string())
}
