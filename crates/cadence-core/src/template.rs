//! Placeholder detection and single-pass template filling, plus the fixed
//! footer appended to every rendered command.

use regex::{Captures, Regex};
use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();

fn placeholder_re() -> &'static Regex {
    PLACEHOLDER_RE.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").unwrap())
}

/// All distinct placeholder names in `text`, ordered for stable diagnostics.
pub fn find_placeholders(text: &str) -> BTreeSet<String> {
    placeholder_re()
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// One left-to-right pass: known names are substituted, unknown tokens stay
/// verbatim. Substituted values are never re-scanned, so placeholder-shaped
/// text inside a value survives untouched.
pub fn fill(template: &str, context: &HashMap<String, String>) -> String {
    placeholder_re()
        .replace_all(template, |caps: &Captures| match context.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Instructional footer appended to every rendered template. Not loaded from
/// disk; its own placeholders resolve through the same context as the
/// template's.
pub const FOOTER: &str = "\n\n---\n\nWhen the work above is finished, recommend the next command in priority order:\n1. If spec gaps remain (previous count: {{prev_spec_gaps}}), recommend /refresh.\n2. Else if features are missing task files ({{missing_tasks}}), recommend /tasks-gen <feature-id> for the highest-priority one.\n3. Otherwise recommend /task-next.\n\nEnd your response with exactly these three lines:\n\x1b[32mcompleted: <what was just finished>\x1b[0m\n\x1b[33mstate: <N> spec gaps | <N> features need tasks | <N> tasks pending\x1b[0m\n\x1b[36mnext: /<command> [<feature-id>]\x1b[0m\n\nThen overwrite .cadence/state.md with the same three lines, without ANSI codes.\n";
