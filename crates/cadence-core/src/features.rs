//! Aggregation over the features document: priority/status scanning, the
//! default-feature rule, missing-task reporting, and done-feature filtering.

use crate::config::Settings;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Fallback when no feature is in progress or not started (or the features
/// file does not exist yet).
pub const DEFAULT_FEATURE_ID: &str = "F01";

/// A feature block participates in aggregation only when the Priority and
/// Status lines follow the heading directly, in that order. Field values end
/// at the first ` | ` detail suffix.
static META_RE: OnceLock<Regex> = OnceLock::new();

fn meta_re() -> &'static Regex {
    META_RE.get_or_init(|| {
        Regex::new(r"(?mi)^##\s+(\w+)[^\n]*\n\*\*Priority\*\*:\s*([^|\n]+)\n\*\*Status\*\*:\s*([^|\n]+)")
            .unwrap()
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMeta {
    pub id: String,
    pub priority: String,
    pub status: String,
}

impl FeatureMeta {
    pub fn is_done(&self) -> bool {
        self.status.eq_ignore_ascii_case("done")
    }

    /// High sorts first, unknown priorities last.
    pub fn priority_rank(&self) -> u8 {
        match self.priority.to_ascii_lowercase().as_str() {
            "high" => 0,
            "medium" => 1,
            "low" => 2,
            _ => 9,
        }
    }
}

/// All parseable feature blocks, in document order.
pub fn scan(doc: &str) -> Vec<FeatureMeta> {
    meta_re()
        .captures_iter(doc)
        .map(|caps| FeatureMeta {
            id: caps[1].to_string(),
            priority: caps[2].trim().to_string(),
            status: caps[3].trim().to_string(),
        })
        .collect()
}

/// The feature to work on when none is named: first in progress, else first
/// not started, else the fixed fallback.
pub fn default_feature(doc: &str) -> String {
    let metas = scan(doc);
    metas
        .iter()
        .find(|m| m.status.eq_ignore_ascii_case("in progress"))
        .or_else(|| {
            metas
                .iter()
                .find(|m| m.status.eq_ignore_ascii_case("not started"))
        })
        .map(|m| m.id.clone())
        .unwrap_or_else(|| DEFAULT_FEATURE_ID.to_string())
}

/// Not-done features with no task file in the active tasks dir or its
/// archive, sorted by priority, rendered `"ID (priority), ..."` or `"none"`.
pub fn missing_tasks_summary(root: &Path, settings: &Settings) -> String {
    let Ok(doc) = std::fs::read_to_string(settings.features_path(root)) else {
        return "none".to_string();
    };
    let tasks_dir = settings.tasks_path(root);
    let archive_dir = settings.archive_path(root);

    let mut missing: Vec<FeatureMeta> = scan(&doc)
        .into_iter()
        .filter(|m| !m.is_done())
        .filter(|m| {
            let file = format!("{}.md", m.id);
            !tasks_dir.join(&file).exists() && !archive_dir.join(&file).exists()
        })
        .collect();
    // sort_by_key is stable, so ties keep document order
    missing.sort_by_key(FeatureMeta::priority_rank);

    if missing.is_empty() {
        return "none".to_string();
    }
    missing
        .iter()
        .map(|m| format!("{} ({})", m.id, m.priority))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reassemble the document without done-feature blocks, keeping any preamble
/// before the first heading, and note how many blocks were dropped.
pub fn filter_done(doc: &str) -> String {
    let starts: Vec<usize> = heading_offsets(doc);
    if starts.is_empty() {
        return doc.to_string();
    }

    let mut out = String::from(&doc[..starts[0]]);
    let mut omitted = 0usize;
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(doc.len());
        let block = &doc[start..end];
        let done = scan(block).first().is_some_and(FeatureMeta::is_done);
        if done {
            omitted += 1;
        } else {
            out.push_str(block);
        }
    }
    if omitted > 0 {
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&format!("--- {omitted} completed features omitted ---\n"));
    }
    out
}

/// Byte offsets of every level-2 heading line.
fn heading_offsets(doc: &str) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut pos = 0;
    for line in doc.split_inclusive('\n') {
        if line.starts_with("## ") {
            offsets.push(pos);
        }
        pos += line.len();
    }
    offsets
}

// ---------------------------------------------------------------------------
// StatusTally
// ---------------------------------------------------------------------------

/// Counts by recognized status. Blocks with any other status string are
/// excluded from every bucket.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StatusTally {
    pub done: usize,
    pub in_progress: usize,
    pub not_started: usize,
}

pub fn status_tally(doc: &str) -> StatusTally {
    let mut tally = StatusTally::default();
    for meta in scan(doc) {
        match meta.status.to_ascii_lowercase().as_str() {
            "done" => tally.done += 1,
            "in progress" => tally.in_progress += 1,
            "not started" => tally.not_started += 1,
            _ => {}
        }
    }
    tally
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MIXED_PRIORITY: &str = "\
## F01 — Low Feature
**Priority**: Low
**Status**: not started | Tests written: no
**Description**: Low priority thing.

---

## F02 — High Feature
**Priority**: High
**Status**: not started | Tests written: no
**Description**: High priority thing.

---

## F03 — Medium Feature
**Priority**: Medium
**Status**: not started | Tests written: no
**Description**: Medium priority thing.

---
";

    const WITH_DONE: &str = "\
# Feature List

## F01 — Directory Scaffold
**Priority**: High
**Status**: done | Tests written: yes
**Description**: Creates the directory tree.

---

## F02 — YAML Config
**Priority**: High
**Status**: not started | Tests written: no
**Description**: Reads YAML settings.

---

## F03 — Another Done
**Priority**: Medium
**Status**: done | Tests written: yes
**Description**: Another completed feature.

---
";

    fn project(features: &str) -> (TempDir, Settings) {
        let dir = TempDir::new().unwrap();
        let settings = Settings::default();
        let features_path = settings.features_path(dir.path());
        std::fs::create_dir_all(features_path.parent().unwrap()).unwrap();
        std::fs::write(features_path, features).unwrap();
        std::fs::create_dir_all(settings.tasks_path(dir.path())).unwrap();
        (dir, settings)
    }

    #[test]
    fn scan_strips_detail_suffix() {
        let metas = scan(MIXED_PRIORITY);
        assert_eq!(metas.len(), 3);
        assert_eq!(metas[0].id, "F01");
        assert_eq!(metas[0].priority, "Low");
        assert_eq!(metas[0].status, "not started");
    }

    #[test]
    fn scan_skips_blocks_without_both_fields() {
        let doc = "## F01 — No metadata\nJust prose.\n\n## F02 — Valid\n**Priority**: High\n**Status**: done\n";
        let metas = scan(doc);
        assert_eq!(metas.len(), 1);
        assert_eq!(metas[0].id, "F02");
    }

    #[test]
    fn scan_skips_reordered_fields() {
        // Status before Priority does not match the documented shape
        let doc = "## F01 — Swapped\n**Status**: done\n**Priority**: High\n";
        assert!(scan(doc).is_empty());
    }

    #[test]
    fn default_feature_prefers_in_progress() {
        let doc = "\
## F01 — A
**Priority**: High
**Status**: not started

## F02 — B
**Priority**: Low
**Status**: in progress
";
        assert_eq!(default_feature(doc), "F02");
    }

    #[test]
    fn default_feature_falls_back_to_not_started() {
        assert_eq!(default_feature(MIXED_PRIORITY), "F01");
    }

    #[test]
    fn default_feature_fixed_fallback() {
        assert_eq!(default_feature(""), "F01");
        let all_done = "## F07 — X\n**Priority**: High\n**Status**: done\n";
        assert_eq!(default_feature(all_done), "F01");
    }

    #[test]
    fn missing_tasks_sorted_by_priority() {
        let (dir, settings) = project(MIXED_PRIORITY);
        let result = missing_tasks_summary(dir.path(), &settings);
        let high = result.find("F02").unwrap();
        let medium = result.find("F03").unwrap();
        let low = result.find("F01").unwrap();
        assert!(high < medium && medium < low, "bad order: {result}");
        assert!(result.contains("F02 (High)"));
    }

    #[test]
    fn missing_tasks_excludes_feature_with_task_file() {
        let (dir, settings) = project(MIXED_PRIORITY);
        std::fs::write(
            settings.tasks_path(dir.path()).join("F02.md"),
            "# Tasks for F02\n",
        )
        .unwrap();
        let result = missing_tasks_summary(dir.path(), &settings);
        assert!(!result.contains("F02"));
        assert!(result.contains("F01"));
    }

    #[test]
    fn missing_tasks_excludes_done_features() {
        let doc = "## F01 — Done Feature\n**Priority**: High\n**Status**: done\n";
        let (dir, settings) = project(doc);
        assert_eq!(missing_tasks_summary(dir.path(), &settings), "none");
    }

    #[test]
    fn missing_tasks_excludes_archived_feature() {
        let doc = "## F01 — Widget App\n**Priority**: High\n**Status**: not started\n";
        let (dir, settings) = project(doc);
        let archive = settings.archive_path(dir.path());
        std::fs::create_dir_all(&archive).unwrap();
        std::fs::write(archive.join("F01.md"), "# Tasks for F01\n").unwrap();
        assert_eq!(missing_tasks_summary(dir.path(), &settings), "none");
    }

    #[test]
    fn missing_tasks_none_when_all_covered() {
        let (dir, settings) = project(MIXED_PRIORITY);
        for id in ["F01", "F02", "F03"] {
            std::fs::write(
                settings.tasks_path(dir.path()).join(format!("{id}.md")),
                "# Tasks\n",
            )
            .unwrap();
        }
        assert_eq!(missing_tasks_summary(dir.path(), &settings), "none");
    }

    #[test]
    fn missing_tasks_none_when_features_file_absent() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::default();
        assert_eq!(missing_tasks_summary(dir.path(), &settings), "none");
    }

    #[test]
    fn filter_done_strips_done_blocks() {
        let result = filter_done(WITH_DONE);
        assert!(result.contains("F02 — YAML Config"));
        assert!(!result.contains("F01 — Directory Scaffold"));
        assert!(!result.contains("F03 — Another Done"));
        assert!(result.contains("2 completed features omitted"));
    }

    #[test]
    fn filter_done_preserves_preamble() {
        let result = filter_done(WITH_DONE);
        assert!(result.starts_with("# Feature List"));
    }

    #[test]
    fn filter_done_no_summary_when_nothing_dropped() {
        let result = filter_done(MIXED_PRIORITY);
        assert!(result.contains("F01"));
        assert!(result.contains("F02"));
        assert!(!result.contains("completed features omitted"));
    }

    #[test]
    fn tally_counts_recognized_statuses() {
        let tally = status_tally(WITH_DONE);
        assert_eq!(
            tally,
            StatusTally {
                done: 2,
                in_progress: 0,
                not_started: 1,
            }
        );
    }

    #[test]
    fn tally_excludes_unrecognized_status() {
        let doc = "## F01 — Odd\n**Priority**: High\n**Status**: blocked on review\n";
        assert_eq!(status_tally(doc), StatusTally::default());
    }
}
