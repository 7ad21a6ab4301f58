//! Task-file access: loading with the archive fallback, and the pending-task
//! count for the status report.

use crate::config::Settings;
use crate::error::{CadenceError, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

static TASK_STATUS_RE: OnceLock<Regex> = OnceLock::new();

fn task_status_re() -> &'static Regex {
    TASK_STATUS_RE.get_or_init(|| Regex::new(r"(?mi)^\*\*Status\*\*:\s*([^|\n]+)").unwrap())
}

/// Load the task file for a feature, falling back to the `done/` archive
/// copy. The error names the active path, which is where a new file belongs.
pub fn load_tasks(root: &Path, settings: &Settings, feature_id: &str) -> Result<String> {
    let file = format!("{feature_id}.md");
    let active = settings.tasks_path(root).join(&file);
    match crate::io::read_artifact(&active) {
        Err(CadenceError::MissingArtifact(_)) => {
            let archived = settings.archive_path(root).join(&file);
            if archived.exists() {
                crate::io::read_artifact(&archived)
            } else {
                Err(CadenceError::MissingArtifact(active))
            }
        }
        other => other,
    }
}

/// Count `###` task blocks across active task files whose Status line is
/// absent or not "done". The archive is never scanned: archived means
/// finished.
pub fn pending_task_count(root: &Path, settings: &Settings) -> usize {
    let Ok(entries) = std::fs::read_dir(settings.tasks_path(root)) else {
        return 0;
    };
    let mut pending = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") || !path.is_file() {
            continue;
        }
        let Ok(doc) = std::fs::read_to_string(&path) else {
            continue;
        };
        // leading newline so a file that opens with a task heading still splits
        pending += format!("\n{doc}")
            .split("\n### ")
            .skip(1)
            .filter(|block| {
                task_status_re()
                    .captures(block)
                    .map(|caps| !caps[1].trim().eq_ignore_ascii_case("done"))
                    .unwrap_or(true)
            })
            .count();
    }
    pending
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings_with_dirs(dir: &TempDir) -> Settings {
        let settings = Settings::default();
        std::fs::create_dir_all(settings.archive_path(dir.path())).unwrap();
        settings
    }

    #[test]
    fn load_tasks_prefers_active_file() {
        let dir = TempDir::new().unwrap();
        let settings = settings_with_dirs(&dir);
        std::fs::write(settings.tasks_path(dir.path()).join("F01.md"), "active").unwrap();
        std::fs::write(settings.archive_path(dir.path()).join("F01.md"), "archived").unwrap();
        assert_eq!(load_tasks(dir.path(), &settings, "F01").unwrap(), "active");
    }

    #[test]
    fn load_tasks_falls_back_to_archive() {
        let dir = TempDir::new().unwrap();
        let settings = settings_with_dirs(&dir);
        std::fs::write(settings.archive_path(dir.path()).join("F01.md"), "archived").unwrap();
        assert_eq!(load_tasks(dir.path(), &settings, "F01").unwrap(), "archived");
    }

    #[test]
    fn load_tasks_missing_everywhere_names_active_path() {
        let dir = TempDir::new().unwrap();
        let settings = settings_with_dirs(&dir);
        match load_tasks(dir.path(), &settings, "F09") {
            Err(CadenceError::MissingArtifact(p)) => {
                assert_eq!(p, settings.tasks_path(dir.path()).join("F09.md"));
            }
            other => panic!("expected MissingArtifact, got {other:?}"),
        }
    }

    #[test]
    fn pending_counts_open_and_statusless_tasks() {
        let dir = TempDir::new().unwrap();
        let settings = settings_with_dirs(&dir);
        std::fs::write(
            settings.tasks_path(dir.path()).join("F01.md"),
            "# Tasks for F01\n\n### T01 — A\n**Status**: done\n\n### T02 — B\n**Status**: not started\n\n### T03 — C\nno status line\n",
        )
        .unwrap();
        assert_eq!(pending_task_count(dir.path(), &settings), 2);
    }

    #[test]
    fn pending_ignores_archive() {
        let dir = TempDir::new().unwrap();
        let settings = settings_with_dirs(&dir);
        std::fs::write(
            settings.archive_path(dir.path()).join("F01.md"),
            "### T01 — A\n**Status**: not started\n",
        )
        .unwrap();
        assert_eq!(pending_task_count(dir.path(), &settings), 0);
    }

    #[test]
    fn pending_zero_when_tasks_dir_missing() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::default();
        assert_eq!(pending_task_count(dir.path(), &settings), 0);
    }
}
