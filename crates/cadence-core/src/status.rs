//! The aggregate project report behind `cadence status`. Pure reads, no
//! templates: every field degrades to a defined default when its source is
//! missing.

use crate::config::Settings;
use crate::features::{self, StatusTally};
use crate::{ledger, tasks};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct StatusReport {
    pub spec_count: usize,
    pub tally: StatusTally,
    pub missing_tasks: String,
    pub pending_tasks: usize,
    pub last_completed: String,
    pub next: String,
}

impl StatusReport {
    pub fn gather(root: &Path, settings: &Settings) -> Self {
        let features_doc =
            std::fs::read_to_string(settings.features_path(root)).unwrap_or_default();
        Self {
            spec_count: count_spec_files(root, settings),
            tally: features::status_tally(&features_doc),
            missing_tasks: features::missing_tasks_summary(root, settings),
            pending_tasks: tasks::pending_task_count(root, settings),
            last_completed: ledger::completed_summary(root),
            next: ledger::next_summary(root),
        }
    }

    pub fn render(&self) -> String {
        let t = &self.tally;
        format!(
            "Specs:          {} file(s)\n\
             Features:       {} done, {} in progress, {} not started\n\
             Missing tasks:  {}\n\
             Pending tasks:  {}\n\
             Last completed: {}\n\
             Next:           {}",
            self.spec_count,
            t.done,
            t.in_progress,
            t.not_started,
            self.missing_tasks,
            self.pending_tasks,
            self.last_completed,
            self.next,
        )
    }
}

fn count_spec_files(root: &Path, settings: &Settings) -> usize {
    std::fs::read_dir(settings.specs_path(root))
        .map(|entries| {
            entries
                .flatten()
                .filter(|e| {
                    let p = e.path();
                    p.is_file() && p.extension().and_then(|x| x.to_str()) == Some("md")
                })
                .count()
        })
        .unwrap_or(0)
}
