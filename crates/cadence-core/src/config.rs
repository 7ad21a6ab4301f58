use crate::error::{CadenceError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// On-disk shape of settings.yaml: everything lives under the `cadence` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SettingsFile {
    cadence: Settings,
}

/// Root-relative paths for every project artifact the runner reads.
///
/// All five keys are structural: a settings.yaml missing one fails to
/// deserialize, which is the intended failure mode for a malformed config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub specs_dir: String,
    pub features_file: String,
    pub tasks_dir: String,
    pub templates_dir: String,
    pub rules_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            specs_dir: ".cadence/specs".to_string(),
            features_file: ".cadence/features/features.md".to_string(),
            tasks_dir: ".cadence/tasks".to_string(),
            templates_dir: ".cadence/templates".to_string(),
            rules_file: ".cadence/rules.md".to_string(),
        }
    }
}

impl Settings {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::settings_path(root);
        let data = crate::io::read_artifact(&path)?;
        let file: SettingsFile = serde_yaml::from_str(&data)?;
        Ok(file.cadence)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::settings_path(root);
        let data = serde_yaml::to_string(&SettingsFile {
            cadence: self.clone(),
        })?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn specs_path(&self, root: &Path) -> PathBuf {
        root.join(&self.specs_dir)
    }

    pub fn features_path(&self, root: &Path) -> PathBuf {
        root.join(&self.features_file)
    }

    pub fn tasks_path(&self, root: &Path) -> PathBuf {
        root.join(&self.tasks_dir)
    }

    /// Task files for completed features live under `<tasks_dir>/done/`.
    pub fn archive_path(&self, root: &Path) -> PathBuf {
        self.tasks_path(root).join(paths::ARCHIVE_DIR)
    }

    pub fn templates_path(&self, root: &Path) -> PathBuf {
        root.join(&self.templates_dir)
    }

    pub fn rules_path(&self, root: &Path) -> PathBuf {
        root.join(&self.rules_file)
    }
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// One workflow step: a command ID, the template it renders, and the
/// slash-command form shown to users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub id: String,
    pub template: String,
    pub command: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub steps: Vec<WorkflowStep>,
}

impl Default for Workflow {
    fn default() -> Self {
        let steps = [
            ("refresh", "refresh.md"),
            ("features-gen", "gen_features.md"),
            ("features-update", "update_features.md"),
            ("tasks-gen", "gen_tasks.md"),
            ("tasks-update", "update_tasks.md"),
            ("task-start", "start_task.md"),
            ("task-next", "next_task.md"),
            ("checkpoint", "checkpoint.md"),
            ("milestone", "milestone.md"),
            ("deploy", "deploy.md"),
        ]
        .into_iter()
        .map(|(id, template)| WorkflowStep {
            id: id.to_string(),
            template: template.to_string(),
            command: format!("/{id}"),
        })
        .collect();
        Self { steps }
    }
}

impl Workflow {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::workflow_path(root);
        let data = crate::io::read_artifact(&path)?;
        let workflow: Workflow = serde_yaml::from_str(&data)?;
        Ok(workflow)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::workflow_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn find_step(&self, id: &str) -> Result<&WorkflowStep> {
        self.steps
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| CadenceError::UnknownCommand {
                id: id.to_string(),
                valid: self.steps.iter().map(|s| s.id.clone()).collect(),
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
