use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const CADENCE_DIR: &str = ".cadence";
pub const CONFIG_DIR: &str = ".cadence/config";

pub const SETTINGS_FILE: &str = ".cadence/config/settings.yaml";
pub const WORKFLOW_FILE: &str = ".cadence/config/workflow.yaml";
pub const STATE_FILE: &str = ".cadence/state.md";

/// Subdirectory of the tasks dir holding task files for completed features.
pub const ARCHIVE_DIR: &str = "done";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn cadence_dir(root: &Path) -> PathBuf {
    root.join(CADENCE_DIR)
}

pub fn config_dir(root: &Path) -> PathBuf {
    root.join(CONFIG_DIR)
}

pub fn settings_path(root: &Path) -> PathBuf {
    root.join(SETTINGS_FILE)
}

pub fn workflow_path(root: &Path) -> PathBuf {
    root.join(WORKFLOW_FILE)
}

pub fn state_path(root: &Path) -> PathBuf {
    root.join(STATE_FILE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
