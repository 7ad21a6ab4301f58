use anyhow::Context;
use cadence_core::config::{Settings, Workflow};
use cadence_core::context::GAP_MARKER;
use cadence_core::{io, paths};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing cadence in: {}", root.display());

    let settings = Settings::default();

    // 1. Directory tree
    let dirs = [
        paths::cadence_dir(root),
        paths::config_dir(root),
        settings.specs_path(root),
        settings.features_path(root)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| paths::cadence_dir(root)),
        settings.tasks_path(root),
        settings.archive_path(root),
        settings.templates_path(root),
    ];
    for dir in &dirs {
        io::ensure_dir(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }

    // 2. Config files
    let settings_path = paths::settings_path(root);
    if settings_path.exists() {
        report(root, &settings_path, false);
    } else {
        settings.save(root).context("failed to write settings.yaml")?;
        report(root, &settings_path, true);
    }
    let workflow_path = paths::workflow_path(root);
    if workflow_path.exists() {
        report(root, &workflow_path, false);
    } else {
        Workflow::default()
            .save(root)
            .context("failed to write workflow.yaml")?;
        report(root, &workflow_path, true);
    }

    // 3. Seed documents
    report(
        root,
        &settings.rules_path(root),
        io::write_if_missing(&settings.rules_path(root), RULES_SEED.as_bytes())?,
    );
    report(
        root,
        &settings.features_path(root),
        io::write_if_missing(&settings.features_path(root), FEATURES_SEED.as_bytes())?,
    );

    // 4. One prompt template per workflow step
    for (name, body) in templates() {
        let path = settings.templates_path(root).join(name);
        report(root, &path, io::write_if_missing(&path, body.as_bytes())?);
    }

    // The ledger (.cadence/state.md) is deliberately not scaffolded: its
    // absence means "no previous run" and every reader has a default for it.

    println!("\ncadence initialized.");
    println!("Next: cadence refresh");
    Ok(())
}

fn report(root: &Path, path: &Path, created: bool) {
    let rel = path.strip_prefix(root).unwrap_or(path);
    if created {
        println!("  created: {}", rel.display());
    } else {
        println!("  exists:  {}", rel.display());
    }
}

const RULES_SEED: &str = "\
# Project Rules

## Testing
- Every feature needs tests before its status moves to done.

## Workflow
- Work one task at a time; update statuses as you go.
- Keep feature and task IDs stable once assigned.
";

const FEATURES_SEED: &str = "\
# Feature List

(no features yet — run /features-gen to derive them from the specs)
";

/// One seed prompt template per workflow step. Built at scaffold time so the
/// missing-file guard prose quotes the same marker the renderer substitutes.
fn templates() -> Vec<(&'static str, String)> {
    let no_task_file_guard = format!(
        "If the task file\nbelow reads '{GAP_MARKER}', the file does not exist yet: reply\n\
         `Error: no task file for {{{{feature_id}}}}` and stop."
    );
    vec![
        (
            "refresh.md",
            "Review the specification against the current rules and list every gap,\n\
             ambiguity, or contradiction you find. Number each gap.\n\n\
             ## Specification\n\n{{spec}}\n\n## Rules\n\n{{rules}}\n\n\
             Count the gaps; that count feeds the state line below.\n"
                .to_string(),
        ),
        (
            "gen_features.md",
            "Derive a feature list from the specification. Write it to the features\n\
             file as `## F<NN> — <title>` blocks, each followed immediately by\n\
             `**Priority**: <High|Medium|Low>` and `**Status**: not started` lines\n\
             and a `**Description**:` line.\n\n\
             ## Specification\n\n{{spec}}\n\n## Rules\n\n{{rules}}\n"
                .to_string(),
        ),
        (
            "update_features.md",
            "Apply the change request to the feature list, keeping IDs stable and\n\
             the Priority/Status lines directly under each heading. Generate a task\n\
             file for any newly added feature.\n\n\
             ## Change request\n\n{{request}}\n\n## Current features\n\n{{features}}\n\n\
             ## Rules\n\n{{rules}}\n"
                .to_string(),
        ),
        (
            "gen_tasks.md",
            [
                "Break feature {{feature_id}} into tasks. Write them to the tasks file\n\
                 for {{feature_id}} as `### T<NN> — <title>` blocks with a\n\
                 `**Description**:` line each. If the feature section below reads\n'",
                GAP_MARKER,
                "', reply `Error: feature list missing` and stop.\n\n\
                 ## Feature\n\n{{feature}}\n\n## Specification\n\n{{spec}}\n\n\
                 ## Rules\n\n{{rules}}\n",
            ]
            .concat(),
        ),
        (
            "update_tasks.md",
            "Apply the change request to the task list for {{feature_id}}, keeping\n\
             task IDs stable.\n\n\
             ## Change request\n\n{{request}}\n\n## Current tasks\n\n{{tasks}}\n\n\
             ## Rules\n\n{{rules}}\n"
                .to_string(),
        ),
        (
            "start_task.md",
            format!(
                "Implement task {{{{task}}}} of feature {{{{feature_id}}}}. {no_task_file_guard}\n\n\
                 ## Tasks\n\n{{{{tasks}}}}\n\n## Rules\n\n{{{{rules}}}}\n"
            ),
        ),
        (
            "next_task.md",
            format!(
                "Pick the first not-done task for feature {{{{feature_id}}}} and implement\n\
                 it. {no_task_file_guard} Mark the task done when tests pass.\n\n\
                 ## Tasks\n\n{{{{tasks}}}}\n\n## Rules\n\n{{{{rules}}}}\n"
            ),
        ),
        (
            "checkpoint.md",
            "Summarize project progress and commit the current work. Skip the\n\
             commit if nothing is staged. Overwrite .cadence/current.md with the\n\
             summary.\n\n\
             ## Features\n\n{{features}}\n\n## Previous state\n\n{{state}}\n\n\
             ## Rules\n\n{{rules}}\n"
                .to_string(),
        ),
        (
            "milestone.md",
            "Verify feature {{feature_id}} is complete: every task done, tests\n\
             passing. Move its block to the completed section of the features file\n\
             (incomplete features stay in the incomplete section) and update the\n\
             README to reflect the new capability.\n\n\
             ## Feature\n\n{{feature}}\n\n## Tasks\n\n{{tasks}}\n\n\
             ## Rules\n\n{{rules}}\n"
                .to_string(),
        ),
        (
            "deploy.md",
            "Deploy the current build to {{target}}. Run the test suite first and\n\
             abort on any failure.\n\n## Rules\n\n{{rules}}\n"
                .to_string(),
        ),
    ]
}
