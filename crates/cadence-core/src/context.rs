//! Maps placeholder names to values. Each name has a tagged resolver built
//! fresh per invocation; a resolver hitting a missing artifact degrades to a
//! marked gap instead of aborting the render.

use crate::config::Settings;
use crate::error::{CadenceError, Result};
use crate::{features, ledger, section, specs, tasks};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Prose prefix of the value substituted when a placeholder's backing file
/// does not exist. Seed templates quote it in their guard instructions, so
/// it lives in one place.
pub const GAP_MARKER: &str = "not yet available";

/// Optional arguments of one run, as parsed by the CLI.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub feature: Option<String>,
    pub task: Option<String>,
    pub request: Option<String>,
    pub target: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Resolver {
    /// Concatenated specs directory.
    Specs,
    /// Raw rules file.
    Rules,
    /// Features document with completed blocks filtered out.
    Features,
    /// Extracted section for the effective feature.
    FeatureSection,
    /// The effective feature ID itself.
    FeatureId,
    /// Task file for the effective feature, archive fallback included.
    Tasks,
    /// Extracted task section; demands an explicit --task.
    TaskSection,
    /// Pass-through of --request.
    Request,
    /// Pass-through of --target.
    Target,
    /// Raw ledger text.
    State,
    /// Spec-gap counter from the previous run.
    PrevSpecGaps,
    /// Priority-ordered features still missing task files.
    MissingTasks,
}

impl Resolver {
    fn for_name(name: &str) -> Option<Self> {
        Some(match name {
            "spec" => Self::Specs,
            "rules" => Self::Rules,
            "features" => Self::Features,
            "feature" => Self::FeatureSection,
            "feature_id" => Self::FeatureId,
            "tasks" => Self::Tasks,
            "task" => Self::TaskSection,
            "request" => Self::Request,
            "target" => Self::Target,
            "state" => Self::State,
            "prev_spec_gaps" => Self::PrevSpecGaps,
            "missing_tasks" => Self::MissingTasks,
            _ => return None,
        })
    }

    fn resolve(self, root: &Path, settings: &Settings, args: &Invocation) -> Result<String> {
        match self {
            Self::Specs => specs::concat_specs(root, settings),
            Self::Rules => crate::io::read_artifact(&settings.rules_path(root)),
            Self::Features => {
                let doc = crate::io::read_artifact(&settings.features_path(root))?;
                Ok(features::filter_done(&doc))
            }
            Self::FeatureSection => {
                let id = effective_feature(root, settings, args);
                let doc = crate::io::read_artifact(&settings.features_path(root))?;
                section::extract_feature(&doc, &id)
            }
            Self::FeatureId => Ok(effective_feature(root, settings, args)),
            Self::Tasks => {
                let id = effective_feature(root, settings, args);
                tasks::load_tasks(root, settings, &id)
            }
            Self::TaskSection => {
                let task_id = args
                    .task
                    .as_deref()
                    .ok_or(CadenceError::MissingArgument("task"))?;
                let feature_id = effective_feature(root, settings, args);
                let doc = tasks::load_tasks(root, settings, &feature_id)?;
                section::extract_task(&doc, task_id)
            }
            Self::Request => Ok(args.request.clone().unwrap_or_default()),
            Self::Target => Ok(args.target.clone().unwrap_or_default()),
            Self::State => ledger::load_state(root),
            Self::PrevSpecGaps => Ok(ledger::spec_gap_count(root).to_string()),
            Self::MissingTasks => Ok(features::missing_tasks_summary(root, settings)),
        }
    }
}

/// The explicit `--feature` when given, else the default-feature derivation
/// over the features document (which itself falls back to a fixed ID).
fn effective_feature(root: &Path, settings: &Settings, args: &Invocation) -> String {
    if let Some(id) = &args.feature {
        return id.clone();
    }
    let doc = std::fs::read_to_string(settings.features_path(root)).unwrap_or_default();
    features::default_feature(&doc)
}

/// Resolve every requested placeholder. Unregistered names are warned about
/// and omitted so the filler leaves them verbatim; a missing artifact becomes
/// a marked gap; any other failure is fatal.
pub fn build(
    root: &Path,
    settings: &Settings,
    names: &BTreeSet<String>,
    args: &Invocation,
) -> Result<HashMap<String, String>> {
    let mut context = HashMap::new();
    for name in names {
        let Some(resolver) = Resolver::for_name(name) else {
            tracing::warn!("no resolver registered for placeholder '{{{{{name}}}}}'");
            continue;
        };
        match resolver.resolve(root, settings, args) {
            Ok(value) => {
                context.insert(name.clone(), value);
            }
            Err(CadenceError::MissingArtifact(path)) => {
                tracing::debug!("{name}: artifact not found, rendering gap marker");
                context.insert(name.clone(), format!("({GAP_MARKER}: {})", path.display()));
            }
            Err(e) => return Err(e),
        }
    }
    Ok(context)
}
