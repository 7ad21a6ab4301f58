//! The dispatch pipeline: resolve continuation, look up the workflow step,
//! fill its template and the fixed footer, and hand back the full text.

use crate::config::{Settings, Workflow};
use crate::context::{self, Invocation};
use crate::error::Result;
use crate::{ledger, template};
use std::path::Path;

/// Reserved pseudo-command: re-run whatever the previous invocation's ledger
/// recommended.
pub const CONTINUE_COMMAND: &str = "continue";

/// Turn `continue` into the concrete command recorded in the ledger. A
/// feature token on the ledger line replaces any explicit `--feature`; a
/// bare line leaves the explicit argument alone.
pub fn resolve_continuation(root: &Path, command: &str, args: &mut Invocation) -> Result<String> {
    if command != CONTINUE_COMMAND {
        return Ok(command.to_string());
    }
    let next = ledger::resolve_next(root)?;
    tracing::debug!(command = %next.command, "resolved continuation from ledger");
    if let Some(feature) = next.feature {
        args.feature = Some(feature);
    }
    Ok(next.command)
}

/// Render a workflow command to its final stdout text: filled template plus
/// filled footer.
pub fn render(root: &Path, command: &str, mut args: Invocation) -> Result<String> {
    let command = resolve_continuation(root, command, &mut args)?;
    let settings = Settings::load(root)?;
    let workflow = Workflow::load(root)?;
    let step = workflow.find_step(&command)?;

    let template_path = settings.templates_path(root).join(&step.template);
    let body = crate::io::read_artifact(&template_path)?;

    let mut names = template::find_placeholders(&body);
    names.extend(template::find_placeholders(template::FOOTER));
    let context = context::build(root, &settings, &names, &args)?;

    Ok(format!(
        "{}{}",
        template::fill(&body, &context),
        template::fill(template::FOOTER, &context)
    ))
}
