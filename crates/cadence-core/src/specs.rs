//! Specification documents: the `{{spec}}` placeholder is every markdown
//! file in the specs directory, concatenated in name order.

use crate::config::Settings;
use crate::error::{CadenceError, Result};
use std::path::Path;

/// Join all `*.md` files in the specs dir with a horizontal rule. An empty
/// directory renders a readable sentinel; a missing directory is an error
/// (the project was never scaffolded).
pub fn concat_specs(root: &Path, settings: &Settings) -> Result<String> {
    let dir = settings.specs_path(root);
    let entries = std::fs::read_dir(&dir).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CadenceError::MissingArtifact(dir.clone()),
        _ => CadenceError::Io(e),
    })?;

    let mut files: Vec<_> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().and_then(|e| e.to_str()) == Some("md"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Ok(format!("(no spec files found in {})", dir.display()));
    }

    let mut parts = Vec::with_capacity(files.len());
    for file in &files {
        parts.push(crate::io::read_artifact(file)?);
    }
    Ok(parts.join("\n\n---\n\n"))
}
