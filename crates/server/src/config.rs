use std::path::Path;

use anyhow::{bail, Context, Result};
use pagerender::{RenderError, Renderer};
use serde_json::Value;

/// Read a page configuration file.
pub fn load_page_config(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read page configuration {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse page configuration {}", path.display()))
}

/// Load a page configuration file and merge it into `renderer`.
pub fn apply_page_config(renderer: &mut Renderer, path: &Path) -> Result<()> {
    let partial = load_page_config(path)?;

    match renderer.update_config(&partial) {
        Ok(()) => Ok(()),
        Err(RenderError::Invalid(errors)) => {
            let details = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            bail!("Invalid page configuration {}: {details}", path.display())
        }
        Err(err) => Err(err.into()),
    }
}
