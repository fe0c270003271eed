use anyhow::{Context, Result, anyhow};
use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::NamedTempFile;
use tracing::debug;

const DEFAULT_EDITOR: &str = "vim";

/// Composes the input text interactively: opens the user's editor on a
/// fresh temporary file, blocks until the editor exits, and reads the file
/// back. The temporary file is removed on every exit path when the handle
/// drops.
pub fn compose_input() -> Result<String> {
    compose_input_with(|key| env::var(key).ok())
}

fn compose_input_with(get_var: impl FnMut(&str) -> Option<String>) -> Result<String> {
    let editor = resolve_editor(get_var);
    let scratch = NamedTempFile::new().context("Failed to create temporary file for editing")?;

    debug!(editor = %editor, path = %scratch.path().display(), "launching editor");
    run_editor(&editor, scratch.path())?;

    let text = fs::read_to_string(scratch.path())
        .context("Failed to read edited input back from temporary file")?;
    if text.trim().is_empty() {
        return Err(anyhow!("Editor session produced no input text"));
    }
    Ok(text)
}

fn resolve_editor(mut get_var: impl FnMut(&str) -> Option<String>) -> String {
    get_var("EDITOR")
        .or_else(|| get_var("VISUAL"))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

fn run_editor(editor: &str, path: &Path) -> Result<()> {
    let status = Command::new(editor)
        .arg(path)
        .status()
        .with_context(|| format!("Failed to launch editor '{editor}'"))?;

    if !status.success() {
        return Err(anyhow!("Editor '{editor}' exited with {status}"));
    }
    Ok(())
}
