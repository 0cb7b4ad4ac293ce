pub mod auth;
pub mod chat;
pub mod config;
pub mod dashboard;
pub mod student;

use anyhow::{Context, Result};
use rustyline::DefaultEditor;

/// Reads a value from the terminal when it was not passed as a flag.
pub(crate) fn prompt_if_missing(value: Option<String>, label: &str) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    let mut editor = DefaultEditor::new()?;
    editor
        .readline(&format!("{label}: "))
        .with_context(|| format!("No {} given", label.to_lowercase()))
}
