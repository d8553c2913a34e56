use std::path::Path;
use std::process::{Command, ExitStatus};

pub const DEFAULT_EDITOR: &str = "nano";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to launch '{editor}': {source}")]
    Spawn {
        editor: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{editor}' exited with {status}")]
    Exit { editor: String, status: ExitStatus },
}

/// `$EDITOR`, or [`DEFAULT_EDITOR`] when unset or blank.
pub fn editor_command() -> String {
    resolve_editor(std::env::var("EDITOR").ok())
}

fn resolve_editor(var: Option<String>) -> String {
    var.filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

/// Runs `editor` on `path` and waits for it. `editor` may carry its own
/// arguments, e.g. `code --wait`.
pub fn open_in_editor(editor: &str, path: &Path) -> Result<(), SettingsError> {
    let mut words = editor.split_whitespace();
    let program = words.next().unwrap_or(DEFAULT_EDITOR);
    tracing::debug!(program, path = %path.display(), "Launching editor");

    let status = Command::new(program)
        .args(words)
        .arg(path)
        .status()
        .map_err(|source| SettingsError::Spawn {
            editor: editor.to_string(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(SettingsError::Exit {
            editor: editor.to_string(),
            status,
        })
    }
}
