//! Editor utilities for editing stored config contents.

use std::io::Write;
use std::process::Command;

use crate::error::{NovaError, Result};

/// Open `editor` on a temp file pre-populated with `initial_content`.
/// `file_name` is kept as the temp file suffix so editors pick the right syntax.
/// Returns the content after the editor is closed.
pub fn edit_in_editor(editor: &str, file_name: &str, initial_content: &str) -> Result<String> {
    let safe_name: String = file_name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    let temp_path = std::env::temp_dir().join(format!("nova_{}_{}", uuid::Uuid::new_v4(), safe_name));

    {
        let mut file = std::fs::File::create(&temp_path)?;
        file.write_all(initial_content.as_bytes())?;
    }

    let status = match Command::new(editor).arg(&temp_path).status() {
        Ok(status) => status,
        Err(e) => {
            let _ = std::fs::remove_file(&temp_path);
            return Err(NovaError::Other(format!("Unable to run {}: {}", editor, e)));
        }
    };

    if !status.success() {
        let _ = std::fs::remove_file(&temp_path);
        return Err(NovaError::Other(format!(
            "{} exited with non-zero status",
            editor
        )));
    }

    let content = std::fs::read_to_string(&temp_path)?;
    let _ = std::fs::remove_file(&temp_path);

    Ok(content)
}
