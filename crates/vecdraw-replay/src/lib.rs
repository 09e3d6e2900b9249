//! vecdraw Replay
//!
//! Drives the editing core from JSON gesture scripts without a window and
//! reports the resulting document.

mod report;
mod script;
mod shortcuts;

pub use report::{ShapeSummary, Summary};
pub use script::{Script, Step, apply_step, run_command};
pub use shortcuts::{Command, Shortcut, ShortcutRegistry};

use std::path::Path;
use vecdraw_core::{Editor, EditorResult, EditorSettings, HeadlessHost};

/// Read editor settings from a JSON file.
pub fn load_settings(path: impl AsRef<Path>) -> EditorResult<EditorSettings> {
    let json = std::fs::read_to_string(path)?;
    EditorSettings::from_json(&json)
}

/// Replay a script file on a fresh headless editor.
pub fn replay_file(script: impl AsRef<Path>, settings: EditorSettings) -> EditorResult<Editor<HeadlessHost>> {
    let script = Script::load(script)?;
    let mut editor = Editor::headless(settings);
    script.run(&mut editor)?;
    Ok(editor)
}
