//! Gesture scripts: pointer events, tool switches and commands replayed
//! against an editor in order.

use crate::shortcuts::{Command, ShortcutRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;
use vecdraw_core::tools::{PathSubTool, ToolKind};
use vecdraw_core::{Editor, EditorError, EditorResult, ToolEvent, ToolHost};

/// One scripted step.
///
/// ```json
/// {"tool": "Line"}
/// {"event": "left_down", "point": {"x": 0.0, "y": 0.0}}
/// {"command": "undo"}
/// {"key": "Z", "ctrl": true}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Event(ToolEvent),
    Tool {
        tool: ToolKind,
    },
    SubTool {
        sub_tool: PathSubTool,
    },
    Command {
        command: Command,
    },
    Key {
        key: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        shift: bool,
    },
    /// Select the shape at an index of the current layer.
    Select {
        select: usize,
    },
}

/// An ordered list of steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(json: &str) -> EditorResult<Self> {
        serde_json::from_str(json).map_err(|e| EditorError::Script(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> EditorResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Run every step. Stops at the first failing command.
    pub fn run<H: ToolHost>(&self, editor: &mut Editor<H>) -> EditorResult<()> {
        for (index, step) in self.steps.iter().enumerate() {
            log::trace!("step {index}: {step:?}");
            apply_step(editor, step).map_err(|e| match e {
                EditorError::Script(msg) => EditorError::Script(format!("step {index}: {msg}")),
                other => other,
            })?;
        }
        log::info!("replayed {} step(s)", self.steps.len());
        Ok(())
    }
}

pub fn apply_step<H: ToolHost>(editor: &mut Editor<H>, step: &Step) -> EditorResult<()> {
    match step {
        Step::Event(event) => editor.handle_event(*event),
        Step::Tool { tool } => editor.set_tool(*tool),
        Step::SubTool { sub_tool } => editor.set_path_sub_tool(*sub_tool),
        Step::Command { command } => run_command(editor, *command)?,
        Step::Key { key, ctrl, shift } => {
            let command = ShortcutRegistry::lookup(key, *ctrl, *shift)
                .ok_or_else(|| EditorError::Script(format!("no shortcut bound to {key}")))?;
            run_command(editor, command)?;
        }
        Step::Select { select } => {
            let id = editor
                .scene()
                .current()
                .shapes()
                .get(*select)
                .copied()
                .ok_or_else(|| EditorError::Script(format!("no shape at index {select}")))?;
            editor.select(id)?;
        }
    }
    Ok(())
}

pub fn run_command<H: ToolHost>(editor: &mut Editor<H>, command: Command) -> EditorResult<()> {
    match command {
        Command::Undo => {
            editor.undo();
        }
        Command::Redo => {
            editor.redo();
        }
        Command::SelectAll => editor.select_all(),
        Command::DeselectAll => editor.deselect_all(),
        Command::Delete => {
            editor.delete_selected();
        }
        Command::Group => {
            editor.group_selected();
        }
        Command::Ungroup => {
            editor.ungroup_selected();
        }
        Command::Cut => {
            editor.cut();
        }
        Command::Copy => {
            editor.copy();
        }
        Command::Paste => {
            editor.paste()?;
        }
        Command::Connect => {
            editor.connect_selected();
        }
        Command::Disconnect => {
            editor.disconnect_selected();
        }
        Command::Cancel => editor.clean_tool(),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecdraw_core::EditorSettings;

    #[test]
    fn test_parse_steps() {
        let json = r#"{"steps": [
            {"tool": "Line"},
            {"event": "left_down", "point": {"x": 1.0, "y": 2.0}},
            {"sub_tool": "CubicBezier"},
            {"command": "select_all"},
            {"key": "z", "ctrl": true},
            {"select": 0}
        ]}"#;
        let script = Script::from_json(json).unwrap();
        assert_eq!(script.steps.len(), 6);
        assert_eq!(script.steps[0], Step::Tool { tool: ToolKind::Line });
        assert!(matches!(script.steps[1], Step::Event(ToolEvent::LeftDown(_))));
        assert_eq!(
            script.steps[2],
            Step::SubTool {
                sub_tool: PathSubTool::CubicBezier
            }
        );
        assert_eq!(
            script.steps[3],
            Step::Command {
                command: Command::SelectAll
            }
        );
        assert!(matches!(&script.steps[4], Step::Key { ctrl: true, shift: false, .. }));
        assert_eq!(script.steps[5], Step::Select { select: 0 });
    }

    #[test]
    fn test_bad_script_is_script_error() {
        assert!(matches!(Script::from_json("{\"steps\": 3}"), Err(EditorError::Script(_))));
    }

    #[test]
    fn test_run_line_then_undo_shortcut() {
        let script = Script::from_json(
            r#"{"steps": [
                {"tool": "Line"},
                {"event": "left_down", "point": {"x": 0.0, "y": 0.0}},
                {"event": "move", "point": {"x": 50.0, "y": 0.0}},
                {"event": "left_down", "point": {"x": 100.0, "y": 0.0}},
                {"key": "Z", "ctrl": true}
            ]}"#,
        )
        .unwrap();
        let mut editor = Editor::headless(EditorSettings::default());
        script.steps[..4].iter().for_each(|s| apply_step(&mut editor, s).unwrap());
        assert_eq!(editor.scene().current().len(), 1);
        apply_step(&mut editor, &script.steps[4]).unwrap();
        assert!(editor.scene().current().is_empty());
    }

    #[test]
    fn test_errors_name_the_step() {
        let script = Script {
            steps: vec![
                Step::Command {
                    command: Command::SelectAll,
                },
                Step::Select { select: 4 },
            ],
        };
        let mut editor = Editor::headless(EditorSettings::default());
        let Err(EditorError::Script(msg)) = script.run(&mut editor) else {
            panic!("expected a script error");
        };
        assert!(msg.starts_with("step 1:"));
    }

    #[test]
    fn test_paste_with_empty_clipboard_fails() {
        let mut editor = Editor::headless(EditorSettings::default());
        let result = run_command(&mut editor, Command::Paste);
        assert!(matches!(result, Err(EditorError::EmptyClipboard)));
    }
}
