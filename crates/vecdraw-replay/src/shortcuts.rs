//! Keyboard shortcut registry and documentation.

use serde::{Deserialize, Serialize};

/// Editor command reachable from a script or a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Undo,
    Redo,
    SelectAll,
    DeselectAll,
    Delete,
    Group,
    Ungroup,
    Cut,
    Copy,
    Paste,
    Connect,
    Disconnect,
    Cancel,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub command: Command,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, ctrl: bool, shift: bool, command: Command, description: &'static str) -> Self {
        Self {
            key,
            ctrl,
            shift,
            command,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("A", true, false, Command::SelectAll, "Select all shapes"),
            Shortcut::new("A", true, true, Command::DeselectAll, "Clear selection"),
            Shortcut::new("Z", true, false, Command::Undo, "Undo"),
            Shortcut::new("Z", true, true, Command::Redo, "Redo"),
            Shortcut::new("Y", true, false, Command::Redo, "Redo"),
            Shortcut::new("G", true, false, Command::Group, "Group selected shapes"),
            Shortcut::new("G", true, true, Command::Ungroup, "Ungroup selected shapes"),
            Shortcut::new("C", true, false, Command::Copy, "Copy shapes"),
            Shortcut::new("X", true, false, Command::Cut, "Cut shapes"),
            Shortcut::new("V", true, false, Command::Paste, "Paste shapes"),
            Shortcut::new("J", true, false, Command::Connect, "Connect selected points"),
            Shortcut::new("J", true, true, Command::Disconnect, "Disconnect selected shapes"),
            Shortcut::new("Delete", false, false, Command::Delete, "Delete selected shapes"),
            Shortcut::new("Backspace", false, false, Command::Delete, "Delete selected shapes"),
            Shortcut::new("Escape", false, false, Command::Cancel, "Cancel current action"),
        ]
    }

    /// Command bound to a key chord. Keys compare case-insensitively.
    pub fn lookup(key: &str, ctrl: bool, shift: bool) -> Option<Command> {
        Self::all()
            .into_iter()
            .find(|s| s.ctrl == ctrl && s.shift == shift && s.key.eq_ignore_ascii_case(key))
            .map(|s| s.command)
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}
