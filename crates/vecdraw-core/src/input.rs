//! Pointer events delivered to tools.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self { shift: true, ..Self::NONE }
    }

    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::NONE }
    }

    /// Whether the configured key is held. [`ModifierKey::None`] is never held.
    pub fn has(&self, key: ModifierKey) -> bool {
        match key {
            ModifierKey::None => false,
            ModifierKey::Shift => self.shift,
            ModifierKey::Ctrl => self.ctrl,
            ModifierKey::Alt => self.alt,
            ModifierKey::Meta => self.meta,
        }
    }
}

/// A single modifier key, as named in editor settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModifierKey {
    #[default]
    None,
    Shift,
    Ctrl,
    Alt,
    Meta,
}

/// Pointer location (world coordinates) and held modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputArgs {
    pub point: Point,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl InputArgs {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            point: Point::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Input event routed to the active tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ToolEvent {
    LeftDown(InputArgs),
    LeftUp(InputArgs),
    RightDown(InputArgs),
    RightUp(InputArgs),
    Move(InputArgs),
}
