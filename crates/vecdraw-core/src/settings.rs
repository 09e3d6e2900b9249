//! Editor configuration.

use crate::error::EditorResult;
use crate::input::ModifierKey;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Grid size for snapping.
pub const GRID_SIZE: f64 = 20.0;

/// Distance threshold for line snapping (in world units).
pub const LINE_SNAP_THRESHOLD: f64 = 10.0;

bitflags! {
    /// Which end of a line the fixed-length constraint adjusts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct FixedLengthFlags: u8 {
        const START      = 1 << 0;
        const END        = 1 << 1;
        const VERTICAL   = 1 << 2;
        const HORIZONTAL = 1 << 3;
    }
}

/// Fixed-length constraint applied when the line tool commits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedLength {
    pub flags: FixedLengthFlags,
    pub length: f64,
}

impl Default for FixedLength {
    fn default() -> Self {
        Self {
            flags: FixedLengthFlags::empty(),
            length: 15.0,
        }
    }
}

impl FixedLength {
    pub fn is_enabled(&self) -> bool {
        self.flags.intersects(FixedLengthFlags::START | FixedLengthFlags::END) && self.length > 0.0
    }
}

/// Grid snap configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub enabled: bool,
    pub size: f64,
    pub origin_x: f64,
    pub origin_y: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            size: GRID_SIZE,
            origin_x: 0.0,
            origin_y: 0.0,
        }
    }
}

/// Axis snap to the endpoints of committed lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineSnapSettings {
    pub enabled: bool,
    pub threshold: f64,
}

impl Default for LineSnapSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: LINE_SNAP_THRESHOLD,
        }
    }
}

/// Editor-wide options consulted by tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub hit_test_radius: f64,
    pub connect_points: bool,
    pub connection_radius: f64,
    pub disconnect_points: bool,
    pub disconnect_threshold: f64,
    pub connect_modifier: ModifierKey,
    pub disconnect_modifier: ModifierKey,
    pub additive_modifier: ModifierKey,
    /// Rectangle selection picks points instead of shapes.
    pub point_selection: bool,
    pub split_lines: bool,
    pub scribble_simplify: bool,
    pub scribble_epsilon: f64,
    pub default_is_stroked: bool,
    pub default_is_filled: bool,
    pub default_text: String,
    pub fixed_length: FixedLength,
    pub grid: GridSettings,
    pub line_snap: LineSnapSettings,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            hit_test_radius: 7.0,
            connect_points: true,
            connection_radius: 10.0,
            disconnect_points: true,
            disconnect_threshold: 10.0,
            connect_modifier: ModifierKey::Ctrl,
            disconnect_modifier: ModifierKey::Shift,
            additive_modifier: ModifierKey::Shift,
            point_selection: false,
            split_lines: true,
            scribble_simplify: true,
            scribble_epsilon: 1.0,
            default_is_stroked: true,
            default_is_filled: false,
            default_text: "Text".to_string(),
            fixed_length: FixedLength::default(),
            grid: GridSettings::default(),
            line_snap: LineSnapSettings::default(),
        }
    }
}

impl EditorSettings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = EditorSettings::default();
        assert_eq!(s.hit_test_radius, 7.0);
        assert!(s.connect_points);
        assert_eq!(s.connect_modifier, ModifierKey::Ctrl);
        assert_eq!(s.default_text, "Text");
        assert!(!s.fixed_length.is_enabled());
    }

    #[test]
    fn test_partial_json() {
        let s = EditorSettings::from_json(r#"{"split_lines": false, "grid": {"enabled": true}}"#).unwrap();
        assert!(!s.split_lines);
        assert!(s.grid.enabled);
        assert_eq!(s.grid.size, GRID_SIZE);
        assert_eq!(s.connection_radius, 10.0);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut s = EditorSettings::default();
        s.fixed_length.flags = FixedLengthFlags::END | FixedLengthFlags::HORIZONTAL;
        let back = EditorSettings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(EditorSettings::from_json("{not json").is_err());
    }
}
