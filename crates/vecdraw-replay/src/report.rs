//! Document summary printed after a replay.

use kurbo::Point;
use serde::Serialize;
use vecdraw_core::{Editor, ShapeId, ToolHost};

/// One shape on the current layer.
#[derive(Debug, Clone, Serialize)]
pub struct ShapeSummary {
    pub kind: &'static str,
    pub name: String,
    pub selected: bool,
    /// Every point the shape references, deduplicated, in drawing order.
    pub points: Vec<Point>,
    /// How many of those points another layer shape also references.
    pub shared_points: usize,
}

/// State of the editor after a replay.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub tool: &'static str,
    pub shapes: Vec<ShapeSummary>,
    /// Arena entries, points included.
    pub arena: usize,
    pub working: usize,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl Summary {
    pub fn from_editor<H: ToolHost>(editor: &Editor<H>) -> Self {
        let scene = editor.scene();
        let selection = editor.selection().snapshot();
        let shapes = scene
            .current()
            .shapes()
            .iter()
            .filter_map(|&id| {
                let shape = scene.get(id)?;
                let points: Vec<ShapeId> = scene.points(id);
                let shared_points = points.iter().filter(|&&p| scene.owners_of(p).len() > 1).count();
                Some(ShapeSummary {
                    kind: shape.kind.name(),
                    name: shape.name().to_string(),
                    selected: selection.is_selected(id),
                    points: points.iter().filter_map(|&p| scene.position(p)).collect(),
                    shared_points,
                })
            })
            .collect();
        Self {
            tool: editor.tool().name(),
            shapes,
            arena: scene.arena_len(),
            working: scene.working().len(),
            can_undo: scene.can_undo(),
            can_redo: scene.can_redo(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecdraw_core::{EditorSettings, InputArgs, ToolKind};

    #[test]
    fn test_summary_of_connected_lines() {
        let mut editor = Editor::headless(EditorSettings::default());
        editor.set_tool(ToolKind::Line);
        for (x, y) in [(0.0, 0.0), (100.0, 0.0), (100.0, 0.0), (100.0, 100.0)] {
            editor.left_down(InputArgs::new(x, y));
        }
        let summary = Summary::from_editor(&editor);
        assert_eq!(summary.tool, "line");
        assert_eq!(summary.shapes.len(), 2);
        assert_eq!(summary.shapes[0].kind, "line");
        assert_eq!(summary.shapes[0].points, vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
        assert_eq!(summary.shapes[0].shared_points, 1);
        assert_eq!(summary.working, 0);
        assert!(summary.can_undo);

        let json = summary.to_json().unwrap();
        assert!(json.contains("\"shared_points\": 1"));
    }
}
