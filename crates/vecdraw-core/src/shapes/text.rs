//! Text shape.

use super::{PointSlots, ShapeId};
use serde::{Deserialize, Serialize};

/// Text laid out in the box spanned by two corner points.
///
/// `{name}` placeholders in `text` are bound from the shape's properties
/// and record when drawn, see [`super::bind_text`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextShape {
    pub top_left: ShapeId,
    pub bottom_right: ShapeId,
    pub text: String,
}

impl TextShape {
    pub fn new(top_left: ShapeId, bottom_right: ShapeId, text: impl Into<String>) -> Self {
        Self {
            top_left,
            bottom_right,
            text: text.into(),
        }
    }

    /// Replace the text. Returns whether it changed.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.text == text {
            return false;
        }
        self.text = text;
        true
    }
}

impl PointSlots for TextShape {
    fn slots(&self) -> Vec<ShapeId> {
        vec![self.top_left, self.bottom_right]
    }

    fn slots_mut(&mut self) -> Vec<&mut ShapeId> {
        vec![&mut self.top_left, &mut self.bottom_right]
    }
}
