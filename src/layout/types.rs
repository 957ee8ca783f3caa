use crate::model::Character;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// A character placed on the canvas. Borrowed from the document for the
/// duration of one render call.
#[derive(Debug, Clone)]
pub struct PositionedNode<'a> {
    pub character: &'a Character,
    pub x: f32,
    pub y: f32,
    pub color: String,
}

impl PositionedNode<'_> {
    pub fn name(&self) -> &str {
        &self.character.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelBox {
    /// Label anchor (text center).
    pub x: f32,
    pub y: f32,
    /// Signed perpendicular offset applied to the midpoint.
    pub offset: f32,
    pub text: String,
    pub rect_x: f32,
    pub rect_y: f32,
    pub width: f32,
    pub height: f32,
    pub baseline_y: f32,
}
