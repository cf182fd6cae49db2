//! Builder for creating Detection objects from various box formats.

use crate::tracker::{Detection, Rect};

/// Builder for [`Detection`]s from the box layouts detectors commonly emit.
#[derive(Debug, Clone, Default)]
pub struct DetectionBuilder {
    rect: Rect,
    label: i32,
    name: Option<String>,
    score: f32,
}

impl DetectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.rect = Rect::from_tlbr(x1, y1, x2, y2);
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.rect = Rect::new(cx - w / 2.0, cy - h / 2.0, w, h);
        self
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.rect = Rect::new(x, y, w, h);
        self
    }

    /// Scale the box from model input resolution back to frame resolution.
    pub fn scale(mut self, sx: f32, sy: f32) -> Self {
        self.rect = Rect::new(
            self.rect.x * sx,
            self.rect.y * sy,
            self.rect.width * sx,
            self.rect.height * sy,
        );
        self
    }

    pub fn label(mut self, label: i32) -> Self {
        self.label = label;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    pub fn build(self) -> Detection {
        Detection {
            bbox: self.rect,
            label: self.label,
            name: self.name,
            score: self.score,
        }
    }
}
